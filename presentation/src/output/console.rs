//! Console output formatter for replay results

use super::formatter::ReportFormatter;
use super::view::{NamingView, ObservationView};
use crate::replay::{ReplayReport, StepOutcome};
use colored::Colorize;
use sighting_domain::{Agreement, ConsensusOutcome};

/// Formats replay results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Human wording for an agreement level
    pub fn agreement_text(label: Agreement) -> &'static str {
        match label {
            Agreement::NoOpinion => "No opinion",
            Agreement::Percent100 => "I'd call it that",
            Agreement::Percent80 => "Promising",
            Agreement::Percent60 => "Could be",
            Agreement::Percent40 => "Doubtful",
            Agreement::Percent20 => "Not likely",
            Agreement::Percent0 => "As if!",
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn totals(report: &ReplayReport) -> String {
        let failed = report.failed();
        let failed_text = if failed > 0 {
            format!("{} failed", failed).red().to_string()
        } else {
            "0 failed".to_string()
        };
        format!(
            "{} {} applied, {} unchanged, {}\n",
            "Steps:".cyan().bold(),
            report.applied(),
            report.unchanged(),
            failed_text
        )
    }

    fn outcome_line(observation: &ObservationView) -> String {
        let id = format!("{} (owner {})", observation.id, observation.owner).bold();
        match &observation.outcome {
            ConsensusOutcome::Agreed { name, score } => {
                format!("{}  {} {}", id, name.text().green(), format!("{:.2}", score).dimmed())
            }
            ConsensusOutcome::Tied { .. } => {
                format!("{}  {}", id, observation.outcome.to_string().yellow())
            }
            ConsensusOutcome::NoCandidates => {
                format!("{}  {}", id, "no consensus".dimmed())
            }
        }
    }

    fn naming_block(naming: &NamingView) -> String {
        let mut output = String::new();
        let mut marks = Vec::new();
        if naming.consensus {
            marks.push("consensus".green().to_string());
        }
        if naming.owner_favorite {
            marks.push("owner's favorite".cyan().to_string());
        }
        if !naming.deletable {
            marks.push("locked".yellow().to_string());
        }
        output.push_str(&format!(
            "  {} {} by {}  score {:.2} ({:.0}%){}\n",
            format!("[{}]", naming.id).dimmed(),
            naming.name.text().bold(),
            naming.author,
            naming.score,
            naming.percent,
            if marks.is_empty() {
                String::new()
            } else {
                format!("  {}", marks.join(", "))
            }
        ));

        for row in naming.table.rows.iter().filter(|r| r.count > 0) {
            let users: Vec<&str> = row.users.iter().map(|u| u.as_str()).collect();
            output.push_str(&format!(
                "      {:>+3} {:<18} {:>2} vote(s)  weight {:>5.2}  {}\n",
                row.value,
                Self::agreement_text(row.label),
                row.count,
                row.weight,
                users.join(", ").dimmed()
            ));
        }
        for vote in naming.votes.iter().filter(|v| v.favorite) {
            output.push_str(&format!(
                "      {} {}\n",
                "*".yellow(),
                format!("favorite of {}", vote.user).dimmed()
            ));
        }
        output
    }

    fn steps(report: &ReplayReport) -> String {
        let mut output = Self::section_header("Steps");
        for step in &report.steps {
            let line = match &step.outcome {
                StepOutcome::Applied { detail } => {
                    format!("{} {}  {}", "v".green(), step.action, detail.dimmed())
                }
                StepOutcome::Unchanged => {
                    format!("{} {}  {}", "=".dimmed(), step.action, "unchanged".dimmed())
                }
                StepOutcome::Failed { error } => {
                    format!("{} {}  {}", "x".red(), step.action, error.red())
                }
            };
            output.push_str(&format!("{:>3}. {}\n", step.index, line));
        }
        output
    }

    fn failures(report: &ReplayReport) -> String {
        let mut output = String::new();
        for step in report.failures() {
            if let StepOutcome::Failed { error } = &step.outcome {
                output.push_str(&format!(
                    "  {} step {} ({}): {}\n",
                    "x".red(),
                    step.index,
                    step.action,
                    error
                ));
            }
        }
        output
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_summary(&self, report: &ReplayReport, observations: &[ObservationView]) -> String {
        let mut output = String::new();
        output.push_str(&Self::totals(report));
        output.push_str(&Self::failures(report));
        output.push('\n');
        for observation in observations {
            output.push_str(&Self::outcome_line(observation));
            output.push('\n');
        }
        output
    }

    fn format_full(&self, report: &ReplayReport, observations: &[ObservationView]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Naming Consensus"));
        output.push('\n');
        output.push_str(&Self::totals(report));
        output.push_str(&Self::steps(report));

        output.push_str(&Self::section_header("Observations"));
        for observation in observations {
            output.push('\n');
            output.push_str(&Self::outcome_line(observation));
            output.push('\n');
            for naming in &observation.namings {
                output.push_str(&Self::naming_block(naming));
            }
        }

        output.push_str(&format!("\n{}\n", "=".repeat(60).cyan()));
        output
    }
}
