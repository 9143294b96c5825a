//! Output formatter trait

use super::view::ObservationView;
use crate::replay::ReplayReport;
use serde::Serialize;
use sighting_domain::OutputFormat;

/// Everything a JSON report contains
#[derive(Debug, Serialize)]
pub struct ReplayOutput<'a> {
    pub replay: &'a ReplayReport,
    pub observations: &'a [ObservationView],
}

/// Trait for formatting replay results
pub trait ReportFormatter {
    /// Replay totals and the consensus of each observation
    fn format_summary(&self, report: &ReplayReport, observations: &[ObservationView]) -> String;

    /// Summary plus every step and a vote table per naming
    fn format_full(&self, report: &ReplayReport, observations: &[ObservationView]) -> String;

    /// Format as JSON
    fn format_json(&self, report: &ReplayReport, observations: &[ObservationView]) -> String {
        let output = ReplayOutput {
            replay: report,
            observations,
        };
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format(
        &self,
        format: OutputFormat,
        report: &ReplayReport,
        observations: &[ObservationView],
    ) -> String {
        match format {
            OutputFormat::Summary => self.format_summary(report, observations),
            OutputFormat::Full => self.format_full(report, observations),
            OutputFormat::Json => self.format_json(report, observations),
        }
    }
}
