//! Progress reporting for vote cache refreshes

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sighting_application::ProgressNotifier;
use sighting_domain::ObservationId;
use std::sync::{Mutex, PoisonError};

/// Progress bar over the observations of a refresh run
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    failures: Mutex<usize>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            failures: Mutex::new(0),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_prefix("Refreshing vote caches");
        pb.set_message("Starting...");
        *self.failures.lock().unwrap_or_else(PoisonError::into_inner) = 0;
        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_observation_complete(&self, id: &ObservationId, success: bool) {
        if !success {
            *self.failures.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        }
        if let Some(pb) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), id)
            } else {
                format!("{} {}", "x".red(), id)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_complete(&self) {
        let failures = *self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            if failures == 0 {
                pb.finish_with_message(format!("{}", "done".green()));
            } else {
                pb.finish_with_message(format!("{} ({} failed)", "done".yellow(), failures));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_start(&self, total: usize) {
        println!(
            "{} {} ({} observations)",
            "->".cyan(),
            "Refreshing vote caches".bold(),
            total
        );
    }

    fn on_observation_complete(&self, id: &ObservationId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), id);
        } else {
            println!("  {} {} (failed)", "x".red(), id);
        }
    }

    fn on_complete(&self) {
        println!();
    }
}
