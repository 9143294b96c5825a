//! Presentation layer for sighting
//!
//! This crate contains CLI definitions, the scenario replay runner, output
//! formatters and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;
pub mod replay;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{ReplayOutput, ReportFormatter};
pub use output::view::{NamingView, ObservationView, VoteView, observation_views};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use replay::{
    ReplayAction, ReplayError, ReplayReport, ReplayRunner, ReplayScript, ScriptError, StepOutcome,
};
