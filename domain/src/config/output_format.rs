//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for replay reports
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Consensus per observation only (default)
    #[default]
    Summary,
    /// Consensus plus per-naming vote tables
    Full,
    /// JSON output
    Json,
}
