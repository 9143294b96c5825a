//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Report format for replay results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Consensus per observation
    Summary,
    /// Consensus plus per-naming vote tables
    Full,
    /// JSON output
    Json,
}

impl From<OutputFormat> for sighting_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Full => Self::Full,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for sighting
#[derive(Parser, Debug)]
#[command(name = "sighting")]
#[command(author, version, about = "Replay naming votes on observations and report the consensus")]
#[command(long_about = r#"
Sighting replays a script of naming proposals and votes against a catalog of
observations, then reports which name each observation has settled on.

Votes range from -3 (as if!) to +3 (I'd call it that). A voter's weight
grows with the log of their contribution score, and an observation's owner
gets one extra unit on their own observation.

Configuration files are loaded from (in priority order):
1. --config <path>       Explicit config file
2. ./sighting.toml       Project-level config
3. ~/.config/sighting/config.toml   Global config

Example:
  sighting votes.json
  sighting --output full --save catalog.json votes.json
  sighting --show-config
"#)]
pub struct Cli {
    /// Replay script (JSON)
    pub script: Option<PathBuf>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Catalog snapshot to start from (overrides [catalog] path)
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Write the resulting catalog to this file
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Stop at the first action that fails
    #[arg(long)]
    pub strict: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
