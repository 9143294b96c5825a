//! Catalog configuration from TOML (`[catalog]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the observation catalog snapshot lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// JSON snapshot loaded before a replay
    pub path: Option<PathBuf>,
    /// Write the replay result back to `path`
    pub save_on_exit: bool,
}
