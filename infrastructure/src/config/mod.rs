//! Configuration file loading for sighting
//!
//! Handles file I/O and merging of configuration from several sources.
//! Priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./sighting.toml` or `./.sighting.toml`
//! 3. Global: `$XDG_CONFIG_HOME/sighting/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{FileAuditConfig, FileCatalogConfig, FileConfig, FileOutputConfig};
pub use loader::ConfigLoader;
