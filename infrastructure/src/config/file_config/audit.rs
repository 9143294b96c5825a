//! Audit log configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vote audit trail settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    pub enabled: bool,
    /// JSONL file that audit events are appended to
    pub path: Option<PathBuf>,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: Self::default_path(),
        }
    }
}

impl FileAuditConfig {
    /// `$XDG_DATA_HOME/sighting/votes.jsonl`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("sighting").join("votes.jsonl"))
    }

    /// Path to write to, if auditing is on
    pub fn active_path(&self) -> Option<&PathBuf> {
        if self.enabled {
            self.path.as_ref().filter(|p| !p.as_os_str().is_empty())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        let config = FileAuditConfig::default();
        assert!(!config.enabled);
        assert!(config.active_path().is_none());
    }

    #[test]
    fn test_active_path_when_enabled() {
        let toml_str = r#"
[audit]
enabled = true
path = "/tmp/votes.jsonl"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.audit.active_path(),
            Some(&PathBuf::from("/tmp/votes.jsonl"))
        );
    }
}
