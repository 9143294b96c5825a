//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout and are deserialized
//! directly, using domain types where one exists.

mod audit;
mod catalog;
mod output;

pub use audit::FileAuditConfig;
pub use catalog::FileCatalogConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use sighting_domain::config::validation::{ConfigIssue, ConfigIssueCode};
use std::path::Path;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Catalog snapshot settings
    pub catalog: FileCatalogConfig,
    /// Vote audit trail
    pub audit: FileAuditConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Check the configuration, returning every detected issue.
    ///
    /// Nothing here is fatal to loading; the caller decides what to do with
    /// errors versus warnings.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let empty = |path: &Option<std::path::PathBuf>| {
            path.as_deref().is_some_and(|p: &Path| p.as_os_str().is_empty())
        };

        if empty(&self.catalog.path) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyPath {
                    field: "catalog.path".to_string(),
                },
                "catalog.path is set but empty",
            ));
        }

        if self.catalog.save_on_exit && self.catalog.path.is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::SaveWithoutCatalog,
                "catalog.save_on_exit is set but catalog.path is not; nothing will be saved",
            ));
        }

        if self.audit.enabled {
            if self.audit.path.is_none() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::AuditPathMissing,
                    "audit.enabled is true but no audit.path could be determined; auditing is off",
                ));
            } else if empty(&self.audit.path) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyPath {
                        field: "audit.path".to_string(),
                    },
                    "audit.path is set but empty",
                ));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sighting_domain::config::validation::Severity;
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[catalog]
path = "catalog.json"

[audit]
enabled = true
path = "votes.jsonl"

[output]
format = "json"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog.path, Some(PathBuf::from("catalog.json")));
        assert!(config.audit.enabled);
        assert!(config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.catalog.path.is_none());
        assert!(!config.audit.enabled);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_save_without_catalog_warns() {
        let config: FileConfig = toml::from_str("[catalog]\nsave_on_exit = true\n").unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::SaveWithoutCatalog);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_empty_paths_are_errors() {
        let toml_str = r#"
[catalog]
path = ""

[audit]
enabled = true
path = ""
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(ConfigIssue::is_error));
    }

    #[test]
    fn test_audit_without_path_warns() {
        let mut config = FileConfig::default();
        config.audit.enabled = true;
        config.audit.path = None;
        let issues = config.validate();
        assert_eq!(issues[0].code, ConfigIssueCode::AuditPathMissing);
    }
}
