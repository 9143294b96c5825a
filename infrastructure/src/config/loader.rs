//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["sighting.toml", ".sighting.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./sighting.toml` or `./.sighting.toml`
    /// 3. Global: `$XDG_CONFIG_HOME/sighting/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_from(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
    }

    /// Merge the given files over the defaults; missing files are skipped
    pub fn load_from(
        global: Option<&Path>,
        project: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // An explicit file must exist
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sighting").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./sighting.toml or ./.sighting.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sighting_domain::OutputFormat;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.catalog.path.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_names_app() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.ends_with("sighting/config.toml"));
        }
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("sighting.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&global, "[output]\nformat = \"full\"\ncolor = false\n").unwrap();
        fs::write(&project, "[catalog]\npath = \"project.json\"\n").unwrap();
        fs::write(&explicit, "[output]\nformat = \"json\"\n").unwrap();

        let config =
            ConfigLoader::load_from(Some(&global), Some(&project), Some(&explicit)).unwrap();
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert_eq!(config.catalog.path, Some(PathBuf::from("project.json")));
    }

    #[test]
    fn test_missing_optional_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_from(
            Some(&dir.path().join("nope.toml")),
            Some(&dir.path().join("also-nope.toml")),
            None,
        )
        .unwrap();
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load_from(None, None, Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_value_fails() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("bad.toml");
        fs::write(&explicit, "[output]\nformat = \"yaml\"\n").unwrap();
        assert!(ConfigLoader::load_from(None, None, Some(&explicit)).is_err());
    }
}
