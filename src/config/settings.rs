//! Application settings and paths.
//!
//! Defaults for the scan front end, read from an XDG-compliant settings file.

use crate::cli::OutputFormat;
use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{DEFAULT_TIMEOUT, DEFAULT_WORKERS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsweep)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory without creating it.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portsweep", "portsweep")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Front-end defaults, overridden by flags and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Workers per target.
    pub default_workers: usize,
    /// Per-operation timeout in seconds.
    pub default_timeout_secs: u64,
    pub default_output_format: OutputFormat,
    /// Draw a progress bar for plain output.
    pub show_progress: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_workers: DEFAULT_WORKERS,
            default_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            default_output_format: OutputFormat::Plain,
            show_progress: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when there is no settings file or no home directory.
    pub fn load() -> ConfigResult<Self> {
        let file = match Paths::discover() {
            Ok(paths) => paths.settings_file(),
            Err(ConfigError::DirectoryNotFound) => return Ok(Self::default()),
            Err(e) => return Err(e),
        };

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file. The file must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_workers, 100);
        assert_eq!(settings.default_timeout_secs, 5);
        assert_eq!(settings.default_output_format, OutputFormat::Plain);
        assert!(settings.show_progress);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_workers": 20, "default_output_format": "json"}}"#).unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.default_workers, 20);
        assert_eq!(settings.default_output_format, OutputFormat::Json);
        assert_eq!(settings.default_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "workers = 20").unwrap();

        assert!(matches!(
            AppSettings::load_from(file.path()),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");

        assert!(matches!(
            AppSettings::load_from(&missing),
            Err(ConfigError::ReadFailed { .. })
        ));
    }
}
