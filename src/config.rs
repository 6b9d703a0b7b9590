//! Planner runtime settings.
//!
//! A small TOML config controls the repair behavior and the athlete FTP
//! used by the bundled TSS estimator. Missing config falls back to
//! defaults; the engine itself never touches the filesystem.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Runtime settings for the week planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Whether the repair step runs when every validation scenario fails
    pub auto_fix: bool,
    /// Athlete FTP in watts (50-600)
    pub ftp: u16,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            auto_fix: true,
            ftp: 200,
        }
    }
}

impl PlannerSettings {
    /// Validate FTP value (50-600 watts).
    pub fn validate_ftp(ftp: u16) -> bool {
        (50..=600).contains(&ftp)
    }
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    directories::ProjectDirs::from("com", "pedalplan", "PedalPlan")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Load planner settings from the default config path.
pub fn load_settings() -> Result<PlannerSettings, ConfigError> {
    load_settings_from(&get_config_path())
}

/// Load planner settings from a specific path.
///
/// A missing file is not an error; defaults are returned.
pub fn load_settings_from(path: &Path) -> Result<PlannerSettings, ConfigError> {
    if !path.exists() {
        return Ok(PlannerSettings::default());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save planner settings to a specific path.
pub fn save_settings_to(settings: &PlannerSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(settings).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
