//! Workspace settings for scssp.
//!
//! A single setting lives in `scssp.toml` at the workspace root: the
//! workspace-relative path of the main stylesheet. A missing or malformed
//! file falls back to defaults so the server always starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the settings file at the workspace root.
pub const SETTINGS_FILE: &str = "scssp.toml";

/// Fallback main stylesheet path when nothing is configured.
pub const DEFAULT_MAIN_STYLESHEET: &str = "src/assets/scss/style.scss";

/// Settings loaded from scssp.toml.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Workspace-relative path to the main stylesheet.
    pub main_stylesheet: Option<PathBuf>,
}

impl Settings {
    /// The configured main stylesheet path, or the default.
    pub fn main_stylesheet_path(&self) -> PathBuf {
        self.main_stylesheet
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MAIN_STYLESHEET))
    }
}

/// A failure while persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be written.
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Load settings from a scssp.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", path.display(), e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Write settings back to a scssp.toml file.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}
