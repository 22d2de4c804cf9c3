//! Configuration loading for the SMS code entry screen.
//!
//! Reads `~/.smscode/config.toml`. A missing file is not an error; a file that
//! cannot be read or parsed is reported so the caller can fall back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use smscode_types::ui::UiOptions;
use thiserror::Error;

const CONFIG_DIR: &str = ".smscode";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable selecting the UI mode when the config file does not.
pub const TUI_ENV_VAR: &str = "SMSCODE_TUI";

#[derive(Debug, Default, Deserialize)]
pub struct SmsCodeConfig {
    pub app: Option<AppConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// "full" (alternate screen) or "inline".
    pub tui: Option<String>,
    /// Use ASCII-only glyphs for box borders and markers.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// How the screen occupies the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Full,
    Inline,
}

impl UiMode {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "inline" => Some(UiMode::Inline),
            "full" | "fullscreen" => Some(UiMode::Full),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var(TUI_ENV_VAR)
            .ok()
            .and_then(|value| Self::parse(&value))
    }
}

impl SmsCodeConfig {
    /// Loads the user config. `Ok(None)` when there is no home directory or no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }

    /// UI mode named in the config file, if any. Unknown names are logged and ignored.
    #[must_use]
    pub fn ui_mode(&self) -> Option<UiMode> {
        let raw = self.app.as_ref().and_then(|app| app.tui.as_ref())?;
        let mode = UiMode::parse(raw);
        if mode.is_none() {
            tracing::warn!("Unknown tui mode in config: {}", raw);
        }
        mode
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}
