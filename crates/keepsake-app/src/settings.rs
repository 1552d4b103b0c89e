//! Application settings stored as TOML in the user's config directory.
//!
//! A missing or unreadable file yields the defaults. Command-line flags
//! override what is loaded here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use keepsake_model::User;
use keepsake_persistence::{AutoSaveConfig, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};

use crate::auth::Auth;
use crate::error::{AppError, Result};

// =============================================================================
// ROOT SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: EndpointSettings,
    pub autosave: AutoSaveConfig,
    pub auth: AuthSettings,
    pub session: SessionSettings,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "invalid settings file, using defaults");
            Self::default()
        })
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| AppError::SettingsIo {
                operation: "create directory for",
                path: path.to_path_buf(),
                source,
            })?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|source| AppError::SettingsFormat { source })?;
        std::fs::write(path, content).map_err(|source| AppError::SettingsIo {
            operation: "write",
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("app", "Keepsake", "keepsake")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Where the data document lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// `None` keeps data in memory only.
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl EndpointSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub password: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            password: Auth::DEFAULT_PASSWORD.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Who is using the app when it starts.
    pub default_user: User,
}
