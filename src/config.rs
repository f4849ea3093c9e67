//! Console configuration.
//!
//! Resolution order, highest wins:
//! 1. Environment (`KBCONSOLE_BASE_URL`, `KBCONSOLE_TOKEN_PATH`)
//! 2. Config file `config.toml` in the user config directory
//! 3. Built-in defaults (local backend, platform token path)

use crate::auth::TokenFile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend URL used when nothing is configured (local dev stack).
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Env var overriding the backend base URL.
pub const ENV_BASE_URL: &str = "KBCONSOLE_BASE_URL";

/// Env var overriding the persisted-token path.
pub const ENV_TOKEN_PATH: &str = "KBCONSOLE_TOKEN_PATH";

/// Connection settings for the console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the admin backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Override for the persisted-token location.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_path: None,
        }
    }
}

impl ConsoleConfig {
    /// Build purely from environment variables. `None` when the base URL
    /// is not set (the file/default path should be consulted instead).
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var(ENV_BASE_URL).ok()?;
        if base_url.is_empty() {
            return None;
        }
        let token_path = std::env::var(ENV_TOKEN_PATH).ok().map(PathBuf::from);
        Some(Self {
            base_url,
            token_path,
        })
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Resolve the effective configuration: env, then file, then
    /// defaults. Never fails; a broken config file logs a warning and
    /// falls through to defaults.
    pub fn load() -> Self {
        if let Some(config) = Self::from_env() {
            return config;
        }
        if let Some(path) = Self::default_file_path() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return config,
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring unreadable config file");
                    }
                }
            }
        }
        Self::default()
    }

    /// Default location of the config file.
    pub fn default_file_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "kbconsole")?;
        Some(dirs.config_dir().join("config.toml"))
    }

    /// The token-file handle this configuration selects.
    pub fn token_file(&self) -> TokenFile {
        let path = self
            .token_path
            .clone()
            .or_else(TokenFile::default_path)
            // Last-resort relative path for platforms without a home dir.
            .unwrap_or_else(|| PathBuf::from(".kbconsole_token"));
        TokenFile::new(path)
    }
}
