//! Durable storage for the bearer token.
//!
//! One plain-text file under the user's config directory. Absence of the
//! file means logged out; there is no other persisted auth state.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Name of the config subdirectory and token file.
const APP_DIR: &str = "kbconsole";
const TOKEN_FILE: &str = "auth_token";

/// Handle to the persisted-token location.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Use an explicit token path (tests, config override).
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The platform-default token path, e.g.
    /// `~/.config/kbconsole/auth_token` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", APP_DIR)?;
        Some(dirs.config_dir().join(TOKEN_FILE))
    }

    /// Where this handle reads and writes.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the stored token. `None` if the file is missing, unreadable,
    /// or blank.
    pub fn load(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Persist a token, creating parent directories as needed.
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    /// Remove the stored token. Missing file is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}
