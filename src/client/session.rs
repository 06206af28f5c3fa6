//! Durable session storage.
//!
//! The token and the account snapshot from login are written to a JSON file
//! so a restart can resume without re-entering credentials. The file lives in
//! the platform data directory by default; tests point it at a temp path.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::user::User;

const SESSION_FILE: &str = "session.json";

/// A persisted login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store in the platform data directory.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "auntrack", "auntrack")
            .context("Could not determine data directory")?;
        Ok(Self::at(dirs.data_dir().join(SESSION_FILE)))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if any. A corrupt file is treated as no
    /// session and removed.
    pub fn load(&self) -> Option<Session> {
        let text = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&text) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("Discarding unreadable session file: {}", e);
                let _ = fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(session).context("Failed to encode session")?;
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!("Failed to remove session file: {}", e);
            }
        }
    }
}
