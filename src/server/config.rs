//! Server configuration.
//!
//! Values come from `auntrack.toml` (working directory first, then the
//! platform config directory), with environment variables taking precedence:
//! `AUNTRACK_BIND`, `AUNTRACK_DATABASE`, `AUNTRACK_JWT_SECRET`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

const CONFIG_FILE: &str = "auntrack.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind: String,
    /// Path to the SQLite database file.
    pub database_path: String,
    /// Secret used to sign session tokens.
    pub jwt_secret: String,
    /// Session token validity in hours.
    pub token_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".to_string(),
            database_path: "auntrack.db".to_string(),
            jwt_secret: "change-me-in-production".to_string(),
            token_ttl_hours: 24,
        }
    }
}

impl ServerConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(bind) = std::env::var("AUNTRACK_BIND") {
            config.bind = bind;
        }
        if let Ok(db) = std::env::var("AUNTRACK_DATABASE") {
            config.database_path = db;
        }
        if let Ok(secret) = std::env::var("AUNTRACK_JWT_SECRET") {
            config.jwt_secret = secret;
        }

        if config.jwt_secret == ServerConfig::default().jwt_secret {
            log::warn!("Using the default JWT secret; set AUNTRACK_JWT_SECRET in production");
        }

        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        ProjectDirs::from("com", "auntrack", "auntrack")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .filter(|path| path.exists())
    }
}
