//! # Configuration
//!
//! [`AppConfig`] is read from an optional YAML file, then overridden from
//! the environment.
//!
//! | Source                 | Key                    | Default        |
//! |------------------------|------------------------|----------------|
//! | `port`                 | `PORT`                 | `8080`         |
//! | `database_url`         | `DATABASE_URL`         | unset (memory) |
//! | `uploads_dir`          | `UPLOADS_DIR`          | `uploads`      |
//! | `max_upload_bytes`     | -                      | 32 MiB         |
//! | `cors.allowed_origins` | `CORS_ALLOWED_ORIGINS` | empty          |
//!
//! The file path comes from `REQDOC_CONFIG`. When that variable is unset and
//! the default `configs.yml` does not exist, defaults are used. An explicitly
//! named file that is missing is an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Config file read when `REQDOC_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "configs.yml";

/// Errors while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for [`AppConfig`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Cross-origin settings for browser clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to send credentialed requests. Empty means permissive.
    pub allowed_origins: Vec<String>,
}

/// Application configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres connection URL. `None` selects the in-memory backend.
    pub database_url: Option<String>,
    /// Directory uploaded document files are written to.
    pub uploads_dir: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    pub cors: CorsConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("uploads_dir", &self.uploads_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors", &self.cors)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            uploads_dir: PathBuf::from("uploads"),
            max_upload_bytes: 32 * 1024 * 1024,
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from the config file named by `REQDOC_CONFIG` and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let mut config = match lookup("REQDOC_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Parse a YAML config file. Absent keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PORT") {
            self.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key: "PORT", value })?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(dir) = lookup("UPLOADS_DIR").filter(|v| !v.trim().is_empty()) {
            self.uploads_dir = PathBuf::from(dir);
        }
        if let Some(origins) = lookup("CORS_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }
}
