//! Server configuration parsed from environment variables.
//!
//! Every knob has a typed default except `DATABASE_URL`. Parsing goes through a
//! lookup function so tests can feed a map instead of mutating the process env.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
pub const DEFAULT_GENERATE_MAX_TOKENS: u32 = 4096;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Upper bound on request bodies. Shared canvases carry base64 images.
    pub max_body_bytes: usize,
    pub generate_max_tokens: u32,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unparseable values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        Ok(Self {
            port: env_parse(&lookup, "PORT", DEFAULT_PORT),
            database_url,
            db_max_connections: env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            max_body_bytes: env_parse(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
            generate_max_tokens: env_parse(&lookup, "GENERATE_MAX_TOKENS", DEFAULT_GENERATE_MAX_TOKENS),
        })
    }
}

/// Parse `key` through `lookup`, keeping `default` when absent or malformed.
pub fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Outcome of loading `.env`, held until tracing is installed.
#[derive(Debug, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    Absent,
    Failed(String),
}

impl DotenvStatus {
    #[must_use]
    pub fn from_result(result: Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::Absent,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            Self::Loaded(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Self::Absent => tracing::debug!("no .env file"),
            Self::Failed(error) => tracing::warn!(%error, ".env could not be loaded"),
        }
    }
}
