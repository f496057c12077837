//! Process configuration
//!
//! Loaded once at startup and never mutated afterwards. The cookie secret is
//! read from the environment, never from the config file, and never logged.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Environment variable holding the cookie signing secret
pub const SECRET_ENV: &str = "BLOGCORE_COOKIE_SECRET";

/// Minimum secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cookie secret not set: export {0} (try `blogcore gen-secret`)")]
    MissingSecret(String),

    #[error("invalid cookie secret: {0}")]
    InvalidSecret(String),

    #[error("failed to read config: {0}")]
    Read(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The process-wide HMAC key for session cookies
#[derive(Clone)]
pub struct CookieSecret(Arc<[u8]>);

impl CookieSecret {
    /// Wrap raw key bytes, rejecting anything shorter than [`MIN_SECRET_LEN`]
    pub fn new(bytes: Vec<u8>) -> ConfigResult<Self> {
        if bytes.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidSecret(format!(
                "must be at least {} bytes, got {}",
                MIN_SECRET_LEN,
                bytes.len()
            )));
        }
        Ok(Self(bytes.into()))
    }

    /// Read the secret from [`SECRET_ENV`]
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_var(SECRET_ENV)
    }

    /// Read the secret from a named environment variable
    pub fn from_env_var(name: &str) -> ConfigResult<Self> {
        match std::env::var(name) {
            Ok(value) if !value.is_empty() => Self::new(value.into_bytes()),
            _ => Err(ConfigError::MissingSecret(name.to_string())),
        }
    }

    /// A fresh random secret, hex encoded, suitable for [`SECRET_ENV`]
    pub fn generate_hex() -> String {
        let mut bytes = [0u8; MIN_SECRET_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[cfg(test)]
    pub(crate) fn new_unchecked(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl fmt::Debug for CookieSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CookieSecret(<redacted>)")
    }
}

/// Session cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the signed user id (default: "user_id")
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

fn default_cookie_name() -> String {
    "user_id".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        let name = &self.session.cookie_name;
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Invalid(format!(
                "cookie_name '{}' must be non-empty and use [A-Za-z0-9_-]",
                name
            )));
        }
        Ok(())
    }
}
