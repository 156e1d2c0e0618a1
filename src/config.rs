//! Application settings loaded from command-line flags, the environment,
//! and an optional `.env` file.

use crate::http::HttpSettings;
use axum::http::HeaderValue;
use clap::Args;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Errors raised while validating settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A configured CORS origin is not a valid header value or lacks a
    /// scheme.
    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    /// Wildcard origins cannot be combined with credentialed requests.
    #[error("wildcard CORS origin is not allowed with credentials")]
    WildcardOrigin,

    /// The dotenv file exists but could not be read or parsed.
    #[error("failed to load environment file: {0}")]
    EnvFile(String),
}

/// Loads variables from the dotenv file at `path` into the process
/// environment. Variables that are already set keep their values.
///
/// Returns `Ok(false)` when the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] when the file exists but cannot be read
/// or contains a malformed line.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(ConfigError::EnvFile(err.to_string())),
    }
}

/// Runtime settings. Every flag falls back to the environment variable
/// named in its help text.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Deployment environment name reported by the health check.
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub app_env: String,

    /// Path prefix under which the API is mounted.
    #[arg(long, env = "API_PREFIX", default_value = "/api")]
    pub api_prefix: String,

    /// Store connection string.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:///./family_tasks.db")]
    pub database_url: String,

    /// Maximum pooled store connections.
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 4)]
    pub database_max_connections: u32,

    /// Comma-separated origins allowed to call the API from a browser.
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://localhost:5173"
    )]
    pub cors_origins: Vec<String>,

    /// Socket address the HTTP server binds to.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind_addr: SocketAddr,
}

impl Settings {
    /// Returns the API prefix with a leading `/` and no trailing `/`.
    ///
    /// A blank or bare `/` prefix mounts the API at the root and yields an
    /// empty string.
    #[must_use]
    pub fn normalized_api_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Parses the configured origins, skipping blank entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WildcardOrigin`] for `*` and
    /// [`ConfigError::InvalidOrigin`] for values without a scheme or that
    /// cannot be sent as a header.
    pub fn allowed_origins(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.cors_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(parse_origin)
            .collect()
    }

    /// Builds the router configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an origin is invalid.
    pub fn http_settings(&self) -> Result<HttpSettings, ConfigError> {
        Ok(HttpSettings {
            api_prefix: self.normalized_api_prefix(),
            environment: self.app_env.clone(),
            allowed_origins: self.allowed_origins()?,
        })
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    if origin == "*" {
        return Err(ConfigError::WildcardOrigin);
    }
    if !origin.contains("://") {
        return Err(ConfigError::InvalidOrigin(origin.to_owned()));
    }
    HeaderValue::from_str(origin.trim_end_matches('/'))
        .map_err(|_| ConfigError::InvalidOrigin(origin.to_owned()))
}
