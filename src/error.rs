//! Unified error types for the presence API.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Unified error type for the presence API.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cache file error.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Upstream Telegram client error.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration file errors. Each variant is fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file {} was not found", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("configuration file {} contains syntax errors: {source}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Environment overrides could not be parsed.
    #[error("invalid environment override: {0}")]
    Env(#[from] envy::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Cache file errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Reading or writing the cache file failed.
    #[error("cache file {} is not accessible: {source}", path.display())]
    Io {
        /// Path of the cache file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The cache file holds something other than a status record.
    #[error("cache file {} is corrupt: {source}", path.display())]
    Corrupt {
        /// Path of the cache file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Serializing the record failed.
    #[error("failed to serialize cache record: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Upstream Telegram client errors.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Connecting to Telegram failed.
    #[error("failed to connect to telegram: {0}")]
    Connect(String),

    /// The stored session has not been authorized.
    #[error("session is not authorized, run tg-presence-setup first")]
    Unauthorized,

    /// A request to Telegram failed.
    #[error("telegram request failed: {0}")]
    Request(String),

    /// Sign-in failed during setup.
    #[error("sign-in failed: {0}")]
    SignIn(String),

    /// Session file could not be opened or saved.
    #[error("session file error: {0}")]
    Session(#[source] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
