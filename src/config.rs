//! Application configuration loaded from a TOML file with environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Prefix for environment overrides (e.g. `TG_PRESENCE_PORT`).
pub const ENV_PREFIX: &str = "TG_PRESENCE_";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram API credentials.
    pub api: ApiConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// On-disk state locations.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Telegram API identifiers, obtained from my.telegram.org.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API id.
    pub id: i32,
    /// API hash.
    pub hash: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Locations of the session and cache files.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Telegram session file written by the setup tool.
    #[serde(default = "default_session_path")]
    pub session: PathBuf,

    /// JSON status cache file.
    #[serde(default = "default_cache_path")]
    pub cache: PathBuf,
}

/// Values that may be overridden from the environment.
#[derive(Debug, Default, Deserialize)]
pub struct EnvOverrides {
    /// Alternative configuration file path.
    #[serde(default)]
    pub config: Option<PathBuf>,
    /// Bind address override.
    #[serde(default)]
    pub host: Option<String>,
    /// Bind port override.
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_session_path() -> PathBuf {
    PathBuf::from("tg-presence.session")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("cache/client_cache.json")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session: default_session_path(),
            cache: default_cache_path(),
        }
    }
}

impl EnvOverrides {
    /// Read `TG_PRESENCE_*` variables, loading a `.env` file first.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }
}

impl Config {
    /// Load and validate the configuration file at `path`.
    ///
    /// A missing file, a file that is not valid TOML, and a file holding
    /// unusable values produce distinct errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&contents, path)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Resolve the configuration path (CLI flag, then environment, then the
    /// default), load it, and apply environment overrides.
    pub fn load_with_env(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let overrides = EnvOverrides::from_env()?;

        let path = cli_path
            .or_else(|| overrides.config.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::load(&path)?;
        config.apply(overrides);
        Ok(config)
    }

    /// Parse and validate configuration text. `path` is used for error messages.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of file values.
    pub fn apply(&mut self, overrides: EnvOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
    }

    /// Check that the API credentials are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.id <= 0 {
            return Err(ConfigError::Invalid(
                "api.id must be a positive integer".to_string(),
            ));
        }

        if self.api.hash.trim().is_empty() {
            return Err(ConfigError::Invalid("api.hash is required".to_string()));
        }

        Ok(())
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
