//! Configuration loading for google-search-mcp
//!
//! Configuration is assembled once at startup from:
//! 1. A `.env` file in the working directory (if present)
//! 2. Environment variables (secrets are environment-only)
//! 3. TOML file at `GOOGLE_SEARCH_CONFIG_PATH` or `~/.binks/google-search.toml`
//! 4. Default values
//!
//! The resulting [`GatewayConfig`] is immutable and shared behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::auth::AuthContext;

pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_ENGINE_ID: &str = "GOOGLE_CSE_ID";
pub const ENV_HOST: &str = "HTTP_HOST";
pub const ENV_PORT: &str = "HTTP_PORT";
pub const ENV_ENABLE_AUTH: &str = "ENABLE_AUTH";
pub const ENV_API_TOKEN: &str = "API_TOKEN";
pub const ENV_CONFIG_PATH: &str = "GOOGLE_SEARCH_CONFIG_PATH";
pub const ENV_TIMEOUT: &str = "GOOGLE_SEARCH_TIMEOUT_SECS";
pub const ENV_MAX_RESULTS: &str = "GOOGLE_SEARCH_MAX_RESULTS";

/// Errors raised while assembling the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is set but cannot be used
    #[error("invalid value for {name}: {reason}")]
    InvalidValue {
        /// Variable or key name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Authentication is enabled but there is nothing to compare against
    #[error("ENABLE_AUTH=true requires API_TOKEN to be set")]
    AuthTokenMissing,

    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listener settings
    pub server: ServerConfig,
    /// Provider tuning (endpoint, limits, timeout)
    pub provider: ProviderConfig,
    /// Provider credentials
    pub credentials: ProviderCredentials,
    /// Caller authentication policy
    pub auth: AuthContext,
}

/// Non-secret settings that may come from the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Google Custom Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Custom Search JSON API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Provider-side cap on results per request
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Results returned when the caller does not ask for a count
    #[serde(default = "default_results")]
    pub default_results: u32,
    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Credentials for the Custom Search API
#[derive(Clone)]
pub struct ProviderCredentials {
    pub api_key: String,
    pub search_engine_id: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &"<redacted>")
            .field("search_engine_id", &self.search_engine_id)
            .finish()
    }
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_max_results() -> u32 {
    10 // Custom Search API hard limit per request
}

fn default_results() -> u32 {
    5
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_results: default_max_results(),
            default_results: default_results(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl GatewayConfig {
    /// Load configuration from `.env`, the environment and the optional TOML file
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::info!("Loaded environment from {}", path.display());
        }

        let file = FileConfig::load()?;
        Self::from_lookup(file, |key| std::env::var(key).ok())
    }

    /// Build the configuration from file settings and a variable lookup
    ///
    /// Environment values override file values. Empty variables count as unset.
    pub fn from_lookup<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let FileConfig {
            mut server,
            mut provider,
        } = file;

        if let Some(host) = var(ENV_HOST) {
            server.host = host;
        }
        if let Some(port) = var(ENV_PORT) {
            server.port = parse_var(ENV_PORT, &port)?;
        }
        if let Some(timeout) = var(ENV_TIMEOUT) {
            provider.timeout_seconds = parse_var(ENV_TIMEOUT, &timeout)?;
        }
        if let Some(max) = var(ENV_MAX_RESULTS) {
            provider.max_results = parse_var(ENV_MAX_RESULTS, &max)?;
        }
        provider.validate()?;

        let credentials = ProviderCredentials {
            api_key: var(ENV_API_KEY).ok_or(ConfigError::MissingVar(ENV_API_KEY))?,
            search_engine_id: var(ENV_ENGINE_ID).ok_or(ConfigError::MissingVar(ENV_ENGINE_ID))?,
        };

        let auth_enabled = var(ENV_ENABLE_AUTH)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let auth = if auth_enabled {
            let token = var(ENV_API_TOKEN).ok_or(ConfigError::AuthTokenMissing)?;
            AuthContext::enabled(token)
        } else {
            AuthContext::Disabled
        };

        Ok(Self {
            server,
            provider,
            credentials,
            auth,
        })
    }
}

impl FileConfig {
    /// Read the TOML file if one is configured and present
    pub fn load() -> Result<Self, ConfigError> {
        let Some(path) = Self::find_config_path() else {
            tracing::info!("No config path specified, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return Some(PathBuf::from(path));
        }

        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".binks").join("google-search.toml"))
    }
}

impl ProviderConfig {
    fn validate(&mut self) -> Result<(), ConfigError> {
        url::Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidValue {
            name: "provider.endpoint",
            reason: e.to_string(),
        })?;

        if self.max_results == 0 {
            return Err(ConfigError::InvalidValue {
                name: "provider.max_results",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                name: "provider.timeout_seconds",
                reason: "must be at least 1".to_string(),
            });
        }

        self.default_results = self.default_results.clamp(1, self.max_results);
        Ok(())
    }
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: format!("{:?}: {}", value, e),
        })
}
