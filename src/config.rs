//! Configuration loading and constants.
//!
//! Loads application configuration from an optional TOML file and defines constants
//! for cache headers, log previews, the health payload and default paths.
//! `AppConfig` is the root configuration struct containing all settings; every
//! section has defaults so the server runs without any file at all.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Defaults
// =============================================================================

/// Default bind host. The server is meant for a local frontend harness.
pub const DEFAULT_HTTP_HOST: &str = "localhost";

/// Default bind port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Seconds to wait for open connections after a shutdown signal
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

// =============================================================================
// Cache Headers
// =============================================================================

/// API responses are live session snapshots and must never be cached
pub const CACHE_CONTROL_API: &str = "no-store";

// =============================================================================
// Provider Defaults
// =============================================================================

/// Provider reported in health and query responses
pub const DEFAULT_PROVIDER_NAME: &str = "gemini";

/// Human-readable provider name for startup output
pub const DEFAULT_PROVIDER_DISPLAY_NAME: &str = "Gemini (Google)";

/// Environment variable that bypasses the interactive prompt
pub const DEFAULT_KEY_ENV: &str = "GEMINI_API_KEY";

/// Prefix real Gemini keys start with
pub const DEFAULT_KEY_PREFIX: &str = "AIzaSy";

/// Where users obtain a key
pub const DEFAULT_KEY_URL: &str = "https://makersuite.google.com/app/apikey";

// =============================================================================
// Session / Echo Constants
// =============================================================================

/// Error returned by `/query` when no key has been set up
pub const NOT_INITIALIZED_ERROR: &str = "CLI not initialized";

/// `status` field of the health payload
pub const HEALTH_STATUS_OK: &str = "ok";

/// `mode` field of the health payload
pub const SERVER_MODE: &str = "echo";

/// Characters of the API key shown in logs
pub const KEY_PREVIEW_CHARS: usize = 10;

/// Characters of an incoming query shown in logs
pub const QUERY_PREVIEW_CHARS: usize = 100;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Configuration file picked up when `--config` is not given and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Crate target used in the default log filter
const LOG_TARGET: &str = "boilerai_server";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=info", LOG_TARGET);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Log formats accepted in `[logging]`
const LOG_FORMATS: [&str; 2] = ["text", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// API key provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    /// Grace period for draining connections on shutdown, in seconds
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    fn default_shutdown_grace() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_SECS
    }

    /// `host:port` as written in the config, suitable for socket address lookup
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// API key provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier reported to clients
    #[serde(default = "ProviderConfig::default_name")]
    pub name: String,
    #[serde(default = "ProviderConfig::default_display_name")]
    pub display_name: String,
    /// Environment variable checked before prompting
    #[serde(default = "ProviderConfig::default_key_env")]
    pub key_env: String,
    /// Expected key prefix. An empty prefix disables the format check.
    #[serde(default = "ProviderConfig::default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "ProviderConfig::default_key_url")]
    pub key_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            display_name: Self::default_display_name(),
            key_env: Self::default_key_env(),
            key_prefix: Self::default_key_prefix(),
            key_url: Self::default_key_url(),
        }
    }
}

impl ProviderConfig {
    fn default_name() -> String {
        DEFAULT_PROVIDER_NAME.to_string()
    }

    fn default_display_name() -> String {
        DEFAULT_PROVIDER_DISPLAY_NAME.to_string()
    }

    fn default_key_env() -> String {
        DEFAULT_KEY_ENV.to_string()
    }

    fn default_key_prefix() -> String {
        DEFAULT_KEY_PREFIX.to_string()
    }

    fn default_key_url() -> String {
        DEFAULT_KEY_URL.to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Without one, `DEFAULT_CONFIG_PATH` is used if
    /// present, otherwise built-in defaults apply.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider.name must not be empty".to_string(),
            ));
        }
        if self.provider.key_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "provider.key_env must not be empty".to_string(),
            ));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.format must be one of {:?}, got {:?}",
                LOG_FORMATS, self.logging.format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
