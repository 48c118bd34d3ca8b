//! Configuration management for chatrelay
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Every section is optional; a missing file section falls back to defaults.
//! The upstream credential is not part of this struct; it is
//! resolved from the environment by [`crate::credential::ApiKey`].

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

/// Default OpenRouter API base URL
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier sent upstream
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";

/// Default environment variable holding the upstream credential
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Environment variable that overrides `server.port`
pub const PORT_ENV: &str = "PORT";

/// Upper bound for `upstream.timeout_seconds`
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration (long-running adapter only)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Upstream chat-completion API configuration
///
/// Fields are private so that a validated instance cannot be mutated
/// afterwards; use the accessors.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_model")]
    model: String,
    /// Name of the environment variable holding the credential
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
    /// Sent as `HTTP-Referer` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    referer: Option<String>,
    /// Sent as `X-Title` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// Transport timeout. `None` keeps the HTTP client default (no timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_seconds: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            referer: None,
            title: None,
            timeout_seconds: None,
        }
    }
}

impl UpstreamConfig {
    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the name of the credential environment variable
    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }

    /// Get the optional `HTTP-Referer` value
    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    /// Get the optional `X-Title` value
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Get the optional transport timeout in seconds
    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    /// Full URL of the chat-completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Resolve the process configuration
    ///
    /// Reads `path` when given (a missing file is an error), otherwise starts
    /// from defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(PORT_ENV) {
            let port = raw.trim().parse::<u16>().map_err(|_| {
                AppError::Config(format!("{} must be a valid port number, got '{}'", PORT_ENV, raw))
            })?;
            tracing::debug!(port, "Using port from environment");
            self.server.port = port;
        }
        Ok(())
    }

    /// Socket address the server binds to
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip = self.server.host.parse::<IpAddr>().map_err(|_| {
            AppError::Config(format!(
                "server.host must be an IP address, got '{}'",
                self.server.host
            ))
        })?;
        Ok(SocketAddr::from((ip, self.server.port)))
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `load()`, but can also be called explicitly
    /// when constructing Config via other means (e.g., in tests).
    pub fn validate(&self) -> AppResult<()> {
        let upstream = &self.upstream;

        if !upstream.base_url.starts_with("http://") && !upstream.base_url.starts_with("https://")
        {
            return Err(AppError::Config(format!(
                "upstream.base_url '{}' must start with 'http://' or 'https://'",
                upstream.base_url
            )));
        }

        if upstream.model.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.model cannot be empty".to_string(),
            ));
        }

        if upstream.api_key_env.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.api_key_env cannot be empty".to_string(),
            ));
        }

        if let Some(timeout) = upstream.timeout_seconds {
            if timeout == 0 {
                return Err(AppError::Config(
                    "upstream.timeout_seconds must be greater than 0".to_string(),
                ));
            }
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(AppError::Config(format!(
                    "upstream.timeout_seconds cannot exceed {} seconds, got {}",
                    MAX_TIMEOUT_SECONDS, timeout
                )));
            }
        }

        // Header values must be visible ASCII; reqwest rejects anything else at send time
        for (name, value) in [("referer", &upstream.referer), ("title", &upstream.title)] {
            if let Some(value) = value
                && axum::http::HeaderValue::from_str(value).is_err()
            {
                return Err(AppError::Config(format!(
                    "upstream.{} is not a valid HTTP header value: '{}'",
                    name, value
                )));
            }
        }

        for origin in &self.server.cors_allowed_origins {
            if axum::http::HeaderValue::from_str(origin).is_err() {
                return Err(AppError::Config(format!(
                    "server.cors_allowed_origins contains an invalid origin: '{}'",
                    origin
                )));
            }
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
