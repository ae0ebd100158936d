//! Startup configuration.
//!
//! Values are resolved once from the process environment and never vary per
//! call. Resolution goes through a lookup function so it can be exercised
//! without touching the real environment.

use std::time::Duration;

use thiserror::Error;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Default base URL for Gemini model endpoints.
pub const DEFAULT_ENDPOINT_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default transport timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default HTTP port for the server binary.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors raised while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be used.
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// DispatcherConfig
// ---------------------------------------------------------------------------

/// Endpoint, model and credentials for the dispatcher's transport.
#[derive(Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Base URL for model endpoints, without a trailing slash.
    pub endpoint_url: String,
    /// Model identifier, e.g. `gemini-2.5-flash-preview-09-2025`.
    pub model_id: String,
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Timeout applied by the HTTP client to each attempt.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for DispatcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("model_id", &self.model_id)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl DispatcherConfig {
    /// Create a config with the default endpoint and timeout.
    pub fn new(model_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            model_id: model_id.into(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Resolve from the process environment.
    ///
    /// - `GEMINI_API_KEY` or `GOOGLE_API_KEY` (required)
    /// - `GEMINI_MODEL` (default [`DEFAULT_MODEL`])
    /// - `GEMINI_ENDPOINT_URL` (default [`DEFAULT_ENDPOINT_URL`])
    /// - `GEMINI_TIMEOUT_SECS` (default [`DEFAULT_TIMEOUT_SECS`])
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` in place of the environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GEMINI_API_KEY")
            .or_else(|| non_empty("GOOGLE_API_KEY"))
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        let model_id = non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let endpoint_url = non_empty("GEMINI_ENDPOINT_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_ENDPOINT_URL.to_string());

        let request_timeout = match non_empty("GEMINI_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "GEMINI_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            endpoint_url,
            model_id,
            api_key,
            request_timeout,
        })
    }

    /// Full `generateContent` URL for the configured model (key not included).
    pub fn generate_content_url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint_url, self.model_id)
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Settings for the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Page URL encoded into the share QR code. Derived from the request's
    /// `Host` header when unset.
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            public_url: None,
        }
    }
}

impl ServerConfig {
    /// Resolve `PORT` and `PUBLIC_URL` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let public_url = lookup("PUBLIC_URL").filter(|v| !v.trim().is_empty());

        Ok(Self { port, public_url })
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
