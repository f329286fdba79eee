//! Server configuration from the environment

use slack_lists_api::{ClientConfig, DEFAULT_API_URL};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "slack_lists=info";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `SLACK_BOT_TOKEN` unset or blank
    #[error("SLACK_BOT_TOKEN environment variable is required")]
    MissingToken,

    /// A variable holds an unusable value
    #[error("Invalid {name}='{value}': {reason}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// How MCP messages reach the server
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transport {
    /// Line-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// JSON-RPC over `POST /mcp`
    Http,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidValue {
                name: "MCP_TRANSPORT",
                value: s.to_string(),
                reason: "expected 'stdio' or 'http'",
            }),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
        })
    }
}

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Slack bot token
    pub token: String,
    /// Slack Web API base URL
    pub api_base: String,
    /// Per-request timeout for Slack calls
    pub timeout: Duration,
    /// Selected transport
    pub transport: Transport,
    /// HTTP bind host
    pub host: String,
    /// HTTP bind port
    pub port: u16,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("transport", &self.transport)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the token is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the token is missing or a value does not parse
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = var("SLACK_BOT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let timeout_secs = match var("SLACK_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "SLACK_TIMEOUT_SECS",
                    value: raw,
                    reason: "expected a positive number of seconds",
                })?,
            None => 30,
        };

        let transport = match var("MCP_TRANSPORT") {
            Some(raw) => raw.parse()?,
            None => Transport::default(),
        };

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
                reason: "expected a port number",
            })?,
            None => 8000,
        };

        Ok(Self {
            token: token.trim().to_string(),
            api_base: var("SLACK_API_BASE").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            transport,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        })
    }

    /// Slack client settings derived from this configuration
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.token.clone())
            .with_api_url(self.api_base.clone())
            .with_timeout(self.timeout)
    }
}
