//! Demo service configuration.
//!
//! Configuration is loaded from environment variables. Every value has a
//! default so the service starts with no environment at all.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default service name reported by the root endpoint.
pub const DEFAULT_SERVICE_NAME: &str = "demo-service";

/// Default deployment environment.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default time allowed for draining connections before a forced exit.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECONDS: u64 = 10;

/// Default lower bound of the slow endpoint delay, in milliseconds.
pub const DEFAULT_SLOW_MIN_DELAY_MS: u64 = 500;

/// Default upper bound (exclusive) of the slow endpoint delay, in milliseconds.
pub const DEFAULT_SLOW_MAX_DELAY_MS: u64 = 2000;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Demo service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Service name reported by `/`.
    pub service_name: String,

    /// Deployment environment (e.g., "development", "production").
    pub environment: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Seconds to wait for in-flight requests during shutdown.
    pub shutdown_timeout_seconds: u64,

    /// Lower bound of the `/api/slow` delay in milliseconds.
    pub slow_min_delay_ms: u64,

    /// Upper bound (exclusive) of the `/api/slow` delay in milliseconds.
    pub slow_max_delay_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port configuration: {0}")]
    InvalidPort(String),

    #[error("Invalid bind address configuration: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid log format configuration: {0}")]
    InvalidLogFormat(String),

    #[error("Invalid shutdown timeout configuration: {0}")]
    InvalidShutdownTimeout(String),

    #[error("Invalid slow endpoint delay configuration: {0}")]
    InvalidSlowDelay(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = if let Some(value_str) = vars.get("PORT") {
            let value: u16 = value_str.parse().map_err(|e| {
                ConfigError::InvalidPort(format!(
                    "PORT must be an integer between 1 and 65535, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidPort(
                    "PORT must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_PORT
        };

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| format!("0.0.0.0:{}", port));

        if let Err(e) = bind_address.parse::<SocketAddr>() {
            return Err(ConfigError::InvalidBindAddress(format!(
                "BIND_ADDRESS must be a socket address, got '{}': {}",
                bind_address, e
            )));
        }

        let service_name = vars
            .get("SERVICE_NAME")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        let environment = vars
            .get("ENVIRONMENT")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        let log_format = match vars.get("LOG_FORMAT").map(|s| s.to_ascii_lowercase()) {
            None => LogFormat::default(),
            Some(value) if value == "pretty" => LogFormat::Pretty,
            Some(value) if value == "json" => LogFormat::Json,
            Some(value) => {
                return Err(ConfigError::InvalidLogFormat(format!(
                    "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                    value
                )))
            }
        };

        let shutdown_timeout_seconds =
            if let Some(value_str) = vars.get("SHUTDOWN_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidShutdownTimeout(format!(
                        "SHUTDOWN_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidShutdownTimeout(
                        "SHUTDOWN_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_SHUTDOWN_TIMEOUT_SECONDS
            };

        let slow_min_delay_ms =
            parse_delay(vars, "SLOW_MIN_DELAY_MS", DEFAULT_SLOW_MIN_DELAY_MS)?;
        let slow_max_delay_ms =
            parse_delay(vars, "SLOW_MAX_DELAY_MS", DEFAULT_SLOW_MAX_DELAY_MS)?;

        if slow_max_delay_ms <= slow_min_delay_ms {
            return Err(ConfigError::InvalidSlowDelay(format!(
                "SLOW_MAX_DELAY_MS ({}) must be greater than SLOW_MIN_DELAY_MS ({})",
                slow_max_delay_ms, slow_min_delay_ms
            )));
        }

        Ok(Config {
            bind_address,
            service_name,
            environment,
            log_format,
            shutdown_timeout_seconds,
            slow_min_delay_ms,
            slow_max_delay_ms,
        })
    }
}

fn parse_delay(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    match vars.get(name) {
        Some(value_str) => value_str.parse().map_err(|e| {
            ConfigError::InvalidSlowDelay(format!(
                "{} must be a valid non-negative integer, got '{}': {}",
                name, value_str, e
            ))
        }),
        None => Ok(default),
    }
}
