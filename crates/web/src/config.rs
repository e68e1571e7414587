//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ESPRESSO_HOST` - Bind address (default: 127.0.0.1)
//! - `ESPRESSO_PORT` - Listen port (default: 3000)
//! - `ESPRESSO_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_var(&lookup, "ESPRESSO_HOST", "127.0.0.1")?;
        let port = parse_var(&lookup, "ESPRESSO_PORT", "3000")?;
        let log_json = match non_empty(lookup("ESPRESSO_LOG_FORMAT")).as_deref().map(str::trim) {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "ESPRESSO_LOG_FORMAT".to_string(),
                    format!("expected `text` or `json` (got {other})"),
                ));
            }
        };
        let sentry_sample_rate = parse_rate(&lookup, "SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            log_json,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_var<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = non_empty(lookup(key)).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate, which must lie in `0.0..=1.0`.
fn parse_rate<F>(lookup: &F, key: &str, default: &str) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let rate: f32 = parse_var(lookup, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WebConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.sentry_dsn.is_none());
        assert!(!config.log_json);
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(config.sentry_traces_sample_rate.abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = WebConfig::from_lookup(lookup(&[
            ("ESPRESSO_HOST", "0.0.0.0"),
            ("ESPRESSO_PORT", "8080"),
            ("ESPRESSO_LOG_FORMAT", "json"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
            ("SENTRY_ENVIRONMENT", "staging"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.log_json);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_dsn_is_none() {
        let config = WebConfig::from_lookup(lookup(&[("SENTRY_DSN", "  ")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = WebConfig::from_lookup(lookup(&[("ESPRESSO_PORT", "espresso")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ESPRESSO_PORT"));
    }

    #[test]
    fn test_unknown_log_format() {
        let err = WebConfig::from_lookup(lookup(&[("ESPRESSO_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(err.to_string().contains("ESPRESSO_LOG_FORMAT"));
    }

    #[test]
    fn test_rate_out_of_range() {
        let err = WebConfig::from_lookup(lookup(&[("SENTRY_SAMPLE_RATE", "1.5")])).unwrap_err();
        assert!(err.to_string().contains("SENTRY_SAMPLE_RATE"));
    }
}
