//! Application configuration loaded from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::domain::ConfigError;

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests per second per client IP
    pub rps: u32,
    /// Burst size per client IP
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { rps: 10, burst: 20 }
    }
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                message: format!("expected 'pretty' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Server configuration.
///
/// `api_key` enables API-key authentication when present.
#[derive(Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub rate_limit: Option<RateLimitConfig>,
    pub api_key: Option<SecretString>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            request_timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimitConfig::default()),
            api_key: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    ///
    /// `RATE_LIMIT_RPS=0` disables rate limiting.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(var("BIND_ADDR"), "BIND_ADDR", defaults.bind_addr)?;
        let timeout_secs: u64 = parse_or(var("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        let rps: u32 = parse_or(var("RATE_LIMIT_RPS"), "RATE_LIMIT_RPS", 10)?;
        let burst: u32 = parse_or(var("RATE_LIMIT_BURST"), "RATE_LIMIT_BURST", 20)?;
        let rate_limit = (rps > 0).then(|| RateLimitConfig {
            rps,
            burst: burst.max(1),
        });

        let api_key = var("API_AUTH_KEY").map(SecretString::from);
        let log_format = match var("LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
            rate_limit,
            api_key,
            log_format,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.rate_limit, Some(RateLimitConfig { rps: 10, burst: 20 }));
        assert!(config.api_key.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("RATE_LIMIT_RPS", "3"),
            ("RATE_LIMIT_BURST", "6"),
            ("API_AUTH_KEY", "s3cret"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.rate_limit, Some(RateLimitConfig { rps: 3, burst: 6 }));
        assert_eq!(config.api_key.unwrap().expose_secret(), "s3cret");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_zero_rps_disables_rate_limit() {
        let config = AppConfig::from_lookup(lookup_from(&[("RATE_LIMIT_RPS", "0")])).unwrap();
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("API_AUTH_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err =
            AppConfig::from_lookup(lookup_from(&[("RATE_LIMIT_RPS", "fast")])).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "RATE_LIMIT_RPS")
        );

        let err =
            AppConfig::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "0")])).unwrap_err();
        let ConfigError::InvalidValue { key, .. } = &err;
        assert_eq!(key, "REQUEST_TIMEOUT_SECS");

        let err = AppConfig::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(err.to_string().contains("LOG_FORMAT"));
    }
}
