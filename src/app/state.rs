//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::infra::observability::PrometheusHandle;

use super::config::{AppConfig, RateLimitConfig};

/// Shared application state for the Axum web server.
///
/// Everything here is fixed at startup; handlers only read it.
pub struct AppState {
    /// Key required in `x-api-key`, when authentication is enabled.
    pub api_key: Option<SecretString>,

    /// Per-request deadline enforced by the router.
    pub request_timeout: Duration,

    /// Per-IP rate limit, when enabled.
    pub rate_limit: Option<RateLimitConfig>,

    /// Prometheus handle rendered at `/metrics`.
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Creates a new `AppState` from the loaded configuration.
    #[must_use]
    pub fn new(config: AppConfig, metrics: Option<Arc<PrometheusHandle>>) -> Self {
        Self {
            api_key: config.api_key,
            request_timeout: config.request_timeout,
            rate_limit: config.rate_limit,
            metrics,
        }
    }

    /// State with default configuration, no authentication, no rate limit and
    /// no metrics recorder.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn new_for_test() -> Arc<Self> {
        let config = AppConfig {
            rate_limit: None,
            ..AppConfig::default()
        };
        Arc::new(Self::new(config, None))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_app_state_from_config() {
        let config = AppConfig {
            api_key: Some(SecretString::from("k".to_string())),
            request_timeout: Duration::from_secs(7),
            ..AppConfig::default()
        };

        let state = AppState::new(config, None);

        assert_eq!(state.api_key.as_ref().unwrap().expose_secret(), "k");
        assert_eq!(state.request_timeout, Duration::from_secs(7));
        assert_eq!(state.rate_limit, Some(RateLimitConfig::default()));
        assert!(state.metrics.is_none());
    }

    #[test]
    fn test_state_for_test_is_open() {
        let state = AppState::new_for_test();
        assert!(state.api_key.is_none());
        assert!(state.rate_limit.is_none());
    }
}
