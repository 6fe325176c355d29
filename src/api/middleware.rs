//! HTTP middleware for API layer.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, Response, header},
    middleware::Next,
    response::IntoResponse,
};
use governor::clock::{Clock, DefaultClock};
use governor::{Quota, RateLimiter};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::app::{AppState, RateLimitConfig};
use crate::domain::{ErrorExt, GeneralError};

use super::error::ApiError;

/// Constant-time comparison of two byte slices to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// API key authentication middleware.
///
/// Requires a valid `x-api-key` header when a key is configured. Missing or
/// wrong keys answer CH009; a header that is not visible ASCII answers CH004.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let Some(expected) = state.api_key.as_ref() else {
        return next.run(request).await;
    };

    let Some(key_header) = request.headers().get("x-api-key") else {
        warn!("API auth failed: missing x-api-key header");
        let err = GeneralError::NotAuthenticated.with_detail("missing x-api-key header");
        return ApiError::from(err).into_response();
    };

    let Ok(provided) = key_header.to_str() else {
        warn!("API auth failed: malformed x-api-key header");
        let err = GeneralError::BadRequestHeader.with_detail("x-api-key is not valid ASCII");
        return ApiError::from(err).into_response();
    };

    // Compare via SHA-256 digests for constant-time comparison (prevents timing attacks)
    let expected_hash = Sha256::digest(expected.expose_secret().as_bytes());
    let provided_hash = Sha256::digest(provided.as_bytes());

    if !constant_time_eq(expected_hash.as_slice(), provided_hash.as_slice()) {
        warn!("API auth failed: invalid x-api-key");
        return ApiError::from(GeneralError::NotAuthenticated).into_response();
    }

    next.run(request).await
}

/// Checks between sweeps of idle client buckets.
const PRUNE_EVERY: u64 = 1024;

/// Shared rate limiter state (keyed by client IP to prevent global DoS)
pub struct RateLimitState {
    limiter: governor::RateLimiter<
        IpAddr,
        governor::state::keyed::DashMapStateStore<IpAddr>,
        DefaultClock,
    >,
    config: RateLimitConfig,
    checks: AtomicU64,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        let rps = NonZeroU32::new(config.rps).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);

        Self {
            limiter: RateLimiter::dashmap(Quota::per_second(rps).allow_burst(burst)),
            config,
            checks: AtomicU64::new(0),
        }
    }

    /// Takes one cell from the client's bucket, or returns how long the
    /// client has to wait. Every [`PRUNE_EVERY`] checks, idle buckets are
    /// dropped so the map stays bounded by recently active clients.
    pub fn check(&self, client_ip: IpAddr) -> Result<(), Duration> {
        let outcome = self
            .limiter
            .check_key(&client_ip)
            .map_err(|not_until| not_until.wait_time_from(DefaultClock::default().now()));

        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            self.prune();
        }
        outcome
    }

    /// Drops buckets that have refilled completely.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of clients with a bucket in memory.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Extract client IP from request (X-Forwarded-For, X-Real-IP, or ConnectInfo).
/// Falls back to 0.0.0.0 when unknown to avoid blocking; unknown clients share one bucket.
pub(crate) fn client_ip_from_request<B>(request: &Request<B>) -> IpAddr {
    // Prefer proxy headers (client is first in X-Forwarded-For)
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());
    if let Some(ip) = forwarded {
        return ip;
    }

    let real_ip = request
        .headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());
    if let Some(ip) = real_ip {
        return ip;
    }

    // Present when served through into_make_service_with_connect_info
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

/// Per-IP rate limit middleware. Rejections answer CH007 with `Retry-After`.
pub async fn rate_limit_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let client_ip = client_ip_from_request(&request);
    let limit = HeaderValue::from(rate_limit.config.rps);

    match rate_limit.check(client_ip) {
        Ok(()) => {
            let mut response = next.run(request).await;
            response.headers_mut().insert("X-RateLimit-Limit", limit);
            response
        }
        Err(wait_time) => {
            let retry_after = wait_time.as_secs().max(1);

            warn!(%client_ip, retry_after, "Rate limit exceeded");
            let mut response = ApiError::from(GeneralError::RateLimited).into_response();
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", limit);
            headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(())
            .unwrap();
        assert_eq!(
            client_ip_from_request(&request),
            "203.0.113.7".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip_then_unspecified() {
        let request = Request::builder()
            .header("x-forwarded-for", "garbage")
            .header("x-real-ip", " 198.51.100.2 ")
            .body(())
            .unwrap();
        assert_eq!(
            client_ip_from_request(&request),
            "198.51.100.2".parse::<IpAddr>().unwrap()
        );

        let mut request = Request::builder().body(()).unwrap();
        assert_eq!(
            client_ip_from_request(&request),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );

        let peer: SocketAddr = "192.0.2.9:51000".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(client_ip_from_request(&request), peer.ip());
    }

    #[test]
    fn test_rate_limit_state_allows_burst_then_rejects() {
        let state = RateLimitState::new(RateLimitConfig { rps: 1, burst: 2 });
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(state.check(ip).is_ok());
        assert!(state.check(ip).is_ok());
        let wait = state.check(ip).unwrap_err();
        assert!(wait > Duration::ZERO && wait <= Duration::from_secs(1));

        let other = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
        assert!(state.check(other).is_ok());
    }

    #[test]
    fn test_prune_drops_refilled_buckets() {
        let state = RateLimitState::new(RateLimitConfig {
            rps: 1000,
            burst: 1,
        });
        for host in 1..=10 {
            assert!(state.check(IpAddr::V4(Ipv4Addr::new(192, 0, 2, host))).is_ok());
        }
        assert_eq!(state.tracked_clients(), 10);

        std::thread::sleep(Duration::from_millis(20));
        state.prune();
        assert_eq!(state.tracked_clients(), 0);
    }

    #[test]
    fn test_checks_sweep_idle_clients_periodically() {
        let state = RateLimitState::new(RateLimitConfig {
            rps: 1000,
            burst: 1,
        });
        for host in 1..=10 {
            let _ = state.check(IpAddr::V4(Ipv4Addr::new(198, 51, 100, host)));
        }
        std::thread::sleep(Duration::from_millis(20));

        let busy = IpAddr::V4(Ipv4Addr::LOCALHOST);
        for _ in 10..PRUNE_EVERY {
            let _ = state.check(busy);
        }
        assert!(state.tracked_clients() <= 1);
    }
}
