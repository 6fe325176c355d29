//! HTTP routing: classified error responses at every exit of the router.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, error_handling::HandleErrorLayer, middleware, routing::get};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::app::AppState;

use super::handlers::{
    catalog_entry_handler, catalog_handler, fallback_handler, handle_middleware_error,
    liveness_handler, metrics_handler,
};
use super::middleware::{RateLimitState, auth_middleware, rate_limit_middleware};

/// Create the API router.
///
/// Authentication and rate limiting apply to everything except the health
/// routes; the request timeout applies to every route including the fallback.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let mut api_routes = Router::new()
        .route("/errors", get(catalog_handler))
        .route("/errors/{code}", get(catalog_entry_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&app_state),
            auth_middleware,
        ));

    if let Some(config) = app_state.rate_limit.clone() {
        let rate_limit_state = Arc::new(RateLimitState::new(config));
        api_routes = api_routes.route_layer(middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit_middleware,
        ));
    }

    let health_routes = Router::new().route("/live", get(liveness_handler));

    let router = Router::new()
        .merge(api_routes)
        .nest("/health", health_routes)
        .fallback(fallback_handler)
        .with_state(Arc::clone(&app_state));

    with_boundary_layers(router, app_state.request_timeout)
}

/// Tracing and the request deadline. Timeouts surface as CH001 responses.
fn with_boundary_layers(router: Router, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .layer(TimeoutLayer::new(timeout)),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_slow_handler_times_out_with_classified_body() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let router = with_boundary_layers(router, Duration::from_millis(20));

        let response = router
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "CH001");
        assert_eq!(json["message"], "Request timed out");
        assert_eq!(json["temporary"], true);
    }

    #[tokio::test]
    async fn test_fast_handler_passes_through() {
        let router = Router::new().route("/fast", get(|| async { "ok" }));
        let router = with_boundary_layers(router, Duration::from_secs(1));

        let response = router
            .oneshot(Request::builder().uri("/fast").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_liveness_is_open_when_auth_enabled() {
        let state = Arc::new(AppState {
            api_key: Some(secrecy::SecretString::from("k".to_string())),
            request_timeout: Duration::from_secs(30),
            rate_limit: None,
            metrics: None,
        });
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
