//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
};

use crate::app::{AppState, registry};
use crate::domain::{BoxError, CatalogEntry, ErrorExt, GeneralError};

use super::error::ApiError;

/// Liveness probe
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Published error catalogue
pub async fn catalog_handler() -> Json<Vec<CatalogEntry>> {
    Json(registry::catalog())
}

/// A single catalogue entry, looked up by code (case-insensitive).
pub async fn catalog_entry_handler(
    Path(code): Path<String>,
) -> Result<Json<CatalogEntry>, ApiError> {
    let code = code.to_ascii_uppercase();
    registry::catalog()
        .into_iter()
        .find(|entry| entry.code == code)
        .map(Json)
        .ok_or_else(|| {
            GeneralError::NotFound
                .with_detail(format!("unknown error code {code}"))
                .into()
        })
}

/// Prometheus scrape output
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| GeneralError::NotFound.with_detail("metrics recorder is not installed"))?;
    Ok(handle.render())
}

/// Fallback for unmatched routes
pub async fn fallback_handler(method: Method, uri: Uri) -> ApiError {
    GeneralError::NotFound
        .with_detail(format!("no route for {method} {}", uri.path()))
        .into()
}

/// Converts failures raised by tower middleware (timeouts, overload) into
/// classified responses.
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    ApiError::from(err)
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    use super::*;

    async fn json_of(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_catalog_entry_lookup() {
        let Json(entry) = catalog_entry_handler(Path("ch761".to_string()))
            .await
            .unwrap();
        assert_eq!(entry.code, "CH761");
        assert!(entry.temporary);
    }

    #[tokio::test]
    async fn test_catalog_entry_includes_default() {
        let Json(entry) = catalog_entry_handler(Path("CH000".to_string()))
            .await
            .unwrap();
        assert_eq!(entry.message, "API Error");
        assert_eq!(entry.status, 500);
    }

    #[tokio::test]
    async fn test_catalog_entry_unknown_code() {
        let err = catalog_entry_handler(Path("CH999".to_string()))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = json_of(response).await;
        assert_eq!(json["code"], "CH006");
        assert_eq!(json["detail"], "unknown error code CH999");
    }

    #[tokio::test]
    async fn test_metrics_without_recorder_is_not_found() {
        let state = AppState::new_for_test();
        let err = metrics_handler(State(state)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fallback_reports_route() {
        let response = fallback_handler(Method::DELETE, Uri::from_static("/accounts/7"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_of(response).await["detail"],
            "no route for DELETE /accounts/7"
        );
    }

    #[tokio::test]
    async fn test_middleware_error_is_classified() {
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let response = handle_middleware_error(err).await.into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
