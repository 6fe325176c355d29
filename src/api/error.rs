//! The API error type: any error a handler returns becomes a classified
//! JSON response.

use std::error::Error as StdError;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::app::classifier::{classify, render};
use crate::domain::BoxError;
use crate::infra::observability::ERROR_RESPONSES_TOTAL;

/// Error returned by handlers and middleware.
///
/// Wraps whatever error a collaborator produced; classification happens
/// once, when the response is built.
#[derive(Debug)]
pub struct ApiError(BoxError);

impl ApiError {
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }

    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<BoxError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (body, entry) = classify(self.inner());
        let status =
            StatusCode::from_u16(entry.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = body.code, error = %render(self.inner()), "Server error");
        } else {
            debug!(code = body.code, error = %render(self.inner()), "Request failed");
        }
        metrics::counter!(ERROR_RESPONSES_TOTAL, "code" => body.code).increment(1);

        (status, Json(body)).into_response()
    }
}
