//! Demo service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl.
//! Internal details are logged server-side; clients get a generic message.

use crate::observability::MetricsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use thiserror::Error;

/// HTTP-facing error type.
///
/// Maps to status codes:
/// - NotFound: 404 Not Found
/// - Metrics, Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Internal server error")]
    Internal,
}

impl DemoError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DemoError::NotFound(_) => 404,
            DemoError::Metrics(_) | DemoError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    let body = ErrorResponse {
        error: ErrorDetail {
            code: code.to_string(),
            message,
        },
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for DemoError {
    fn into_response(self) -> Response {
        match &self {
            DemoError::NotFound(resource) => {
                error_response(StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone())
            }
            DemoError::Metrics(err) => {
                tracing::error!(target: "demo.metrics", error = %err, "Metrics export failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "METRICS_ERROR",
                    "Metrics are temporarily unavailable".to_string(),
                )
            }
            DemoError::Internal => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

/// Convert a caught handler panic into a 500 response.
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(target: "demo.panic", panic = %detail, "Unhandled error in request handler");
    DemoError::Internal.into_response()
}
