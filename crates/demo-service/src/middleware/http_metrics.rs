//! HTTP metrics middleware for capturing all request/response metrics
//!
//! This middleware captures metrics for ALL HTTP responses including
//! framework-level errors that occur before handlers run:
//! - 404 Not Found (no route matched)
//! - 405 Method Not Allowed
//! - 408 Request Timeout (from the timeout layer)
//! - 500 Internal Server Error (from a caught handler panic)

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::observability::{HttpMetrics, RequestOutcome};

/// Middleware that records HTTP request metrics for all responses
///
/// This captures:
/// - Request method (extension methods are recorded as `OTHER`)
/// - Route (router template if matched, otherwise the normalized raw path)
/// - Response status code
/// - Request duration
///
/// The in-flight gauge is held for the whole inner call. If the request
/// future is dropped mid-flight, the gauge is still released.
pub async fn http_metrics_middleware(
    State(metrics): State<Arc<HttpMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let in_flight = metrics.start_request();

    let method = request.method().to_string();
    let raw_path = request.uri().path().to_string();
    let matched_template = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string());

    // Execute the request
    let response = next.run(request).await;

    in_flight.complete(&RequestOutcome {
        method,
        raw_path,
        matched_template,
        status_code: response.status().as_u16(),
    });

    response
}
