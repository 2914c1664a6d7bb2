//! Prometheus metrics endpoint handler.
//!
//! # Security
//!
//! This endpoint is unauthenticated to allow Prometheus to scrape metrics.
//! Labels are bounded and carry no identifiers from request paths.

use crate::errors::DemoError;
use crate::observability::HttpMetrics;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use std::sync::Arc;

/// Handler for GET /metrics
///
/// Returns 200 OK with Prometheus text format:
/// ```text
/// # HELP http_requests_total Total number of HTTP requests
/// # TYPE http_requests_total counter
/// http_requests_total{method="GET",route="/api/users/:id",status_code="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "demo.metrics.scrape")]
pub async fn metrics_handler(
    State(metrics): State<Arc<HttpMetrics>>,
) -> Result<impl IntoResponse, DemoError> {
    let exposition = metrics.render()?;
    Ok(([(CONTENT_TYPE, exposition.content_type)], exposition.body))
}
