//! HTTP routes for the demo service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::errors::handle_panic;
use crate::handlers::{self, HealthState};
use crate::middleware::http_metrics_middleware;
use crate::observability::HttpMetrics;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Request timeout applied to every route.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Liveness/readiness state.
    pub health: Arc<HealthState>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Service info
/// - `/health` - Liveness probe - not traced
/// - `/ready` - Readiness probe - not traced
/// - `/metrics` - Prometheus metrics endpoint - not traced
/// - `/api/users`, `/api/users/:id`, `/api/slow` - Mock API
/// - TraceLayer for request logging on `/` and `/api`
/// - Panic catching, 30 second request timeout
/// - HTTP metrics middleware (outermost)
pub fn build_routes(state: Arc<AppState>, metrics: Arc<HttpMetrics>) -> Router {
    // Operational endpoints (no request tracing)
    let probe_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics.clone());

    // Traced application routes
    let api_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/:id", get(handlers::get_user))
        .route("/api/slow", get(handlers::slow))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. CatchPanicLayer - Turn handler panics into 500s (innermost)
    // 2. TimeoutLayer - Timeout the request
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    probe_routes
        .merge(metrics_routes)
        .merge(api_routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(middleware::from_fn_with_state(
            metrics,
            http_metrics_middleware,
        ))
}
