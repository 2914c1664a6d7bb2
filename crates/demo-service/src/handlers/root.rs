//! Root endpoint handler.

use crate::models::ServiceInfo;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handler for GET /
///
/// Describes the service and lists its endpoints.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    tracing::info!(target: "demo.root", "Root endpoint accessed");

    Json(ServiceInfo {
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        message: format!(
            "Hello from {} observability service!",
            state.config.service_name
        ),
        endpoints: BTreeMap::from([
            ("health", "/health"),
            ("ready", "/ready"),
            ("metrics", "/metrics"),
            ("api", "/api/users"),
        ]),
    })
}
