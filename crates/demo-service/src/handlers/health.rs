//! Health check handlers.
//!
//! Provides health check endpoints for Kubernetes liveness and readiness probes.
//!
//! - `/health`: Liveness probe - returns healthy while the process answers
//! - `/ready`: Readiness probe - checks dependencies and the readiness flag

use crate::models::{HealthResponse, ReadinessResponse};
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Health state for the demo service.
///
/// Tracks process start (for uptime) and whether the service should
/// receive traffic.
#[derive(Debug)]
pub struct HealthState {
    started: Instant,
    ready: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    /// Create a new health state (not ready).
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ready: AtomicBool::new(false),
        }
    }

    /// Mark the service as ready to serve traffic.
    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Mark the service as not ready (e.g., during shutdown).
    pub fn set_not_ready(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    /// Check if the service is ready.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Whole seconds since the state was created.
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

/// Mock dependency checks.
///
/// A real service would ping its database, cache and upstream APIs here.
fn dependency_checks() -> BTreeMap<&'static str, bool> {
    BTreeMap::from([("database", true), ("cache", true), ("dependencies", true)])
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Liveness probe handler.
///
/// Does NOT check any dependencies - failure means the process is hung.
/// Kubernetes will kill and restart the pod if this fails.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_rfc3339(),
        uptime: state.health.uptime_seconds(),
    })
}

/// Readiness probe handler.
///
/// Returns 200 when every dependency check passes and the service is
/// accepting traffic, 503 otherwise.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let checks = dependency_checks();
    let all_ready = state.health.is_ready() && checks.values().all(|ok| *ok);

    if !all_ready {
        tracing::warn!(target: "demo.health", ?checks, "Readiness check failed");
    }

    let (status_code, status) = if all_ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        status_code,
        Json(ReadinessResponse {
            status,
            timestamp: now_rfc3339(),
            checks,
        }),
    )
}
