//! Response models for the demo service.

use serde::Serialize;
use std::collections::BTreeMap;

/// Liveness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process can answer.
    pub status: &'static str,

    /// RFC 3339 timestamp of the response.
    pub timestamp: String,

    /// Whole seconds since process start.
    pub uptime: u64,
}

/// Readiness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: &'static str,

    /// RFC 3339 timestamp of the response.
    pub timestamp: String,

    /// Per-dependency check results.
    pub checks: BTreeMap<&'static str, bool>,
}

/// Root endpoint response describing the service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: &'static str,
    pub environment: String,
    pub message: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Mock user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub role: &'static str,
}

/// Response for the user listing.
#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: &'static [User],
    pub count: usize,
}

/// Response for the slow endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SlowResponse {
    pub message: &'static str,
    pub delay_ms: u64,
    pub timestamp: String,
}

/// Fixed user data served by `/api/users`.
pub static MOCK_USERS: [User; 5] = [
    User {
        id: 1,
        name: "Alice Johnson",
        email: "alice@example.com",
        role: "admin",
    },
    User {
        id: 2,
        name: "Bob Smith",
        email: "bob@example.com",
        role: "user",
    },
    User {
        id: 3,
        name: "Charlie Brown",
        email: "charlie@example.com",
        role: "user",
    },
    User {
        id: 4,
        name: "Diana Prince",
        email: "diana@example.com",
        role: "moderator",
    },
    User {
        id: 5,
        name: "Eve Davis",
        email: "eve@example.com",
        role: "user",
    },
];
