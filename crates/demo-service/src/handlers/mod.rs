//! HTTP request handlers for the demo service.

pub mod api;
pub mod health;
pub mod metrics;
pub mod root;

pub use api::{get_user, list_users, slow};
pub use health::{health_check, readiness_check, HealthState};
pub use metrics::metrics_handler;
pub use root::root;
