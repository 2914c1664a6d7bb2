//! Observability for the demo service.
//!
//! - `route` - bounded-cardinality route labels
//! - `metrics` - HTTP request instruments and Prometheus rendering

pub mod metrics;
pub mod route;

pub use metrics::{Exposition, HttpMetrics, InFlightRequest, MetricsError, RequestOutcome};
pub use route::normalize_route;
