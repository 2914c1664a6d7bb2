//! Observability Demo Service Library
//!
//! A small HTTP service instrumented with health probes, Prometheus
//! metrics and request tracing.
//!
//! The interesting part is the request labeler in `observability`: every
//! completed request is recorded under a `{method, route, status_code}`
//! label set whose `route` value never embeds a resource identifier, so
//! label cardinality stays bounded by the number of declared endpoints.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/http_metrics.rs -> handlers/*.rs
//!                          |
//!                          v
//!            observability/{route,metrics}.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Response models and mock data
//! - `observability` - Route normalization and metrics registry
//! - `routes` - Axum router setup
//! - `tasks` - Background tasks (metrics upkeep)

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod tasks;
