//! Background tasks for the demo service.

pub mod metrics_upkeep;

pub use metrics_upkeep::start_metrics_upkeep;
