//! # Demo Test Utilities
//!
//! Shared test utilities for the demo service.
//!
//! This crate provides:
//! - Server test harness (`TestDemoServer` for E2E tests)
//! - Prometheus exposition helpers (`metric_sample`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use demo_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestDemoServer::spawn().await?;
//!
//!     let response = reqwest::get(format!("{}/health", server.url())).await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod server_harness;

// Re-export commonly used items
pub use assertions::*;
pub use server_harness::*;
