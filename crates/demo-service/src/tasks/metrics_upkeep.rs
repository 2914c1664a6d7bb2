//! Metrics upkeep background task.
//!
//! The Prometheus registry buffers histogram samples until they are folded
//! into buckets. Scrapes do that, but an unscraped process would buffer
//! without bound, so this task runs upkeep on a fixed interval.
//!
//! # Graceful Shutdown
//!
//! The task exits when the cancellation token is cancelled.

use crate::observability::HttpMetrics;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Default upkeep interval in seconds.
pub const DEFAULT_UPKEEP_INTERVAL_SECONDS: u64 = 5;

/// Run metrics upkeep every `interval` until `cancel_token` is cancelled.
pub async fn start_metrics_upkeep(
    metrics: Arc<HttpMetrics>,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                metrics.run_upkeep();
            }
            _ = cancel_token.cancelled() => {
                info!(target: "demo.metrics", "Metrics upkeep task received shutdown signal, exiting");
                break;
            }
        }
    }
}
