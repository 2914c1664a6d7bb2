//! HTTP request metrics.
//!
//! Three instruments, named for compatibility with existing dashboards:
//! - `http_request_duration_seconds` histogram
//! - `http_requests_total` counter
//! - `http_requests_in_flight` gauge (no labels)
//!
//! # Cardinality
//!
//! The histogram and counter carry exactly three labels:
//! - `method`: standard HTTP verb, or `OTHER` for extension methods
//! - `route`: normalized route (see [`crate::observability::route`])
//! - `status_code`: numeric status as a string
//!
//! # Ownership
//!
//! [`HttpMetrics`] owns its Prometheus registry. No global recorder is
//! installed; the registry is built once at startup and shared through axum
//! state, so tests can construct a fresh one each.
//!
//! Process metrics (`process_cpu_seconds_total`, `process_resident_memory_bytes`,
//! `process_open_fds`, `process_start_time_seconds`, ...) are sampled into the
//! same registry on every render.

use crate::observability::route::normalize_route;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics::{Gauge, Recorder, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use metrics_process::Collector;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Histogram of request durations, in seconds.
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Counter of completed requests.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Gauge of requests currently being processed.
pub const HTTP_REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

/// Label key for the HTTP method.
pub const LABEL_METHOD: &str = "method";

/// Label key for the normalized route.
pub const LABEL_ROUTE: &str = "route";

/// Label key for the response status code.
pub const LABEL_STATUS_CODE: &str = "status_code";

/// Method label value for anything outside the standard verbs.
pub const OTHER_METHOD: &str = "OTHER";

/// Duration histogram bucket boundaries, in seconds.
pub const HTTP_DURATION_BUCKETS: [f64; 12] = [
    0.001, 0.005, 0.015, 0.050, 0.100, 0.200, 0.300, 0.400, 0.500, 1.000, 2.000, 5.000,
];

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Errors raised while building or reading the metrics registry.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Invalid histogram bucket configuration: {0}")]
    Buckets(String),

    #[error("Failed to render metrics")]
    Render,
}

/// A completed HTTP exchange, as seen by the metrics layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    /// HTTP method (e.g. "GET").
    pub method: String,
    /// Request path as received, without the query string.
    pub raw_path: String,
    /// Route pattern resolved by the router, if any.
    pub matched_template: Option<String>,
    /// Response status code.
    pub status_code: u16,
}

/// Rendered metrics and the content type to serve them with.
#[derive(Debug, Clone)]
pub struct Exposition {
    pub body: String,
    pub content_type: &'static str,
}

/// Process-wide HTTP request instruments.
pub struct HttpMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    in_flight: Gauge,
    process: Collector,
}

impl HttpMetrics {
    /// Build the registry and register all three instruments.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Buckets`] if the histogram buckets are rejected.
    pub fn new() -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
                &HTTP_DURATION_BUCKETS,
            )
            .map_err(|e| MetricsError::Buckets(e.to_string()))?
            .build_recorder();
        let handle = recorder.handle();
        let process = Collector::default();

        let in_flight = metrics::with_local_recorder(&recorder, || {
            process.describe();
            describe_histogram!(
                HTTP_REQUEST_DURATION_SECONDS,
                Unit::Seconds,
                "Duration of HTTP requests in seconds"
            );
            describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
            describe_gauge!(
                HTTP_REQUESTS_IN_FLIGHT,
                "Number of HTTP requests currently being processed"
            );
            gauge!(HTTP_REQUESTS_IN_FLIGHT)
        });

        Ok(Self {
            recorder,
            handle,
            in_flight,
            process,
        })
    }

    /// Mark one more request as in flight.
    ///
    /// The returned guard decrements the gauge when dropped, whether or not
    /// [`InFlightRequest::complete`] was called.
    pub fn start_request(&self) -> InFlightRequest<'_> {
        self.in_flight.increment(1.0);
        InFlightRequest {
            metrics: self,
            started: Instant::now(),
        }
    }

    /// Render all instruments in the Prometheus text format.
    ///
    /// Samples process metrics first so each scrape sees current values.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Render`] if the exporter faults while formatting.
    pub fn render(&self) -> Result<Exposition, MetricsError> {
        let body = panic::catch_unwind(AssertUnwindSafe(|| {
            metrics::with_local_recorder(&self.recorder, || self.process.collect());
            self.handle.render()
        }))
        .map_err(|_| {
            tracing::error!(target: "demo.metrics", "Metrics rendering failed");
            MetricsError::Render
        })?;

        Ok(Exposition {
            body,
            content_type: PROMETHEUS_CONTENT_TYPE,
        })
    }

    /// Fold pending histogram samples into their buckets.
    ///
    /// Rendering does this as well. Without scrapes, samples accumulate
    /// until this runs, so the binary calls it on an interval.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

impl std::fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetrics").finish_non_exhaustive()
    }
}

/// Scoped in-flight accounting for one request.
///
/// Created by [`HttpMetrics::start_request`]. Dropping it without calling
/// [`complete`](Self::complete) (e.g. the client disconnected and the
/// request future was dropped) still decrements the in-flight gauge but
/// records no duration or count.
#[must_use = "dropping the guard immediately ends the in-flight window"]
pub struct InFlightRequest<'a> {
    metrics: &'a HttpMetrics,
    started: Instant,
}

impl InFlightRequest<'_> {
    /// Record the completed request and end its in-flight window.
    ///
    /// A fault while recording is logged and swallowed; the gauge is
    /// released either way.
    pub fn complete(self, outcome: &RequestOutcome) {
        let metrics = self.metrics;
        self.complete_into(&metrics.recorder, outcome);
    }

    /// Record into `recorder`. Returns `false` if recording faulted.
    fn complete_into<R: Recorder>(self, recorder: &R, outcome: &RequestOutcome) -> bool {
        let elapsed = self.started.elapsed();
        let method = method_label(&outcome.method);
        let route = normalize_route(&outcome.raw_path, outcome.matched_template.as_deref());

        let recorded = panic::catch_unwind(AssertUnwindSafe(|| {
            metrics::with_local_recorder(recorder, || {
                record_http_request(method, &route, outcome.status_code, elapsed);
            });
        }))
        .is_ok();

        if !recorded {
            tracing::error!(
                target: "demo.metrics",
                method,
                route = %route,
                status_code = outcome.status_code,
                "Failed to record HTTP request metrics"
            );
        }

        recorded
    }
}

impl Drop for InFlightRequest<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.decrement(1.0);
    }
}

/// Bounded `method` label value.
///
/// The nine standard verbs pass through unchanged. Anything else, including
/// lowercase spellings, becomes [`OTHER_METHOD`] so clients cannot mint new
/// series by inventing methods.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "CONNECT" => "CONNECT",
        "OPTIONS" => "OPTIONS",
        "TRACE" => "TRACE",
        "PATCH" => "PATCH",
        _ => OTHER_METHOD,
    }
}

/// Record one HTTP request against the current recorder.
///
/// Metric: `http_request_duration_seconds`, `http_requests_total`
/// Labels: `method`, `route`, `status_code`
///
/// `method` and `route` must already be normalized.
pub fn record_http_request(method: &str, route: &str, status_code: u16, duration: Duration) {
    let status_code = status_code.to_string();

    histogram!(HTTP_REQUEST_DURATION_SECONDS,
        LABEL_METHOD => method.to_string(),
        LABEL_ROUTE => route.to_string(),
        LABEL_STATUS_CODE => status_code.clone()
    )
    .record(duration.as_secs_f64());

    counter!(HTTP_REQUESTS_TOTAL,
        LABEL_METHOD => method.to_string(),
        LABEL_ROUTE => route.to_string(),
        LABEL_STATUS_CODE => status_code
    )
    .increment(1);
}
