//! Demo Service
//!
//! Entry point for the observability demo: health probes, Prometheus
//! metrics and request tracing around a small mock API.

use demo_service::config::{Config, LogFormat};
use demo_service::handlers::HealthState;
use demo_service::observability::HttpMetrics;
use demo_service::routes::{self, AppState};
use demo_service::tasks::{metrics_upkeep::DEFAULT_UPKEEP_INTERVAL_SECONDS, start_metrics_upkeep};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,demo_service=debug,demo=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so the log format is known
    let config = Config::from_env();
    init_tracing(config.as_ref().map(|c| c.log_format).unwrap_or_default());

    info!("Starting demo service");

    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        service = %config.service_name,
        environment = %config.environment,
        bind_address = %config.bind_address,
        shutdown_timeout_seconds = config.shutdown_timeout_seconds,
        "Configuration loaded successfully"
    );

    let metrics = Arc::new(HttpMetrics::new().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?);

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_seconds);
    let service_name = config.service_name.clone();
    let environment = config.environment.clone();

    let health = Arc::new(HealthState::new());
    let state = Arc::new(AppState {
        config,
        health: health.clone(),
    });

    // Shutdown is signalled once; graceful drain, the forced deadline and
    // background tasks all wait on the same token.
    let shutdown = CancellationToken::new();

    tokio::spawn(start_metrics_upkeep(
        metrics.clone(),
        Duration::from_secs(DEFAULT_UPKEEP_INTERVAL_SECONDS),
        shutdown.clone(),
    ));

    let app = routes::build_routes(state, metrics);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    health.set_ready();

    info!(
        port = addr.port(),
        service = %service_name,
        environment = %environment,
        "Server started successfully"
    );

    tokio::spawn({
        let shutdown = shutdown.clone();
        let health = health.clone();
        async move {
            shutdown_signal().await;
            health.set_not_ready();
            shutdown.cancel();
        }
    });

    let server = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();

    tokio::select! {
        result = server => {
            result?;
        }
        _ = shutdown_deadline(shutdown, shutdown_timeout) => {
            error!("Forced shutdown after timeout");
            return Err("forced shutdown after timeout".into());
        }
    }

    info!("HTTP server closed");

    Ok(())
}

/// Install the global tracing subscriber.
fn init_tracing(log_format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let (json_layer, pretty_layer) = match log_format {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
        LogFormat::Pretty => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = await_signal(signal::ctrl_c(), "SIGINT");

    #[cfg(unix)]
    let terminate = await_signal(
        async {
            let mut stream = signal::unix::signal(signal::unix::SignalKind::terminate())?;
            stream.recv().await;
            Ok::<(), std::io::Error>(())
        },
        "SIGTERM",
    );

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Waits for one signal listener.
///
/// A listener that fails to install never resolves, so it cannot start
/// shutdown on its own.
async fn await_signal<F>(listener: F, name: &'static str)
where
    F: Future<Output = std::io::Result<()>>,
{
    match listener.await {
        Ok(()) => info!(signal = name, "Received shutdown signal"),
        Err(e) => {
            error!(signal = name, "Failed to listen for {}: {}", name, e);
            std::future::pending::<()>().await;
        }
    }
}

/// Resolves `timeout` after shutdown begins.
async fn shutdown_deadline(shutdown: CancellationToken, timeout: Duration) {
    shutdown.cancelled().await;
    warn!("Draining connections for up to {} seconds...", timeout.as_secs());
    tokio::time::sleep(timeout).await;
}
