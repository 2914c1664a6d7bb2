//! Test server harness for E2E testing
//!
//! Provides `TestDemoServer` for spawning real demo service instances in tests.

use demo_service::config::Config;
use demo_service::handlers::HealthState;
use demo_service::observability::HttpMetrics;
use demo_service::routes::{self, AppState};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the demo service in E2E tests.
///
/// Each instance owns its own metrics registry, so tests running in
/// parallel never see each other's samples.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_e2e() -> Result<()> {
///     let server = TestDemoServer::spawn().await?;
///
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestDemoServer {
    addr: SocketAddr,
    config: Config,
    metrics: Arc<HttpMetrics>,
    health: Arc<HealthState>,
    _handle: JoinHandle<()>,
}

impl TestDemoServer {
    /// Spawn a ready server with test defaults.
    ///
    /// The `/api/slow` delay is shortened to 0..20ms.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn a ready server, overriding configuration variables.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    /// - Report ready on `/ready`
    pub async fn spawn_with_vars(overrides: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("ENVIRONMENT".to_string(), "test".to_string()),
            ("SLOW_MIN_DELAY_MS".to_string(), "0".to_string()),
            ("SLOW_MAX_DELAY_MS".to_string(), "20".to_string()),
        ]);
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let metrics = Arc::new(
            HttpMetrics::new().map_err(|e| anyhow::anyhow!("Failed to create metrics: {}", e))?,
        );

        let health = Arc::new(HealthState::new());
        let state = Arc::new(AppState {
            config: config.clone(),
            health: health.clone(),
        });

        let app = routes::build_routes(state, metrics.clone());

        let listener = tokio::net::TcpListener::bind(config.bind_address.as_str())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                eprintln!("Test server error: {}", e);
            }
        });

        health.set_ready();

        Ok(Self {
            addr,
            config,
            metrics,
            health,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Metrics registry the server records into.
    pub fn metrics(&self) -> &Arc<HttpMetrics> {
        &self.metrics
    }

    /// Health state, for toggling readiness mid-test.
    pub fn health(&self) -> &Arc<HealthState> {
        &self.health
    }
}

impl Drop for TestDemoServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
