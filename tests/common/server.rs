//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own aggregator and cache.

#![allow(dead_code)]

use super::constants::*;
use orbit_server::aggregator::{AggregatorSettings, ListeningAggregator};
use orbit_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use orbit_server::spotify::{FixtureMusicSource, MusicSource, SpotifyWebClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The aggregator behind the server, for cache inspection in tests
    pub aggregator: Arc<ListeningAggregator>,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a mock-mode server backed by the fixture source.
    pub async fn spawn() -> Self {
        Self::spawn_with(true, Arc::new(FixtureMusicSource::new())).await
    }

    /// Spawns a server without mock mode that talks to `api_base` through
    /// the real Spotify client.
    pub async fn spawn_live(api_base: &str) -> Self {
        let client = SpotifyWebClient::new(api_base, Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .expect("Failed to build Spotify client");
        Self::spawn_with(false, Arc::new(client)).await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if port binding fails or the server doesn't become ready
    /// within timeout.
    pub async fn spawn_with(mock_mode: bool, source: Arc<dyn MusicSource>) -> Self {
        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            logging_level: RequestsLoggingLevel::None,
            mock_mode,
            ..Default::default()
        };

        let aggregator = Arc::new(ListeningAggregator::new(
            source,
            AggregatorSettings::default(),
        ));
        let app = make_app(config, aggregator.clone());

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            aggregator,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the /health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
