use anyhow::{Context, Result};
use std::{future::Future, sync::Arc, time::Duration};

use tower_http::services::ServeDir;
use tracing::info;

use axum::{extract::State, middleware, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::aggregator::ListeningAggregator;

use super::mail_routes::make_mail_routes;
use super::mcp_routes::make_mcp_routes;
use super::metrics::metrics_handler;
use super::spotify_routes::make_spotify_routes;
use super::{log_requests, state::ServerState, ServerConfig};

pub const SERVICE_NAME: &str = "orbit-server";

#[derive(Serialize)]
struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok",
        service: SERVICE_NAME,
        uptime: format_uptime(state.start_time.elapsed()),
    })
}

pub fn make_app(config: ServerConfig, aggregator: Arc<ListeningAggregator>) -> Router {
    let state = ServerState::new(config.clone(), aggregator);

    let mut app: Router = Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/spotify", make_spotify_routes(state.clone()))
        .nest("/mcp", make_mcp_routes(state.clone()))
        .nest("/mail", make_mail_routes());

    if let Some(frontend_path) = config.frontend_dir_path {
        let static_files_service =
            ServeDir::new(frontend_path).append_index_html_on_directories(true);
        app = app.fallback_service(static_files_service);
    }

    app.layer(middleware::from_fn_with_state(state, log_requests))
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serves the API on `config.port` and Prometheus metrics on
/// `config.metrics_port` until `shutdown` resolves.
pub async fn run_server<F>(
    config: ServerConfig,
    aggregator: Arc<ListeningAggregator>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, aggregator);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    let mut metrics_stop = stop_rx.clone();
    let metrics_server = tokio::spawn(async move {
        axum::serve(metrics_listener, make_metrics_app())
            .with_graceful_shutdown(async move {
                let _ = metrics_stop.changed().await;
            })
            .await
    });

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutting down HTTP server...");
            let _ = stop_tx.send(true);
        })
        .await?;

    drop(stop_rx);
    metrics_server
        .await
        .context("Metrics server task panicked")??;
    Ok(())
}
