//! A tiny stand-in for the Spotify Web API, enough to exercise the real
//! HTTP client end to end.
#![allow(dead_code)]

use super::constants::*;
use axum::{
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

pub struct FakeSpotify {
    /// API base to hand to the server (e.g., "http://127.0.0.1:12345/v1")
    pub api_base: String,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", VALID_UPSTREAM_TOKEN))
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    if !is_authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
        )
            .into_response();
    }
    Json(json!({
        "id": UPSTREAM_USER_ID,
        "display_name": "Upstream User",
        "email": "upstream@example.com",
        "images": [{"url": "https://img.example.com/me.png"}]
    }))
    .into_response()
}

async fn recently_played(headers: HeaderMap) -> impl IntoResponse {
    if !is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (StatusCode::TOO_MANY_REQUESTS, [("retry-after", "0")]).into_response()
}

impl FakeSpotify {
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let app = Router::new().nest(
            "/v1",
            Router::new()
                .route("/me", get(me))
                .route("/me/player/recently-played", get(recently_played)),
        );
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake upstream failed");
        });

        Self {
            api_base: format!("http://127.0.0.1:{}/v1", port),
            _shutdown_tx: Some(shutdown_tx),
        }
    }
}

impl Drop for FakeSpotify {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
