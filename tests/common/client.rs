//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and provides methods for all orbit-server endpoints.
//! When API routes or request formats change, update only this file.
#![allow(dead_code)]

use super::constants::*;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE};
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

/// HTTP test client with cookie store
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a client that sends no credentials
    pub fn new(base_url: String) -> Self {
        Self::with_headers(base_url, HeaderMap::new())
    }

    /// Creates a client sending `Authorization: Bearer <token>` on every request
    pub fn with_bearer(base_url: String, token: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid token"),
        );
        Self::with_headers(base_url, headers)
    }

    /// Creates a client carrying the `access_token` and `session_id` cookies
    pub fn with_cookies(base_url: String, access_token: &str, session_id: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!(
                "access_token={}; session_id={}",
                access_token, session_id
            ))
            .expect("Invalid cookie"),
        );
        Self::with_headers(base_url, headers)
    }

    fn with_headers(base_url: String, headers: HeaderMap) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Health
    // ========================================================================

    pub async fn health(&self) -> Response {
        self.get("/health").await
    }

    // ========================================================================
    // Spotify pass-through
    // ========================================================================

    pub async fn profile(&self) -> Response {
        self.get("/spotify/profile").await
    }

    pub async fn top_artists(&self, time_range: Option<&str>, limit: Option<u32>) -> Response {
        let mut query = Vec::new();
        if let Some(range) = time_range {
            query.push(format!("time_range={}", range));
        }
        if let Some(limit) = limit {
            query.push(format!("limit={}", limit));
        }
        self.get(&format!("/spotify/top-artists?{}", query.join("&")))
            .await
    }

    pub async fn top_tracks(&self) -> Response {
        self.get("/spotify/top-tracks").await
    }

    pub async fn playlists(&self) -> Response {
        self.get("/spotify/playlists").await
    }

    pub async fn recently_played(&self) -> Response {
        self.get("/spotify/recent").await
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    pub async fn spotify_data(&self) -> Response {
        self.get("/mcp/spotify/data").await
    }

    pub async fn spotify_themes(&self) -> Response {
        self.get("/mcp/spotify/themes").await
    }

    // ========================================================================
    // Mail
    // ========================================================================

    pub async fn mail_summary(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/mail/summary", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }
}
