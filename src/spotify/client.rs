//! Spotify Web API implementation of [`MusicSource`].

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::payloads::{
    Page, SpotifyArtist, SpotifyPlayHistory, SpotifyPlaylist, SpotifyProfile, SpotifyTrack,
};
use super::source::{MusicSource, SourceError};
use crate::listening::{Artist, Playlist, RecentlyPlayedItem, TimeRange, Track, UserProfile};
use crate::server::metrics;

pub const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// Spotify's maximum page size for every endpoint used here.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Used when a 429 response carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Stop following `next` links after this many pages.
const MAX_PLAYLIST_PAGES: usize = 100;

/// Upstream error bodies are logged up to this many characters and never
/// forwarded to callers.
const MAX_LOGGED_ERROR_BODY: usize = 200;

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

fn retry_after(response: &reqwest::Response) -> Duration {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
        .min(MAX_RETRY_AFTER)
}

fn outcome_label(result: &Result<reqwest::Response, SourceError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(SourceError::Unauthorized) => "unauthorized",
        Err(SourceError::RateLimited) => "rate_limited",
        Err(SourceError::Api { .. }) => "api_error",
        Err(SourceError::Connection(_)) => "connection",
        Err(SourceError::Timeout) => "timeout",
        Err(SourceError::InvalidResponse(_)) => "invalid_response",
    }
}

/// Client for the handful of Spotify Web API endpoints the pipeline reads.
pub struct SpotifyWebClient {
    client: Client,
    api_base: String,
}

impl SpotifyWebClient {
    /// Create a client for `api_base` (e.g. "https://api.spotify.com/v1")
    /// whose requests give up after `timeout`.
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Spotify HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// True when `url` points under this client's API base, so the access
    /// token is only ever sent there.
    fn is_api_url(&self, url: &str) -> bool {
        url.strip_prefix(self.api_base.as_str())
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
    }

    async fn send_once(&self, url: &str, access_token: &str) -> Result<reqwest::Response, SourceError> {
        self.client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Connection(e.to_string())
                }
            })
    }

    /// Sends the request, retrying once after `Retry-After` on 429, and
    /// maps failure statuses onto [`SourceError`].
    async fn send(&self, url: &str, access_token: &str) -> Result<reqwest::Response, SourceError> {
        let mut response = self.send_once(url, access_token).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let wait = retry_after(&response);
            warn!(url = %url, wait_secs = wait.as_secs(), "Spotify rate limit hit, retrying once");
            tokio::time::sleep(wait).await;
            response = self.send_once(url, access_token).await?;
        }

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(SourceError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let logged: String = body.chars().take(MAX_LOGGED_ERROR_BODY).collect();
            warn!(url = %url, status = status.as_u16(), body = %logged, "Spotify request failed");
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: format!(
                    "Spotify request failed: {}",
                    status.canonical_reason().unwrap_or("unexpected status")
                ),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        url: &str,
        access_token: &str,
    ) -> Result<T, SourceError> {
        let started = Instant::now();
        let result = self.send(url, access_token).await;
        metrics::record_upstream_request(endpoint, outcome_label(&result), started.elapsed());

        let response = result?;
        response.json::<T>().await.map_err(|e| {
            SourceError::InvalidResponse(format!("Failed to parse Spotify {endpoint} response: {e}"))
        })
    }
}

#[async_trait]
impl MusicSource for SpotifyWebClient {
    async fn profile(&self, access_token: &str) -> Result<UserProfile, SourceError> {
        let url = format!("{}/me", self.api_base);
        let raw: SpotifyProfile = self.get_json("me", &url, access_token).await?;
        Ok(raw.into())
    }

    async fn top_artists(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, SourceError> {
        let url = format!(
            "{}/me/top/artists?time_range={}&limit={}",
            self.api_base,
            range.as_query_value(),
            clamp_limit(limit)
        );
        let page: Page<SpotifyArtist> = self.get_json("top_artists", &url, access_token).await?;
        let artists: Vec<Artist> = page.into_items().map(Artist::from).collect();
        debug!(range = range.as_query_value(), count = artists.len(), "Fetched top artists");
        Ok(artists)
    }

    async fn top_tracks(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, SourceError> {
        let url = format!(
            "{}/me/top/tracks?time_range={}&limit={}",
            self.api_base,
            range.as_query_value(),
            clamp_limit(limit)
        );
        let page: Page<SpotifyTrack> = self.get_json("top_tracks", &url, access_token).await?;
        Ok(page.into_items().map(Track::from).collect())
    }

    async fn playlists(&self, access_token: &str) -> Result<Vec<Playlist>, SourceError> {
        let mut url = Some(format!("{}/me/playlists?limit={}", self.api_base, MAX_PAGE_LIMIT));
        let mut playlists = Vec::new();
        let mut pages = 0;

        while let Some(page_url) = url.take() {
            if pages == MAX_PLAYLIST_PAGES {
                warn!(pages, "Stopping playlist pagination early");
                break;
            }
            let page: Page<SpotifyPlaylist> =
                self.get_json("playlists", &page_url, access_token).await?;
            pages += 1;
            url = match page.next.clone() {
                Some(next) if !self.is_api_url(&next) => {
                    warn!(next = %next, "Ignoring playlist page link outside the API base");
                    None
                }
                next => next,
            };
            playlists.extend(page.into_items().map(Playlist::from));
        }

        debug!(count = playlists.len(), pages, "Fetched playlists");
        Ok(playlists)
    }

    async fn recently_played(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<RecentlyPlayedItem>, SourceError> {
        let url = format!(
            "{}/me/player/recently-played?limit={}",
            self.api_base,
            clamp_limit(limit)
        );
        let page: Page<SpotifyPlayHistory> =
            self.get_json("recently_played", &url, access_token).await?;
        Ok(page.into_items().map(RecentlyPlayedItem::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base: &str) -> SpotifyWebClient {
        SpotifyWebClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(25), 25);
        assert_eq!(clamp_limit(500), 50);
    }

    #[test]
    fn only_api_base_urls_are_followed() {
        let client = client("https://api.spotify.com/v1/");
        assert!(client.is_api_url("https://api.spotify.com/v1/me/playlists?offset=50"));
        assert!(!client.is_api_url("https://api.spotify.com/v1evil/me/playlists"));
        assert!(!client.is_api_url("https://elsewhere.example/v1/me/playlists"));
    }

    #[tokio::test]
    async fn playlist_links_outside_api_base_are_not_followed() {
        async fn playlists() -> impl IntoResponse {
            Json(json!({
                "items": [{"id": "p1", "name": "Chill Study", "owner": {"id": "u"},
                           "tracks": {"total": 5}}],
                "next": "http://127.0.0.1:1/me/playlists?offset=50&limit=50"
            }))
        }
        let base = serve(Router::new().route("/me/playlists", get(playlists))).await;

        let playlists = client(&base).playlists("t").await.unwrap();
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].id, "p1");
    }

    #[tokio::test]
    async fn sends_bearer_token_and_normalizes_profile() {
        async fn me(headers: HeaderMap) -> impl IntoResponse {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            if auth != "Bearer token-123" {
                return AxumStatus::UNAUTHORIZED.into_response();
            }
            Json(json!({"id": "u1", "display_name": null, "images": []})).into_response()
        }
        let base = serve(Router::new().route("/me", get(me))).await;

        let profile = client(&base).profile("token-123").await.unwrap();
        assert_eq!(profile.id, "u1");
        assert_eq!(profile.name, "u1");
        assert!(profile.image.is_none());

        let err = client(&base).profile("wrong").await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized));
    }

    #[tokio::test]
    async fn retries_once_after_rate_limit() {
        let hits = Arc::new(AtomicUsize::new(0));
        async fn me(State(hits): State<Arc<AtomicUsize>>) -> impl IntoResponse {
            if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                return (AxumStatus::TOO_MANY_REQUESTS, [("retry-after", "0")]).into_response();
            }
            Json(json!({"id": "u1", "display_name": "User"})).into_response()
        }
        let base = serve(Router::new().route("/me", get(me)).with_state(hits.clone())).await;

        let profile = client(&base).profile("t").await.unwrap();
        assert_eq!(profile.name, "User");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_rate_limit_is_an_error() {
        async fn me() -> impl IntoResponse {
            (AxumStatus::TOO_MANY_REQUESTS, [("retry-after", "0")])
        }
        let base = serve(Router::new().route("/me", get(me))).await;

        let err = client(&base).profile("t").await.unwrap_err();
        assert!(matches!(err, SourceError::RateLimited));
    }

    #[tokio::test]
    async fn other_failures_carry_status_without_body() {
        async fn me() -> impl IntoResponse {
            (AxumStatus::FORBIDDEN, "insufficient scope")
        }
        let base = serve(Router::new().route("/me", get(me))).await;

        match client(&base).profile("t").await.unwrap_err() {
            SourceError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Spotify request failed: Forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        async fn me() -> impl IntoResponse {
            "not json"
        }
        let base = serve(Router::new().route("/me", get(me))).await;

        let err = client(&base).profile("t").await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn follows_playlist_pages() {
        async fn playlists(
            State(base): State<Arc<std::sync::OnceLock<String>>>,
            axum::extract::Query(query): axum::extract::Query<std::collections::HashMap<String, String>>,
        ) -> impl IntoResponse {
            let base = base.get().cloned().unwrap_or_default();
            if query.get("offset").map(String::as_str) == Some("50") {
                return Json(json!({
                    "items": [{"id": "p2", "name": "Running Pump", "owner": {"id": "u"},
                               "tracks": {"total": 30}, "public": true}],
                    "next": null
                }));
            }
            Json(json!({
                "items": [{"id": "p1", "name": "Chill Study", "description": "Focus music",
                           "owner": {"id": "u"}, "tracks": {"total": 50}}, null],
                "next": format!("{base}/me/playlists?offset=50&limit=50")
            }))
        }
        let base_cell = Arc::new(std::sync::OnceLock::new());
        let base = serve(
            Router::new()
                .route("/me/playlists", get(playlists))
                .with_state(base_cell.clone()),
        )
        .await;
        base_cell.set(base.clone()).unwrap();

        let playlists = client(&base).playlists("t").await.unwrap();
        let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(playlists[1].description.as_deref(), Some(""));
        assert!(playlists[1].public);
    }
}
