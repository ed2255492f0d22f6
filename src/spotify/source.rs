//! Music source trait definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::listening::{Artist, Playlist, RecentlyPlayedItem, TimeRange, Track, UserProfile};

/// Errors that can occur when reading from a music source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Access token rejected")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Read-only access to a user's listening records.
///
/// Every call takes the caller's access token; implementations hold no
/// per-user state.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MusicSource: Send + Sync {
    async fn profile(&self, access_token: &str) -> Result<UserProfile, SourceError>;

    /// Top artists for `range`, at most `limit` of them.
    async fn top_artists(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, SourceError>;

    /// Top tracks for `range`, at most `limit` of them.
    async fn top_tracks(
        &self,
        access_token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, SourceError>;

    /// Every playlist of the user, across all pages.
    async fn playlists(&self, access_token: &str) -> Result<Vec<Playlist>, SourceError>;

    async fn recently_played(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<RecentlyPlayedItem>, SourceError>;
}
