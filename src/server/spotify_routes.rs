//! Pass-through Spotify routes returning normalized listening records.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use crate::listening::{Artist, Playlist, RecentlyPlayedItem, TimeRange, Track, UserProfile};
use crate::spotify::MAX_PAGE_LIMIT;

use super::error::ApiError;
use super::session::SpotifyAccess;
use super::state::{GuardedAggregator, ServerState};

pub const DEFAULT_TOP_ITEMS_LIMIT: u32 = 25;
pub const RECENTLY_PLAYED_LIMIT: u32 = 50;

#[derive(Deserialize, Debug, Default)]
struct TopItemsQuery {
    pub time_range: Option<String>,
    /// Clamped to `1..=50`, default 25.
    pub limit: Option<u32>,
}

impl TopItemsQuery {
    fn range(&self) -> Result<TimeRange, ApiError> {
        match self.time_range.as_deref() {
            None | Some("") => Ok(TimeRange::default()),
            Some(value) => TimeRange::parse(value).ok_or_else(|| {
                ApiError::bad_request(format!(
                    "Invalid time_range '{}', expected short_term, medium_term or long_term",
                    value
                ))
            }),
        }
    }

    /// Missing or zero means the default page size.
    fn limit(&self) -> u32 {
        match self.limit {
            None | Some(0) => DEFAULT_TOP_ITEMS_LIMIT,
            Some(limit) => limit.min(MAX_PAGE_LIMIT),
        }
    }
}

async fn get_profile(
    access: SpotifyAccess,
    State(aggregator): State<GuardedAggregator>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = aggregator.source().profile(&access.access_token).await?;
    Ok(Json(profile))
}

async fn get_top_artists(
    access: SpotifyAccess,
    State(aggregator): State<GuardedAggregator>,
    Query(query): Query<TopItemsQuery>,
) -> Result<Json<Vec<Artist>>, ApiError> {
    let range = query.range()?;
    let limit = query.limit();
    debug!("Top artists range={:?} limit={}", range, limit);
    let artists = aggregator
        .source()
        .top_artists(&access.access_token, range, limit)
        .await?;
    Ok(Json(artists))
}

async fn get_top_tracks(
    access: SpotifyAccess,
    State(aggregator): State<GuardedAggregator>,
    Query(query): Query<TopItemsQuery>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let range = query.range()?;
    let limit = query.limit();
    debug!("Top tracks range={:?} limit={}", range, limit);
    let tracks = aggregator
        .source()
        .top_tracks(&access.access_token, range, limit)
        .await?;
    Ok(Json(tracks))
}

async fn get_playlists(
    access: SpotifyAccess,
    State(aggregator): State<GuardedAggregator>,
) -> Result<Json<Vec<Playlist>>, ApiError> {
    let playlists = aggregator.source().playlists(&access.access_token).await?;
    Ok(Json(playlists))
}

async fn get_recently_played(
    access: SpotifyAccess,
    State(aggregator): State<GuardedAggregator>,
) -> Result<Json<Vec<RecentlyPlayedItem>>, ApiError> {
    let items = aggregator
        .source()
        .recently_played(&access.access_token, RECENTLY_PLAYED_LIMIT)
        .await?;
    Ok(Json(items))
}

pub fn make_spotify_routes(state: ServerState) -> Router {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/top-artists", get(get_top_artists))
        .route("/top-tracks", get(get_top_tracks))
        .route("/playlists", get(get_playlists))
        .route("/recent", get(get_recently_played))
        .with_state(state)
}
