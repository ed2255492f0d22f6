//! Aggregated listening data and synthesized themes.

use axum::{extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::consolidated::Consolidated;
use crate::themes::ThemesOutput;

use super::error::ApiError;
use super::session::SpotifyAccess;
use super::state::{GuardedAggregator, ServerState};

async fn get_spotify_data(
    access: SpotifyAccess,
    State(aggregator): State<GuardedAggregator>,
) -> Result<Json<Consolidated>, ApiError> {
    let consolidated = aggregator
        .consolidated(&access.user_id, &access.access_token)
        .await?;
    Ok(Json(consolidated.as_ref().clone()))
}

async fn get_spotify_themes(
    access: SpotifyAccess,
    State(aggregator): State<GuardedAggregator>,
) -> Result<Json<ThemesOutput>, ApiError> {
    let themes = aggregator
        .themes(&access.user_id, &access.access_token)
        .await?;
    debug!(
        user = %access.user_id,
        "Synthesized {} themes",
        themes.themes.len()
    );
    Ok(Json(themes))
}

pub fn make_mcp_routes(state: ServerState) -> Router {
    Router::new()
        .route("/spotify/data", get(get_spotify_data))
        .route("/spotify/themes", get(get_spotify_themes))
        .with_state(state)
}
