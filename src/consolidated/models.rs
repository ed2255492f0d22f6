use serde::{Deserialize, Serialize};

use crate::derived::DerivedMetrics;
use crate::listening::{Artist, Playlist, RecentlyPlayedItem, Track, UserProfile};

pub const SPOTIFY_SOURCE: &str = "spotify";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistWindow {
    pub top_artist_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistTrackWindow {
    pub top_artist_ids: Vec<String>,
    pub top_track_ids: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeRanges {
    pub short: ArtistWindow,
    pub medium: ArtistTrackWindow,
    pub long: ArtistWindow,
}

/// Everything the frontend needs about a user's listening, fetched in one go.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consolidated {
    pub source: String,
    /// RFC 3339
    pub fetched_at: String,
    pub profile: UserProfile,
    pub time_ranges: TimeRanges,
    pub artists: Vec<Artist>,
    pub tracks: Vec<Track>,
    pub playlists: Vec<Playlist>,
    pub recently_played: Vec<RecentlyPlayedItem>,
    pub derived: DerivedMetrics,
}
