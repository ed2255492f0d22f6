//! Statistics derived from a user's listening records.
//!
//! Everything here is pure and total: empty input produces empty lists or
//! zero, never an error.

mod histogram;
mod keywords;
mod recency;
mod stability;

use serde::{Deserialize, Serialize};

use crate::listening::{Artist, Playlist, RecentlyPlayedItem};

pub use histogram::{compute_genre_histogram, GenreHistogramEntry};
pub use keywords::{extract_playlist_keywords, PlaylistKeyword};
pub use recency::{compute_recency_boost, RecencyBoostEntry, RECENCY_BOOST_STEP};
pub use stability::compute_stability_score;

/// Number of themes the frontend wants to render.
pub const THEMES_TARGET: usize = 6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub genre_histogram: Vec<GenreHistogramEntry>,
    pub stability_score: f64,
    pub playlist_keywords: Vec<PlaylistKeyword>,
    pub recency_boost: Vec<RecencyBoostEntry>,
    pub themes_target: usize,
}

impl Default for DerivedMetrics {
    fn default() -> Self {
        Self {
            genre_histogram: Vec::new(),
            stability_score: 0.0,
            playlist_keywords: Vec::new(),
            recency_boost: Vec::new(),
            themes_target: THEMES_TARGET,
        }
    }
}

/// Inputs of [`compute_derived`], borrowed from a single fetch.
pub struct ListeningWindows<'a> {
    pub short_artists: &'a [Artist],
    pub medium_artists: &'a [Artist],
    pub long_artists: &'a [Artist],
    /// Union of the three artist windows, used to resolve recently played artists.
    pub all_artists: &'a [Artist],
    pub playlists: &'a [Playlist],
    pub recently_played: &'a [RecentlyPlayedItem],
}

pub fn compute_derived(windows: &ListeningWindows<'_>) -> DerivedMetrics {
    DerivedMetrics {
        genre_histogram: compute_genre_histogram(windows.medium_artists),
        stability_score: compute_stability_score(
            windows.short_artists,
            windows.medium_artists,
            windows.long_artists,
        ),
        playlist_keywords: extract_playlist_keywords(windows.playlists),
        recency_boost: compute_recency_boost(windows.recently_played, windows.all_artists),
        themes_target: THEMES_TARGET,
    }
}
