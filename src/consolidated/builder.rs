use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use super::models::{ArtistTrackWindow, ArtistWindow, Consolidated, TimeRanges, SPOTIFY_SOURCE};
use crate::derived::{compute_derived, ListeningWindows};
use crate::listening::{Artist, Playlist, RecentlyPlayedItem, TimeRange, Track, UserProfile};
use crate::spotify::{MusicSource, SourceError};

/// Page size for top items and recently played.
const TOP_ITEMS_LIMIT: u32 = 25;
const RECENTLY_PLAYED_LIMIT: u32 = 50;

/// Raw per-category results of one fetch, before merging and derivation.
#[derive(Clone, Debug)]
pub struct FetchedListening {
    pub profile: UserProfile,
    pub short_artists: Vec<Artist>,
    pub medium_artists: Vec<Artist>,
    pub long_artists: Vec<Artist>,
    pub medium_tracks: Vec<Track>,
    pub playlists: Vec<Playlist>,
    pub recently_played: Vec<RecentlyPlayedItem>,
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

/// Id-deduplicated union of the three artist windows. An artist keeps the
/// position of its first appearance; a later duplicate replaces its record.
pub fn merge_artists(windows: &[&[Artist]]) -> Vec<Artist> {
    let mut merged: Vec<Artist> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for artist in windows.iter().flat_map(|window| window.iter()) {
        match positions.get(artist.id.as_str()) {
            Some(&position) => merged[position] = artist.clone(),
            None => {
                positions.insert(artist.id.as_str(), merged.len());
                merged.push(artist.clone());
            }
        }
    }
    merged
}

/// Merges fetched records and computes derived metrics. Pure apart from the
/// `fetchedAt` timestamp.
pub fn build_consolidated(fetched: FetchedListening) -> Consolidated {
    let artists = merge_artists(&[
        fetched.short_artists.as_slice(),
        fetched.medium_artists.as_slice(),
        fetched.long_artists.as_slice(),
    ]);

    let derived = compute_derived(&ListeningWindows {
        short_artists: &fetched.short_artists,
        medium_artists: &fetched.medium_artists,
        long_artists: &fetched.long_artists,
        all_artists: &artists,
        playlists: &fetched.playlists,
        recently_played: &fetched.recently_played,
    });

    let time_ranges = TimeRanges {
        short: ArtistWindow {
            top_artist_ids: ids(&fetched.short_artists, |a| a.id.as_str()),
        },
        medium: ArtistTrackWindow {
            top_artist_ids: ids(&fetched.medium_artists, |a| a.id.as_str()),
            top_track_ids: ids(&fetched.medium_tracks, |t| t.id.as_str()),
        },
        long: ArtistWindow {
            top_artist_ids: ids(&fetched.long_artists, |a| a.id.as_str()),
        },
    };

    debug!(
        artists = artists.len(),
        playlists = fetched.playlists.len(),
        stability = derived.stability_score,
        "Built consolidated snapshot"
    );

    Consolidated {
        source: SPOTIFY_SOURCE.to_string(),
        fetched_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        profile: fetched.profile,
        time_ranges,
        artists,
        tracks: fetched.medium_tracks,
        playlists: fetched.playlists,
        recently_played: fetched.recently_played,
        derived,
    }
}

/// Fetches all listening categories concurrently. The first failure aborts
/// the whole fetch.
pub async fn fetch_listening(
    source: &dyn MusicSource,
    access_token: &str,
) -> Result<FetchedListening, SourceError> {
    let (
        profile,
        short_artists,
        medium_artists,
        long_artists,
        medium_tracks,
        playlists,
        recently_played,
    ) = tokio::try_join!(
        source.profile(access_token),
        source.top_artists(access_token, TimeRange::ShortTerm, TOP_ITEMS_LIMIT),
        source.top_artists(access_token, TimeRange::MediumTerm, TOP_ITEMS_LIMIT),
        source.top_artists(access_token, TimeRange::LongTerm, TOP_ITEMS_LIMIT),
        source.top_tracks(access_token, TimeRange::MediumTerm, TOP_ITEMS_LIMIT),
        source.playlists(access_token),
        source.recently_played(access_token, RECENTLY_PLAYED_LIMIT),
    )?;

    Ok(FetchedListening {
        profile,
        short_artists,
        medium_artists,
        long_artists,
        medium_tracks,
        playlists,
        recently_played,
    })
}

pub async fn fetch_consolidated(
    source: &dyn MusicSource,
    access_token: &str,
) -> Result<Consolidated, SourceError> {
    let fetched = fetch_listening(source, access_token).await?;
    let consolidated = build_consolidated(fetched);
    info!(
        user = %consolidated.profile.id,
        artists = consolidated.artists.len(),
        "Fetched consolidated listening data"
    );
    Ok(consolidated)
}
