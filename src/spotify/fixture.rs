//! Deterministic in-memory music source used in mock mode and tests.

use async_trait::async_trait;

use super::source::{MusicSource, SourceError};
use crate::listening::{
    Artist, Playlist, RecentlyPlayedItem, TimeRange, Track, TrackAlbum, TrackArtist, UserProfile,
};

pub const FIXTURE_USER_ID: &str = "mock_user_123";
const FIXTURE_PLAYED_AT: &str = "2024-01-01T12:00:00Z";

/// Serves the same small listening history to every caller, whatever the
/// access token.
#[derive(Clone, Debug, Default)]
pub struct FixtureMusicSource;

impl FixtureMusicSource {
    pub fn new() -> Self {
        Self
    }

    fn artist(id: &str) -> Artist {
        let (name, genres, popularity): (&str, &[&str], u32) = match id {
            "a1" => ("Bon Iver", &["indie folk", "chamber pop"][..], 75),
            "a2" => ("Tycho", &["ambient", "electronic"][..], 70),
            _ => ("Radiohead", &["alternative rock", "art rock"][..], 85),
        };
        Artist {
            popularity: Some(popularity),
            ..Artist::new(id, name, genres)
        }
    }

    fn artist_ids(range: TimeRange) -> &'static [&'static str] {
        match range {
            TimeRange::ShortTerm => &["a1", "a2"],
            TimeRange::MediumTerm => &["a1", "a2", "a3"],
            TimeRange::LongTerm => &["a2", "a3"],
        }
    }
}

#[async_trait]
impl MusicSource for FixtureMusicSource {
    async fn profile(&self, _access_token: &str) -> Result<UserProfile, SourceError> {
        Ok(UserProfile {
            id: FIXTURE_USER_ID.to_string(),
            name: "Mock User".to_string(),
            email: Some("mock@example.com".to_string()),
            image: None,
        })
    }

    async fn top_artists(
        &self,
        _access_token: &str,
        range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Artist>, SourceError> {
        Ok(Self::artist_ids(range)
            .iter()
            .take(limit as usize)
            .map(|id| Self::artist(id))
            .collect())
    }

    async fn top_tracks(
        &self,
        _access_token: &str,
        _range: TimeRange,
        limit: u32,
    ) -> Result<Vec<Track>, SourceError> {
        let holocene = Track {
            id: "t1".to_string(),
            name: "Holocene".to_string(),
            artists: vec![TrackArtist {
                id: "a1".to_string(),
                name: "Bon Iver".to_string(),
            }],
            album: TrackAlbum {
                id: "alb1".to_string(),
                name: "Album".to_string(),
                image: None,
            },
            popularity: None,
        };
        Ok(std::iter::once(holocene).take(limit as usize).collect())
    }

    async fn playlists(&self, _access_token: &str) -> Result<Vec<Playlist>, SourceError> {
        let playlist = |id: &str, name: &str, description: &str, tracks_total| Playlist {
            id: id.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            image: None,
            tracks_total,
            public: true,
            owner_id: FIXTURE_USER_ID.to_string(),
        };
        Ok(vec![
            playlist("p1", "Chill Study", "Focus music", 50),
            playlist("p2", "Running Pump", "High energy", 30),
        ])
    }

    async fn recently_played(
        &self,
        _access_token: &str,
        limit: u32,
    ) -> Result<Vec<RecentlyPlayedItem>, SourceError> {
        let item = RecentlyPlayedItem {
            track_id: "t1".to_string(),
            track_name: "Holocene".to_string(),
            artist_ids: vec!["a1".to_string()],
            played_at: FIXTURE_PLAYED_AT.to_string(),
        };
        Ok(std::iter::once(item).take(limit as usize).collect())
    }
}
