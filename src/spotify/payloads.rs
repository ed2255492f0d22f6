//! Spotify Web API payloads and their normalization into listening records.
//!
//! Only the fields the pipeline reads are declared. Anything optional on the
//! wire is defaulted here so downstream code never sees a missing collection.

use serde::Deserialize;

use crate::listening::{
    Artist, Playlist, RecentlyPlayedItem, Track, TrackAlbum, TrackArtist, UserProfile,
};

#[derive(Debug, Deserialize)]
pub(super) struct Image {
    pub url: String,
}

fn first_image(images: Option<Vec<Image>>) -> Option<String> {
    images.and_then(|images| images.into_iter().next()).map(|i| i.url)
}

/// One page of a paginated listing. Spotify occasionally returns `null`
/// entries (e.g. deleted playlists), which are skipped.
#[derive(Debug, Deserialize)]
pub(super) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn into_items(self) -> impl Iterator<Item = T> {
        self.items.into_iter().flatten()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub images: Option<Vec<Image>>,
}

impl From<SpotifyProfile> for UserProfile {
    fn from(raw: SpotifyProfile) -> Self {
        let name = raw.display_name.unwrap_or_else(|| raw.id.clone());
        UserProfile {
            id: raw.id,
            name,
            email: raw.email,
            image: first_image(raw.images),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyArtist {
    pub id: String,
    pub name: String,
    pub genres: Option<Vec<String>>,
    pub images: Option<Vec<Image>>,
    pub popularity: Option<u32>,
}

impl From<SpotifyArtist> for Artist {
    fn from(raw: SpotifyArtist) -> Self {
        Artist {
            id: raw.id,
            name: raw.name,
            genres: raw.genres.unwrap_or_default(),
            image: first_image(raw.images),
            popularity: raw.popularity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyAlbum {
    pub id: Option<String>,
    pub name: String,
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtistRef>,
    pub album: Option<SpotifyAlbum>,
    pub popularity: Option<u32>,
}

impl From<SpotifyTrack> for Track {
    fn from(raw: SpotifyTrack) -> Self {
        let album = match raw.album {
            Some(album) => TrackAlbum {
                id: album.id.unwrap_or_default(),
                name: album.name,
                image: first_image(album.images),
            },
            None => TrackAlbum {
                id: String::new(),
                name: String::new(),
                image: None,
            },
        };
        Track {
            id: raw.id.unwrap_or_default(),
            name: raw.name,
            artists: raw
                .artists
                .into_iter()
                .map(|a| TrackArtist {
                    id: a.id.unwrap_or_default(),
                    name: a.name,
                })
                .collect(),
            album,
            popularity: raw.popularity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyTracksRef {
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyOwner {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub images: Option<Vec<Image>>,
    pub tracks: Option<SpotifyTracksRef>,
    pub public: Option<bool>,
    pub owner: SpotifyOwner,
}

impl From<SpotifyPlaylist> for Playlist {
    fn from(raw: SpotifyPlaylist) -> Self {
        Playlist {
            id: raw.id,
            name: raw.name,
            description: Some(raw.description.unwrap_or_default()),
            image: first_image(raw.images),
            tracks_total: raw.tracks.map(|t| t.total).unwrap_or(0),
            public: raw.public.unwrap_or(false),
            owner_id: raw.owner.id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SpotifyPlayHistory {
    pub track: SpotifyTrack,
    pub played_at: String,
}

impl From<SpotifyPlayHistory> for RecentlyPlayedItem {
    fn from(raw: SpotifyPlayHistory) -> Self {
        RecentlyPlayedItem {
            track_id: raw.track.id.unwrap_or_default(),
            track_name: raw.track.name,
            artist_ids: raw
                .track
                .artists
                .into_iter()
                .filter_map(|a| a.id)
                .collect(),
            played_at: raw.played_at,
        }
    }
}
