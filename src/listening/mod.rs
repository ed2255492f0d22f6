mod models;

pub use models::{
    Artist, Playlist, RecentlyPlayedItem, TimeRange, Track, TrackAlbum, TrackArtist, UserProfile,
};
