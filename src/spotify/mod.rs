mod client;
mod fixture;
mod payloads;
mod source;

pub use client::{SpotifyWebClient, DEFAULT_SPOTIFY_API_BASE, MAX_PAGE_LIMIT};
pub use fixture::{FixtureMusicSource, FIXTURE_USER_ID};
pub use source::{MusicSource, SourceError};

#[cfg(feature = "mock")]
pub use source::MockMusicSource;
