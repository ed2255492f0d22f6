//! Orbit Server Library
//!
//! Spotify and mail backend-for-frontend with a deterministic
//! listening-to-themes pipeline. Modules are exposed for testing and reuse.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod consolidated;
pub mod derived;
pub mod listening;
pub mod mail;
pub mod server;
pub mod spotify;
pub mod text;
pub mod themes;

// Re-export commonly used types for convenience
pub use aggregator::{AggregatorSettings, ListeningAggregator};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use spotify::{FixtureMusicSource, MusicSource, SpotifyWebClient};
