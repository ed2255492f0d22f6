//! One-shot snapshot of a user's listening: every category fetched in
//! parallel, merged, and annotated with derived metrics.

mod builder;
mod models;

pub use builder::{
    build_consolidated, fetch_consolidated, fetch_listening, merge_artists, FetchedListening,
};
pub use models::{ArtistTrackWindow, ArtistWindow, Consolidated, TimeRanges, SPOTIFY_SOURCE};
