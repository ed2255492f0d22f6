use crate::listening::Playlist;
use crate::text::{compute_term_frequency, score_tokens, tokenize, ScoredToken};

const MAX_PLAYLIST_KEYWORDS: usize = 20;

/// `token` plus `occurrences / playlist count`.
pub type PlaylistKeyword = ScoredToken;

/// Ranks the words used across playlist names and descriptions.
pub fn extract_playlist_keywords(playlists: &[Playlist]) -> Vec<PlaylistKeyword> {
    let tokens: Vec<String> = playlists
        .iter()
        .flat_map(|playlist| tokenize(&playlist.keyword_text()))
        .collect();

    let freq = compute_term_frequency(&tokens);
    let mut keywords = score_tokens(&freq, playlists.len());
    keywords.truncate(MAX_PLAYLIST_KEYWORDS);
    keywords
}
