use serde::{Deserialize, Serialize};

use crate::listening::Artist;
use crate::text::TermFrequency;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenreHistogramEntry {
    pub genre: String,
    pub count: usize,
}

/// Counts genre occurrences across `artists`, most frequent first.
///
/// Genres with equal counts keep the order in which they were first seen.
pub fn compute_genre_histogram(artists: &[Artist]) -> Vec<GenreHistogramEntry> {
    let counts: TermFrequency = artists
        .iter()
        .flat_map(|artist| artist.genres.iter())
        .collect();

    let mut histogram: Vec<GenreHistogramEntry> = counts
        .iter()
        .map(|(genre, count)| GenreHistogramEntry {
            genre: genre.to_string(),
            count,
        })
        .collect();
    histogram.sort_by(|a, b| b.count.cmp(&a.count));
    histogram
}
