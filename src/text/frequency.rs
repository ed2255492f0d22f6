use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Token counts that iterate in the order tokens were first seen.
///
/// Ranking relies on stable sorts, so the insertion order is what breaks
/// ties between equal counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermFrequency {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: &str) {
        self.add_count(token, 1);
    }

    pub fn add_count(&mut self, token: &str, count: usize) {
        match self.index.get(token) {
            Some(&position) => self.entries[position].1 += count,
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), count));
            }
        }
    }

    pub fn get(&self, token: &str) -> usize {
        self.index
            .get(token)
            .map(|&position| self.entries[position].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|(token, count)| (token.as_str(), *count))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TermFrequency {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut freq = TermFrequency::new();
        for token in iter {
            freq.add(token.as_ref());
        }
        freq
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredToken {
    pub token: String,
    pub score: f64,
}

pub fn compute_term_frequency<S: AsRef<str>>(tokens: &[S]) -> TermFrequency {
    tokens.iter().collect()
}

/// Turns raw counts into `count / total_docs` relevance scores, highest
/// first. Equal scores keep first-seen order.
///
/// A `total_docs` of zero is treated as one.
pub fn score_tokens(freq: &TermFrequency, total_docs: usize) -> Vec<ScoredToken> {
    let divisor = total_docs.max(1) as f64;
    let mut scored: Vec<ScoredToken> = freq
        .iter()
        .map(|(token, count)| ScoredToken {
            token: token.to_string(),
            score: count as f64 / divisor,
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
