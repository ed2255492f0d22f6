//! Rule-based theme synthesis over derived listening metrics.

use std::collections::HashMap;

use tracing::debug;

use super::models::{Theme, ThemeEvidence, ThemeWeights, ThemesOutput};
use super::palette::{color_for_genre, mood_for_theme, theme_name_for_family};
use crate::derived::{DerivedMetrics, THEMES_TARGET};
use crate::text::map_tokens_to_themes;

const KEYWORD_THEME_LIMIT: usize = 3;
const FAMILY_THEME_LIMIT: usize = 3;
const KEYWORD_THEME_GENRES: usize = 5;
const HISTOGRAM_FAMILY_WINDOW: usize = 15;
const EVIDENCE_LIMIT: usize = 3;
const HISTOGRAM_FAMILY_WEIGHT: f64 = 0.35;
const RECENCY_FAMILY_WEIGHT: f64 = 0.15;

struct GenreFamily<'a> {
    name: &'a str,
    genres: Vec<&'a str>,
    score: f64,
}

/// First space-delimited word of a genre: `"indie folk"` belongs to `"indie"`.
fn genre_family(genre: &str) -> &str {
    genre.split(' ').next().unwrap_or(genre)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn build_theme<S: AsRef<str>>(name: &str, genres: &[S], playlists: &[S]) -> Theme {
    let lead_genre = genres.first().map(|g| g.as_ref());
    let color = color_for_genre(lead_genre.unwrap_or(name));

    Theme {
        name: capitalize(name),
        mood: mood_for_theme(name).to_string(),
        color: color.to_string(),
        evidence: ThemeEvidence {
            genres: genres
                .iter()
                .take(EVIDENCE_LIMIT)
                .map(|g| g.as_ref().to_string())
                .collect(),
            playlists: playlists
                .iter()
                .take(EVIDENCE_LIMIT)
                .map(|p| p.as_ref().to_string())
                .collect(),
            recency_hint: lead_genre.map(|genre| format!("Recently engaging with {genre}")),
        },
    }
}

fn family_position<'a>(
    families: &mut Vec<GenreFamily<'a>>,
    positions: &mut HashMap<&'a str, usize>,
    name: &'a str,
) -> usize {
    *positions.entry(name).or_insert_with(|| {
        families.push(GenreFamily {
            name,
            genres: Vec::new(),
            score: 0.0,
        });
        families.len() - 1
    })
}

/// Groups the leading histogram genres into families and scores them, adding
/// recency boosts on top. Families keep first-seen order.
fn score_genre_families(metrics: &DerivedMetrics) -> Vec<GenreFamily<'_>> {
    let mut families = Vec::new();
    let mut positions = HashMap::new();

    for entry in metrics.genre_histogram.iter().take(HISTOGRAM_FAMILY_WINDOW) {
        let position = family_position(&mut families, &mut positions, genre_family(&entry.genre));
        let family = &mut families[position];
        family.genres.push(entry.genre.as_str());
        family.score += entry.count as f64 * HISTOGRAM_FAMILY_WEIGHT;
    }

    for entry in &metrics.recency_boost {
        let position = family_position(&mut families, &mut positions, genre_family(&entry.genre));
        families[position].score += entry.boost * RECENCY_FAMILY_WEIGHT;
    }

    families
}

/// Synthesizes up to six narrative themes from derived metrics.
///
/// Keyword themes come first (from playlist vocabulary), followed by genre
/// family themes. The same name may appear twice when both sources agree.
pub fn infer_themes_from_metrics(metrics: &DerivedMetrics) -> ThemesOutput {
    let playlist_tokens: Vec<&str> = metrics
        .playlist_keywords
        .iter()
        .map(|k| k.token.as_str())
        .collect();
    let leading_tokens: Vec<&str> = playlist_tokens
        .iter()
        .take(EVIDENCE_LIMIT)
        .copied()
        .collect();
    let leading_genres: Vec<&str> = metrics
        .genre_histogram
        .iter()
        .take(KEYWORD_THEME_GENRES)
        .map(|g| g.genre.as_str())
        .collect();

    let theme_scores = map_tokens_to_themes(&playlist_tokens);
    let mut keyword_themes: Vec<(&str, usize)> = theme_scores.iter().collect();
    keyword_themes.sort_by(|a, b| b.1.cmp(&a.1));

    let mut themes: Vec<Theme> = keyword_themes
        .iter()
        .take(KEYWORD_THEME_LIMIT)
        .map(|(name, _)| build_theme(name, &leading_genres, &leading_tokens))
        .collect();

    let mut families = score_genre_families(metrics);
    families.sort_by(|a, b| b.score.total_cmp(&a.score));
    themes.extend(families.iter().take(FAMILY_THEME_LIMIT).map(|family| {
        build_theme(theme_name_for_family(family.name), &family.genres, &[])
    }));

    themes.truncate(THEMES_TARGET);
    debug!(
        "Synthesized {} themes from {} keywords and {} genres",
        themes.len(),
        playlist_tokens.len(),
        metrics.genre_histogram.len()
    );

    ThemesOutput {
        themes,
        weights: ThemeWeights::MANIFEST,
    }
}
