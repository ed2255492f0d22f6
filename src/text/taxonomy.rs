//! Fixed keyword taxonomy that maps free-text tokens onto mood themes.

use super::TermFrequency;

/// Theme name and the words that trigger it, in ranking tie-break order.
pub const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "calm",
        &[
            "sleep",
            "chill",
            "relax",
            "ambient",
            "calm",
            "peaceful",
            "meditation",
            "study",
            "focus",
            "quiet",
        ],
    ),
    (
        "motion",
        &[
            "run", "workout", "gym", "energy", "drive", "roadtrip", "car", "cardio", "hype", "pump",
        ],
    ),
    (
        "melancholy",
        &[
            "sad",
            "cry",
            "rain",
            "lonely",
            "alone",
            "heartbreak",
            "breakup",
            "feels",
            "emo",
            "mood",
        ],
    ),
    (
        "joy",
        &[
            "happy",
            "party",
            "dance",
            "fun",
            "summer",
            "beach",
            "friends",
            "celebrate",
            "good",
            "vibes",
        ],
    ),
    (
        "curiosity",
        &[
            "discover",
            "new",
            "indie",
            "underground",
            "fresh",
            "explore",
            "alternative",
            "experimental",
        ],
    ),
    (
        "nostalgia",
        &[
            "throwback",
            "oldies",
            "classics",
            "retro",
            "memories",
            "vintage",
            "80s",
            "90s",
            "00s",
        ],
    ),
];

/// Per-theme hit counts, iterated in the order each theme was first hit.
pub type ThemeScores = TermFrequency;

/// Counts, for every token, each theme whose trigger list contains it.
///
/// Themes never hit are absent from the result.
pub fn map_tokens_to_themes<S: AsRef<str>>(tokens: &[S]) -> ThemeScores {
    let mut scores = ThemeScores::new();
    for token in tokens {
        let token = token.as_ref();
        for (theme, keywords) in THEME_KEYWORDS {
            if keywords.contains(&token) {
                scores.add(theme);
            }
        }
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_has_between_eight_and_ten_keywords() {
        assert_eq!(THEME_KEYWORDS.len(), 6);
        for (theme, keywords) in THEME_KEYWORDS {
            assert!(
                (8..=10).contains(&keywords.len()),
                "{theme} has {} keywords",
                keywords.len()
            );
        }
    }

    #[test]
    fn counts_matches_in_first_hit_order() {
        let scores = map_tokens_to_themes(&["pump", "chill", "study", "sleep", "running"]);
        let collected: Vec<(&str, usize)> = scores.iter().collect();
        assert_eq!(collected, vec![("motion", 1), ("calm", 3)]);
    }

    #[test]
    fn unknown_tokens_produce_nothing() {
        assert!(map_tokens_to_themes(&["spreadsheet", "invoice"]).is_empty());
    }

    #[test]
    fn membership_is_exact() {
        assert!(map_tokens_to_themes(&["chilled", "runner"]).is_empty());
    }
}
