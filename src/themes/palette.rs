//! Lookup tables turning theme names and genres into colors and moods.

/// Checked in order; the first key contained in the genre wins.
const GENRE_COLORS: &[(&str, &str)] = &[
    ("indie", "#a8c5e0"),
    ("folk", "#d4c5a9"),
    ("ambient", "#c5d9e8"),
    ("electronic", "#b8a8d1"),
    ("rock", "#d1a8a8"),
    ("pop", "#f0c0c0"),
    ("jazz", "#c5a8d1"),
    ("classical", "#e8d4c5"),
    ("hip hop", "#d1c5a8"),
    ("metal", "#8a8a8a"),
    ("punk", "#d1a8c5"),
];

pub const FALLBACK_COLOR: &str = "#b5b5b5";

const MOODS: &[(&str, &str)] = &[
    ("calm", "pale violet drift, distant radio hum"),
    ("motion", "neon pulse, accelerating heartbeat"),
    ("melancholy", "rain-soaked pavement, fading photographs"),
    ("joy", "sun-drenched afternoon, laughter echoing"),
    ("curiosity", "flickering streetlights, unmarked paths"),
    ("nostalgia", "cassette tape hiss, forgotten summers"),
    ("indie", "coffee shop ambiance, analog warmth"),
    ("folk", "wooden cabin, fireplace crackling"),
    ("ambient", "vast empty spaces, soft breathing"),
    ("electronic", "digital rain, synthesized dreams"),
    ("rock", "distorted guitars, stadium echoes"),
];

pub const FALLBACK_MOOD: &str = "undefined atmosphere, shifting tones";

const FAMILY_THEMES: &[(&str, &str)] = &[
    ("indie", "Curiosity"),
    ("folk", "Nostalgia"),
    ("ambient", "Calm"),
    ("electronic", "Motion"),
    ("rock", "Release"),
    ("pop", "Joy"),
    ("jazz", "Contemplation"),
    ("classical", "Serenity"),
];

pub const FALLBACK_FAMILY_THEME: &str = "Exploration";

pub fn color_for_genre(genre: &str) -> &'static str {
    let genre = genre.to_lowercase();
    GENRE_COLORS
        .iter()
        .find(|(key, _)| genre.contains(key))
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

pub fn mood_for_theme(name: &str) -> &'static str {
    let name = name.to_lowercase();
    MOODS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, mood)| *mood)
        .unwrap_or(FALLBACK_MOOD)
}

/// Theme name for a genre family such as `"indie"` or `"rock"`.
pub fn theme_name_for_family(family: &str) -> &'static str {
    let family = family.to_lowercase();
    FAMILY_THEMES
        .iter()
        .find(|(key, _)| *key == family)
        .map(|(_, theme)| *theme)
        .unwrap_or(FALLBACK_FAMILY_THEME)
}
