use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeEvidence {
    pub genres: Vec<String>,
    pub playlists: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recency_hint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub mood: String,
    /// `#rrggbb`
    pub color: String,
    pub evidence: ThemeEvidence,
}

/// Relative weight of each signal. Reported alongside the themes for the
/// frontend; synthesis itself does not read it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeWeights {
    pub genre_histogram: f64,
    pub stability: f64,
    pub playlists: f64,
    pub recency: f64,
    pub tracks: f64,
}

impl ThemeWeights {
    pub const MANIFEST: ThemeWeights = ThemeWeights {
        genre_histogram: 0.35,
        stability: 0.20,
        playlists: 0.25,
        recency: 0.15,
        tracks: 0.05,
    };
}

impl Default for ThemeWeights {
    fn default() -> Self {
        Self::MANIFEST
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemesOutput {
    pub themes: Vec<Theme>,
    pub weights: ThemeWeights,
}
