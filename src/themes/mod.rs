mod models;
mod palette;
mod synthesizer;

pub use models::{Theme, ThemeEvidence, ThemeWeights, ThemesOutput};
pub use palette::{color_for_genre, mood_for_theme, theme_name_for_family};
pub use synthesizer::infer_themes_from_metrics;

use crate::consolidated::Consolidated;

/// Synthesizes themes for a consolidated listening snapshot.
pub fn infer_themes(consolidated: &Consolidated) -> ThemesOutput {
    infer_themes_from_metrics(&consolidated.derived)
}
