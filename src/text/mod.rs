mod frequency;
mod taxonomy;
mod tokenizer;

pub use frequency::{compute_term_frequency, score_tokens, ScoredToken, TermFrequency};
pub use taxonomy::{map_tokens_to_themes, ThemeScores, THEME_KEYWORDS};
pub use tokenizer::tokenize;
