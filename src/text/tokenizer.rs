//! Free-text tokenizer shared by playlist keywords and mail subjects.

/// Common English function words that never make useful keywords.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "should", "could", "may", "might", "can", "my", "your",
    "their", "this", "that", "these", "those", "i", "you", "he", "she", "it", "we", "they",
];

/// Tokens this short or shorter are dropped.
const MIN_TOKEN_LEN_EXCLUSIVE: usize = 2;

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `text` into lowercase word tokens.
///
/// Every character that is neither a word character (`[A-Za-z0-9_]`) nor
/// whitespace becomes a separator. Tokens of length <= 2 and stopwords are
/// dropped. Empty input gives an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if is_word_char(c) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|token| token.len() > MIN_TOKEN_LEN_EXCLUSIVE && !is_stopword(token))
        .map(str::to_string)
        .collect()
}
