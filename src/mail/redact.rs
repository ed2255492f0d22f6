//! Privacy helpers for mail metadata: address masking, `From:` parsing and
//! subject screening.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::{compute_term_frequency, score_tokens, tokenize, ScoredToken};

pub const DEFAULT_SUBJECT_MAX_CHARS: usize = 80;
pub const DEFAULT_TOPIC_TOKENS: usize = 20;
const ELLIPSIS: &str = "...";

lazy_static! {
    static ref FROM_HEADER: Regex =
        Regex::new(r"^([^<]+)\s*<([^>]+)>$").expect("Failed to compile From header regex");

    /// Bare 9-10 digit runs (account/order numbers) and phone-number shapes.
    static ref PII: Regex = Regex::new(
        r"\b[0-9]{9,10}\b|\b[0-9]{3}[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b"
    )
    .expect("Failed to compile PII regex");
}

/// Masks an address down to a recognizable hint: `john.doe@gmail.com`
/// becomes `jo***@g***.com`. Strings without `@` are returned unchanged.
pub fn redact_email(email: &str) -> String {
    let mut parts = email.split('@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return email.to_string();
    };

    let masked_local = if local.chars().count() > 2 {
        format!("{}***", local.chars().take(2).collect::<String>())
    } else {
        local.to_string()
    };

    let mut labels = domain.split('.');
    let first_label = labels.next().unwrap_or_default();
    let rest: Vec<&str> = labels.collect();
    if rest.is_empty() {
        return format!("{masked_local}@{domain}");
    }

    let masked_first = if first_label.chars().count() > 1 {
        let first_char: String = first_label.chars().take(1).collect();
        format!("{first_char}***")
    } else {
        first_label.to_string()
    };
    format!("{masked_local}@{masked_first}.{}", rest.join("."))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSender {
    pub name: String,
    pub email: String,
}

fn strip_quotes(name: &str) -> &str {
    let name = name
        .strip_prefix('"')
        .or_else(|| name.strip_prefix('\''))
        .unwrap_or(name);
    name.strip_suffix('"')
        .or_else(|| name.strip_suffix('\''))
        .unwrap_or(name)
}

/// Splits `"Name" <addr@host>` into display name and lowercased address.
/// A bare address uses its local part as the name.
pub fn parse_from_header(from: &str) -> ParsedSender {
    if let Some(captures) = FROM_HEADER.captures(from) {
        return ParsedSender {
            name: strip_quotes(captures[1].trim()).to_string(),
            email: captures[2].trim().to_lowercase(),
        };
    }

    let email = from.trim().to_lowercase();
    let name = email.split('@').next().unwrap_or_default().to_string();
    ParsedSender { name, email }
}

/// True when the subject looks like it carries an account number or phone
/// number.
pub fn should_redact_subject(subject: &str) -> bool {
    PII.is_match(subject)
}

/// Cuts subjects longer than `max_chars` characters, ending them with `...`.
pub fn truncate_subject(subject: &str, max_chars: usize) -> String {
    if subject.chars().count() <= max_chars {
        return subject.to_string();
    }
    let kept: String = subject
        .chars()
        .take(max_chars.saturating_sub(ELLIPSIS.len()))
        .collect();
    format!("{kept}{ELLIPSIS}")
}

/// The tokens themselves followed by every run of `n` consecutive tokens
/// joined by a space.
pub fn extract_ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> Vec<String> {
    let mut ngrams: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
    if n > 0 {
        ngrams.extend(tokens.windows(n).map(|window| {
            window
                .iter()
                .map(|t| t.as_ref())
                .collect::<Vec<&str>>()
                .join(" ")
        }));
    }
    ngrams
}

/// Most frequent subject words and bigrams, scored by occurrences per
/// subject.
pub fn compute_top_tokens<S: AsRef<str>>(subjects: &[S], top_k: usize) -> Vec<ScoredToken> {
    let all_tokens: Vec<String> = subjects
        .iter()
        .flat_map(|subject| extract_ngrams(&tokenize(subject.as_ref()), 2))
        .collect();

    let freq = compute_term_frequency(&all_tokens);
    let mut scored = score_tokens(&freq, subjects.len());
    scored.truncate(top_k);
    scored
}
