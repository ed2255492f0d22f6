//! Mail metadata aggregation. Messages arrive already fetched; this module
//! only redacts and summarizes them.

mod cleaner;
mod redact;
mod summary;

pub use cleaner::{clean_email_body, truncate_url};
pub use redact::{
    compute_top_tokens, extract_ngrams, parse_from_header, redact_email, should_redact_subject,
    truncate_subject, ParsedSender, DEFAULT_SUBJECT_MAX_CHARS, DEFAULT_TOPIC_TOKENS,
};
pub use summary::{
    cadence_per_week, redact_message, summarize_mail, MailAggregates, MailMessageInput,
    MailMessageMeta, MailSummary, TopSender, TopicToken, DEFAULT_WINDOW_DAYS, GMAIL_SOURCE,
    REDACTED_SUBJECT,
};
