use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::cleaner::clean_email_body;
use super::redact::{
    compute_top_tokens, parse_from_header, redact_email, should_redact_subject, truncate_subject,
    DEFAULT_SUBJECT_MAX_CHARS, DEFAULT_TOPIC_TOKENS,
};
use crate::text::{ScoredToken, TermFrequency};

pub const GMAIL_SOURCE: &str = "gmail";
pub const DEFAULT_WINDOW_DAYS: u32 = 90;
pub const REDACTED_SUBJECT: &str = "[redacted]";
const TOP_SENDERS: usize = 10;

fn default_subject() -> String {
    "No Subject".to_string()
}

fn default_sender() -> String {
    "Unknown Sender".to_string()
}

/// Message metadata as fetched from the mail provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessageInput {
    pub id: String,
    /// Falls back to `id` when empty.
    #[serde(default)]
    pub thread_id: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_sender")]
    pub from: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Optional HTML or plain text body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessageMeta {
    pub id: String,
    pub thread_id: String,
    pub subject: String,
    pub from_name: String,
    /// Redacted
    pub from_email: String,
    pub date: String,
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopSender {
    pub sender: String,
    pub count: usize,
}

pub type TopicToken = ScoredToken;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailAggregates {
    pub top_senders: Vec<TopSender>,
    pub topic_tokens: Vec<TopicToken>,
    pub cadence_per_week: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailSummary {
    pub source: String,
    pub fetched_at: String,
    pub window_days: u32,
    pub messages: Vec<MailMessageMeta>,
    pub aggregates: MailAggregates,
}

/// Redacts one message. PII-looking subjects are replaced entirely, others
/// are truncated.
pub fn redact_message(message: &MailMessageInput) -> MailMessageMeta {
    let sender = parse_from_header(&message.from);
    let subject = if should_redact_subject(&message.subject) {
        REDACTED_SUBJECT.to_string()
    } else {
        truncate_subject(&message.subject, DEFAULT_SUBJECT_MAX_CHARS)
    };
    let thread_id = if message.thread_id.is_empty() {
        message.id.clone()
    } else {
        message.thread_id.clone()
    };

    MailMessageMeta {
        id: message.id.clone(),
        thread_id,
        subject,
        from_name: sender.name,
        from_email: redact_email(&sender.email),
        date: message.date.clone(),
        labels: message.labels.clone(),
        clean_text: message.body.as_deref().map(clean_email_body),
    }
}

fn top_senders(messages: &[MailMessageMeta]) -> Vec<TopSender> {
    let counts: TermFrequency = messages.iter().map(|m| m.from_name.as_str()).collect();
    let mut senders: Vec<TopSender> = counts
        .iter()
        .map(|(sender, count)| TopSender {
            sender: sender.to_string(),
            count,
        })
        .collect();
    senders.sort_by(|a, b| b.count.cmp(&a.count));
    senders.truncate(TOP_SENDERS);
    senders
}

/// Messages per week over a `window_days` window; zero for an empty window.
pub fn cadence_per_week(message_count: usize, window_days: u32) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    message_count as f64 / (window_days as f64 / 7.0)
}

/// Redacts every message and aggregates senders, subject topics and cadence.
///
/// Subjects flagged as PII are left out of the topic tokens.
pub fn summarize_mail(messages: &[MailMessageInput], window_days: u32) -> MailSummary {
    let metas: Vec<MailMessageMeta> = messages.iter().map(redact_message).collect();

    let topic_subjects: Vec<&str> = messages
        .iter()
        .map(|m| m.subject.as_str())
        .filter(|subject| !should_redact_subject(subject))
        .collect();

    let aggregates = MailAggregates {
        top_senders: top_senders(&metas),
        topic_tokens: compute_top_tokens(&topic_subjects, DEFAULT_TOPIC_TOKENS),
        cadence_per_week: cadence_per_week(messages.len(), window_days),
    };

    MailSummary {
        source: GMAIL_SOURCE.to_string(),
        fetched_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        window_days,
        messages: metas,
        aggregates,
    }
}
