//! Mail summary route. Messages are posted already fetched.

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::mail::{
    summarize_mail, MailMessageInput, MailSummary, DEFAULT_WINDOW_DAYS, REDACTED_SUBJECT,
};

use super::metrics::record_mail_messages;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MailSummaryBody {
    pub window_days: Option<u32>,
    #[serde(default)]
    pub messages: Vec<MailMessageInput>,
}

async fn post_mail_summary(Json(body): Json<MailSummaryBody>) -> Json<MailSummary> {
    let window_days = body.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
    let summary = summarize_mail(&body.messages, window_days);

    let redacted = summary
        .messages
        .iter()
        .filter(|m| m.subject == REDACTED_SUBJECT)
        .count();
    record_mail_messages(summary.messages.len(), redacted);
    info!(
        "Summarized {} messages over {} days ({} subjects redacted)",
        summary.messages.len(),
        window_days,
        redacted
    );

    Json(summary)
}

pub fn make_mail_routes() -> Router {
    Router::new().route("/summary", post(post_mail_summary))
}
