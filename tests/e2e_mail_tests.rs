//! End-to-end tests for the mail summary endpoint.

mod common;

use common::{TestClient, TestServer};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_mail_summary_redacts_and_aggregates() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .mail_summary(&json!({
            "windowDays": 14,
            "messages": [
                {"id": "m1", "threadId": "t1", "from": "Team <team@corp.io>", "subject": "Weekly team sync", "labels": ["INBOX"]},
                {"id": "m2", "from": "Team <team@corp.io>", "subject": "Weekly team sync notes"},
                {"id": "m3", "from": "Bank <alerts@bank.com>", "subject": "Your code 123456789"},
                {"id": "m4", "from": "news@paper.com", "subject": "Morning briefing"}
            ]
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["source"], "gmail");
    assert_eq!(body["windowDays"], 14);
    assert_eq!(body["aggregates"]["cadencePerWeek"], 2.0);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["threadId"], "t1");
    assert_eq!(messages[1]["threadId"], "m2");
    assert_eq!(messages[0]["fromEmail"], "te***@c***.io");
    assert_eq!(messages[2]["subject"], "[redacted]");
    assert_eq!(messages[3]["fromName"], "news");

    let top_sender = &body["aggregates"]["topSenders"][0];
    assert_eq!(top_sender["sender"], "Team");
    assert_eq!(top_sender["count"], 2);

    let tokens: Vec<&str> = body["aggregates"]["topicTokens"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["token"].as_str().unwrap())
        .collect();
    assert!(tokens.contains(&"weekly team"));
    assert!(!tokens.contains(&"code"));
}

#[tokio::test]
async fn test_mail_summary_defaults_window() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client
        .mail_summary(&json!({"messages": []}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["windowDays"], 90);
    assert_eq!(body["aggregates"]["cadencePerWeek"], 0.0);
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_mail_summary_cleans_bodies() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client
        .mail_summary(&json!({
            "messages": [{
                "id": "m1",
                "from": "a@b.co",
                "subject": "Hi",
                "body": "<p>Read <a href=\"https://example.com/post\">this post</a></p>"
            }]
        }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(
        body["messages"][0]["cleanText"],
        "Read this post (https://example.com/post)"
    );
}

#[tokio::test]
async fn test_mail_summary_rejects_malformed_json() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .client
        .post(format!("{}/mail/summary", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
