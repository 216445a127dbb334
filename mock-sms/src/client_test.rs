use std::time::Duration;

use super::*;
use crate::routes::app;
use crate::state::AppState;

/// Serve a fresh router on an ephemeral port and return a client for it.
async fn spawn_server(max_messages: usize) -> MockSmsClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(AppState::new(max_messages))).await.unwrap();
    });
    MockSmsClient::new(format!("http://{addr}/")).unwrap()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn from_vars_requires_url() {
    let err = MockSmsClient::from_vars(|_| None).unwrap_err();
    assert!(matches!(err, ClientError::MissingEnv { var: URL_ENV }));

    let err = MockSmsClient::from_vars(|_| Some("  ".into())).unwrap_err();
    assert!(matches!(err, ClientError::MissingEnv { .. }));
}

#[test]
fn from_vars_trims_trailing_slash() {
    let client = MockSmsClient::from_vars(|_| Some("http://localhost:8098/".into())).unwrap();
    assert_eq!(client.base_url(), "http://localhost:8098");
}

// =============================================================
// Round trips against a live router
// =============================================================

#[tokio::test]
async fn empty_log_has_no_last_message() {
    let client = spawn_server(10).await;
    assert!(client.last_message().await.unwrap().is_none());
    assert!(client.messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn send_then_read_back() {
    let client = spawn_server(10).await;
    let sent = client
        .send_sms(Some("+15559876543"), "Your verification code is: 841317. Do not share.")
        .await
        .unwrap();
    assert_eq!(sent.status, "sent");

    let last = client.last_message().await.unwrap().unwrap();
    assert_eq!(last.id, sent.id);
    assert_eq!(last.otp, "841317");
    assert_eq!(last.to.as_deref(), Some("+15559876543"));
}

#[tokio::test]
async fn raw_and_form_bodies_are_recorded() {
    let client = spawn_server(10).await;
    let http = reqwest::Client::new();

    let plain = http
        .post(format!("{}/send-sms", client.base_url()))
        .header("content-type", "text/plain")
        .body("call 12 or dial 9999999999")
        .send()
        .await
        .unwrap();
    assert!(plain.status().is_success());

    let form = http
        .post(format!("{}/send-sms", client.base_url()))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("to=+15550100\nmessage=Your code is 4821")
        .send()
        .await
        .unwrap();
    assert!(form.status().is_success());

    let messages = client.messages().await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].otp, "");
    assert_eq!(messages[1].otp, "4821");
    assert_eq!(messages[1].to.as_deref(), Some("+15550100"));
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let client = spawn_server(10).await;
    let err = client.send_sms(None, "   ").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 400, .. }));
    assert!(client.messages().await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_empties_log() {
    let client = spawn_server(10).await;
    client.send_sms(None, "one 1111").await.unwrap();
    client.send_sms(None, "two 2222").await.unwrap();
    assert_eq!(client.clear().await.unwrap(), 2);
    assert!(client.last_message().await.unwrap().is_none());
}

#[tokio::test]
async fn history_is_bounded() {
    let client = spawn_server(2).await;
    for body in ["a 1001", "b 1002", "c 1003"] {
        client.send_sms(None, body).await.unwrap();
    }
    let otps: Vec<String> = client.messages().await.unwrap().into_iter().map(|m| m.otp).collect();
    assert_eq!(otps, vec!["1002", "1003"]);
}

#[tokio::test]
async fn healthz_is_ok() {
    let client = spawn_server(10).await;
    let response = reqwest::get(format!("{}/healthz", client.base_url())).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

// =============================================================
// wait_for_otp
// =============================================================

#[tokio::test]
async fn wait_for_otp_sees_late_message() {
    let client = spawn_server(10).await;
    let sender = client.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        sender.send_sms(None, "Your code is 663311").await.unwrap();
    });
    let otp = client.wait_for_otp(Duration::from_secs(5)).await.unwrap();
    assert_eq!(otp, "663311");
}

#[tokio::test]
async fn wait_for_otp_times_out_without_code() {
    let client = spawn_server(10).await;
    client.send_sms(None, "welcome aboard").await.unwrap();
    let err = client.wait_for_otp(Duration::from_millis(250)).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(_)));
}
