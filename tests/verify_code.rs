mod common;

use common::{TestApp, extract_code, spawn_app};
use edgex_admin::handlers::VerifyCodeResponse;
use reqwest::StatusCode;

/// Sends a code for `(channel, user_id)` and returns it as delivered.
async fn issue_code(app: &TestApp, channel: &str, user_id: u64, destination: &str) -> String {
    let response = app.send_code(channel, user_id, destination).await;
    assert_eq!(response.status(), StatusCode::OK);

    let outbox = if channel == "sms_login" { &app.sms } else { &app.email };
    let sent = outbox.last_sent().expect("No message was sent");
    extract_code(&sent.body)
}

/// A well-formed code guaranteed to differ from `code`.
fn other_code(code: &str) -> String {
    let other = if code == "000000" { "111111" } else { "000000" };
    other.to_string()
}

#[tokio::test]
async fn verify_code_accepts_issued_code() {
    let app = spawn_app().await;
    let code = issue_code(&app, "sms_login", 42, "13612345678").await;

    let response = app.verify_code("sms_login", 42, &code).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: VerifyCodeResponse = response.json().await.expect("Failed to parse response");
    assert!(body.verified);
}

#[tokio::test]
async fn verify_code_rejects_wrong_code() {
    let app = spawn_app().await;
    let code = issue_code(&app, "email_login", 3, "ops@example.com").await;

    let response = app.verify_code("email_login", 3, &other_code(&code)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(TestApp::message(response).await, "Invalid or expired code");
}

#[tokio::test]
async fn verify_code_is_scoped_to_channel_and_user() {
    let app = spawn_app().await;
    let code = issue_code(&app, "email_login", 3, "ops@example.com").await;

    let other_channel = app.verify_code("password_reset", 3, &code).await;
    assert_eq!(other_channel.status(), StatusCode::BAD_REQUEST);

    let other_user = app.verify_code("email_login", 4, &code).await;
    assert_eq!(other_user.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_code_without_issuance_fails() {
    let app = spawn_app().await;

    let response = app.verify_code("sms_login", 1, "123456").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_code_rejects_malformed_code() {
    let app = spawn_app().await;

    for bad in ["12345", "1234567", "12a456"] {
        let response = app.verify_code("sms_login", 1, bad).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(TestApp::message(response).await, "Invalid input");
    }
}
