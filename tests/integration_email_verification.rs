mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{json_request, setup_test_app};

#[tokio::test]
async fn test_send_code_mails_six_digits_and_hides_hash() {
    let app = setup_test_app();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/email-verification",
            None,
            Some(json!({ "data": { "email": "client@site.uz" } })),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "client@site.uz");
    assert!(body["data"].get("code").is_none());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    let code: u32 = sent[0].code.parse().unwrap();
    assert!((100_000..=999_999).contains(&code));
}

#[tokio::test]
async fn test_check_code_against_latest() {
    let app = setup_test_app();
    for _ in 0..2 {
        app.send(json_request(
            "POST",
            "/api/email-verification",
            None,
            Some(json!({ "data": { "email": "client@site.uz" } })),
        ))
        .await;
    }
    let code = app.mailer.last_code_for("client@site.uz").unwrap();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/check-email-verification",
            None,
            Some(json!({ "data": { "email": "client@site.uz", "code": code } })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "email": "client@site.uz" } }));

    // Codes stay valid after a successful check.
    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/check-email-verification",
            None,
            Some(json!({ "data": { "email": "client@site.uz", "code": code } })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_code_is_unauthorized() {
    let app = setup_test_app();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/check-email-verification",
            None,
            Some(json!({ "data": { "email": "nobody@site.uz", "code": 123456 } })),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "The provided code is incorrect.");
}

#[tokio::test]
async fn test_invalid_email_is_a_validation_error() {
    let app = setup_test_app();

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/email-verification",
            None,
            Some(json!({ "data": { "email": "not-an-email" } })),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["data.email"].is_array());
    assert!(app.mailer.sent().is_empty());
}
