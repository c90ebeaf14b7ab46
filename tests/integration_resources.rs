mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{TestApp, get, json_request, setup_test_app};

async fn admin(app: &TestApp) -> String {
    app.login_as(Some("super_admin")).await
}

fn setting(key: &str) -> Value {
    json!({ "data": { "key": key, "value": format!("{} value", key) } })
}

async fn create_setting(app: &TestApp, token: &str, key: &str) -> Value {
    let (status, body) = app
        .send(json_request("POST", "/api/settings", Some(token), Some(setting(key))))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn test_create_and_show_record() {
    let app = setup_test_app();
    let token = admin(&app).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/abouts",
            Some(&token),
            Some(json!({ "data": {
                "title": { "uz": "Biz haqimizda", "en": "About us" },
                "description": { "en": "We build things" }
            } })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["title"]["en"], "About us");
    assert!(body["data"]["created_at"].is_string());

    let (status, body) = app
        .send(get(&format!("/api/abouts/{}", id), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"]["en"], "We build things");
}

#[tokio::test]
async fn test_validation_errors_are_reported_per_field() {
    let app = setup_test_app();
    let token = admin(&app).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/partners",
            Some(&token),
            Some(json!({ "data": { "name": "Acme", "logo": "uploads/files/a.png", "link": "not a url" } })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The given data was invalid.");
    assert!(body["errors"]["data.link"].is_array());

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/partners",
            Some(&token),
            Some(json!({ "data": { "name": "Acme" } })),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["data.logo"].is_array());
}

#[tokio::test]
async fn test_missing_envelope_is_rejected() {
    let app = setup_test_app();
    let token = admin(&app).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/settings",
            Some(&token),
            Some(json!({ "key": "phone", "value": "+998" })),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["data"].is_array());
}

#[tokio::test]
async fn test_pagination_and_all() {
    let app = setup_test_app();
    let token = admin(&app).await;
    for i in 0..15 {
        create_setting(&app, &token, &format!("key-{}", i)).await;
    }

    let (status, body) = app.send(get("/api/settings", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["meta"]["total"], 15);
    assert_eq!(body["meta"]["has_more"], true);
    assert_eq!(body["data"][0]["key"], "key-0");

    let (_, body) = app
        .send(get("/api/settings?page=2&limit=10", Some(&token)))
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"][0]["key"], "key-10");
    assert_eq!(body["meta"]["has_more"], false);

    let (_, body) = app.send(get("/api/settings?all", Some(&token))).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 15);
    assert!(body.get("meta").is_none());
}

#[tokio::test]
async fn test_partial_update_merges_fields() {
    let app = setup_test_app();
    let token = admin(&app).await;
    let created = create_setting(&app, &token, "phone").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .send(json_request(
            "PATCH",
            &format!("/api/settings/{}", id),
            Some(&token),
            Some(json!({ "data": { "value": "+998 71 000 00 00" } })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["key"], "phone");
    assert_eq!(body["data"]["value"], "+998 71 000 00 00");

    let (status, _) = app
        .send(json_request(
            "PUT",
            "/api/settings/9999",
            Some(&token),
            Some(json!({ "data": { "value": "x" } })),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_returns_record_then_not_found() {
    let app = setup_test_app();
    let token = admin(&app).await;
    let created = create_setting(&app, &token, "email").await;
    let uri = format!("/api/settings/{}", created["id"]);

    let (status, body) = app
        .send(json_request("DELETE", &uri, Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["key"], "email");

    let (status, _) = app
        .send(json_request("DELETE", &uri, Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_kinds_are_isolated() {
    let app = setup_test_app();
    let token = admin(&app).await;
    create_setting(&app, &token, "phone").await;

    let (_, body) = app.send(get("/api/translations", Some(&token))).await;
    assert_eq!(body["meta"]["total"], 0);
}

#[tokio::test]
async fn test_ui_mirror_reads_without_token() {
    let app = setup_test_app();
    let token = admin(&app).await;
    let created = create_setting(&app, &token, "address").await;

    let (status, body) = app.send(get("/api/ui/settings", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["key"], "address");

    let (status, body) = app
        .send(get(&format!("/api/ui/settings/{}", created["id"]), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "address value");

    let (status, _) = app
        .send(json_request("POST", "/api/ui/settings", None, Some(setting("x"))))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
