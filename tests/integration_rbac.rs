mod common;

use axum::http::StatusCode;
use serde_json::json;

use sitekit::middleware::rbac::RouteAccess;
use tower::ServiceExt;

use common::{get, json_request, setup_test_app, setup_test_app_with, unique_email};
use sitekit_core::PermissionTable;

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let app = setup_test_app();

    let (status, body) = app.send(get("/api/abouts", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "message": "Unauthenticated." }));
}

#[tokio::test]
async fn test_garbage_token_is_unauthenticated() {
    let app = setup_test_app();

    let (status, _) = app.send(get("/api/user", Some("not-a-jwt"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_super_admin_passes_every_guarded_route() {
    let app = setup_test_app();
    let token = app.login_as(Some("super_admin")).await;

    for uri in ["/api/user", "/api/role", "/api/abouts", "/api/translations"] {
        let (status, _) = app.send(get(uri, Some(&token))).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
    }
}

#[tokio::test]
async fn test_unlisted_action_is_not_allowed() {
    let app = setup_test_app();
    let token = app.login_as(Some("editor")).await;

    let (status, _) = app.send(get("/api/abouts", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/abouts",
            Some(&token),
            Some(json!({ "data": { "title": { "en": "Us" }, "description": { "en": "Text" } } })),
        ))
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "message": "NOT ALLOWED" }));
}

#[tokio::test]
async fn test_role_missing_from_table_is_denied_everything() {
    let app = setup_test_app();
    let token = app.login_as(Some("moderator")).await;

    for uri in ["/api/user", "/api/role", "/api/abouts", "/api/settings/1"] {
        let (status, body) = app.send(get(uri, Some(&token))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", uri);
        assert_eq!(body["message"], "NOT ALLOWED");
    }
}

#[tokio::test]
async fn test_only_the_active_role_grants_access() {
    let app = setup_test_app();
    let user = app.create_user(&unique_email(), Some("super_admin")).await;
    let token = app.token_for(user.clone()).await;

    let (status, body) = app
        .send(json_request(
            "PATCH",
            &format!("/api/user/{}", user.id),
            Some(&token),
            Some(json!({ "role": "editor" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let roles = body["data"]["roles"].as_array().unwrap();
    assert_eq!(roles.len(), 2);
    assert!(
        roles
            .iter()
            .any(|role| role["role_code"] == "super_admin" && role["status"] == "inactive")
    );

    let (status, body) = app.send(get("/api/user", Some(&token))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "message": "NOT ALLOWED" }));

    let (status, _) = app.send(get("/api/abouts", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_guarded_responses_carry_route_and_role() {
    let app = setup_test_app();
    let token = app.login_as(Some("editor")).await;

    let response = app
        .router()
        .oneshot(get("/api/user/1", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let access = response.extensions().get::<RouteAccess>().unwrap();
    assert_eq!(access.route.as_str(), "user.show");
    assert_eq!(access.role.code(), "editor");

    let response = app.router().oneshot(get("/api/ui/abouts", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.extensions().get::<RouteAccess>().is_none());
}

#[tokio::test]
async fn test_user_without_active_role_is_treated_as_guest() {
    let table = PermissionTable::default().grant("guest", "abouts", ["index"]);
    let app = setup_test_app_with(table);
    let token = app.login_as(None).await;

    let (status, _) = app.send(get("/api/abouts", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(get("/api/carousels", Some(&token))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_empty_action_list_denies_the_resource() {
    let table = PermissionTable::default().grant("editor", "settings", Vec::<String>::new());
    let app = setup_test_app_with(table);
    let token = app.login_as(Some("editor")).await;

    let (status, _) = app.send(get("/api/settings", Some(&token))).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_session_routes_need_only_a_token() {
    let app = setup_test_app_with(PermissionTable::default());
    let token = app.login_as(None).await;

    let (status, body) = app.send(get("/api/check-user-token", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["email"].is_string());
}

#[tokio::test]
async fn test_public_ui_routes_skip_authentication() {
    let app = setup_test_app_with(PermissionTable::default());

    let (status, body) = app.send(get("/api/ui/partners", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}
