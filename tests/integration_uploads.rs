mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use common::{MAX_UPLOAD_BYTES, setup_test_app};

const BOUNDARY: &str = "sitekit-test-boundary";

fn multipart_request(token: &str, field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload-file")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_stores_file_under_public_prefix() {
    let app = setup_test_app();
    let token = app.login_as(Some("super_admin")).await;

    let (status, body) = app
        .send(multipart_request(&token, "file", "banner.PNG", b"not really a png"))
        .await;

    assert_eq!(status, StatusCode::OK);
    let location = body["location"].as_str().unwrap();
    assert!(location.starts_with("uploads/files/"));
    assert!(location.ends_with(".png"));

    let stored = app.upload_dir.join(location.trim_start_matches("uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"not really a png");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app();
    let token = app.login_as(Some("super_admin")).await;

    let (status, body) = app
        .send(multipart_request(&token, "image", "banner.png", b"bytes"))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["file"][0], "The file field is required.");
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    let app = setup_test_app();
    let token = app.login_as(Some("super_admin")).await;
    let content = vec![b'x'; MAX_UPLOAD_BYTES + 1];

    let (status, body) = app
        .send(multipart_request(&token, "file", "big.bin", &content))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["file"][0],
        "The file may not be greater than 8 kilobytes."
    );
}

#[tokio::test]
async fn test_upload_requires_permission() {
    let app = setup_test_app();
    let token = app.login_as(Some("editor")).await;

    let (status, body) = app
        .send(multipart_request(&token, "file", "banner.png", b"bytes"))
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "NOT ALLOWED");
}
