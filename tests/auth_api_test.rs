//! Contract tests for POST /user/auth.
//!
//! Tests:
//! - Correct credential returns 200 {"Status":"OK"}
//! - Mismatch, malformed stored hash, and absent hash all return 401
//!   with an identical body (no oracle for the caller)
//! - Missing/unknown identifiers map to 400/404

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use common::{TestApp, ALICE_PASSWORD};

async fn post_auth(app: &TestApp, form: &str) -> (StatusCode, String) {
    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/user/auth")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .expect("request failed");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_auth_correct_password_is_ok() {
    let app = TestApp::seeded();

    let (status, body) = post_auth(&app, &format!("id=1&password={ALICE_PASSWORD}")).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).expect("body should be JSON");
    assert_eq!(json["Status"], "OK");
}

#[tokio::test]
async fn test_auth_wrong_password_is_unauthorized() {
    let app = TestApp::seeded();

    let (status, _) = post_auth(&app, "id=1&password=wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_malformed_stored_hash_is_indistinguishable_from_mismatch() {
    let app = TestApp::seeded();

    // carol's stored hash decodes but is structurally invalid
    let (malformed_status, malformed_body) = post_auth(&app, "id=3&password=anything").await;
    let (mismatch_status, mismatch_body) = post_auth(&app, "id=1&password=wrong").await;

    assert_eq!(malformed_status, StatusCode::UNAUTHORIZED);
    assert_eq!(malformed_status, mismatch_status);
    assert_eq!(malformed_body, mismatch_body);
}

#[tokio::test]
async fn test_auth_account_without_password_is_unauthorized() {
    let app = TestApp::seeded();

    let (status, _) = post_auth(&app, "id=2&password=anything").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_missing_password_is_checked_as_empty() {
    let app = TestApp::seeded();

    let (status, _) = post_auth(&app, "id=1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_missing_id_is_bad_request() {
    let app = TestApp::seeded();

    let (status, _) = post_auth(&app, "password=secret").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auth_unknown_user_is_not_found() {
    let app = TestApp::seeded();

    let (status, _) = post_auth(&app, "id=999&password=secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_corrupt_stored_encoding_is_internal_error() {
    let app = TestApp::seeded();

    let (status, _) = post_auth(&app, "id=4&password=secret").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
