//! Integration tests for bounded retry against a flaky Drive
//!
//! - 5xx then success
//! - 429 with Retry-After then success
//! - 403 rate-limit reason treated as throttling
//! - Retry budget exhaustion

use galsync_drive::DriveError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_server_error_is_retried() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/img-1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    common::mount_download(&server, "img-1", b"ok").await;

    let bytes = client.download("img-1").await.expect("retry should recover");
    assert_eq!(bytes, b"ok");
}

#[tokio::test]
async fn test_too_many_requests_honours_retry_after() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/img-1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    common::mount_download(&server, "img-1", b"ok").await;

    let bytes = client.download("img-1").await.expect("retry should recover");
    assert_eq!(bytes, b"ok");
}

#[tokio::test]
async fn test_rate_limit_403_is_retried() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/img-1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {
                "code": 403,
                "errors": [{ "reason": "userRateLimitExceeded" }]
            }
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    common::mount_download(&server, "img-1", b"ok").await;

    let bytes = client.download("img-1").await.expect("retry should recover");
    assert_eq!(bytes, b"ok");
}

#[tokio::test]
async fn test_retry_budget_is_bounded() {
    let (server, client) = common::setup_drive_mock().await;

    // One initial attempt plus fast_retry().max_retries retries
    Mock::given(method("GET"))
        .and(path("/files/img-1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(u64::from(common::fast_retry().max_retries) + 1)
        .mount(&server)
        .await;

    let err = client.download("img-1").await.unwrap_err();
    assert!(matches!(err, DriveError::ServerError(_)), "{err}");
}

#[tokio::test]
async fn test_unauthorized_fails_immediately() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/img-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.download("img-1").await.unwrap_err();
    assert!(matches!(err, DriveError::Unauthorized(_)), "{err}");
}
