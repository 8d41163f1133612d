//! Integration tests for `files.get?alt=media`

use galsync_core::domain::RemoteId;
use galsync_core::ports::IRemoteStore;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_download_returns_bytes() {
    let (server, store) = common::setup_store_mock().await;
    let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    common::mount_download(&server, "img-1", &jpeg).await;

    let bytes = store
        .download_content(&RemoteId::new("img-1".to_string()).unwrap())
        .await
        .expect("download failed");

    assert_eq!(bytes, jpeg);
}

#[tokio::test]
async fn test_download_sends_bearer_token() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/img-1"))
        .and(query_param("alt", "media"))
        .and(header("authorization", "Bearer test-access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = client.download("img-1").await.expect("download failed");
    assert_eq!(bytes, b"data");
}

#[tokio::test]
async fn test_download_forbidden_names_the_file() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/img-9"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficientFilePermissions"))
        .expect(1)
        .mount(&server)
        .await;

    let err = store
        .download_content(&RemoteId::new("img-9".to_string()).unwrap())
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("img-9"), "{message}");
    assert!(message.contains("Forbidden"), "{message}");
}
