//! Shared test helpers for Drive API integration tests
//!
//! Each helper mounts the endpoints a test needs and returns a client
//! pointing at the mock server.

use std::time::Duration;

use galsync_drive::client::DriveClient;
use galsync_drive::retry::RetryPolicy;
use galsync_drive::DriveRemoteStore;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-access-token";

pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// PEM of the RSA key used to sign test assertions
pub const TEST_PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");

/// Retry policy that keeps tests fast
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_delay: Duration::from_millis(5),
    }
}

/// Starts a mock server and returns a client pointing at it.
pub async fn setup_drive_mock() -> (MockServer, DriveClient) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_url(TEST_TOKEN, server.uri()).with_retry_policy(fast_retry());
    (server, client)
}

/// Same as [`setup_drive_mock`] but wrapped in the port adapter.
pub async fn setup_store_mock() -> (MockServer, DriveRemoteStore) {
    let (server, client) = setup_drive_mock().await;
    (server, DriveRemoteStore::new(client))
}

/// A `files.list` entry
pub fn file_json(id: &str, name: &str, mime: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "mimeType": mime,
        "parents": ["root-folder"],
        "createdTime": "2025-07-04T09:00:00.000Z",
        "modifiedTime": "2025-07-05T10:00:00.000Z"
    })
}

/// Mounts a single-page `files.list` response for any query
pub async fn mount_list(server: &MockServer, files: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": files
        })))
        .mount(server)
        .await;
}

/// Mounts a `files.get?alt=media` response
pub async fn mount_download(server: &MockServer, file_id: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{file_id}")))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// A service-account key JSON pointing at `token_uri`
pub fn service_account_json(token_uri: &str) -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": "test-project",
        "client_email": "gallery-sync@test-project.iam.gserviceaccount.com",
        "private_key": TEST_PRIVATE_KEY,
        "token_uri": token_uri
    })
    .to_string()
}
