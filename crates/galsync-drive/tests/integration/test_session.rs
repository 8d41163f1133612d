//! Integration tests for session establishment
//!
//! - JWT bearer exchange against a mock token endpoint
//! - The obtained token is used for Drive calls
//! - Transient token endpoint failures are retried within the budget
//! - Rejected exchanges and missing credentials are credential errors

use galsync_core::config::ConfigBuilder;
use galsync_core::domain::{RemoteId, SetupError};
use galsync_core::ports::{IRemoteStore, ListQuery};
use galsync_drive::auth::{ServiceAccountKey, TokenExchanger};
use galsync_drive::obtain_session;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

async fn mount_token_endpoint(server: &MockServer, status: u16) {
    let response = if status == 200 {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.session-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        }))
    } else {
        ResponseTemplate::new(status).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        }))
    };

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("jwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_exchange_returns_access_token() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 200).await;

    let token_url = format!("{}/token", server.uri());
    let key = ServiceAccountKey::from_json(&common::service_account_json(&token_url)).unwrap();

    let token = TokenExchanger::new(token_url)
        .exchange(&key)
        .await
        .expect("exchange failed");

    assert_eq!(token.access_token, "ya29.session-token");
    assert_eq!(token.expires_in, Some(3599));
}

#[tokio::test]
async fn test_exchange_retries_transient_token_endpoint_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_token_endpoint(&server, 200).await;

    let token_url = format!("{}/token", server.uri());
    let key = ServiceAccountKey::from_json(&common::service_account_json(&token_url)).unwrap();

    let token = TokenExchanger::new(token_url)
        .with_retry_policy(common::fast_retry())
        .exchange(&key)
        .await
        .expect("exchange should recover after a 503");

    assert_eq!(token.access_token, "ya29.session-token");
}

#[tokio::test]
async fn test_exchange_gives_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let token_url = format!("{}/token", server.uri());
    let key = ServiceAccountKey::from_json(&common::service_account_json(&token_url)).unwrap();

    let err = TokenExchanger::new(token_url)
        .with_retry_policy(common::fast_retry())
        .exchange(&key)
        .await
        .expect_err("exchange should fail");

    assert!(matches!(err, SetupError::Credential(_)));
}

#[tokio::test]
async fn test_session_from_inline_credentials_lists_with_token() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 200).await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(header("authorization", "Bearer ya29.session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [common::file_json("gal-1", "Summer Trip", common::FOLDER_MIME)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token_url = format!("{}/token", server.uri());
    let config = ConfigBuilder::new()
        .drive_credentials_json(common::service_account_json(&token_url))
        .drive_api_base_url(server.uri())
        .build();

    let store = obtain_session(&config).await.expect("session failed");
    let folders = store
        .list_children(&ListQuery::subfolders(
            RemoteId::new("root-folder".to_string()).unwrap(),
        ))
        .await
        .expect("listing failed");

    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].name, "Summer Trip");
}

#[tokio::test]
async fn test_session_from_credentials_file_with_token_url_override() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 200).await;

    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("key.json");
    // The key points elsewhere; the configured override must win
    std::fs::write(
        &key_path,
        common::service_account_json("https://oauth2.invalid/token"),
    )
    .unwrap();

    let config = ConfigBuilder::new()
        .drive_credentials_file(key_path)
        .drive_token_url(format!("{}/token", server.uri()))
        .drive_api_base_url(server.uri())
        .build();

    obtain_session(&config).await.expect("session failed");
}

#[tokio::test]
async fn test_rejected_exchange_is_credential_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 400).await;

    let config = ConfigBuilder::new()
        .drive_credentials_json(common::service_account_json(&format!(
            "{}/token",
            server.uri()
        )))
        .drive_api_base_url(server.uri())
        .build();

    let err = obtain_session(&config).await.err().expect("should fail");
    let setup = err
        .downcast_ref::<SetupError>()
        .expect("error should be a SetupError");
    assert!(matches!(setup, SetupError::Credential(_)));
    assert!(setup.to_string().contains("invalid_grant"));
}

#[tokio::test]
async fn test_missing_credentials_is_credential_error() {
    let config = ConfigBuilder::new().build();

    let err = obtain_session(&config).await.err().expect("should fail");
    assert!(matches!(
        err.downcast_ref::<SetupError>(),
        Some(SetupError::Credential(_))
    ));
}

#[tokio::test]
async fn test_malformed_inline_credentials_is_credential_error() {
    let config = ConfigBuilder::new()
        .drive_credentials_json("{not json")
        .build();

    let err = obtain_session(&config).await.err().expect("should fail");
    assert!(matches!(
        err.downcast_ref::<SetupError>(),
        Some(SetupError::Credential(_))
    ));
}
