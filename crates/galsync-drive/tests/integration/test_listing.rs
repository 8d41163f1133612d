//! Integration tests for `files.list` through the IRemoteStore adapter
//!
//! - Query grammar and parameters sent to Drive
//! - Pagination via nextPageToken
//! - Single-page probes
//! - Local name ordering
//! - Malformed responses

use chrono::{TimeZone, Utc};
use galsync_core::domain::{RemoteId, Watermark};
use galsync_core::ports::{IRemoteStore, ListQuery};
use galsync_drive::query::FileListRequest;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common;

fn id(s: &str) -> RemoteId {
    RemoteId::new(s.to_string()).unwrap()
}

#[tokio::test]
async fn test_subfolder_listing_sends_drive_query() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(header("authorization", "Bearer test-access-token"))
        .and(query_param(
            "q",
            "'root-folder' in parents and mimeType='application/vnd.google-apps.folder' and trashed=false",
        ))
        .and(query_param("orderBy", "name"))
        .and(query_param("pageSize", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                common::file_json("gal-2", "Winter", common::FOLDER_MIME),
                common::file_json("gal-1", "Summer Trip", common::FOLDER_MIME)
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let folders = store
        .list_children(&ListQuery::subfolders(id("root-folder")))
        .await
        .expect("listing failed");

    let names: Vec<&str> = folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Summer Trip", "Winter"]);
    assert!(folders.iter().all(|f| f.is_folder()));
    assert_eq!(
        folders[0].parent_id.as_ref().map(RemoteId::as_str),
        Some("root-folder")
    );
}

#[tokio::test]
async fn test_listing_follows_pages() {
    let (server, store) = common::setup_store_mock().await;

    // Page 2 is mounted first so the token-specific mock wins
    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [common::file_json("img-3", "c.jpg", "image/jpeg")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                common::file_json("img-1", "a.jpg", "image/jpeg"),
                common::file_json("img-2", "b.png", "image/png")
            ],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let children = store
        .list_children(&ListQuery::children(id("gal-1")))
        .await
        .expect("listing failed");

    let ids: Vec<&str> = children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["img-1", "img-2", "img-3"]);
}

#[tokio::test]
async fn test_probe_fetches_single_page_of_one() {
    let (server, store) = common::setup_store_mock().await;
    let watermark = Watermark::at(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param(
            "q",
            "'gal-1' in parents and trashed=false and modifiedTime > '2025-07-01T00:00:00.000Z'",
        ))
        .and(query_param("pageSize", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [common::file_json("img-1", "a.jpg", "image/jpeg")],
            "nextPageToken": "ignored"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let hits = store
        .list_children(&ListQuery::modified_since(id("gal-1"), watermark))
        .await
        .expect("probe failed");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "a.jpg");
}

#[tokio::test]
async fn test_empty_listing() {
    let (server, store) = common::setup_store_mock().await;
    common::mount_list(&server, serde_json::json!([])).await;

    let children = store
        .list_children(&ListQuery::children(id("gal-1")))
        .await
        .expect("listing failed");
    assert!(children.is_empty());
}

#[tokio::test]
async fn test_listing_maps_optional_metadata() {
    let (server, client) = common::setup_drive_mock().await;

    let mut file = common::file_json("img-1", "Sunset Beach.png", "image/png");
    file["description"] = serde_json::json!("Golden hour");
    common::mount_list(&server, serde_json::json!([file])).await;

    let request = FileListRequest::from_query(&ListQuery::children(id("gal-1")));
    let files = client.list_files(&request).await.expect("listing failed");

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].description.as_deref(), Some("Golden hour"));
    assert!(files[0].created_time.is_some());
}

#[tokio::test]
async fn test_malformed_listing_is_an_error() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = store
        .list_children(&ListQuery::children(id("gal-1")))
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("gal-1"), "{message}");
    assert!(message.contains("Invalid response"), "{message}");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let (server, store) = common::setup_store_mock().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File not found: gone"))
        .expect(1)
        .mount(&server)
        .await;

    let err = store
        .list_children(&ListQuery::children(id("gone")))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Not found"));
}
