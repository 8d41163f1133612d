//! DriveRemoteStore - IRemoteStore implementation for Google Drive
//!
//! Wraps a [`DriveClient`] and translates port-level [`ListQuery`] values
//! into `files.list` requests, and Drive file resources into
//! [`RemoteObject`]s.
//!
//! ## Design Notes
//!
//! - Listings are re-sorted locally by name after every enumeration, so
//!   ordering does not depend on Drive's collation.
//! - A file whose id fails [`RemoteId`] validation makes the listing fail;
//!   Drive never produces such ids.

use anyhow::{Context, Result};

use galsync_core::domain::{RemoteId, RemoteObject};
use galsync_core::ports::{IRemoteStore, ListQuery};

use crate::client::{DriveClient, DriveFile};
use crate::query::FileListRequest;

/// Google Drive adapter for the [`IRemoteStore`] port
#[derive(Clone)]
pub struct DriveRemoteStore {
    client: DriveClient,
}

impl DriveRemoteStore {
    /// Creates a store backed by `client`
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &DriveClient {
        &self.client
    }
}

impl TryFrom<DriveFile> for RemoteObject {
    type Error = galsync_core::domain::DomainError;

    fn try_from(file: DriveFile) -> Result<Self, Self::Error> {
        let parent_id = file
            .parents
            .into_iter()
            .next()
            .map(RemoteId::new)
            .transpose()?;

        Ok(RemoteObject {
            id: RemoteId::new(file.id)?,
            name: file.name,
            mime_type: file.mime_type,
            parent_id,
            created_time: file.created_time,
            modified_time: file.modified_time,
            description: file.description,
        })
    }
}

#[async_trait::async_trait]
impl IRemoteStore for DriveRemoteStore {
    async fn list_children(&self, query: &ListQuery) -> Result<Vec<RemoteObject>> {
        let request = FileListRequest::from_query(query);
        let files = self
            .client
            .list_files(&request)
            .await
            .with_context(|| format!("Failed to list children of folder {}", query.parent))?;

        let mut objects = files
            .into_iter()
            .map(RemoteObject::try_from)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Invalid listing for folder {}", query.parent))?;

        if query.order_by_name {
            objects.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(objects)
    }

    async fn download_content(&self, id: &RemoteId) -> Result<Vec<u8>> {
        self.client
            .download(id.as_str())
            .await
            .with_context(|| format!("Failed to download file {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_file(id: &str, parents: Vec<&str>) -> DriveFile {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Summer Trip",
            "mimeType": "application/vnd.google-apps.folder",
            "parents": parents,
            "createdTime": "2025-07-04T09:00:00Z",
            "description": "Two weeks on the coast."
        }))
        .unwrap()
    }

    #[test]
    fn test_drive_file_to_remote_object() {
        let obj = RemoteObject::try_from(drive_file("gal-1", vec!["root"])).unwrap();
        assert_eq!(obj.id.as_str(), "gal-1");
        assert_eq!(obj.parent_id.as_ref().map(RemoteId::as_str), Some("root"));
        assert!(obj.is_folder());
        assert_eq!(obj.description(), Some("Two weeks on the coast."));
        assert!(obj.modified_time.is_none());
    }

    #[test]
    fn test_drive_file_without_parent() {
        let obj = RemoteObject::try_from(drive_file("gal-1", vec![])).unwrap();
        assert!(obj.parent_id.is_none());
    }

    #[test]
    fn test_drive_file_with_invalid_id() {
        assert!(RemoteObject::try_from(drive_file("bad id", vec![])).is_err());
    }
}
