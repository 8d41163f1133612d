//! Remote object metadata
//!
//! [`RemoteObject`] is the provider-agnostic view of one listed file or
//! folder. It is read-only: galsync never creates, deletes or mutates remote
//! objects.

use chrono::{DateTime, Utc};

use super::newtypes::RemoteId;

/// Mime type the remote store uses for folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Mime types downloaded as gallery images; everything else is skipped
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/tiff",
];

/// Metadata of a single remote file or folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Provider-assigned identifier
    pub id: RemoteId,
    /// Display name (file or folder name)
    pub name: String,
    /// Provider mime type
    pub mime_type: String,
    /// Parent folder, when the provider reports one
    pub parent_id: Option<RemoteId>,
    /// Creation timestamp
    pub created_time: Option<DateTime<Utc>>,
    /// Last modification timestamp
    pub modified_time: Option<DateTime<Utc>>,
    /// Free-text description
    pub description: Option<String>,
}

impl RemoteObject {
    /// Creates an object with the given identity and type and no optional metadata
    pub fn new(id: RemoteId, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mime_type: mime_type.into(),
            parent_id: None,
            created_time: None,
            modified_time: None,
            description: None,
        }
    }

    /// Returns true if this object is a folder
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }

    /// Returns true if the mime type is on the image allow-list
    pub fn is_image(&self) -> bool {
        IMAGE_MIME_TYPES.contains(&self.mime_type.as_str())
    }

    /// The description, if present and non-empty
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(mime: &str) -> RemoteObject {
        RemoteObject::new(RemoteId::new("obj-1".to_string()).unwrap(), "x", mime)
    }

    #[test]
    fn test_folder_detection() {
        assert!(object(FOLDER_MIME_TYPE).is_folder());
        assert!(!object("image/png").is_folder());
    }

    #[test]
    fn test_image_allow_list() {
        for mime in IMAGE_MIME_TYPES {
            assert!(object(mime).is_image(), "{mime} should be an image");
        }
        assert!(!object("application/pdf").is_image());
        assert!(!object("image/svg+xml").is_image());
        assert!(!object("image/heic").is_image());
    }

    #[test]
    fn test_empty_description_is_none() {
        let mut obj = object("image/png");
        assert_eq!(obj.description(), None);
        obj.description = Some(String::new());
        assert_eq!(obj.description(), None);
        obj.description = Some("Golden hour".to_string());
        assert_eq!(obj.description(), Some("Golden hour"));
    }
}
