//! Remote store port (driven/secondary port)
//!
//! The capability boundary between galsync and the storage provider. An
//! authenticated session exposes exactly two operations: listing the
//! children of a folder and downloading a file's content. Nothing above
//! this port performs raw network calls.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because transport errors are adapter-specific.
//! - Trashed objects are never returned; every query implies `trashed = false`.
//! - [`ListQuery`] is provider-agnostic; adapters translate it into their
//!   own filter grammar.

use crate::domain::{RemoteId, RemoteObject, Watermark};

/// Which children a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    /// Files and folders
    Any,
    /// Folders only
    FoldersOnly,
}

/// A conjunctive listing filter over a single parent folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Folder whose immediate children are listed
    pub parent: RemoteId,
    /// Restricts the result to folders
    pub kind: KindFilter,
    /// Only children modified strictly after this instant
    pub modified_after: Option<Watermark>,
    /// Maximum number of results; `None` follows every page
    pub limit: Option<u32>,
    /// Ask the provider for name-ascending order
    pub order_by_name: bool,
}

impl ListQuery {
    /// Every child of `parent`, in name order
    pub fn children(parent: RemoteId) -> Self {
        Self {
            parent,
            kind: KindFilter::Any,
            modified_after: None,
            limit: None,
            order_by_name: true,
        }
    }

    /// Every subfolder of `parent`, in name order
    pub fn subfolders(parent: RemoteId) -> Self {
        Self {
            kind: KindFilter::FoldersOnly,
            ..Self::children(parent)
        }
    }

    /// At most one child of `parent` modified after `watermark`
    pub fn modified_since(parent: RemoteId, watermark: Watermark) -> Self {
        Self {
            parent,
            kind: KindFilter::Any,
            modified_after: Some(watermark),
            limit: Some(1),
            order_by_name: false,
        }
    }
}

/// Port trait for the remote storage session
///
/// Implementations are expected to handle transient failures (rate
/// limiting, 5xx, dropped connections) with bounded retries and to surface
/// anything else as an error naming the failed call.
#[async_trait::async_trait]
pub trait IRemoteStore: Send + Sync {
    /// Lists the immediate, non-trashed children matching `query`
    async fn list_children(&self, query: &ListQuery) -> anyhow::Result<Vec<RemoteObject>>;

    /// Downloads a file's content by its remote ID
    async fn download_content(&self, id: &RemoteId) -> anyhow::Result<Vec<u8>>;
}
