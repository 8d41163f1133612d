//! State store port (driven/secondary port)
//!
//! Persists the only state that survives between runs: the sync watermark,
//! plus the optional snapshot of gallery folder ids used to detect deleted
//! galleries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{RemoteId, Watermark};

/// The set of gallery folder ids present when the watermark was last saved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSnapshot {
    /// Ids of the root's immediate subfolders
    pub folder_ids: BTreeSet<RemoteId>,
}

impl FolderSnapshot {
    /// Builds a snapshot from folder ids
    pub fn new(folder_ids: impl IntoIterator<Item = RemoteId>) -> Self {
        Self {
            folder_ids: folder_ids.into_iter().collect(),
        }
    }

    /// Ids present now but not in this snapshot, and ids in this snapshot but gone now
    pub fn diff(&self, current: &FolderSnapshot) -> (Vec<RemoteId>, Vec<RemoteId>) {
        let added = current
            .folder_ids
            .difference(&self.folder_ids)
            .cloned()
            .collect();
        let removed = self
            .folder_ids
            .difference(&current.folder_ids)
            .cloned()
            .collect();
        (added, removed)
    }
}

/// Port trait for persisted sync state
#[async_trait::async_trait]
pub trait IStateStore: Send + Sync {
    /// Loads the watermark; `None` when no run has saved one yet
    async fn load_watermark(&self) -> anyhow::Result<Option<Watermark>>;

    /// Persists the current wall-clock instant as the new watermark
    async fn save_watermark(&self) -> anyhow::Result<Watermark>;

    /// Loads the gallery folder snapshot, if one was saved
    async fn load_folder_snapshot(&self) -> anyhow::Result<Option<FolderSnapshot>>;

    /// Persists the gallery folder snapshot
    async fn save_folder_snapshot(&self, snapshot: &FolderSnapshot) -> anyhow::Result<()>;
}
