//! Change detection use case
//!
//! Decides whether a full sync is needed by comparing remote modification
//! times against the persisted watermark.
//!
//! ## Detection Flow
//!
//! 1. **Baseline**: no watermark → changes, without any remote call
//! 2. **Probes**: each [`ChangeProbe`] runs in order; the first signal wins
//! 3. **Verdict**: no probe signalled → unchanged
//!
//! The default probe ([`ModifiedSinceProbe`]) lists the root's subfolders and
//! asks each candidate folder for one child modified after the watermark.
//! It cannot see a gallery folder that was deleted since the watermark;
//! [`FolderSetProbe`] closes that gap when enabled.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::{RemoteId, Watermark};
use crate::ports::{FolderSnapshot, IRemoteStore, IStateStore, ListQuery};

// ============================================================================
// Verdict types
// ============================================================================

/// What a probe found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSignal {
    /// A child of a candidate folder was modified after the watermark
    Modified {
        /// Folder that was probed
        folder_id: RemoteId,
        /// Name of the first matching child
        name: String,
        /// Its modification time, when reported
        modified_time: Option<DateTime<Utc>>,
    },
    /// Gallery folders appeared or disappeared since the snapshot
    FolderSetChanged {
        added: Vec<RemoteId>,
        removed: Vec<RemoteId>,
    },
}

/// Outcome of a change check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeVerdict {
    /// No watermark persisted; a sync is required to establish one
    NoBaseline,
    /// A probe found a change
    Changed(ChangeSignal),
    /// Nothing newer than the watermark
    Unchanged,
}

impl ChangeVerdict {
    /// Returns true unless the verdict is [`ChangeVerdict::Unchanged`]
    pub fn has_changes(&self) -> bool {
        !matches!(self, ChangeVerdict::Unchanged)
    }
}

impl Display for ChangeVerdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ChangeVerdict::NoBaseline => {
                write!(f, "No previous sync timestamp found, changes detected")
            }
            ChangeVerdict::Changed(ChangeSignal::Modified {
                name,
                modified_time,
                ..
            }) => match modified_time {
                Some(t) => write!(
                    f,
                    "Changes detected: {name} modified at {}",
                    t.format(Watermark::FORMAT)
                ),
                None => write!(f, "Changes detected: {name} modified"),
            },
            ChangeVerdict::Changed(ChangeSignal::FolderSetChanged { added, removed }) => write!(
                f,
                "Changes detected: {} gallery folder(s) added, {} removed",
                added.len(),
                removed.len()
            ),
            ChangeVerdict::Unchanged => write!(f, "No changes detected"),
        }
    }
}

// ============================================================================
// ChangeProbe strategy
// ============================================================================

/// A strategy for spotting remote changes after a watermark
#[async_trait::async_trait]
pub trait ChangeProbe: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Returns the first change found, or `None`
    async fn probe(
        &self,
        remote: &dyn IRemoteStore,
        root: &RemoteId,
        watermark: &Watermark,
    ) -> Result<Option<ChangeSignal>>;
}

/// Lists the root's subfolders, then asks the root and each subfolder for
/// a single child modified after the watermark, stopping at the first hit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModifiedSinceProbe;

#[async_trait::async_trait]
impl ChangeProbe for ModifiedSinceProbe {
    fn name(&self) -> &'static str {
        "modified-since"
    }

    async fn probe(
        &self,
        remote: &dyn IRemoteStore,
        root: &RemoteId,
        watermark: &Watermark,
    ) -> Result<Option<ChangeSignal>> {
        let subfolders = remote
            .list_children(&ListQuery::subfolders(root.clone()))
            .await
            .context("Failed to list gallery folders")?;

        let candidates =
            std::iter::once(root.clone()).chain(subfolders.into_iter().map(|f| f.id));

        for folder_id in candidates {
            let hits = remote
                .list_children(&ListQuery::modified_since(folder_id.clone(), *watermark))
                .await
                .with_context(|| format!("Failed to probe folder {folder_id} for changes"))?;

            if let Some(first) = hits.into_iter().next() {
                debug!(folder = %folder_id, name = %first.name, "Found modified child");
                return Ok(Some(ChangeSignal::Modified {
                    folder_id,
                    name: first.name,
                    modified_time: first.modified_time,
                }));
            }
        }

        Ok(None)
    }
}

/// Compares the current set of gallery folder ids with the snapshot taken
/// when the watermark was saved. Without a snapshot it gives no signal.
pub struct FolderSetProbe {
    state: Arc<dyn IStateStore>,
}

impl FolderSetProbe {
    pub fn new(state: Arc<dyn IStateStore>) -> Self {
        Self { state }
    }

    /// Lists the root's subfolders into a snapshot
    pub async fn capture(remote: &dyn IRemoteStore, root: &RemoteId) -> Result<FolderSnapshot> {
        let folders = remote
            .list_children(&ListQuery::subfolders(root.clone()))
            .await
            .context("Failed to list gallery folders for snapshot")?;
        Ok(FolderSnapshot::new(folders.into_iter().map(|f| f.id)))
    }
}

#[async_trait::async_trait]
impl ChangeProbe for FolderSetProbe {
    fn name(&self) -> &'static str {
        "folder-set"
    }

    async fn probe(
        &self,
        remote: &dyn IRemoteStore,
        root: &RemoteId,
        _watermark: &Watermark,
    ) -> Result<Option<ChangeSignal>> {
        let Some(previous) = self
            .state
            .load_folder_snapshot()
            .await
            .context("Failed to load gallery folder snapshot")?
        else {
            debug!("No gallery folder snapshot saved, skipping folder-set probe");
            return Ok(None);
        };

        let current = Self::capture(remote, root).await?;
        let (added, removed) = previous.diff(&current);

        if added.is_empty() && removed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ChangeSignal::FolderSetChanged { added, removed }))
        }
    }
}

// ============================================================================
// ChangeDetector
// ============================================================================

/// Use case answering "does the remote tree need to be synced again?"
pub struct ChangeDetector {
    remote: Arc<dyn IRemoteStore>,
    state: Arc<dyn IStateStore>,
    probes: Vec<Box<dyn ChangeProbe>>,
}

impl ChangeDetector {
    /// Creates a detector running only the [`ModifiedSinceProbe`]
    pub fn new(remote: Arc<dyn IRemoteStore>, state: Arc<dyn IStateStore>) -> Self {
        Self {
            remote,
            state,
            probes: vec![Box::new(ModifiedSinceProbe)],
        }
    }

    /// Appends a probe, run after the existing ones
    pub fn with_probe(mut self, probe: Box<dyn ChangeProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    /// Also reports gallery folders added or removed since the last snapshot
    pub fn with_deletion_detection(self) -> Self {
        let probe = FolderSetProbe::new(Arc::clone(&self.state));
        self.with_probe(Box::new(probe))
    }

    /// Loads the persisted watermark and checks `root` against it
    pub async fn detect(&self, root: &RemoteId) -> Result<ChangeVerdict> {
        let watermark = self
            .state
            .load_watermark()
            .await
            .context("Failed to load sync watermark")?;
        self.detect_since(root, watermark.as_ref()).await
    }

    /// Checks `root` against an explicit watermark
    pub async fn detect_since(
        &self,
        root: &RemoteId,
        watermark: Option<&Watermark>,
    ) -> Result<ChangeVerdict> {
        let Some(watermark) = watermark else {
            info!("No previous sync timestamp found");
            return Ok(ChangeVerdict::NoBaseline);
        };

        info!(root = %root, watermark = %watermark, "Checking for remote changes");

        for probe in &self.probes {
            if let Some(signal) = probe
                .probe(self.remote.as_ref(), root, watermark)
                .await
                .with_context(|| format!("Change probe '{}' failed", probe.name()))?
            {
                let verdict = ChangeVerdict::Changed(signal);
                info!(probe = probe.name(), "{verdict}");
                return Ok(verdict);
            }
        }

        info!("{}", ChangeVerdict::Unchanged);
        Ok(ChangeVerdict::Unchanged)
    }
}
