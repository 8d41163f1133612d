//! Tree synchronizer
//!
//! Rebuilds the local gallery tree from the remote root folder.
//!
//! ## Sync Flow
//!
//! 1. **Reset**: delete and recreate the content root
//! 2. **Listing**: write `_index.md`
//! 3. **Galleries**: for each subfolder of the root, in name order:
//!    - list its children and skip anything that is not an allowed image
//!    - download each image under its sanitized name
//!    - render and write `index.md`
//!
//! When sanitized names collide, the first entry in name-then-id order is
//! kept and the rest are reported as skipped.
//!
//! Every run is a full rebuild; nothing is diffed against the previous tree.
//! The first failed listing or download aborts the run, which can leave a
//! partially rebuilt tree behind.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use galsync_core::domain::{
    gallery_date, gallery_title, is_safe_component, render_document, render_listing,
    sanitize_file_name, RemoteId, RemoteObject, Resource,
};
use galsync_core::ports::{IRemoteStore, ListQuery};
use serde::Serialize;
use tracing::{info, warn};

use crate::filesystem::{ContentTree, GALLERY_DOCUMENT_FILE};

// ============================================================================
// SyncOptions
// ============================================================================

/// Rendering settings for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Title of `_index.md`
    pub listing_title: String,
    /// Date used when a gallery's creation time is unknown
    pub default_date: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            listing_title: "Galleries".to_string(),
            default_date: "2026-02-14".to_string(),
        }
    }
}

// ============================================================================
// SyncReport
// ============================================================================

/// Why a remote object was left out of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Mime type is not on the image allow-list
    UnsupportedType,
    /// Sanitized name would escape its directory
    UnsafeName,
    /// Sanitized name collides with an earlier entry in name order
    DuplicateName,
}

/// A remote object that was not written locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Gallery folder name; `None` for a skipped gallery itself
    pub gallery: Option<String>,
    /// Remote name
    pub name: String,
    /// Remote mime type
    pub mime_type: String,
    pub reason: SkipReason,
}

/// One gallery written to the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryReport {
    /// Remote folder name
    pub name: String,
    /// Local directory name
    pub directory: String,
    /// Rendered title
    pub title: String,
    /// Rendered date
    pub date: String,
    /// Local image file names, in document order
    pub images: Vec<String>,
}

/// Summary of a completed sync run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Galleries written, in name order
    pub galleries: Vec<GalleryReport>,
    /// Objects left out
    pub skipped: Vec<SkippedItem>,
    /// Number of images downloaded
    pub images_downloaded: u32,
    /// Total bytes downloaded
    pub bytes_downloaded: u64,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

// ============================================================================
// TreeSynchronizer
// ============================================================================

/// Rebuilds the local gallery tree from a remote root folder
pub struct TreeSynchronizer {
    remote: Arc<dyn IRemoteStore>,
    tree: ContentTree,
    options: SyncOptions,
}

impl TreeSynchronizer {
    pub fn new(remote: Arc<dyn IRemoteStore>, tree: ContentTree, options: SyncOptions) -> Self {
        Self {
            remote,
            tree,
            options,
        }
    }

    /// The local tree this synchronizer writes
    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    /// Runs a full rebuild of the tree from `root`.
    pub async fn sync(&self, root: &RemoteId) -> Result<SyncReport> {
        let start = Instant::now();
        let mut report = SyncReport::default();

        self.tree
            .reset()
            .await
            .with_context(|| format!("Failed to reset {}", self.tree.root().display()))?;
        self.tree
            .write_listing(&render_listing(&self.options.listing_title))
            .await
            .context("Failed to write listing document")?;

        let mut galleries = self
            .remote
            .list_children(&ListQuery::subfolders(root.clone()))
            .await
            .context("Failed to list galleries")?;
        sort_by_name(&mut galleries);
        info!("Found {} galleries", galleries.len());

        let mut directories = HashSet::new();
        for gallery in &galleries {
            let directory = sanitize_file_name(&gallery.name);
            if !is_safe_component(&directory) {
                warn!(gallery = %gallery.name, "Skipped gallery with unsafe name");
                report.skipped.push(SkippedItem {
                    gallery: None,
                    name: gallery.name.clone(),
                    mime_type: gallery.mime_type.clone(),
                    reason: SkipReason::UnsafeName,
                });
                continue;
            }
            if !directories.insert(directory.clone()) {
                warn!(
                    gallery = %gallery.name,
                    id = %gallery.id,
                    directory = %directory,
                    "Skipped gallery whose directory is already taken"
                );
                report.skipped.push(SkippedItem {
                    gallery: None,
                    name: gallery.name.clone(),
                    mime_type: gallery.mime_type.clone(),
                    reason: SkipReason::DuplicateName,
                });
                continue;
            }

            let written = self
                .sync_gallery(gallery, directory, &mut report)
                .await
                .with_context(|| format!("Failed to sync gallery '{}'", gallery.name))?;
            report.galleries.push(written);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            galleries = report.galleries.len(),
            images = report.images_downloaded,
            skipped = report.skipped.len(),
            duration_ms = report.duration_ms,
            "Sync complete"
        );
        Ok(report)
    }

    async fn sync_gallery(
        &self,
        gallery: &RemoteObject,
        directory: String,
        report: &mut SyncReport,
    ) -> Result<GalleryReport> {
        self.tree.create_gallery(&directory).await?;

        let mut children = self
            .remote
            .list_children(&ListQuery::children(gallery.id.clone()))
            .await?;
        sort_by_name(&mut children);

        let mut resources = Vec::new();
        let mut file_names = HashSet::new();
        for child in &children {
            if !child.is_image() {
                info!(
                    gallery = %gallery.name,
                    "Skipped: {} (mimeType: {})", child.name, child.mime_type
                );
                report.skipped.push(SkippedItem {
                    gallery: Some(gallery.name.clone()),
                    name: child.name.clone(),
                    mime_type: child.mime_type.clone(),
                    reason: SkipReason::UnsupportedType,
                });
                continue;
            }

            let safe_name = sanitize_file_name(&child.name);
            if !is_safe_component(&safe_name) || safe_name == GALLERY_DOCUMENT_FILE {
                warn!(gallery = %gallery.name, file = %child.name, "Skipped image with unsafe name");
                report.skipped.push(SkippedItem {
                    gallery: Some(gallery.name.clone()),
                    name: child.name.clone(),
                    mime_type: child.mime_type.clone(),
                    reason: SkipReason::UnsafeName,
                });
                continue;
            }
            if !file_names.insert(safe_name.clone()) {
                warn!(
                    gallery = %gallery.name,
                    file = %child.name,
                    id = %child.id,
                    "Skipped image whose file name is already taken"
                );
                report.skipped.push(SkippedItem {
                    gallery: Some(gallery.name.clone()),
                    name: child.name.clone(),
                    mime_type: child.mime_type.clone(),
                    reason: SkipReason::DuplicateName,
                });
                continue;
            }

            let data = self
                .remote
                .download_content(&child.id)
                .await
                .with_context(|| format!("Failed to download '{}'", child.name))?;
            self.tree
                .write_gallery_file(&directory, &safe_name, &data)
                .await
                .with_context(|| format!("Failed to write '{safe_name}'"))?;

            info!(
                gallery = %gallery.name,
                bytes = data.len(),
                "Downloaded: {} -> {} ({:.0} KB)",
                child.name,
                safe_name,
                data.len() as f64 / 1024.0
            );
            report.images_downloaded += 1;
            report.bytes_downloaded += data.len() as u64;
            resources.push(Resource::new(safe_name, child.description()));
        }

        let title = gallery_title(&gallery.name);
        let date = gallery_date(gallery.created_time.as_ref(), &self.options.default_date);
        let body = gallery.description().unwrap_or_default();
        let document = render_document(&title, &date, &resources, body);

        self.tree
            .write_gallery_file(&directory, GALLERY_DOCUMENT_FILE, document.as_bytes())
            .await
            .context("Failed to write gallery document")?;
        info!(gallery = %gallery.name, "{}: index.md generated", gallery.name);

        Ok(GalleryReport {
            name: gallery.name.clone(),
            directory,
            title,
            date,
            images: resources.into_iter().map(|r| r.src).collect(),
        })
    }
}

/// Byte-order sort by name, then id; listings are not trusted to arrive
/// ordered and Drive allows duplicate names
fn sort_by_name(objects: &mut [RemoteObject]) {
    objects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}
