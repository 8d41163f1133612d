//! Local content tree adapter
//!
//! Owns the directory the static-site generator reads galleries from:
//!
//! ```text
//! <root>/
//!   _index.md
//!   summer-trip/
//!     index.md
//!     beach.jpg
//! ```
//!
//! ## Design Decisions
//!
//! - **Full rebuild**: [`ContentTree::reset`] deletes and recreates the root.
//! - **Atomic writes**: files are written to a temp name and renamed into
//!   place, so a crash never leaves a half-written image.
//! - **Contained paths**: every name is checked with
//!   [`is_safe_component`] before it is joined onto the root.

use std::path::{Component, Path, PathBuf};

use galsync_core::domain::is_safe_component;
use tracing::{debug, instrument};

use crate::SyncError;

/// Name of the top-level listing document
pub const LISTING_FILE: &str = "_index.md";

/// Name of a gallery's document
pub const GALLERY_DOCUMENT_FILE: &str = "index.md";

/// The local gallery tree rooted at a content directory
#[derive(Debug, Clone)]
pub struct ContentTree {
    root: PathBuf,
}

impl ContentTree {
    /// Create a tree rooted at `root`. Nothing is touched until [`reset`](Self::reset).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The content root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deletes the content root (if present) and recreates it empty.
    ///
    /// Refuses roots without a normal path component (`""`, `/`, `.`, `..`).
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn reset(&self) -> Result<(), SyncError> {
        if !self
            .root
            .components()
            .any(|c| matches!(c, Component::Normal(_)))
        {
            return Err(SyncError::UnsafeContentRoot(self.root.clone()));
        }

        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => debug!("removed previous content root"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes the top-level listing document
    pub async fn write_listing(&self, contents: &str) -> Result<PathBuf, SyncError> {
        let path = self.root.join(LISTING_FILE);
        write_atomic(&path, contents.as_bytes()).await?;
        Ok(path)
    }

    /// Creates the directory for a gallery and returns its path
    pub async fn create_gallery(&self, dir_name: &str) -> Result<PathBuf, SyncError> {
        let dir = self.root.join(checked(dir_name)?);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Writes `data` to `file_name` inside the gallery directory `dir_name`
    pub async fn write_gallery_file(
        &self,
        dir_name: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, SyncError> {
        let path = self.root.join(checked(dir_name)?).join(checked(file_name)?);
        write_atomic(&path, data).await?;
        Ok(path)
    }
}

fn checked(name: &str) -> Result<&str, SyncError> {
    if is_safe_component(name) {
        Ok(name)
    } else {
        Err(SyncError::UnsafeComponent(name.to_string()))
    }
}

/// Writes via a temporary sibling and an atomic rename
#[instrument(skip(data), fields(path = %path.display(), bytes = data.len()))]
async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp_path = {
        let mut p = path.as_os_str().to_owned();
        p.push(".tmp");
        PathBuf::from(p)
    };

    tokio::fs::write(&tmp_path, data).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    debug!("write complete");
    Ok(())
}
