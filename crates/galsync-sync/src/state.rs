//! File-backed state store
//!
//! Persists the watermark as the sole contents of a small text file
//! (`2025-07-04T09:00:00.000Z`) and the optional gallery-folder snapshot as
//! JSON in a sidecar next to it (`last_sync.txt` → `last_sync.folders.json`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use galsync_core::domain::Watermark;
use galsync_core::ports::{FolderSnapshot, IStateStore};
use tracing::{debug, info, warn};

/// Extension of the folder snapshot sidecar
const SNAPSHOT_EXTENSION: &str = "folders.json";

/// [`IStateStore`] backed by two local files
#[derive(Debug, Clone)]
pub struct FileStateStore {
    watermark_path: PathBuf,
    snapshot_path: PathBuf,
}

impl FileStateStore {
    /// Create a store whose watermark lives at `watermark_path`
    pub fn new(watermark_path: impl Into<PathBuf>) -> Self {
        let watermark_path = watermark_path.into();
        let snapshot_path = watermark_path.with_extension(SNAPSHOT_EXTENSION);
        Self {
            watermark_path,
            snapshot_path,
        }
    }

    /// Path of the watermark file
    pub fn watermark_path(&self) -> &Path {
        &self.watermark_path
    }

    /// Path of the folder snapshot sidecar
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}

/// Reads a file, mapping "not found" to `None`
async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

async fn write_creating_parent(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[async_trait::async_trait]
impl IStateStore for FileStateStore {
    async fn load_watermark(&self) -> Result<Option<Watermark>> {
        let Some(contents) = read_optional(&self.watermark_path).await? else {
            debug!(path = %self.watermark_path.display(), "No watermark file");
            return Ok(None);
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        match contents.parse::<Watermark>() {
            Ok(watermark) => Ok(Some(watermark)),
            Err(e) => {
                warn!(
                    path = %self.watermark_path.display(),
                    error = %e,
                    "Ignoring unparseable watermark"
                );
                Ok(None)
            }
        }
    }

    async fn save_watermark(&self) -> Result<Watermark> {
        let watermark = Watermark::now();
        write_creating_parent(&self.watermark_path, watermark.to_string().as_bytes()).await?;
        info!("Saved sync timestamp: {watermark}");
        Ok(watermark)
    }

    async fn load_folder_snapshot(&self) -> Result<Option<FolderSnapshot>> {
        let Some(contents) = read_optional(&self.snapshot_path).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&contents) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(
                    path = %self.snapshot_path.display(),
                    error = %e,
                    "Ignoring unparseable folder snapshot"
                );
                Ok(None)
            }
        }
    }

    async fn save_folder_snapshot(&self, snapshot: &FolderSnapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot).context("Failed to encode folder snapshot")?;
        write_creating_parent(&self.snapshot_path, &json).await?;
        debug!(
            path = %self.snapshot_path.display(),
            folders = snapshot.folder_ids.len(),
            "Saved folder snapshot"
        );
        Ok(())
    }
}
