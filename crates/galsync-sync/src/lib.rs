//! galsync Sync - gallery tree synchronization
//!
//! Provides:
//! - Full rebuild of the local gallery tree from the remote store
//! - The local content tree adapter
//! - File-backed persistence of the watermark and folder snapshot
//!
//! ## Modules
//!
//! - [`engine`] - Tree synchronizer orchestrating listing, download and rendering
//! - [`filesystem`] - Local content tree (reset, atomic writes)
//! - [`state`] - File-backed [`IStateStore`](galsync_core::ports::IStateStore)

pub mod engine;
pub mod filesystem;
pub mod state;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing the local tree or state
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error occurred during file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The content root cannot be safely deleted and recreated
    #[error("Refusing to reset content root: {0}")]
    UnsafeContentRoot(PathBuf),

    /// A name would escape its parent directory
    #[error("Unsafe path component: {0:?}")]
    UnsafeComponent(String),
}
