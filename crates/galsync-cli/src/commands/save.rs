//! Save command - Advance the sync watermark
//!
//! Provides the `galsync save` CLI command which:
//! 1. Optionally snapshots the current set of gallery folders
//! 2. Writes the current UTC time as the new watermark
//!
//! Run this after a successful `galsync sync` so the next `check` only looks
//! at changes made afterwards.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use galsync_core::ports::IStateStore;
use galsync_core::usecases::FolderSetProbe;
use galsync_drive::obtain_session;
use galsync_sync::state::FileStateStore;
use tracing::info;

use super::CommandContext;

#[derive(Debug, Args)]
pub struct SaveCommand {
    /// Also record the gallery folder ids so `check --detect-deletions` can
    /// notice removed galleries
    #[arg(long)]
    pub snapshot_folders: bool,
}

impl SaveCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let config = ctx.load_valid_config()?;
        let state = FileStateStore::new(&config.state.watermark_file);

        let mut snapshot_size = None;
        if self.snapshot_folders || config.state.detect_deletions {
            let root = config.root_folder_id()?;
            let store = obtain_session(&config)
                .await
                .context("Failed to open Drive session")?;
            let snapshot = FolderSetProbe::capture(&store, &root).await?;
            state
                .save_folder_snapshot(&snapshot)
                .await
                .context("Failed to save gallery folder snapshot")?;
            info!(folders = snapshot.folder_ids.len(), "Recorded gallery folders");
            snapshot_size = Some(snapshot.folder_ids.len());
        }

        let watermark = state
            .save_watermark()
            .await
            .context("Failed to save sync watermark")?;

        if ctx.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "watermark": watermark.to_string(),
                "path": state.watermark_path().display().to_string(),
                "snapshot_folders": snapshot_size,
            }));
        } else {
            formatter.success(&format!("Saved sync timestamp: {watermark}"));
            formatter.info(&format!("File: {}", state.watermark_path().display()));
            if let Some(count) = snapshot_size {
                formatter.info(&format!("Recorded {count} gallery folders"));
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::output::OutputFormat;

    #[tokio::test]
    async fn test_save_without_snapshot_needs_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let watermark_file = dir.path().join("state/last_sync.txt");

        let mut config = tempfile::NamedTempFile::new().unwrap();
        write!(
            config,
            "state:\n  watermark_file: {}\n",
            watermark_file.display()
        )
        .unwrap();
        config.flush().unwrap();

        let ctx = CommandContext {
            format: OutputFormat::Json,
            quiet: true,
            config_path: Some(config.path().to_path_buf()),
            folder_id: None,
        };

        let code = SaveCommand {
            snapshot_folders: false,
        }
        .execute(&ctx)
        .await
        .unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        let saved = std::fs::read_to_string(&watermark_file).unwrap();
        assert!(saved.ends_with('Z'));
        assert!(!dir.path().join("state/last_sync.folders.json").exists());
    }
}
