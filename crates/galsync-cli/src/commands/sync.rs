//! Sync command - Rebuild the local gallery tree
//!
//! Provides the `galsync sync` CLI command which:
//! 1. Opens a Drive session for the configured root folder
//! 2. Wipes and recreates the content root
//! 3. Downloads every image of every gallery folder and writes its
//!    `index.md`
//! 4. Prints a summary of what was written and skipped

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use galsync_core::config::ContentConfig;
use galsync_drive::obtain_session;
use galsync_sync::engine::{SyncOptions, SyncReport, TreeSynchronizer};
use galsync_sync::filesystem::ContentTree;
use tracing::info;

use super::CommandContext;
use crate::output::OutputFormatter;

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Content root to rebuild (overrides `content.root`)
    #[arg(long)]
    pub content_dir: Option<PathBuf>,
}

impl SyncCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let config = ctx.load_valid_config()?;
        let root = config.root_folder_id()?;

        let content_root = self
            .content_dir
            .clone()
            .unwrap_or_else(|| config.content.root.clone());
        info!(root = %root, content_root = %content_root.display(), "Starting sync");

        let remote = Arc::new(
            obtain_session(&config)
                .await
                .context("Failed to open Drive session")?,
        );
        let synchronizer = TreeSynchronizer::new(
            remote,
            ContentTree::new(content_root),
            sync_options(&config.content),
        );
        let report = synchronizer.sync(&root).await?;

        if ctx.format.is_json() {
            let json = serde_json::to_value(&report).context("Failed to serialize sync report")?;
            formatter.print_json(&json);
        } else {
            print_summary(formatter.as_ref(), &report, synchronizer.tree().root());
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn sync_options(content: &ContentConfig) -> SyncOptions {
    SyncOptions {
        listing_title: content.listing_title.clone(),
        default_date: content.default_date.clone(),
    }
}

fn print_summary(formatter: &dyn OutputFormatter, report: &SyncReport, root: &std::path::Path) {
    formatter.success(&format!(
        "Synced {} galleries into {}",
        report.galleries.len(),
        root.display()
    ));
    for gallery in &report.galleries {
        formatter.info(&format!(
            "  {} ({} images, {})",
            gallery.directory,
            gallery.images.len(),
            gallery.date
        ));
    }
    formatter.info(&format!(
        "Downloaded {} images ({:.1} MB) in {:.1}s",
        report.images_downloaded,
        report.bytes_downloaded as f64 / (1024.0 * 1024.0),
        report.duration_ms as f64 / 1000.0
    ));

    if !report.skipped.is_empty() {
        formatter.warn(&format!("Skipped {} items", report.skipped.len()));
        for item in &report.skipped {
            let location = match &item.gallery {
                Some(gallery) => format!("{gallery}/{}", item.name),
                None => item.name.clone(),
            };
            formatter.info(&format!("  {location} ({:?})", item.reason));
        }
    }
}
