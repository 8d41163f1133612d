//! Check command - Detect remote changes since the last sync
//!
//! Provides the `galsync check` CLI command which:
//! 1. Loads the persisted watermark (no watermark means "changed", with no
//!    remote calls at all)
//! 2. Opens a Drive session and runs the change detector
//! 3. Appends `has_changes=true|false` to the output file, if any
//! 4. Exits 0 when changes were found and 1 otherwise

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use galsync_core::ports::IStateStore;
use galsync_core::usecases::{ChangeDetector, ChangeSignal, ChangeVerdict};
use galsync_drive::obtain_session;
use galsync_sync::state::FileStateStore;
use tracing::info;

use super::CommandContext;

/// Exit status when changes were detected
pub const EXIT_CHANGED: u8 = 0;

/// Exit status when nothing changed
pub const EXIT_UNCHANGED: u8 = 1;

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Also report gallery folders added or removed since the last save
    #[arg(long)]
    pub detect_deletions: bool,

    /// File to append `has_changes=true|false` to
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}

impl CheckCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let formatter = ctx.formatter();
        let config = ctx.load_valid_config()?;
        let root = config.root_folder_id()?;

        let state = Arc::new(FileStateStore::new(&config.state.watermark_file));
        let watermark = state
            .load_watermark()
            .await
            .context("Failed to load sync watermark")?;

        let verdict = match watermark {
            None => {
                info!("{}", ChangeVerdict::NoBaseline);
                ChangeVerdict::NoBaseline
            }
            Some(watermark) => {
                let remote = Arc::new(
                    obtain_session(&config)
                        .await
                        .context("Failed to open Drive session")?,
                );
                let mut detector = ChangeDetector::new(remote, state.clone());
                if self.detect_deletions || config.state.detect_deletions {
                    detector = detector.with_deletion_detection();
                }
                detector.detect_since(&root, Some(&watermark)).await?
            }
        };

        let has_changes = verdict.has_changes();
        if let Some(path) = &self.output_file {
            append_output(path, has_changes)?;
        }

        if ctx.format.is_json() {
            formatter.print_json(&verdict_json(&verdict, watermark.map(|w| w.to_string())));
        } else if has_changes {
            formatter.success(&verdict.to_string());
        } else {
            formatter.info(&verdict.to_string());
        }

        Ok(ExitCode::from(if has_changes {
            EXIT_CHANGED
        } else {
            EXIT_UNCHANGED
        }))
    }
}

/// Appends `has_changes=<bool>` as a line to `path`, creating it if needed
fn append_output(path: &Path, has_changes: bool) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    writeln!(file, "has_changes={has_changes}")
        .with_context(|| format!("Failed to write output file {}", path.display()))
}

fn verdict_json(verdict: &ChangeVerdict, watermark: Option<String>) -> serde_json::Value {
    let mut json = serde_json::json!({
        "has_changes": verdict.has_changes(),
        "message": verdict.to_string(),
        "watermark": watermark,
    });

    match verdict {
        ChangeVerdict::Changed(ChangeSignal::Modified {
            folder_id,
            name,
            modified_time,
        }) => {
            json["folder_id"] = serde_json::json!(folder_id.as_str());
            json["name"] = serde_json::json!(name);
            json["modified_time"] = serde_json::json!(modified_time.map(|t| t.to_rfc3339()));
        }
        ChangeVerdict::Changed(ChangeSignal::FolderSetChanged { added, removed }) => {
            json["added"] = serde_json::json!(added.iter().map(|i| i.as_str()).collect::<Vec<_>>());
            json["removed"] =
                serde_json::json!(removed.iter().map(|i| i.as_str()).collect::<Vec<_>>());
        }
        ChangeVerdict::NoBaseline | ChangeVerdict::Unchanged => {}
    }

    json
}
