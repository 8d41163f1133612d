//! galsync CLI - keeps a static-site gallery tree in step with a Drive folder
//!
//! Provides commands for:
//! - Checking whether the remote folder changed since the last sync
//! - Advancing the sync watermark
//! - Rebuilding the local gallery tree
//! - Viewing and validating configuration

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    check::CheckCommand, completions::CompletionsCommand, config::ConfigCommand,
    save::SaveCommand, sync::SyncCommand, CommandContext, EXIT_FAILURE,
};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "galsync",
    version,
    about = "Sync Google Drive image folders into static-site galleries"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Root folder id (overrides config and GOOGLE_DRIVE_FOLDER_ID)
    #[arg(long, global = true)]
    folder_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check for remote changes since the last saved watermark
    Check(CheckCommand),
    /// Save the current time as the new watermark
    Save(SaveCommand),
    /// Rebuild the local gallery tree from Drive
    Sync(SyncCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Log level from `-v`/`-q`, falling back to the configured level
fn log_filter(verbose: u8, quiet: bool, configured: Option<&str>) -> String {
    match (quiet, verbose) {
        (true, _) => "warn".to_string(),
        (false, 0) => configured.unwrap_or("info").to_string(),
        (false, 1) => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let ctx = CommandContext {
        format,
        quiet: cli.quiet,
        config_path: cli.config.clone(),
        folder_id: cli.folder_id.clone(),
    };

    // Setup tracing
    let configured_level = ctx.load_config().ok().map(|c| c.logging.level);
    let filter = log_filter(cli.verbose, cli.quiet, configured_level.as_deref());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &ctx).await {
        Ok(code) => code,
        Err(err) => {
            get_formatter(format, cli.quiet).error(&format!("{err:#}"));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(command: Commands, ctx: &CommandContext) -> Result<ExitCode> {
    match command {
        Commands::Check(cmd) => cmd.execute(ctx).await,
        Commands::Save(cmd) => cmd.execute(ctx).await,
        Commands::Sync(cmd) => cmd.execute(ctx).await,
        Commands::Config(cmd) => cmd.execute(ctx).await,
        Commands::Completions(cmd) => cmd.execute(ctx).await,
    }
}
