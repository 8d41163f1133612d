//! Subcommands and the context they share
//!
//! Every command receives a [`CommandContext`] carrying the global flags and
//! resolves configuration through it, so file, environment and flag
//! overrides are applied the same way everywhere.

pub mod check;
pub mod completions;
pub mod config;
pub mod save;
pub mod sync;

use std::path::PathBuf;

use anyhow::{Context, Result};
use galsync_core::config::Config;
use galsync_core::domain::SetupError;

use crate::output::{get_formatter, OutputFormat, OutputFormatter};

/// Exit status for a fatal error (`check` uses 0 and 1 for its verdict)
pub const EXIT_FAILURE: u8 = 2;

/// Global flags shared by all commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    pub quiet: bool,
    /// Explicit `--config` path; must exist when given
    pub config_path: Option<PathBuf>,
    /// `--folder-id` override
    pub folder_id: Option<String>,
}

impl CommandContext {
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        get_formatter(self.format, self.quiet)
    }

    /// Path the configuration is read from
    pub fn config_file(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(Config::default_path)
    }

    /// Loads configuration: file, then environment, then flags.
    ///
    /// A missing default file yields defaults; a missing or broken
    /// explicit `--config` file is an error.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config_path {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => Config::load_or_default(&Config::default_path()),
        };

        config.apply_env_overrides();
        if let Some(id) = self.folder_id.as_deref().filter(|s| !s.is_empty()) {
            config.drive.root_folder_id = Some(id.to_string());
        }
        Ok(config)
    }

    /// Loads configuration and fails on the first validation error
    pub fn load_valid_config(&self) -> Result<Config> {
        let config = self.load_config()?;
        let errors = config.validate();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(SetupError::Configuration(messages.join("; ")).into());
        }
        Ok(config)
    }
}
