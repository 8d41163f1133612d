//! Config command - View and validate galsync configuration
//!
//! Provides the `galsync config` CLI command which:
//! 1. Shows the effective configuration (file, environment and flags merged)
//! 2. Validates it and reports every problem found

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use galsync_core::config::{Config, ValidationError};
use tracing::info;

use super::CommandContext;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration and exit non-zero on errors
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        match self {
            ConfigCommand::Show => execute_show(ctx),
            ConfigCommand::Validate => execute_validate(ctx),
        }
    }
}

fn execute_show(ctx: &CommandContext) -> Result<ExitCode> {
    let formatter = ctx.formatter();
    let config_path = ctx.config_file();
    let config = ctx.load_config()?;

    info!(config_path = %config_path.display(), "Showing configuration");

    if ctx.format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", config_path.display()));
        formatter.info("");
        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn execute_validate(ctx: &CommandContext) -> Result<ExitCode> {
    let formatter = ctx.formatter();
    let config_path = ctx.config_file();
    let config = ctx.load_config()?;

    info!(config_path = %config_path.display(), "Validating configuration");

    let errors = check(&config);

    if ctx.format.is_json() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": messages,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", config_path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {} error{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        formatter.info(&format!("File: {}", config_path.display()));
        formatter.info("");
        for error in &errors {
            formatter.info(&format!("  {} - {}", error.field, error.message));
        }
    }

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Field validation plus the checks that only matter at run time
fn check(config: &Config) -> Vec<ValidationError> {
    let mut errors = config.validate();
    if config.drive.root_folder_id.is_none() {
        errors.push(ValidationError {
            field: "drive.root_folder_id".to_string(),
            message: "not set (use --folder-id or GOOGLE_DRIVE_FOLDER_ID)".to_string(),
        });
    }
    errors
}
