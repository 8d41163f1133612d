//! Shell completions generation command
//!
//! Usage: `galsync completions bash > ~/.local/share/bash-completion/completions/galsync`

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use super::CommandContext;

#[derive(Debug, clap::Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    pub async fn execute(&self, _ctx: &CommandContext) -> Result<ExitCode> {
        let mut cmd = crate::Cli::command();
        clap_complete::generate(self.shell, &mut cmd, "galsync", &mut io::stdout());
        Ok(ExitCode::SUCCESS)
    }
}
