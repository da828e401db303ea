//! CLI for the photobooth workflow.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use photobooth_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_config, run_generate, run_man, run_normalize};

/// Top-level CLI for the photobooth client.
#[derive(Debug, Parser)]
#[command(name = "photobooth")]
#[command(about = "Upload two selfies and get a generated photobooth strip back", long_about = None)]
pub struct Cli {
    /// Backend origin to use instead of `backend_origin` from config.toml.
    #[arg(long, global = true, value_name = "URL")]
    pub origin: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload two images and request the generated photo.
    Generate {
        /// First selfie.
        first: PathBuf,
        /// Second selfie.
        second: PathBuf,
        /// Print the final state as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Show how a locator returned by the backend would be rewritten.
    Normalize {
        /// Locator (URL) to normalize.
        locator: String,
    },

    /// Show the config file path and effective configuration.
    Config,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page (roff) to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => return run_completions(shell, Cli::command()),
            CliCommand::Man => return run_man(Cli::command()),
            _ => {}
        }

        let mut cfg = config::load_or_init()?;
        if let Some(origin) = cli.origin {
            cfg.backend_origin = origin;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Generate {
                first,
                second,
                json,
            } => run_generate(&cfg, &first, &second, json).await?,
            CliCommand::Normalize { locator } => run_normalize(&cfg, &locator)?,
            CliCommand::Config => run_config(&cfg)?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
