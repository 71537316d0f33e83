//! blotter CLI - render captured network and log archives
//!
//! This is the library behind the `blotter` binary. Commands read an archive
//! of captured tasks and messages, render it with `blotter-core`, and write
//! one of the export formats.
use anyhow::{Context, Result};
use blotter_core::Config;
use clap::Parser;

mod archive;
mod cli;
mod commands;
mod output;
mod utils;

use crate::utils::initialize_logging;
use cli::{Cli, Commands};

/// Execute the blotter CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if configuration loading or command execution fails.
pub async fn run() -> Result<()> {
    // Convert Broken pipe panics into a clean exit
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe") || msg.contains("broken pipe") {
            // Exit silently for pipeline truncation
            std::process::exit(0);
        }
        // Default behavior: print to stderr
        eprintln!("{msg}");
    }));

    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Rendering is CPU-bound and spawns its own worker threads
    tokio::task::spawn_blocking(move || execute_command(&cli, &config))
        .await
        .context("Command task failed")?
}

fn execute_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Render(args) => commands::render(args, config, cli.no_color),
        Commands::Curl { input, task } => commands::print_curl(input, task.as_deref()),
    }
}
