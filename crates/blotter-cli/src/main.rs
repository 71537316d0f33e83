//! blotter CLI - render captured network and log archives
//!
//! This is the main entry point for the blotter command-line interface.
//! Argument parsing and command dispatch live in the library crate.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    blotter_cli::run().await
}
