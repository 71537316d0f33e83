//! # CLI Structure and Argument Parsing
//!
//! This module defines the command-line interface for `blotter`. The CLI is
//! built using `clap` with derive macros for help generation and argument
//! validation.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Render an archive to the terminal
//! blotter render capture.json
//!
//! # Export every task as HTML
//! blotter render capture.json --tasks --format html --output capture.html
//!
//! # Pipe an archive through and keep only the essentials
//! cat capture.json | blotter render - --format terse
//!
//! # Inspect redirects and cache lookups
//! blotter render capture.json --transactions
//!
//! # Replay a request
//! blotter curl capture.json --task login
//! ```

use blotter_core::ColorMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Main CLI structure for the `blotter` command
#[derive(Parser, Clone, Debug)]
#[command(name = "blotter")]
#[command(version)]
#[command(about = "blotter - render captured network and log archives", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also honors `NO_COLOR`)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, env = "BLOTTER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Render an archive as a styled document
    Render(RenderArgs),

    /// Print cURL command lines for the archive's tasks
    Curl {
        /// Archive file (`-` reads standard input)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only the task with this id
        #[arg(long, value_name = "ID")]
        task: Option<String>,
    },
}

/// Arguments of `blotter render`
#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    /// Archive file (`-` reads standard input)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output format (defaults to `ansi` on a terminal, `text` otherwise)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Sections to include for each task
    #[arg(long, value_enum, default_value_t = ContentArg::Sharing)]
    pub content: ContentArg,

    /// Color mode of the document (overrides the config file)
    #[arg(long, value_enum)]
    pub color: Option<ColorArg>,

    /// Render the archive's tasks instead of its messages
    #[arg(long)]
    pub tasks: bool,

    /// Render each task's network transactions (redirects, cache lookups)
    #[arg(long, conflicts_with = "tasks")]
    pub transactions: bool,

    /// Write to a file instead of standard output
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Which sections a task render includes
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContentArg {
    /// Curated export subset
    Sharing,
    /// Everything, including URL components and request options
    All,
}

/// Color mode accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    /// Two tones only
    Monochrome,
    /// Colors where they carry meaning
    Automatic,
    /// Every colorable element
    Full,
}

impl From<ColorArg> for ColorMode {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Monochrome => Self::Monochrome,
            ColorArg::Automatic => Self::Automatic,
            ColorArg::Full => Self::Full,
        }
    }
}
