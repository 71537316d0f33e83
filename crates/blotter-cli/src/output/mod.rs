//! # Output Formatting
//!
//! Converts a rendered document into the bytes the user asked for and writes
//! them to standard output or a file.
//!
//! ## Supported Formats
//!
//! - **ansi**: Terminal colors and bold via `colored` (default on a terminal)
//! - **text**: Plain text with every line of the document (default when piped)
//! - **terse**: Plain text without timestamps, durations and other metadata
//! - **html**: Standalone HTML page with inline styles
//! - **markdown**: Headings, bold runs and fenced code blocks
//! - **pdf**: Paginated PDF (needs `--output` and the `pdf` feature)

pub mod ansi;
pub mod detect;

use anyhow::{Context, Result, bail};
use blotter_core::{Config, StyledDocument, export};
use clap::ValueEnum;
use std::io::Write;
use std::path::Path;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output
    Ansi,
    /// Plain text
    Text,
    /// Plain text without metadata lines
    Terse,
    /// Standalone HTML page
    Html,
    /// Markdown
    Markdown,
    /// Paginated PDF
    Pdf,
}

impl OutputFormat {
    /// Pick the format when none was given: colors on an interactive
    /// terminal, plain text when piped or writing to a file.
    #[must_use]
    pub fn resolve(explicit: Option<Self>, to_file: bool) -> Self {
        explicit.unwrap_or_else(|| {
            if !to_file && detect::is_interactive() {
                Self::Ansi
            } else {
                Self::Text
            }
        })
    }

    /// Whether the output is binary and cannot go to a terminal.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Pdf)
    }

    /// Encode a document in this format.
    pub fn encode(self, document: &StyledDocument, config: &Config) -> Result<Vec<u8>> {
        let text = match self {
            Self::Ansi => ansi::ansi(document),
            Self::Text => export::plain_text(document),
            Self::Terse => export::plain_text_terse(document),
            Self::Html => export::html(document),
            Self::Markdown => export::markdown(document),
            Self::Pdf => return pdf(document, config),
        };
        Ok(text.into_bytes())
    }
}

#[cfg(feature = "pdf")]
fn pdf(document: &StyledDocument, config: &Config) -> Result<Vec<u8>> {
    let setup = export::pdf::PageSetup::from(&config.pdf);
    Ok(export::pdf::pdf(document, &setup)?)
}

#[cfg(not(feature = "pdf"))]
fn pdf(_document: &StyledDocument, _config: &Config) -> Result<Vec<u8>> {
    bail!("PDF export is not available: blotter was built without the `pdf` feature")
}

/// Write `bytes` to `path`, or to standard output when `path` is `None`.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    if let Some(path) = path {
        std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes).context("Failed to write to stdout")?;
    stdout.flush().context("Failed to write to stdout")?;
    Ok(())
}

/// Reject combinations that cannot produce useful output.
pub fn check_destination(format: OutputFormat, output: Option<&Path>) -> Result<()> {
    if format.is_binary() && output.is_none() {
        bail!("--format pdf requires --output <PATH>");
    }
    Ok(())
}
