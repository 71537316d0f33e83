//! Error types and handling for blotter-core operations.
//!
//! Rendering itself never fails: missing data turns into omitted sections or
//! the "–" placeholder, and a body that cannot be parsed falls through to the
//! next formatting tier. The error type covers the operations around rendering
//! that touch the outside world.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading configuration files, writing exports
//! - **Configuration Errors**: invalid settings or config files
//! - **Export Errors**: a styled document could not be converted to the
//!   requested target (for example a PDF page setup with no printable area)
//!
//! ```rust
//! use blotter_core::{Error, Result};
//!
//! fn report(result: Result<()>) {
//!     if let Err(e) = result {
//!         eprintln!("[{}] {}", e.category(), e);
//!     }
//! }
//!
//! report(Err(Error::Export("page too small".to_string())));
//! ```

use thiserror::Error;

/// The main error type for blotter-core operations.
///
/// ## Display vs Debug
///
/// - `Display` provides user-friendly error messages
/// - `Debug` includes full error details and source chain information
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// The underlying `std::io::Error` is preserved so callers can inspect the
    /// error kind.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or inaccessible.
    ///
    /// ## Common Causes
    ///
    /// - Invalid TOML syntax in config files, or a config that cannot be
    ///   serialized back
    /// - Configuration values outside valid ranges
    /// - Config directory creation failures
    #[error("Configuration error: {0}")]
    Config(String),

    /// A styled document could not be exported to the requested target.
    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Check if the error might go away when the operation is retried.
    ///
    /// Only interrupted or timed-out I/O qualifies; everything else is a
    /// property of the input.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// - `"io"` - File system and I/O operations
    /// - `"config"` - Configuration and settings
    /// - `"export"` - Document export
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Config(_) => "config",
            Self::Export(_) => "export",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
