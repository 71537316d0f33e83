//! # blotter-core
//!
//! Core functionality for blotter - a styled-text rendering pipeline for
//! captured network tasks and log messages.
//!
//! This crate turns plain records (request and response metadata, header lists,
//! lazily loaded body bytes, content types, decoding errors) into a
//! display-independent [`StyledDocument`], and converts that document into
//! plain text, HTML, Markdown and (with the `pdf` feature) PDF.
//!
//! ## Architecture
//!
//! Data flows one way:
//!
//! - **Model**: [`types`] holds the records consumed from the capturing layer
//! - **Sections**: [`section`] turns headers, URLs, options and errors into
//!   titled key-value lists
//! - **Formatting**: [`format`] sniffs body payloads (JSON, form, HTML, text,
//!   binary) and styles them
//! - **Building**: [`TextRenderer`] assembles sections into documents, with a
//!   parallel pre-render cache for large batch exports
//! - **Export**: [`export`] converts documents to output formats
//!
//! ## Quick Start
//!
//! ```rust
//! use blotter_core::{Entity, LogLevel, LogMessage, TextRenderer, export};
//!
//! let message = LogMessage {
//!     level: LogLevel::Warning,
//!     text: "Token expires soon".to_string(),
//!     ..LogMessage::default()
//! };
//!
//! let document = TextRenderer::sharing().share(&[Entity::from(message)]);
//! assert!(export::plain_text(&document).contains("Token expires soon"));
//! assert!(export::plain_text_terse(&document).starts_with("Token"));
//! ```
//!
//! ## Error Handling
//!
//! Rendering never fails: missing data renders as an omitted section or a `–`
//! placeholder. Only configuration loading and PDF export return
//! [`Result<T, Error>`]:
//!
//! ```rust
//! use blotter_core::{Config, Error};
//! use std::path::Path;
//!
//! match Config::load(Some(Path::new("/nonexistent/blotter.toml"))) {
//!     Ok(config) => println!("threshold: {}", config.render.prerender_threshold),
//!     Err(e) if e.is_recoverable() => eprintln!("Try again: {e}"),
//!     Err(e) => eprintln!("[{}] {e}", e.category()),
//! }
//! ```

/// Configuration for rendering and exports
pub mod config;
/// Content selection for task renders
pub mod content;
/// cURL command lines for tasks
pub mod curl;
/// The styled document model
pub mod document;
/// Error types and result aliases
pub mod error;
/// Document export converters
pub mod export;
/// Body formatting by content type
pub mod format;
/// Document building and the pre-render cache
pub mod renderer;
/// Key-value sections
pub mod section;
/// Status titles and summary lines
pub mod status;
/// Style catalog
pub mod style;
/// Records consumed from the capturing layer
pub mod types;
/// Size, duration and time formatting
pub mod utils;

// Re-export commonly used types
pub use config::{Config, PdfConfig, RenderConfig};
pub use content::{ContentFlag, ContentSelector, Section};
pub use document::{Run, RunTags, StyledDocument};
pub use error::{Error, Result};
pub use format::BodyFormatter;
pub use renderer::{RenderedBodyCache, TextRenderer, share};
pub use section::KeyValueSection;
pub use style::{Color, ColorMode, RenderOptions, TextStyle};
pub use types::*;
