//! Body formatting: turns a payload and its declared content type into styled
//! text.
//!
//! ## Precedence
//!
//! 1. Empty payload: the `–` placeholder.
//! 2. A JSON object or array: pretty-printed and syntax-colored by [`json`].
//!    A capture-side [`DecodingError`] highlights the node it points at.
//! 3. UTF-8 text: form parameters for `application/x-www-form-urlencoded`
//!    bodies that parse, highlighted markup for `text/html`, otherwise
//!    preformatted monospaced text.
//! 4. Anything else: a one-line size and content-type summary.
//!
//! Formatting never fails; every payload lands in one of the tiers.
//!
//! ```rust
//! use blotter_core::format::BodyFormatter;
//! use blotter_core::style::RenderOptions;
//! use blotter_core::types::ContentType;
//!
//! let formatter = BodyFormatter::new(RenderOptions::default());
//! let json = ContentType::new("application/json");
//! let doc = formatter.format(br#"{"a":1}"#, Some(&json), None);
//! assert!(doc.plain_text().contains("\"a\": 1"));
//! ```

pub mod html;
pub mod json;
pub mod key_value;

use crate::document::StyledDocument;
use crate::section::KeyValueSection;
use crate::style::{Color, FontStyle, RenderOptions, TextRole, TextStyle};
use crate::types::{ContentType, DecodingError};
use crate::utils::format_byte_count;

/// Text shown where a value or body is missing.
pub const PLACEHOLDER: &str = "–";

/// The `–` placeholder in body style.
pub fn placeholder() -> StyledDocument {
    StyledDocument::text(PLACEHOLDER, TextStyle::role(TextRole::Body2))
}

/// Monospaced text, shown as-is.
pub fn preformatted(text: &str, color: Color) -> StyledDocument {
    StyledDocument::text(
        text,
        TextStyle::role(TextRole::Body2)
            .with_font_style(FontStyle::Monospaced)
            .with_color(color),
    )
}

/// Formats request and response bodies.
///
/// The formatter holds only immutable options, so one instance can be shared
/// by reference across pre-render workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyFormatter {
    options: RenderOptions,
    max_body_size: Option<usize>,
}

impl BodyFormatter {
    /// Formatter with the given options and no size limit.
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self {
            options,
            max_body_size: None,
        }
    }

    /// Summarize payloads larger than `limit` bytes instead of formatting them.
    #[must_use]
    pub const fn with_max_body_size(mut self, limit: Option<usize>) -> Self {
        self.max_body_size = limit;
        self
    }

    /// Render options in effect.
    #[must_use]
    pub const fn options(&self) -> RenderOptions {
        self.options
    }

    /// Format a payload.
    pub fn format(
        &self,
        bytes: &[u8],
        content_type: Option<&ContentType>,
        error: Option<&DecodingError>,
    ) -> StyledDocument {
        if bytes.is_empty() {
            return placeholder();
        }
        if self.max_body_size.is_some_and(|limit| bytes.len() > limit) {
            return self.summary(bytes.len() as u64, content_type);
        }
        if let Some(value) = json::parse_document(bytes) {
            return json::JsonRenderer::new(self.options, error).render(&value);
        }
        let Ok(text) = std::str::from_utf8(bytes) else {
            return self.summary(bytes.len() as u64, content_type);
        };
        if content_type.is_some_and(ContentType::is_encoded_form) {
            if let Some(section) = KeyValueSection::form_parameters(text) {
                return key_value::render_section(&section, None, FontStyle::Monospaced, self.options);
            }
        }
        if content_type.is_some_and(ContentType::is_html) {
            return html::highlight(text, self.options);
        }
        preformatted(text, Color::Label)
    }

    /// One-line summary for a payload that is binary or was never materialized.
    pub fn summary(&self, size: u64, content_type: Option<&ContentType>) -> StyledDocument {
        let mut text = format_byte_count(size);
        if let Some(content_type) = content_type {
            text.push_str(&format!(" ({content_type})"));
        }
        preformatted(&text, Color::Label)
    }
}
