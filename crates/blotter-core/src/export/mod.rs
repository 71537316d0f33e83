//! Converters from a [`StyledDocument`] to output formats.
//!
//! Every converter is a pure function of the document. The text content is
//! the same across formats; only the carried styling differs.
//!
//! | Format     | Function              | Styling kept                         |
//! |------------|-----------------------|--------------------------------------|
//! | Plain text | [`plain_text`]        | none                                 |
//! | Terse text | [`plain_text_terse`]  | none, technical runs dropped         |
//! | HTML       | [`html()`]            | color, weight, font, size, highlight |
//! | Markdown   | [`markdown()`]        | headings, emphasis, code blocks      |
//! | PDF        | `pdf::pdf` (`pdf`)    | color, weight, font, size, highlight |

pub mod html;
pub mod markdown;
#[cfg(feature = "pdf")]
pub mod pdf;

pub use html::html;
pub use markdown::markdown;

use crate::document::StyledDocument;

/// The document text without styling.
#[must_use]
pub fn plain_text(document: &StyledDocument) -> String {
    document.plain_text()
}

/// The document text without technical boilerplate such as metadata lines.
#[must_use]
pub fn plain_text_terse(document: &StyledDocument) -> String {
    document
        .runs()
        .iter()
        .filter(|run| !run.tags.technical)
        .map(|run| run.text.as_str())
        .collect()
}
