//! The styled document: an ordered list of styled text runs.
//!
//! Documents are built by appending fully formed sub-documents and are handed
//! to exporters by reference. Adjacent runs with identical attributes are
//! coalesced on append, so the run count reflects style changes rather than
//! the number of append calls.

use crate::style::{Color, TextStyle};
use crate::types::BlobId;

/// Structured metadata attached to a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTags {
    /// The blob this text was rendered from.
    pub object_id: Option<BlobId>,
    /// Boilerplate that terse plain-text export drops.
    pub technical: bool,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// The text, possibly spanning several lines.
    pub text: String,
    /// Style of every character in the run.
    pub style: TextStyle,
    /// Highlight behind the text.
    pub background: Option<Color>,
    /// Metadata.
    pub tags: RunTags,
}

impl Run {
    /// Plain run without background or tags.
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
            background: None,
            tags: RunTags::default(),
        }
    }

    fn same_attributes(&self, other: &Self) -> bool {
        self.style == other.style && self.background == other.background && self.tags == other.tags
    }
}

/// An ordered sequence of styled runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledDocument {
    runs: Vec<Run>,
}

impl StyledDocument {
    /// Empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Document holding a single run.
    pub fn text(text: impl Into<String>, style: TextStyle) -> Self {
        let mut document = Self::new();
        document.push(text, style);
        document
    }

    /// Append text in the given style.
    pub fn push(&mut self, text: impl Into<String>, style: TextStyle) {
        self.push_run(Run::new(text, style));
    }

    /// Append a run, merging it into the previous one when attributes match.
    pub fn push_run(&mut self, run: Run) {
        if run.text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.same_attributes(&run) => last.text.push_str(&run.text),
            _ => self.runs.push(run),
        }
    }

    /// Append every run of another document.
    pub fn append(&mut self, other: Self) {
        for run in other.runs {
            self.push_run(run);
        }
    }

    /// Join documents, inserting `separator` between neighbours only.
    #[must_use]
    pub fn joined(documents: impl IntoIterator<Item = Self>, separator: &Self) -> Self {
        let mut output = Self::new();
        for (index, document) in documents.into_iter().enumerate() {
            if index > 0 {
                output.append(separator.clone());
            }
            output.append(document);
        }
        output
    }

    /// Tag every run with the blob it was rendered from.
    #[must_use]
    pub fn with_object_id(mut self, id: &BlobId) -> Self {
        for run in &mut self.runs {
            run.tags.object_id = Some(id.clone());
        }
        self
    }

    /// Mark every run as technical boilerplate.
    #[must_use]
    pub fn technical(mut self) -> Self {
        for run in &mut self.runs {
            run.tags.technical = true;
        }
        self
    }

    /// The runs, in order.
    #[must_use]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Whether the document holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Concatenated text of every run.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Split into lines of runs, each line without its trailing newline.
    ///
    /// A document ending in a newline does not produce a trailing empty line.
    #[must_use]
    pub fn lines(&self) -> Vec<Vec<Run>> {
        let mut lines = vec![Vec::new()];
        for run in &self.runs {
            let mut parts = run.text.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    if let Some(line) = lines.last_mut() {
                        line.push(Run {
                            text: part.to_string(),
                            ..run.clone()
                        });
                    }
                }
                if parts.peek().is_some() {
                    lines.push(Vec::new());
                }
            }
        }
        if lines.last().is_some_and(Vec::is_empty) && self.plain_text().ends_with('\n') {
            lines.pop();
        }
        lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::style::{FontWeight, TextRole};

    fn body() -> TextStyle {
        TextStyle::role(TextRole::Body2)
    }

    #[test]
    fn test_push_coalesces_matching_runs() {
        let mut doc = StyledDocument::new();
        doc.push("a", body());
        doc.push("b", body());
        doc.push("c", body().with_weight(FontWeight::Semibold));

        assert_eq!(doc.runs().len(), 2);
        assert_eq!(doc.runs()[0].text, "ab");
        assert_eq!(doc.plain_text(), "abc");
    }

    #[test]
    fn test_empty_runs_are_dropped() {
        let mut doc = StyledDocument::new();
        doc.push("", body());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_joined_has_no_trailing_separator() {
        let separator = StyledDocument::text("|", body().with_color(Color::Red));
        let docs = ["a", "b", "c"].map(|s| StyledDocument::text(s, body()));

        let joined = StyledDocument::joined(docs, &separator);

        assert_eq!(joined.plain_text(), "a|b|c");
        assert_eq!(StyledDocument::joined(Vec::new(), &separator).plain_text(), "");
    }

    #[test]
    fn test_tags_split_runs() {
        let mut doc = StyledDocument::text("meta\n", body()).technical();
        doc.append(StyledDocument::text("content\n", body()));

        assert_eq!(doc.runs().len(), 2);
        assert!(doc.runs()[0].tags.technical);
        assert!(!doc.runs()[1].tags.technical);
    }

    #[test]
    fn test_with_object_id_tags_every_run() {
        let id = BlobId::from("blob");
        let doc = StyledDocument::text("x", body()).with_object_id(&id);
        assert!(doc.runs().iter().all(|r| r.tags.object_id.as_ref() == Some(&id)));
    }

    #[test]
    fn test_lines_split_runs_at_newlines() {
        let mut doc = StyledDocument::text("a\nb", body());
        doc.push("c\n\nd\n", body().with_color(Color::Blue));

        let lines = doc.lines();
        let texts: Vec<String> = lines
            .iter()
            .map(|line| line.iter().map(|r| r.text.as_str()).collect())
            .collect();

        assert_eq!(texts, vec!["a", "bc", "", "d"]);
        assert_eq!(lines[1].len(), 2);
    }
}
