//! Markdown export.
//!
//! Lines are classified by the style of their runs:
//!
//! - title lines become `##` headings
//! - section titles become `###` headings
//! - technical metadata lines are italic
//! - runs of monospaced lines are grouped into fenced code blocks
//! - everything else is a paragraph line, with bold runs emphasized

use crate::document::{Run, StyledDocument};
use crate::style::TextRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Title,
    Heading,
    Technical,
    Code,
    Text,
}

fn classify(line: &[Run]) -> LineKind {
    let Some(first) = line.first() else {
        return LineKind::Blank;
    };
    if line.iter().all(|run| run.tags.technical) {
        return LineKind::Technical;
    }
    match first.style.role {
        TextRole::Title => return LineKind::Title,
        TextRole::Subheadline => return LineKind::Heading,
        TextRole::Body | TextRole::Body2 => {},
    }
    if line.iter().any(|run| run.style.is_monospaced()) {
        LineKind::Code
    } else {
        LineKind::Text
    }
}

fn line_text(line: &[Run]) -> String {
    line.iter().map(|run| run.text.as_str()).collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn inline(line: &[Run]) -> String {
    line.iter()
        .map(|run| {
            let text = escape(&run.text);
            if run.style.weight.is_bold() && !text.trim().is_empty() {
                format!("**{text}**")
            } else {
                text
            }
        })
        .collect()
}

/// A fence longer than any backtick sequence inside the block.
fn fence(lines: &[String]) -> String {
    let longest = lines
        .iter()
        .flat_map(|line| line.split(|c| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Render the document as Markdown.
#[must_use]
pub fn markdown(document: &StyledDocument) -> String {
    let lines = document.lines();
    let kinds: Vec<LineKind> = lines.iter().map(|line| classify(line)).collect();
    let mut out = String::new();
    let mut index = 0;

    while index < lines.len() {
        let line = &lines[index];
        match kinds[index] {
            LineKind::Blank => out.push('\n'),
            LineKind::Title => out.push_str(&format!("## {}\n", escape(&line_text(line)))),
            LineKind::Heading => out.push_str(&format!("### {}\n", escape(&line_text(line)))),
            LineKind::Technical => out.push_str(&format!("*{}*\n", escape(&line_text(line)))),
            LineKind::Text => {
                out.push_str(&inline(line));
                out.push_str("  \n");
            },
            LineKind::Code => {
                let mut end = index;
                let mut block = Vec::new();
                // Blank lines stay inside the block only when more code follows.
                while end < lines.len() {
                    match kinds[end] {
                        LineKind::Code => block.push(line_text(&lines[end])),
                        LineKind::Blank if kinds[end..].iter().find(|k| **k != LineKind::Blank) == Some(&LineKind::Code) => {
                            block.push(String::new());
                        },
                        _ => break,
                    }
                    end += 1;
                }
                let fence = fence(&block);
                out.push_str(&fence);
                out.push('\n');
                for code in &block {
                    out.push_str(code);
                    out.push('\n');
                }
                out.push_str(&fence);
                out.push('\n');
                index = end;
                continue;
            },
        }
        index += 1;
    }
    out
}
