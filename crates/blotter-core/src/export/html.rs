//! Standalone HTML export.
//!
//! The output is a complete UTF-8 HTML5 document. Runs become `<span>`s with
//! inline styles inside a single `pre-wrap` block, so line breaks and
//! indentation survive without `<br>` tags. Text is escaped and every
//! non-ASCII character is written as a numeric character reference, which
//! keeps the file readable in any encoding.

use crate::document::{Run, StyledDocument};
use crate::style::{FontStyle, TextStyle, TextWidth};
use std::fmt::Write as _;

const PROPORTIONAL_FONT: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif";
const MONOSPACED_FONT: &str = "ui-monospace, SFMono-Regular, Menlo, Consolas, monospace";

/// Render the document as a standalone HTML page.
#[must_use]
pub fn html(document: &StyledDocument) -> String {
    let mut out = String::with_capacity(document.runs().len() * 96 + 512);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>Network Logs</title>\n<style>\n");
    let _ = writeln!(
        out,
        "body {{ margin: 24px; background: #ffffff; font-family: {PROPORTIONAL_FONT}; }}"
    );
    out.push_str(
        ".document { margin: 0; white-space: pre-wrap; overflow-wrap: anywhere; font-family: inherit; }\n",
    );
    out.push_str("</style>\n</head>\n<body>\n<pre class=\"document\">");
    for run in document.runs() {
        write_run(&mut out, run);
    }
    out.push_str("</pre>\n</body>\n</html>\n");
    out
}

fn write_run(out: &mut String, run: &Run) {
    let _ = write!(out, "<span style=\"{}", css(run.style));
    if let Some(background) = run.background {
        let _ = write!(out, "; background-color: {}", background.hex());
    }
    out.push_str("\">");
    out.push_str(&escape(&run.text));
    out.push_str("</span>");
}

fn css(style: TextStyle) -> String {
    let mut css = format!(
        "color: {}; font-weight: {}; font-size: {}px; font-family: {}",
        style.color.hex(),
        style.weight.numeric(),
        style.role.point_size(),
        if style.is_monospaced() {
            MONOSPACED_FONT
        } else {
            PROPORTIONAL_FONT
        }
    );
    if style.font_style == FontStyle::MonospacedDigital {
        css.push_str("; font-variant-numeric: tabular-nums");
    }
    if style.width == TextWidth::Condensed {
        css.push_str("; font-stretch: condensed");
    }
    css
}

/// Escape markup characters and write non-ASCII characters as references.
fn escape(text: &str) -> String {
    let encoded = html_escape::encode_quoted_attribute(text);
    let mut out = String::with_capacity(encoded.len());
    for c in encoded.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let _ = write!(out, "&#x{:X};", u32::from(c));
        }
    }
    out
}
