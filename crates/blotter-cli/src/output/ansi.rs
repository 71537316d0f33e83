//! Terminal rendering of styled documents.

use blotter_core::{Color, Run, StyledDocument};
use colored::{ColoredString, Colorize};

/// Paint a document with ANSI escapes.
///
/// Escapes never span a line break so pagers and `head` see complete lines.
/// Whether escapes are emitted at all follows `colored`'s global override
/// (`--no-color`, `NO_COLOR`, terminal detection).
#[must_use]
pub fn ansi(document: &StyledDocument) -> String {
    let mut out = String::new();
    for run in document.runs() {
        for (i, piece) in run.text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if !piece.is_empty() {
                out.push_str(&paint(piece, run).to_string());
            }
        }
    }
    out
}

fn paint(text: &str, run: &Run) -> ColoredString {
    let mut painted = match run.style.color {
        Color::Label => text.normal(),
        Color::SecondaryLabel | Color::TertiaryLabel => text.dimmed(),
        color => text.color(terminal_color(color)),
    };
    if run.style.weight.is_bold() {
        painted = painted.bold();
    }
    if let Some(background) = run.background {
        painted = painted.on_color(terminal_color(background));
    }
    painted
}

/// Nearest of the 16 terminal colors, so the user's theme decides the shade.
const fn terminal_color(color: Color) -> colored::Color {
    match color {
        Color::Label => colored::Color::White,
        Color::SecondaryLabel | Color::TertiaryLabel | Color::Gray => colored::Color::BrightBlack,
        Color::Red => colored::Color::Red,
        Color::Green => colored::Color::Green,
        Color::Blue => colored::Color::Blue,
        Color::Orange => colored::Color::Yellow,
        Color::Purple => colored::Color::Magenta,
        Color::Indigo => colored::Color::BrightBlue,
        Color::Pink => colored::Color::BrightMagenta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blotter_core::style::{FontWeight, TextRole};
    use blotter_core::TextStyle;

    #[test]
    fn test_plain_runs_have_no_escapes() {
        let doc = StyledDocument::text("first\nsecond\n", TextStyle::role(TextRole::Body2));

        assert_eq!(ansi(&doc), "first\nsecond\n");
    }

    #[test]
    fn test_colored_runs_close_before_newline() {
        colored::control::set_override(true);
        let style = TextStyle::role(TextRole::Title)
            .with_weight(FontWeight::Bold)
            .with_color(Color::Red);
        let doc = StyledDocument::text("404 Not Found\nnext", style);

        let painted = ansi(&doc);

        assert!(painted.contains("\x1b["));
        assert!(painted.contains("404 Not Found"));
        let first_line = painted.lines().next().unwrap_or_default();
        assert!(first_line.ends_with("\x1b[0m"));
    }
}
