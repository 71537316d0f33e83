//! Rendering of key-value sections.

use super::PLACEHOLDER;
use crate::document::StyledDocument;
use crate::section::KeyValueSection;
use crate::style::{Color, ColorMode, FontStyle, FontWeight, RenderOptions, TextRole, TextStyle};

/// A section title line, e.g. `Response Headers (3)`.
pub fn subheadline(title: &str) -> StyledDocument {
    StyledDocument::text(
        format!("{title}\n"),
        TextStyle::role(TextRole::Subheadline).with_color(Color::SecondaryLabel),
    )
}

/// Title line followed by one `key: value` line per item.
pub fn render_section(
    section: &KeyValueSection,
    details: Option<&str>,
    font_style: FontStyle,
    options: RenderOptions,
) -> StyledDocument {
    let title = match details {
        Some(details) => format!("{} ({details})", section.title),
        None => section.title.clone(),
    };
    let mut output = subheadline(&title);
    output.append(render_items(&section.items, section.color, font_style, options));
    output
}

/// One `key: value` line per item, or a placeholder line for no items.
///
/// In full color mode keys take the section color at medium weight; otherwise
/// they stay uncolored and semibold. Separators are always secondary.
pub fn render_items(
    items: &[(String, Option<String>)],
    color: Color,
    font_style: FontStyle,
    options: RenderOptions,
) -> StyledDocument {
    let base = TextStyle::role(TextRole::Body2).with_font_style(font_style);
    if items.is_empty() {
        return StyledDocument::text(format!("{PLACEHOLDER}\n"), base);
    }

    let full = options.color == ColorMode::Full;
    let key_style = if full {
        base.with_weight(FontWeight::Medium).with_color(color)
    } else {
        base.with_weight(FontWeight::Semibold)
    };
    let separator_style = base.with_color(Color::SecondaryLabel);

    let mut output = StyledDocument::new();
    for (key, value) in items {
        output.push(key.as_str(), key_style);
        output.push(": ", separator_style);
        output.push(format!("{}\n", value.as_deref().unwrap_or(PLACEHOLDER)), base);
    }
    output
}
