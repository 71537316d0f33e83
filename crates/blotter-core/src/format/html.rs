//! Syntax highlighting for HTML bodies.
//!
//! The markup is kept verbatim; only styling is added. Tags, attribute names,
//! attribute values, comments and character references each get their own
//! color unless the color mode is monochrome.

use crate::document::StyledDocument;
use crate::style::{Color, ColorMode, FontStyle, RenderOptions, TextRole, TextStyle};
use regex::Regex;
use std::sync::LazyLock;

/// Comments, declarations and tags.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<![^>]*>|</?[A-Za-z][^>]*>").unwrap());

/// Opening punctuation, tag name, attribute text, closing punctuation.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(</?)([A-Za-z][\w:.-]*)(.*?)(/?>)$").unwrap());

/// An attribute name with an optional value.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/>"']+)(?:(\s*=\s*)("[^"]*"|'[^']*'|[^\s>]+))?"#).unwrap()
});

/// Character references such as `&amp;` or `&#x27;`.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);").unwrap());

#[derive(Clone, Copy)]
enum Token {
    Text,
    Punctuation,
    TagName,
    AttributeName,
    AttributeValue,
    Comment,
    Entity,
}

struct Highlighter {
    options: RenderOptions,
    output: StyledDocument,
}

impl Highlighter {
    fn style(&self, token: Token) -> TextStyle {
        let base = TextStyle::role(TextRole::Body2).with_font_style(FontStyle::Monospaced);
        if self.options.color == ColorMode::Monochrome {
            return base;
        }
        base.with_color(match token {
            Token::Text => Color::Label,
            Token::Punctuation => Color::SecondaryLabel,
            Token::Comment => Color::Green,
            Token::TagName => Color::Red,
            Token::AttributeName => Color::Orange,
            Token::AttributeValue => Color::Blue,
            Token::Entity => Color::Purple,
        })
    }

    fn push(&mut self, text: &str, token: Token) {
        let style = self.style(token);
        self.output.push(text, style);
    }

    fn text(&mut self, text: &str) {
        let mut last = 0;
        for entity in ENTITY_RE.find_iter(text) {
            self.push(&text[last..entity.start()], Token::Text);
            self.push(entity.as_str(), Token::Entity);
            last = entity.end();
        }
        self.push(&text[last..], Token::Text);
    }

    fn markup(&mut self, markup: &str) {
        if markup.starts_with("<!--") {
            self.push(markup, Token::Comment);
            return;
        }
        let Some(caps) = TAG_RE.captures(markup) else {
            self.push(markup, Token::Punctuation);
            return;
        };
        let part = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        self.push(part(1), Token::Punctuation);
        self.push(part(2), Token::TagName);
        self.attributes(part(3));
        self.push(part(4), Token::Punctuation);
    }

    fn attributes(&mut self, attributes: &str) {
        let mut last = 0;
        for caps in ATTRIBUTE_RE.captures_iter(attributes) {
            let Some(whole) = caps.get(0) else { continue };
            self.push(&attributes[last..whole.start()], Token::Text);
            if let Some(name) = caps.get(1) {
                self.push(name.as_str(), Token::AttributeName);
            }
            if let Some(equals) = caps.get(2) {
                self.push(equals.as_str(), Token::Punctuation);
            }
            if let Some(value) = caps.get(3) {
                self.push(value.as_str(), Token::AttributeValue);
            }
            last = whole.end();
        }
        self.push(&attributes[last..], Token::Text);
    }
}

/// Highlight an HTML document or fragment.
pub fn highlight(html: &str, options: RenderOptions) -> StyledDocument {
    let mut highlighter = Highlighter {
        options,
        output: StyledDocument::new(),
    };
    let mut last = 0;
    for markup in MARKUP_RE.find_iter(html) {
        highlighter.text(&html[last..markup.start()]);
        highlighter.markup(markup.as_str());
        last = markup.end();
    }
    highlighter.text(&html[last..]);
    highlighter.output
}
