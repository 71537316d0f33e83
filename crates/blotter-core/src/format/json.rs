//! Pretty-printed, syntax-colored JSON.
//!
//! The printed text is always valid JSON equivalent to the input: member
//! order is kept, strings are re-escaped and numbers are printed as parsed.
//! Styling never adds characters, so stripping it yields parseable output.

use crate::document::{Run, StyledDocument};
use crate::style::{Color, ColorMode, FontStyle, RenderOptions, TextRole, TextStyle};
use crate::types::{CodingKey, DecodingError};
use serde_json::Value;

const INDENT: &str = "  ";

/// Parse a payload that is a JSON object or array.
///
/// Top-level scalars are rejected so that plain text such as `42` or `true`
/// keeps rendering as text.
pub fn parse_document(bytes: &[u8]) -> Option<Value> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Key,
    String,
    Number,
    Literal,
    Punctuation,
}

/// Renders a JSON value, optionally flagging the node a decoding error points at.
pub struct JsonRenderer<'a> {
    options: RenderOptions,
    error_path: Option<&'a [CodingKey]>,
    path: Vec<CodingKey>,
    output: StyledDocument,
}

impl<'a> JsonRenderer<'a> {
    /// Renderer for the given options and optional decoding error.
    ///
    /// An error with an empty coding path flags nothing.
    pub fn new(options: RenderOptions, error: Option<&'a DecodingError>) -> Self {
        Self {
            options,
            error_path: error
                .map(|e| e.coding_path.as_slice())
                .filter(|path| !path.is_empty()),
            path: Vec::new(),
            output: StyledDocument::new(),
        }
    }

    /// Render the value.
    pub fn render(mut self, value: &Value) -> StyledDocument {
        self.value(value, 0, false);
        self.output
    }

    fn style(&self, token: Token) -> TextStyle {
        let base = TextStyle::role(TextRole::Body2).with_font_style(FontStyle::Monospaced);
        let color = if self.options.color == ColorMode::Monochrome {
            match token {
                Token::Punctuation => Color::SecondaryLabel,
                _ => Color::Label,
            }
        } else {
            match token {
                Token::Key => Color::Blue,
                Token::String => Color::Red,
                Token::Number => Color::Purple,
                Token::Literal => Color::Pink,
                Token::Punctuation => Color::SecondaryLabel,
            }
        };
        base.with_color(color)
    }

    fn push(&mut self, text: impl Into<String>, token: Token, highlighted: bool) {
        let mut run = Run::new(text, self.style(token));
        if highlighted {
            run.background = Some(Color::Red);
        }
        self.output.push_run(run);
    }

    fn indent(&mut self, level: usize) {
        if level > 0 {
            self.push(INDENT.repeat(level), Token::Punctuation, false);
        }
    }

    fn at_error(&self) -> bool {
        self.error_path == Some(self.path.as_slice())
    }

    fn value(&mut self, value: &Value, level: usize, inherited: bool) {
        let highlighted = inherited || self.at_error();
        match value {
            Value::Object(map) if map.is_empty() => self.push("{}", Token::Punctuation, highlighted),
            Value::Array(items) if items.is_empty() => self.push("[]", Token::Punctuation, highlighted),
            Value::Object(map) => {
                self.push("{\n", Token::Punctuation, highlighted);
                let count = map.len();
                for (index, (key, member)) in map.iter().enumerate() {
                    self.indent(level + 1);
                    self.path.push(CodingKey::Key(key.clone()));
                    let key_highlighted = highlighted || self.at_error();
                    self.push(quote(key), Token::Key, key_highlighted);
                    self.push(": ", Token::Punctuation, false);
                    self.value(member, level + 1, highlighted);
                    self.path.pop();
                    self.push(if index + 1 < count { ",\n" } else { "\n" }, Token::Punctuation, false);
                }
                self.indent(level);
                self.push("}", Token::Punctuation, highlighted);
            },
            Value::Array(items) => {
                self.push("[\n", Token::Punctuation, highlighted);
                let count = items.len();
                for (index, item) in items.iter().enumerate() {
                    self.indent(level + 1);
                    self.path.push(CodingKey::Index(index));
                    self.value(item, level + 1, highlighted);
                    self.path.pop();
                    self.push(if index + 1 < count { ",\n" } else { "\n" }, Token::Punctuation, false);
                }
                self.indent(level);
                self.push("]", Token::Punctuation, highlighted);
            },
            Value::String(s) => self.push(quote(s), Token::String, highlighted),
            Value::Number(n) => self.push(n.to_string(), Token::Number, highlighted),
            Value::Bool(b) => self.push(b.to_string(), Token::Literal, highlighted),
            Value::Null => self.push("null", Token::Literal, highlighted),
        }
    }
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
