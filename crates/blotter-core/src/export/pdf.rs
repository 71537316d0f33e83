//! Paginated PDF export.
//!
//! Documents are laid out line by line onto fixed-size pages using the PDF
//! base-14 fonts, so no font data is embedded and the output stays small.
//! Lines longer than the content width wrap at the character that would
//! overflow. Glyph advances are approximated per font family: Courier is
//! exactly 0.6 em, Helvetica is taken as its average digit width.
//!
//! Text is encoded as `WinAnsiEncoding`; characters outside it print as `?`.

use crate::config::PdfConfig;
use crate::document::{Run, StyledDocument};
use crate::style::{Color, TextStyle};
use crate::{Error, Result};
use std::io::Write;

const LINE_SPACING: f32 = 1.2;
const ASCENT: f32 = 0.8;
const BLANK_LINE_SIZE: f32 = 15.0;
const TAB: &str = "    ";
const WRAP_TOLERANCE: f32 = 0.01;
/// Catalog, page tree and the four fonts come first.
const FIRST_PAGE_OBJECT: usize = 7;

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
    /// Margin on every side.
    pub margin: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::from(&PdfConfig::default())
    }
}

impl From<&PdfConfig> for PageSetup {
    fn from(config: &PdfConfig) -> Self {
        Self {
            width: config.page_width,
            height: config.page_height,
            margin: config.margin,
        }
    }
}

impl PageSetup {
    fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn validate(&self) -> Result<()> {
        if self.margin < 0.0 || self.content_width() <= 0.0 || self.height <= 2.0 * self.margin {
            return Err(Error::Export(format!(
                "page {}x{} has no room inside a {} pt margin",
                self.width, self.height, self.margin
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Mono,
    MonoBold,
}

impl Font {
    const ALL: [Self; 4] = [Self::Regular, Self::Bold, Self::Mono, Self::MonoBold];

    const fn for_style(style: TextStyle) -> Self {
        match (style.is_monospaced(), style.weight.is_bold()) {
            (false, false) => Self::Regular,
            (false, true) => Self::Bold,
            (true, false) => Self::Mono,
            (true, true) => Self::MonoBold,
        }
    }

    const fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Mono => "F3",
            Self::MonoBold => "F4",
        }
    }

    const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
            Self::Mono => "Courier",
            Self::MonoBold => "Courier-Bold",
        }
    }

    fn advance(self, size: f32) -> f32 {
        match self {
            Self::Regular | Self::Bold => 0.556 * size,
            Self::Mono | Self::MonoBold => 0.6 * size,
        }
    }
}

/// A piece of one line drawn with one style.
#[derive(Debug)]
struct Fragment {
    text: Vec<u8>,
    font: Font,
    size: f32,
    color: Color,
    background: Option<Color>,
    x: f32,
    width: f32,
}

#[derive(Debug, Default)]
struct Line {
    fragments: Vec<Fragment>,
    height: f32,
}

/// Map a character to its `WinAnsiEncoding` byte.
fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u8,
        '€' => 0x80,
        '…' => 0x85,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '™' => 0x99,
        _ => b'?',
    }
}

/// Escape encoded text for a PDF literal string.
fn literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(char::from(b));
            },
            0x20..0x7f => out.push(char::from(b)),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out
}

struct Layout {
    width: f32,
    lines: Vec<Line>,
    current: Line,
    x: f32,
}

impl Layout {
    fn push_char(&mut self, run: &Run, font: Font, size: f32, c: char) {
        let advance = font.advance(size);
        if self.x > 0.0 && self.x + advance > self.width + WRAP_TOLERANCE {
            self.wrap();
        }
        let extends = self.current.fragments.last().is_some_and(|f| {
            f.font == font
                && (f.size - size).abs() < f32::EPSILON
                && f.color == run.style.color
                && f.background == run.background
        });
        if !extends {
            self.current.fragments.push(Fragment {
                text: Vec::new(),
                font,
                size,
                color: run.style.color,
                background: run.background,
                x: self.x,
                width: 0.0,
            });
        }
        if let Some(fragment) = self.current.fragments.last_mut() {
            fragment.text.push(win_ansi(c));
            fragment.width += advance;
        }
        self.x += advance;
    }

    fn wrap(&mut self) {
        let height = self.current.height;
        let finished = std::mem::replace(
            &mut self.current,
            Line {
                fragments: Vec::new(),
                height,
            },
        );
        self.lines.push(finished);
        self.x = 0.0;
    }

    fn push_line(&mut self, runs: &[Run]) {
        let size = runs
            .iter()
            .map(|run| run.style.role.point_size())
            .fold(BLANK_LINE_SIZE, f32::max);
        self.current = Line {
            fragments: Vec::new(),
            height: size * LINE_SPACING,
        };
        self.x = 0.0;
        for run in runs {
            let font = Font::for_style(run.style);
            let size = run.style.role.point_size();
            for c in run.text.chars() {
                if c == '\t' {
                    for space in TAB.chars() {
                        self.push_char(run, font, size, space);
                    }
                } else {
                    self.push_char(run, font, size, c);
                }
            }
        }
        let line = std::mem::take(&mut self.current);
        self.lines.push(line);
    }
}

fn layout(document: &StyledDocument, width: f32) -> Vec<Line> {
    let mut layout = Layout {
        width,
        lines: Vec::new(),
        current: Line::default(),
        x: 0.0,
    };
    for runs in document.lines() {
        layout.push_line(&runs);
    }
    layout.lines
}

/// Distribute lines onto pages; returns `(line, baseline)` pairs per page.
fn paginate(lines: &[Line], setup: &PageSetup) -> Vec<Vec<(&Line, f32)>> {
    let top = setup.height - setup.margin;
    let mut pages = vec![Vec::new()];
    let mut y = top;
    for line in lines {
        let starts_page = pages.last().is_none_or(Vec::is_empty);
        if !starts_page && y - line.height < setup.margin {
            pages.push(Vec::new());
            y = top;
        }
        if let Some(page) = pages.last_mut() {
            page.push((line, y - line.height * ASCENT));
        }
        y -= line.height;
    }
    pages
}

fn rgb(color: Color) -> String {
    let (r, g, b) = color.rgb();
    format!(
        "{:.3} {:.3} {:.3}",
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0
    )
}

fn content_stream(page: &[(&Line, f32)], setup: &PageSetup) -> Vec<u8> {
    let mut out = String::new();
    for (line, baseline) in page {
        for fragment in &line.fragments {
            let x = setup.margin + fragment.x;
            if let Some(background) = fragment.background {
                let bottom = baseline - line.height * (1.0 - ASCENT);
                out.push_str(&format!(
                    "{} rg {x:.2} {bottom:.2} {:.2} {:.2} re f\n",
                    rgb(background),
                    fragment.width,
                    line.height
                ));
            }
            out.push_str(&format!(
                "BT /{} {:.1} Tf {} rg {x:.2} {baseline:.2} Td ({}) Tj ET\n",
                fragment.font.resource(),
                fragment.size,
                rgb(fragment.color),
                literal(&fragment.text)
            ));
        }
    }
    out.into_bytes()
}

/// Byte sink that records where each object starts.
struct PdfWriter {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Result<Self> {
        let mut buffer = Vec::new();
        buffer.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n")?;
        Ok(Self {
            buffer,
            offsets: Vec::new(),
        })
    }

    fn object(&mut self, body: &str) -> Result<()> {
        self.offsets.push(self.buffer.len());
        let number = self.offsets.len();
        writeln!(self.buffer, "{number} 0 obj\n{body}\nendobj")?;
        Ok(())
    }

    fn stream(&mut self, data: &[u8]) -> Result<()> {
        self.offsets.push(self.buffer.len());
        let number = self.offsets.len();
        writeln!(self.buffer, "{number} 0 obj\n<< /Length {} >>\nstream", data.len())?;
        self.buffer.write_all(data)?;
        self.buffer.write_all(b"endstream\nendobj\n")?;
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        let xref = self.buffer.len();
        writeln!(self.buffer, "xref\n0 {}", self.offsets.len() + 1)?;
        self.buffer.write_all(b"0000000000 65535 f \n")?;
        for offset in &self.offsets {
            writeln!(self.buffer, "{offset:010} 00000 n ")?;
        }
        writeln!(
            self.buffer,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF",
            self.offsets.len() + 1
        )?;
        Ok(self.buffer)
    }
}

/// Render the document as a PDF file.
///
/// # Errors
///
/// Returns [`Error::Export`] if the page has no room inside its margins.
pub fn pdf(document: &StyledDocument, setup: &PageSetup) -> Result<Vec<u8>> {
    setup.validate()?;
    let lines = layout(document, setup.content_width());
    let pages = paginate(&lines, setup);
    tracing::debug!(lines = lines.len(), pages = pages.len(), "writing pdf");

    let mut writer = PdfWriter::new()?;
    writer.object("<< /Type /Catalog /Pages 2 0 R >>")?;
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * i))
        .collect();
    writer.object(&format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ))?;
    for font in Font::ALL {
        writer.object(&format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            font.base_font()
        ))?;
    }
    let fonts: Vec<String> = Font::ALL
        .iter()
        .enumerate()
        .map(|(i, font)| format!("/{} {} 0 R", font.resource(), 3 + i))
        .collect();
    for (index, page) in pages.iter().enumerate() {
        writer.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Resources << /Font << {} >> >> /Contents {} 0 R >>",
            setup.width,
            setup.height,
            fonts.join(" "),
            FIRST_PAGE_OBJECT + 2 * index + 1
        ))?;
        writer.stream(&content_stream(page, setup))?;
    }
    writer.finish()
}
