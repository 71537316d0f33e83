//! Style catalog: the text styles every rendered run is drawn with.
//!
//! A [`TextStyle`] is a plain value combining a [`TextRole`] (which fixes the
//! base point size), a [`FontStyle`], a [`FontWeight`], a [`TextWidth`] and a
//! semantic [`Color`]. Styles carry no identity and are derived on the fly; any
//! combination of the enums is valid.
//!
//! ```rust
//! use blotter_core::style::{Color, FontStyle, FontWeight, TextRole, TextStyle, TextWidth};
//!
//! let subheadline = TextStyle::new(
//!     TextRole::Subheadline,
//!     FontStyle::MonospacedDigital,
//!     FontWeight::Regular,
//!     TextWidth::Condensed,
//!     Color::SecondaryLabel,
//! );
//! assert!(!subheadline.is_monospaced());
//! assert_eq!(subheadline.role.point_size(), 15.0);
//! ```

use serde::{Deserialize, Serialize};

/// Typographic role of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Large status line of a detail header.
    Title,
    /// Section titles and metadata lines.
    Subheadline,
    /// Emphasized body text such as the HTTP method.
    Body,
    /// Regular content: URLs, key-value items, bodies.
    Body2,
}

impl TextRole {
    /// Base point size for the role.
    #[must_use]
    pub const fn point_size(self) -> f32 {
        match self {
            Self::Title => 28.0,
            Self::Subheadline | Self::Body2 => 15.0,
            Self::Body => 17.0,
        }
    }
}

/// Font family class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Proportional system font.
    Proportional,
    /// Fixed-width font for code and key-value lists.
    Monospaced,
    /// Proportional font with fixed-width digits, for timestamps.
    MonospacedDigital,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontWeight {
    /// 400
    Regular,
    /// 500
    Medium,
    /// 600
    Semibold,
    /// 700
    Bold,
}

impl FontWeight {
    /// Numeric weight as used by CSS.
    #[must_use]
    pub const fn numeric(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Medium => 500,
            Self::Semibold => 600,
            Self::Bold => 700,
        }
    }

    /// Whether the weight reads as bold in targets that only know two weights.
    #[must_use]
    pub const fn is_bold(self) -> bool {
        matches!(self, Self::Semibold | Self::Bold)
    }
}

/// Horizontal font width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextWidth {
    /// Regular width.
    Standard,
    /// Narrow width used for dense metadata lines.
    Condensed,
}

/// Semantic color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Primary text.
    Label,
    /// De-emphasized text.
    SecondaryLabel,
    /// Barely visible text.
    TertiaryLabel,
    /// Failures, errors, headers.
    Red,
    /// Success.
    Green,
    /// Informational, URL components.
    Blue,
    /// Warnings, pending state.
    Orange,
    /// Query items.
    Purple,
    /// Notices, request options.
    Indigo,
    /// Accent.
    Pink,
    /// Neutral.
    Gray,
}

impl Color {
    /// Hex code used by the export targets.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Label => "#000000",
            Self::SecondaryLabel => "#8a8a8e",
            Self::TertiaryLabel => "#c4c4c6",
            Self::Red => "#ff3b30",
            Self::Green => "#34c759",
            Self::Blue => "#007aff",
            Self::Orange => "#ff9500",
            Self::Purple => "#af52de",
            Self::Indigo => "#5856d6",
            Self::Pink => "#ff2d55",
            Self::Gray => "#8e8e93",
        }
    }

    /// Red, green and blue components in `0..=255`.
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

/// How much color a rendered document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Two tones only: label and secondary label.
    Monochrome,
    /// Semantic colors for status, no syntax coloring inside key-value lists.
    Automatic,
    /// Every colorable element is colored.
    #[default]
    Full,
}

impl ColorMode {
    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monochrome => "monochrome",
            Self::Automatic => "automatic",
            Self::Full => "full",
        }
    }
}

/// Options shared by everything that produces styled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Color mode.
    pub color: ColorMode,
}

impl RenderOptions {
    /// Options used for exports: colors where they carry meaning.
    pub const SHARING: Self = Self {
        color: ColorMode::Automatic,
    };

    /// Options with the given color mode.
    #[must_use]
    pub const fn with_color(color: ColorMode) -> Self {
        Self { color }
    }
}

/// A fully resolved text style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextStyle {
    /// Typographic role.
    pub role: TextRole,
    /// Font family class.
    pub font_style: FontStyle,
    /// Font weight.
    pub weight: FontWeight,
    /// Font width.
    pub width: TextWidth,
    /// Foreground color.
    pub color: Color,
}

impl TextStyle {
    /// Resolve a style from all of its components.
    #[must_use]
    pub const fn new(
        role: TextRole,
        font_style: FontStyle,
        weight: FontWeight,
        width: TextWidth,
        color: Color,
    ) -> Self {
        Self {
            role,
            font_style,
            weight,
            width,
            color,
        }
    }

    /// Default style for a role: proportional, regular, standard, label.
    #[must_use]
    pub const fn role(role: TextRole) -> Self {
        Self::new(
            role,
            FontStyle::Proportional,
            FontWeight::Regular,
            TextWidth::Standard,
            Color::Label,
        )
    }

    /// Style of the blank line between sections.
    #[must_use]
    pub const fn spacer() -> Self {
        Self::new(
            TextRole::Body2,
            FontStyle::Proportional,
            FontWeight::Regular,
            TextWidth::Standard,
            Color::Label,
        )
    }

    /// Copy with a different font style.
    #[must_use]
    pub const fn with_font_style(self, font_style: FontStyle) -> Self {
        Self { font_style, ..self }
    }

    /// Copy with a different weight.
    #[must_use]
    pub const fn with_weight(self, weight: FontWeight) -> Self {
        Self { weight, ..self }
    }

    /// Copy with a different width.
    #[must_use]
    pub const fn with_width(self, width: TextWidth) -> Self {
        Self { width, ..self }
    }

    /// Copy with a different color.
    #[must_use]
    pub const fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    /// Whether every glyph of the run has the same advance.
    #[must_use]
    pub const fn is_monospaced(self) -> bool {
        matches!(self.font_style, FontStyle::Monospaced)
    }
}
