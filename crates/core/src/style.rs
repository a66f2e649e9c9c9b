//! Colors, text styles and the per-sender style table

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Alignment, Sender};

/// Opaque RGB color, written as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xFF);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const DARK_GRAY: Color = Color::rgb(0x55, 0x55, 0x55);
    pub const LIGHT_GRAY: Color = Color::rgb(0xAA, 0xAA, 0xAA);
    /// Grouped table background gray
    pub const NEUTRAL: Color = Color::rgb(0xEF, 0xEF, 0xF4);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Font role of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Body,
    Footnote,
}

/// Horizontal text alignment inside a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    /// Follows the reading direction of the text
    #[default]
    Natural,
}

/// Colors for one sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderColors {
    pub background: Color,
    pub text: Color,
}

/// Bubble colors keyed by sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub user: SenderColors,
    pub other: SenderColors,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            user: SenderColors {
                background: Color::BLUE,
                text: Color::WHITE,
            },
            other: SenderColors {
                background: Color::NEUTRAL,
                text: Color::DARK_GRAY,
            },
        }
    }
}

/// Resolved look of a bubble for one sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderStyle {
    pub background: Color,
    pub body_text: Color,
    pub alignment: Alignment,
}

impl Palette {
    /// Style table: the user's messages sit on the trailing edge in the accent
    /// color, everyone else's on the leading edge in neutral gray.
    pub fn style_for(&self, sender: Sender) -> SenderStyle {
        match sender {
            Sender::User => SenderStyle {
                background: self.user.background,
                body_text: self.user.text,
                alignment: Alignment::Trailing,
            },
            Sender::Other => SenderStyle {
                background: self.other.background,
                body_text: self.other.text,
                alignment: Alignment::Leading,
            },
        }
    }
}

/// Formats send dates for the caption label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateRenderer {
    format: String,
}

impl DateRenderer {
    pub const DEFAULT_FORMAT: &'static str = "%H:%M";

    /// Build a renderer, rejecting format strings chrono cannot render.
    ///
    /// Some specifiers parse but need data a UTC timestamp does not carry,
    /// so the format is also tried against a fixed date.
    pub fn new(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        let invalid = || Error::InvalidConfig(format!("invalid date format {:?}", format));

        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid());
        }
        let sample_date = Utc
            .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(invalid)?;
        if try_render(&format, &sample_date).is_none() {
            return Err(invalid());
        }
        Ok(Self { format })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Render `date`, falling back to the default format if this one fails
    pub fn render(&self, date: &DateTime<Utc>) -> String {
        try_render(&self.format, date)
            .or_else(|| {
                tracing::warn!(format = %self.format, "Date format failed to render");
                try_render(Self::DEFAULT_FORMAT, date)
            })
            .unwrap_or_default()
    }
}

fn try_render(format: &str, date: &DateTime<Utc>) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

impl TryFrom<String> for DateRenderer {
    type Error = Error;

    fn try_from(format: String) -> Result<Self> {
        Self::new(format)
    }
}

impl From<DateRenderer> for String {
    fn from(renderer: DateRenderer) -> Self {
        renderer.format
    }
}

impl Default for DateRenderer {
    fn default() -> Self {
        Self {
            format: Self::DEFAULT_FORMAT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!("#0000FF".parse::<Color>().unwrap(), Color::BLUE);
        assert_eq!("#efeff4".parse::<Color>().unwrap(), Color::NEUTRAL);
    }

    #[test]
    fn test_parse_color_rejects_malformed() {
        for bad in ["0000FF", "#00F", "#GG0000", "#0000FF00", ""] {
            assert!(
                matches!(bad.parse::<Color>(), Err(Error::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::DARK_GRAY.to_string(), "#555555");
    }

    #[test]
    fn test_style_table() {
        let palette = Palette::default();

        let user = palette.style_for(Sender::User);
        assert_eq!(user.background, Color::BLUE);
        assert_eq!(user.body_text, Color::WHITE);
        assert_eq!(user.alignment, Alignment::Trailing);

        let other = palette.style_for(Sender::Other);
        assert_eq!(other.background, Color::NEUTRAL);
        assert_eq!(other.body_text, Color::DARK_GRAY);
        assert_eq!(other.alignment, Alignment::Leading);
    }

    #[test]
    fn test_date_renderer() {
        let date = Utc.with_ymd_and_hms(2018, 9, 15, 9, 7, 0).unwrap();
        assert_eq!(DateRenderer::default().render(&date), "09:07");

        let long = DateRenderer::new("%Y-%m-%d %H:%M").unwrap();
        assert_eq!(long.render(&date), "2018-09-15 09:07");
    }

    #[test]
    fn test_date_renderer_rejects_bad_format() {
        assert!(matches!(
            DateRenderer::new("%Q"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_date_renderer_rejects_unrenderable_format() {
        // Parses as a valid specifier but cannot be rendered for a UTC timestamp
        assert!(matches!(
            DateRenderer::new("%#z"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_date_renderer_falls_back_to_default() {
        let renderer = DateRenderer {
            format: "%#z".to_string(),
        };
        let date = Utc.with_ymd_and_hms(2018, 9, 15, 9, 7, 0).unwrap();
        assert_eq!(renderer.render(&date), "09:07");
    }
}
