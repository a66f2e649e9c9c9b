//! Bubble configuration
//!
//! Loaded from `bubble.toml` in the platform config directory. Every key is
//! optional; missing keys fall back to the built-in look.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::style::{DateRenderer, Palette};

pub const CONFIG_FILE_NAME: &str = "bubble.toml";

/// Upper bound for any layout distance, in layout units
pub const MAX_DISTANCE: f64 = 10_000.0;

/// Full bubble configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub layout: LayoutMetrics,
    pub text: TextConfig,
    pub palette: Palette,
}

/// Distances used to place the bubble and its labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Gap on the edge the bubble hugs
    pub small_offset: f64,
    /// Gap kept free on the opposite edge
    pub large_offset: f64,
    /// Vertical margin between the bubble and its container
    pub container_margin: f64,
    /// Inset of the labels inside the bubble
    pub content_padding: f64,
    /// Space between the body and the caption row
    pub caption_spacing: f64,
    /// Space between the caption and the read receipt
    pub receipt_spacing: f64,
    pub corner_radius: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            small_offset: 8.0,
            large_offset: 40.0,
            container_margin: 4.0,
            content_padding: 8.0,
            caption_spacing: 8.0,
            receipt_spacing: 2.0,
            corner_radius: 8.0,
        }
    }
}

/// Fixed strings and date formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Caption shown while a message is still being sent
    pub sending: String,
    /// Marker shown on the user's messages once read
    pub read_receipt: String,
    /// strftime format for the send date
    pub date_format: DateRenderer,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            sending: "Sending...".to_string(),
            read_receipt: "✓".to_string(),
            date_format: DateRenderer::default(),
        }
    }
}

impl BubbleConfig {
    /// Parse and validate configuration from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: BubbleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!("Loaded bubble config from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a file, using defaults when the file does not exist
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No bubble config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load from the platform config directory
    pub fn load_or_default() -> Result<Self> {
        Self::load_optional(&Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "onyx", "murmur").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("cannot serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let distances = [
            ("small_offset", layout.small_offset),
            ("large_offset", layout.large_offset),
            ("container_margin", layout.container_margin),
            ("content_padding", layout.content_padding),
            ("caption_spacing", layout.caption_spacing),
            ("receipt_spacing", layout.receipt_spacing),
            ("corner_radius", layout.corner_radius),
        ];
        for (name, value) in distances {
            if !value.is_finite() || !(0.0..=MAX_DISTANCE).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "layout.{} must be between 0 and {}, got {}",
                    name, MAX_DISTANCE, value
                )));
            }
        }

        if layout.large_offset < layout.small_offset {
            return Err(Error::InvalidConfig(format!(
                "layout.large_offset ({}) must not be smaller than layout.small_offset ({})",
                layout.large_offset, layout.small_offset
            )));
        }

        if self.text.read_receipt.is_empty() {
            return Err(Error::InvalidConfig(
                "text.read_receipt must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;
    use tempfile::tempdir;

    #[test]
    fn test_parse_empty_config() {
        let config = BubbleConfig::from_toml("").unwrap();
        assert_eq!(config, BubbleConfig::default());
        assert_eq!(config.layout.small_offset, 8.0);
        assert_eq!(config.layout.large_offset, 40.0);
        assert_eq!(config.text.sending, "Sending...");
        assert_eq!(config.text.read_receipt, "✓");
        assert_eq!(config.text.date_format.format(), "%H:%M");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
[layout]
small_offset = 4.0
large_offset = 64.0
corner_radius = 12.0

[text]
sending = "Wird gesendet..."
read_receipt = "✓✓"
date_format = "%d.%m. %H:%M"

[palette.user]
background = "#34C759"
text = "#FFFFFF"

[palette.other]
background = "#E5E5EA"
text = "#000000"
"##;
        let config = BubbleConfig::from_toml(toml).unwrap();
        assert_eq!(config.layout.small_offset, 4.0);
        assert_eq!(config.layout.large_offset, 64.0);
        assert_eq!(config.layout.corner_radius, 12.0);
        assert_eq!(config.layout.container_margin, 4.0);
        assert_eq!(config.text.sending, "Wird gesendet...");
        assert_eq!(config.text.read_receipt, "✓✓");
        assert_eq!(config.text.date_format.format(), "%d.%m. %H:%M");
        assert_eq!(config.palette.user.background, Color::rgb(0x34, 0xC7, 0x59));
        assert_eq!(config.palette.other.text, Color::rgb(0, 0, 0));
    }

    #[test]
    fn test_rejects_negative_offset() {
        let err = BubbleConfig::from_toml("[layout]\nsmall_offset = -1.0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("small_offset")));
    }

    #[test]
    fn test_rejects_inverted_offsets() {
        let toml = "[layout]\nsmall_offset = 50.0\nlarge_offset = 10.0\n";
        assert!(matches!(
            BubbleConfig::from_toml(toml),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_empty_receipt() {
        let toml = "[text]\nread_receipt = \"\"\n";
        assert!(matches!(
            BubbleConfig::from_toml(toml),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_date_format() {
        let toml = "[text]\ndate_format = \"%Q\"\n";
        assert!(matches!(
            BubbleConfig::from_toml(toml),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_offset() {
        let err = BubbleConfig::from_toml("[layout]\nlarge_offset = 1e20\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("large_offset")));
    }

    #[test]
    fn test_rejects_unrenderable_date_format() {
        let toml = "[text]\ndate_format = \"%#z\"\n";
        assert!(matches!(
            BubbleConfig::from_toml(toml),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_color() {
        let toml = "[palette.user]\nbackground = \"blue\"\ntext = \"#FFFFFF\"\n";
        assert!(matches!(
            BubbleConfig::from_toml(toml),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[layout]\nlarge_offset = 48.0\n").unwrap();

        let config = BubbleConfig::load(&path).unwrap();
        assert_eq!(config.layout.large_offset, 48.0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        assert!(matches!(BubbleConfig::load(&path), Err(Error::Io(_))));
        assert_eq!(
            BubbleConfig::load_optional(&path).unwrap(),
            BubbleConfig::default()
        );
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = BubbleConfig::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("large_offset"));
        assert_eq!(BubbleConfig::from_toml(&toml).unwrap(), config);
    }
}
