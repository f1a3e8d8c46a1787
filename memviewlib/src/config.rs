//! Display settings.
//!
//! Geometry of the three panes ([`DisplayConfig`]) and the color roles used by the paint pass
//! ([`Palette`]). Both can be loaded from a TOML file, e.g.:
//!
//! ```toml
//! [display]
//! bytes_per_line = 16
//! address_digits = 8
//!
//! [palette]
//! dirty = { r = 255, g = 80, b = 80, a = 255 }
//! ```

use crate::error::MemViewError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Plain RGBA color. Hosts convert it to their own color type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Geometry of the address, hex and ASCII panes in character cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Bytes shown on one line
    pub bytes_per_line: usize,
    /// Width of the address column in hex digits
    pub address_digits: usize,
    /// Empty cells before the address column
    pub addr_start: usize,
    /// Empty cells between the address column and the hex zone
    pub gap_data: usize,
    /// Empty cells between the hex zone and the ASCII zone
    pub gap_code: usize,
    /// Vertical pixel offset of the first line (font ascent fudge)
    pub top_margin: f32,
    /// Rows kept between the cursor and the viewport edges
    pub scroll_margin: usize,
    /// Font size in pixels, used by hosts to derive cell metrics
    pub font_size: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bytes_per_line: 32,
            address_digits: 16,
            addr_start: 1,
            gap_data: 2,
            gap_code: 2,
            top_margin: 2.0,
            scroll_margin: 4,
            font_size: 13.0,
        }
    }
}

impl DisplayConfig {
    /// Check the values are usable for layout.
    ///
    /// # Errors
    /// Returns [`MemViewError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), MemViewError> {
        if !(1..=256).contains(&self.bytes_per_line) {
            return Err(MemViewError::InvalidConfig(format!(
                "bytes_per_line must be within 1..=256, found {}",
                self.bytes_per_line
            )));
        }
        if !(1..=16).contains(&self.address_digits) {
            return Err(MemViewError::InvalidConfig(format!(
                "address_digits must be within 1..=16, found {}",
                self.address_digits
            )));
        }
        if !(self.top_margin >= 0.0 && self.top_margin.is_finite()) {
            return Err(MemViewError::InvalidConfig(format!(
                "top_margin must be a non-negative number, found {}",
                self.top_margin
            )));
        }
        if !(self.font_size > 0.0 && self.font_size.is_finite()) {
            return Err(MemViewError::InvalidConfig(format!(
                "font_size must be positive, found {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

/// Color roles of the paint pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub base: Rgba,
    /// Background of every other line
    pub alternate_base: Rgba,
    pub text: Rgba,
    /// Text drawn on top of a selection or highlight
    pub highlighted_text: Rgba,
    /// Primary selection fill
    pub highlight: Rgba,
    pub address: Rgba,
    /// Vertical lines between the panes
    pub separator: Rgba,
    /// Text of bytes changed since the baseline snapshot
    pub dirty: Rgba,
    pub cursor: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Rgba::rgb(30, 30, 30),
            alternate_base: Rgba::rgb(38, 38, 38),
            text: Rgba::rgb(210, 210, 210),
            highlighted_text: Rgba::rgb(255, 255, 255),
            highlight: Rgba::rgb(33, 81, 109),
            address: Rgba::rgb(0xA2, 0xD9, 0xAF),
            separator: Rgba::rgb(128, 128, 128),
            dirty: Rgba::rgb(235, 90, 90),
            cursor: Rgba::rgb(240, 240, 240),
        }
    }
}

/// Everything a host needs to configure a display
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplayConfig,
    pub palette: Palette,
}

impl Settings {
    /// Parse settings from TOML text. Missing keys take their default values.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or the values fail validation.
    pub fn from_toml_str(text: &str) -> Result<Self, MemViewError> {
        let settings: Self =
            toml::from_str(text).map_err(|e| MemViewError::ConfigParse(e.to_string()))?;
        settings.display.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MemViewError> {
        let text = std::fs::read_to_string(&path)?;
        let settings = Self::from_toml_str(&text)?;
        debug!(path = %path.as_ref().display(), "loaded display settings");
        Ok(settings)
    }
}
