//! Color value types.
//!
//! `Color` is an RGB triple of normalized intensities. Whether it holds linear
//! or display (sRGB-encoded) values is decided by the owner; the palette store
//! converts linear input to display space exactly once, on write.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to parse a `#rrggbb` color string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color {0:?}: expected #rrggbb")]
pub struct HexColorError(pub String);

/// RGB color with normalized channels.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// Black. Also the padding value of unused palette slots.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// White.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a color from raw channel values.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from an sRGB-encoded `0xRRGGBB` value.
    ///
    /// The result is in linear space: channels are decoded with the sRGB
    /// transfer function, the same way scene-graph color constructors treat
    /// hex literals.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self::from_srgb_hex(hex).to_linear()
    }

    /// Creates a color from `0xRRGGBB` without decoding (raw `channel / 255`).
    #[must_use]
    pub fn from_srgb_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;
        Self::new(r, g, b)
    }

    /// Parses `#rrggbb`, `rrggbb` or `0xrrggbb` into a linear color.
    ///
    /// # Errors
    ///
    /// Returns [`HexColorError`] if the string is not six hex digits after the
    /// optional prefix.
    pub fn parse_hex(text: &str) -> Result<Self, HexColorError> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexColorError(text.to_string()));
        }

        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| HexColorError(text.to_string()))
    }

    /// Formats the stored channels as `#rrggbb` (each channel `round(c * 255)`).
    ///
    /// No transfer function is applied; format a display-space color to get
    /// the hex a user typed in.
    #[must_use]
    pub fn to_hex_string(self) -> String {
        let to_byte = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }

    /// Converts linear channels to display (sRGB-encoded) channels.
    #[must_use]
    pub fn to_srgb(self) -> Self {
        Self::new(
            linear_to_srgb(self.r),
            linear_to_srgb(self.g),
            linear_to_srgb(self.b),
        )
    }

    /// Converts display (sRGB-encoded) channels to linear channels.
    #[must_use]
    pub fn to_linear(self) -> Self {
        Self::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }

    /// Adds the same offset to every channel.
    #[inline]
    #[must_use]
    pub fn offset(self, amount: f32) -> Self {
        Self::new(self.r + amount, self.g + amount, self.b + amount)
    }

    /// Euclidean distance in RGB space.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Attaches an alpha channel.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    /// Converts to array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Converts to a vec4-aligned array (w = 0) for uniform blocks.
    #[inline]
    #[must_use]
    pub const fn to_padded(self) -> [f32; 4] {
        [self.r, self.g, self.b, 0.0]
    }
}

/// Color plus alpha, one per frame pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Rgba {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new pixel value.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the color channels without alpha.
    #[inline]
    #[must_use]
    pub const fn rgb(self) -> Color {
        Color::new(self.r, self.g, self.b)
    }

    /// Quantizes to 8 bits per channel (clamped, rounded).
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_byte(self.r), to_byte(self.g), to_byte(self.b), to_byte(self.a)]
    }
}

/// sRGB decode for a single channel.
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

/// sRGB encode for a single channel.
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c < 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(0.416_666_66) - 0.055
    }
}
