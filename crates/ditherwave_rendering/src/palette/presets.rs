//! Named palette presets.
//!
//! | Preset        | Colors | Matrix | Noise     |
//! |---------------|--------|--------|-----------|
//! | Black & White | 2      | 8x8    | 0.5       |
//! | Vaporwave     | 5      | 1x4    | 0.6       |
//! | ZX Spectrum   | 15     | 4x4    | unchanged |

use std::fmt;
use std::str::FromStr;

use ditherwave_core::DitherError;
use ditherwave_shared::Color;
use serde::{Deserialize, Serialize};

const BLACK_AND_WHITE: [u32; 2] = [0x000000, 0xffffff];

const VAPORWAVE: [u32; 5] = [0xff71ce, 0x01cdfe, 0x073444, 0xb967ff, 0xfffb96];

const ZX_SPECTRUM: [u32; 15] = [
    0x000000, 0x0000ff, 0xff0000, 0xff00ff, 0x00ff00, 0x00ffff, 0xffff00, 0xffffff,
    0x0000d7, 0xd70000, 0xd700d7, 0x00d700, 0x00d7d7, 0xd7d700, 0xd7d7d7,
];

/// A named palette plus the matrix and noise settings it ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Two-tone black and white.
    BlackAndWhite,
    /// Five pastel neons.
    Vaporwave,
    /// The fifteen distinct ZX Spectrum colors.
    ZxSpectrum,
}

impl Preset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 3] = [Self::BlackAndWhite, Self::Vaporwave, Self::ZxSpectrum];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BlackAndWhite => "Black & White",
            Self::Vaporwave => "Vaporwave",
            Self::ZxSpectrum => "ZX Spectrum",
        }
    }

    /// Canonical config key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BlackAndWhite => "black-and-white",
            Self::Vaporwave => "vaporwave",
            Self::ZxSpectrum => "zx-spectrum",
        }
    }

    /// Palette as sRGB-encoded `0xRRGGBB` values.
    #[must_use]
    pub const fn hex_palette(self) -> &'static [u32] {
        match self {
            Self::BlackAndWhite => &BLACK_AND_WHITE,
            Self::Vaporwave => &VAPORWAVE,
            Self::ZxSpectrum => &ZX_SPECTRUM,
        }
    }

    /// Palette as linear colors, ready for `PaletteStore::reset`.
    #[must_use]
    pub fn palette(self) -> Vec<Color> {
        self.hex_palette().iter().map(|&hex| Color::from_hex(hex)).collect()
    }

    /// Matrix `(width, height)`.
    #[must_use]
    pub const fn matrix_size(self) -> (u32, u32) {
        match self {
            Self::BlackAndWhite => (8, 8),
            Self::Vaporwave => (1, 4),
            Self::ZxSpectrum => (4, 4),
        }
    }

    /// Noise scale, `None` to keep the current value.
    #[must_use]
    pub const fn noise_scale(self) -> Option<f32> {
        match self {
            Self::BlackAndWhite => Some(0.5),
            Self::Vaporwave => Some(0.6),
            Self::ZxSpectrum => None,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = DitherError;

    /// Case-insensitive; `-`, `_`, spaces and `&` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' ' | '&'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "blackandwhite" | "blackwhite" | "bw" => Ok(Self::BlackAndWhite),
            "vaporwave" => Ok(Self::Vaporwave),
            "zxspectrum" => Ok(Self::ZxSpectrum),
            _ => Err(DitherError::UnknownPreset(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for preset in Preset::ALL {
            assert_eq!(preset.key().parse::<Preset>().unwrap(), preset);
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!("ZX_SPECTRUM".parse::<Preset>().unwrap(), Preset::ZxSpectrum);
        assert_eq!("Black and White".parse::<Preset>().unwrap(), Preset::BlackAndWhite);
    }

    #[test]
    fn test_unknown_preset() {
        let err = "gameboy".parse::<Preset>().unwrap_err();
        assert_eq!(err, DitherError::UnknownPreset("gameboy".to_string()));
    }

    #[test]
    fn test_palette_sizes_fit_capacity() {
        for preset in Preset::ALL {
            let len = preset.palette().len();
            assert!((1..=ditherwave_shared::MAX_PALETTE_SIZE).contains(&len));
        }
        assert_eq!(Preset::ZxSpectrum.palette().len(), 15);
    }

    #[test]
    fn test_vaporwave_is_tall_matrix() {
        assert_eq!(Preset::Vaporwave.matrix_size(), (1, 4));
        assert_eq!(Preset::Vaporwave.noise_scale(), Some(0.6));
        assert_eq!(Preset::ZxSpectrum.noise_scale(), None);
    }
}
