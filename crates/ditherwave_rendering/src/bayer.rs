//! Bayer threshold matrices.
//!
//! Four canonical ordered-dither grids are supported: 2x2, 3x3, 4x4 and 8x8.
//! Every other size resolves to [`BayerMatrix::Flat`], a constant 0.5
//! threshold. That is the defined degenerate case (uniform offset instead of a
//! structured pattern), not an error.
//!
//! The matrix used for a `width x height` configuration is the canonical one
//! for `max(width, height)`. A `8 x 1` configuration therefore samples row 0 of
//! the 8x8 grid rather than a true 8x1 ordered matrix.

/// 2x2 grid, row-major, values out of 4.
#[rustfmt::skip]
const BAYER_2: [u8; 4] = [
    0, 2,
    3, 1,
];

/// 3x3 grid, row-major, values out of 9.
#[rustfmt::skip]
const BAYER_3: [u8; 9] = [
    0, 7, 3,
    6, 5, 2,
    4, 1, 8,
];

/// 4x4 grid, row-major, values out of 16.
#[rustfmt::skip]
const BAYER_4: [u8; 16] = [
     0,  8,  2, 10,
    12,  4, 14,  6,
     3, 11,  1,  9,
    15,  7, 13,  5,
];

/// 8x8 grid, row-major, values out of 64.
#[rustfmt::skip]
const BAYER_8: [u8; 64] = [
     0, 32,  8, 40,  2, 34, 10, 42,
    48, 16, 56, 24, 50, 18, 58, 26,
    12, 44,  4, 36, 14, 46,  6, 38,
    60, 28, 52, 20, 62, 30, 54, 22,
     3, 35, 11, 43,  1, 33,  9, 41,
    51, 19, 59, 27, 49, 17, 57, 25,
    15, 47,  7, 39, 13, 45,  5, 37,
    63, 31, 55, 23, 61, 29, 53, 21,
];

/// A resolved threshold matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BayerMatrix {
    /// 2x2 ordered matrix.
    Bayer2,
    /// 3x3 ordered matrix.
    Bayer3,
    /// 4x4 ordered matrix.
    Bayer4,
    /// 8x8 ordered matrix.
    Bayer8,
    /// Constant 0.5 threshold for unsupported sizes.
    Flat,
}

impl BayerMatrix {
    /// Threshold returned by [`BayerMatrix::Flat`].
    pub const FLAT_THRESHOLD: f32 = 0.5;

    /// Resolves the matrix for a requested size.
    #[must_use]
    pub const fn for_size(size: u32) -> Self {
        match size {
            2 => Self::Bayer2,
            3 => Self::Bayer3,
            4 => Self::Bayer4,
            8 => Self::Bayer8,
            _ => Self::Flat,
        }
    }

    /// Resolves the matrix for a `width x height` configuration.
    #[must_use]
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        Self::for_size(width.max(height))
    }

    /// Side length of the grid, `None` for the flat fallback.
    #[must_use]
    pub const fn order(self) -> Option<u32> {
        match self {
            Self::Bayer2 => Some(2),
            Self::Bayer3 => Some(3),
            Self::Bayer4 => Some(4),
            Self::Bayer8 => Some(8),
            Self::Flat => None,
        }
    }

    /// Returns true for the structured (non-flat) matrices.
    #[inline]
    #[must_use]
    pub const fn is_canonical(self) -> bool {
        !matches!(self, Self::Flat)
    }

    /// Threshold at cell `(x, y)`, in `[0, 1)`.
    ///
    /// Coordinates outside the grid wrap around.
    #[inline]
    #[must_use]
    pub fn threshold(self, x: u32, y: u32) -> f32 {
        let (table, order): (&[u8], u32) = match self {
            Self::Bayer2 => (&BAYER_2, 2),
            Self::Bayer3 => (&BAYER_3, 3),
            Self::Bayer4 => (&BAYER_4, 4),
            Self::Bayer8 => (&BAYER_8, 8),
            Self::Flat => return Self::FLAT_THRESHOLD,
        };

        let index = ((y % order) * order + (x % order)) as usize;
        f32::from(table[index]) / (order * order) as f32
    }
}

/// Threshold for cell `(x, y)` of the canonical matrix of `size`.
///
/// Returns exactly `0.5` when `size` is not 2, 3, 4 or 8.
#[inline]
#[must_use]
pub fn threshold(x: u32, y: u32, size: u32) -> f32 {
    BayerMatrix::for_size(size).threshold(x, y)
}
