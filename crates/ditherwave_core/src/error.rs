//! # Engine Error Types
//!
//! All errors the post-process engine can report. Every variant is local and
//! recoverable: the operation that failed leaves the engine state unchanged.
//!
//! A non-canonical Bayer matrix size is deliberately NOT an error. It resolves
//! to a flat 0.5 threshold (see `BayerMatrix::Flat` in the rendering crate).

use ditherwave_shared::HexColorError;
use thiserror::Error;

/// Errors that can occur while configuring the dither pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DitherError {
    /// Indexed palette write outside the active range.
    #[error("palette index {index} out of range: active size is {size}")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Active palette size at the time of the call.
        size: usize,
    },

    /// Append on a palette that already holds every slot.
    #[error("palette full: capacity {capacity}")]
    PaletteFull {
        /// Palette capacity.
        capacity: usize,
    },

    /// Reset with no colors (a palette always has at least one entry).
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// Matrix width or height of zero (pixel position modulo zero).
    #[error("matrix dimensions must be at least 1")]
    ZeroMatrixDimension,

    /// Preset name not recognized.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// Malformed hex color string.
    #[error(transparent)]
    InvalidHexColor(#[from] HexColorError),
}

/// Result type for engine operations.
pub type DitherResult<T> = Result<T, DitherError>;
