//! # DITHERWAVE Shared
//!
//! Common value types used by the post-process engine and the viewer.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `wgpu`
//! - Any GPU or window-related crate
//!
//! If you need graphics types, put them in `ditherwave_rendering`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod constants;
pub mod math;

pub use color::{Color, HexColorError, Rgba};
pub use constants::{
    DEFAULT_DITHER_OFFSET, DEFAULT_JITTER_FREQUENCY, DEFAULT_JITTER_INTENSITY,
    DEFAULT_JITTER_SPEED, DEFAULT_MATRIX_SIZE, DEFAULT_NOISE_SCALE, FRAME_INTERVAL_SECS,
    LUMA_WEIGHTS, MAX_PALETTE_SIZE,
};
pub use math::{lerp, luma};
