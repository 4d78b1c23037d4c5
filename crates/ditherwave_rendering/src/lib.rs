//! # DITHERWAVE Rendering
//!
//! Audio-reactive, palette-constrained ordered dithering applied to a
//! rendered frame.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     DITHER POST-PROCESS                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  SnapshotCell<DitherSettings> ──load()──▶ DitherCompositor   │
//! │        ▲                                   │   │   │         │
//! │  UI / presets                    BayerMatrix  Palette  Params │
//! │                                            │                 │
//! │  Rendered frame ──▶ per-pixel threshold → perturb → nearest  │
//! │                                            ▼                 │
//! │                                   Quantized frame            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CPU compositor and the WGSL shader implement the same per-pixel
//! algorithm; the CPU path is the reference the tests pin down.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bayer;
pub mod dither;
pub mod frame;
pub mod palette;
pub mod pipeline;

pub use bayer::{threshold, BayerMatrix};
pub use dither::{
    shader_module_descriptor, DitherCompositor, DitherParams, DitherSettings, DitherUniforms,
    DITHER_SHADER_WGSL,
};
pub use frame::FrameBuffer;
pub use palette::{PaletteStore, PaletteView, Preset};
pub use pipeline::{DitherPass, PassStats};
