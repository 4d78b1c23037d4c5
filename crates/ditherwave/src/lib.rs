//! # DITHERWAVE
//!
//! Audio-reactive, palette-constrained ordered dithering over a rendered scene.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  rms   ┌──────────┐  pump  ┌──────────────────┐
//! │ Audio thread │───────>│ AudioBus │───────>│ ModulationDriver │
//! └──────────────┘        └──────────┘        └────────┬─────────┘
//!                                                      │ LightLevels
//! ┌──────────────┐ publish ┌───────────────┐           ▼
//! │ UI / config  │────────>│ SnapshotCell< │   ┌──────────────┐
//! │ DitherControls│        │ DitherSettings│   │ FrameSource  │
//! └──────────────┘         └──────┬────────┘   └──────┬───────┘
//!                                 │ load()            │ frame
//!                                 ▼                   ▼
//!                          ┌─────────────────────────────────┐
//!                          │ RenderLoop: DitherPass (60 FPS) │
//!                          └─────────────────────────────────┘
//! ```
//!
//! ## Crate Structure
//!
//! - `ditherwave_shared` - colors, constants, math
//! - `ditherwave_core` - errors, snapshot publication, frame timing
//! - `ditherwave_rendering` - Bayer matrices, palette, compositor, shader
//! - `ditherwave` - this crate: config, controls, audio, render loop

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod audio;
pub mod config;
pub mod controls;
pub mod modulation;
pub mod render_loop;
pub mod scene;

pub use audio::{AudioBus, RmsReceiver, RmsSender};
pub use config::{ConfigError, ConfigResult, ViewerConfig};
pub use controls::DitherControls;
pub use modulation::{LightLevels, ModulationDriver, ModulationTarget};
pub use render_loop::{FrameStats, RenderLoop, RenderLoopConfig, RenderLoopStats};
pub use scene::{FrameSource, GradientScene};

// Re-export engine crates
pub use ditherwave_core as core;
pub use ditherwave_rendering as rendering;
pub use ditherwave_shared as shared;
