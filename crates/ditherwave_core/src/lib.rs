//! # DITHERWAVE Core
//!
//! Primitives the post-process engine is built on:
//! - **Snapshot publication** - configuration is written on UI/audio
//!   timelines and read once per frame by the render thread
//! - **Error taxonomy** - every recoverable engine failure
//! - **Frame timing** - elapsed-time clock and 60 FPS limiter
//!
//! ## Example
//!
//! ```rust,ignore
//! use ditherwave_core::SnapshotCell;
//!
//! let cell = SnapshotCell::new(settings);
//! {
//!     let mut write = cell.begin_write();
//!     write.params.set_noise_scale(0.8);
//! } // published here, atomically
//!
//! let frame_settings = cell.load(); // whole value, never torn
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod sync;
pub mod timing;

pub use error::{DitherError, DitherResult};
pub use sync::{SnapshotCell, SnapshotWriteGuard};
pub use timing::{FrameClock, FrameLimiter};
