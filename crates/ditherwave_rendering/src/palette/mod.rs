//! Dynamic color palette.
//!
//! The palette is an arena of [`MAX_PALETTE_SIZE`] slots plus an active size.
//! The shading stage always receives every slot; only `[0, size)` is ever
//! selected, the remainder is black padding.
//!
//! ```text
//! slot:   0     1     2     3     4     5 ... 14
//!       ┌─────┬─────┬─────┬─────┬─────┬─────────┐
//!       │ c0  │ c1  │ c2  │ c3  │ c4  │ black…  │   size = 5
//!       └─────┴─────┴─────┴─────┴─────┴─────────┘
//! ```
//!
//! Every active slot holds a display-space (sRGB-encoded) color. Linear input
//! is converted once on write.
//!
//! [`MAX_PALETTE_SIZE`]: ditherwave_shared::MAX_PALETTE_SIZE

mod presets;
mod store;

pub use presets::Preset;
pub use store::{PaletteStore, PaletteView};
