//! # Engine Constants
//!
//! Values baked into both the CPU compositor and the WGSL shader.
//!
//! **CRITICAL:** `MAX_PALETTE_SIZE` is also the length of the palette array in
//! the shader's uniform block. Changing it requires updating the shader.

// =============================================================================
// PALETTE
// =============================================================================

/// Number of palette slots visible to the shading stage.
///
/// The buffer is always this long; only the first `size` slots are active.
pub const MAX_PALETTE_SIZE: usize = 15;

// =============================================================================
// DITHER DEFAULTS
// =============================================================================

/// Default Bayer matrix width and height.
pub const DEFAULT_MATRIX_SIZE: u32 = 8;

/// Default strength of the threshold perturbation.
pub const DEFAULT_NOISE_SCALE: f32 = 0.5;

/// Default centering constant subtracted from the threshold.
pub const DEFAULT_DITHER_OFFSET: f32 = 0.5;

/// Default jitter angular speed (radians per second).
pub const DEFAULT_JITTER_SPEED: f32 = 8.0;

/// Default jitter spatial frequency across texture space.
pub const DEFAULT_JITTER_FREQUENCY: f32 = 20.0;

/// Default jitter amplitude (scaled by pixel luma).
pub const DEFAULT_JITTER_INTENSITY: f32 = 0.1;

/// Rec. 601 luma weights (r, g, b).
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

// =============================================================================
// FRAME PACING
// =============================================================================

/// Minimum wall-clock time between rendered frames (60 FPS cap).
pub const FRAME_INTERVAL_SECS: f32 = 1.0 / 60.0;
