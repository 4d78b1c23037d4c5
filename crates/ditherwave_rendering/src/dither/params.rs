//! Dither parameters and the settings bundle published to the render thread.

use ditherwave_core::{DitherError, DitherResult};
use ditherwave_shared::{
    DEFAULT_DITHER_OFFSET, DEFAULT_JITTER_FREQUENCY, DEFAULT_JITTER_INTENSITY,
    DEFAULT_JITTER_SPEED, DEFAULT_MATRIX_SIZE, DEFAULT_NOISE_SCALE,
};
use tracing::debug;

use crate::bayer::BayerMatrix;
use crate::palette::{PaletteStore, Preset};

/// Tunable inputs of the per-pixel algorithm.
///
/// Numeric values outside their nominal ranges (for example a noise scale
/// above 1) are accepted. Only a zero matrix dimension is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherParams {
    matrix_width: u32,
    matrix_height: u32,
    noise_scale: f32,
    dither_offset: f32,
    jitter_speed: f32,
    jitter_frequency: f32,
    jitter_intensity: f32,
}

impl Default for DitherParams {
    fn default() -> Self {
        Self {
            matrix_width: DEFAULT_MATRIX_SIZE,
            matrix_height: DEFAULT_MATRIX_SIZE,
            noise_scale: DEFAULT_NOISE_SCALE,
            dither_offset: DEFAULT_DITHER_OFFSET,
            jitter_speed: DEFAULT_JITTER_SPEED,
            jitter_frequency: DEFAULT_JITTER_FREQUENCY,
            jitter_intensity: DEFAULT_JITTER_INTENSITY,
        }
    }
}

impl DitherParams {
    /// Sets the matrix width.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::ZeroMatrixDimension`] for zero; the previous
    /// width is kept.
    pub fn set_matrix_width(&mut self, width: u32) -> DitherResult<()> {
        self.set_matrix_size(width, self.matrix_height)
    }

    /// Sets the matrix height.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::ZeroMatrixDimension`] for zero; the previous
    /// height is kept.
    pub fn set_matrix_height(&mut self, height: u32) -> DitherResult<()> {
        self.set_matrix_size(self.matrix_width, height)
    }

    /// Sets both matrix dimensions at once.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::ZeroMatrixDimension`] if either is zero.
    pub fn set_matrix_size(&mut self, width: u32, height: u32) -> DitherResult<()> {
        if width == 0 || height == 0 {
            return Err(DitherError::ZeroMatrixDimension);
        }

        self.matrix_width = width;
        self.matrix_height = height;

        let matrix = self.matrix();
        if !matrix.is_canonical() {
            debug!(
                width,
                height,
                "no ordered matrix for size {}, using flat threshold",
                width.max(height)
            );
        }
        Ok(())
    }

    /// Sets the threshold perturbation strength.
    pub fn set_noise_scale(&mut self, noise_scale: f32) {
        self.noise_scale = noise_scale;
    }

    /// Sets the centering constant.
    pub fn set_dither_offset(&mut self, dither_offset: f32) {
        self.dither_offset = dither_offset;
    }

    /// Sets jitter speed, spatial frequency and intensity.
    pub fn set_jitter(&mut self, speed: f32, frequency: f32, intensity: f32) {
        self.jitter_speed = speed;
        self.jitter_frequency = frequency;
        self.jitter_intensity = intensity;
    }

    /// Matrix width.
    #[inline]
    #[must_use]
    pub const fn matrix_width(&self) -> u32 {
        self.matrix_width
    }

    /// Matrix height.
    #[inline]
    #[must_use]
    pub const fn matrix_height(&self) -> u32 {
        self.matrix_height
    }

    /// Noise scale.
    #[inline]
    #[must_use]
    pub const fn noise_scale(&self) -> f32 {
        self.noise_scale
    }

    /// Dither offset.
    #[inline]
    #[must_use]
    pub const fn dither_offset(&self) -> f32 {
        self.dither_offset
    }

    /// Jitter angular speed.
    #[inline]
    #[must_use]
    pub const fn jitter_speed(&self) -> f32 {
        self.jitter_speed
    }

    /// Jitter spatial frequency.
    #[inline]
    #[must_use]
    pub const fn jitter_frequency(&self) -> f32 {
        self.jitter_frequency
    }

    /// Jitter intensity.
    #[inline]
    #[must_use]
    pub const fn jitter_intensity(&self) -> f32 {
        self.jitter_intensity
    }

    /// Threshold matrix for the current dimensions.
    #[must_use]
    pub fn matrix(&self) -> BayerMatrix {
        BayerMatrix::for_dimensions(self.matrix_width, self.matrix_height)
    }
}

/// Everything the dither pass reads in one frame.
///
/// Published as a whole through a `SnapshotCell`, so the render thread never
/// sees a palette from one preset paired with another preset's matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DitherSettings {
    /// Algorithm parameters.
    pub params: DitherParams,
    /// Active palette.
    pub palette: PaletteStore,
    /// Whether the pass runs; a disabled pass copies frames through.
    pub enabled: bool,
}

impl Default for DitherSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl DitherSettings {
    /// Default settings with the pass enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: DitherParams::default(),
            palette: PaletteStore::new(),
            enabled: true,
        }
    }

    /// Applies a preset's palette, matrix and noise scale.
    ///
    /// # Errors
    ///
    /// Propagates palette or matrix validation errors. On error nothing has
    /// been changed.
    pub fn apply_preset(&mut self, preset: Preset) -> DitherResult<()> {
        let mut palette = self.palette.clone();
        palette.reset(&preset.palette())?;

        let mut params = self.params;
        let (width, height) = preset.matrix_size();
        params.set_matrix_size(width, height)?;
        if let Some(noise_scale) = preset.noise_scale() {
            params.set_noise_scale(noise_scale);
        }

        self.palette = palette;
        self.params = params;
        debug!(preset = preset.key(), "preset applied");
        Ok(())
    }
}
