//! # Parameter Surface
//!
//! The only way UI code changes the dither pass. Each call is one atomic
//! publication of the whole settings value; the render thread picks it up on
//! its next frame.

use std::sync::Arc;

use ditherwave_core::{DitherResult, SnapshotCell};
use ditherwave_rendering::{DitherSettings, Preset};
use ditherwave_shared::Color;
use tracing::debug;

/// Handle to the published dither settings. Cheap to clone.
#[derive(Clone)]
pub struct DitherControls {
    cell: Arc<SnapshotCell<DitherSettings>>,
}

impl Default for DitherControls {
    fn default() -> Self {
        Self::new(DitherSettings::new())
    }
}

impl DitherControls {
    /// Creates controls over a fresh settings cell.
    #[must_use]
    pub fn new(settings: DitherSettings) -> Self {
        Self {
            cell: Arc::new(SnapshotCell::new(settings)),
        }
    }

    /// Wraps an existing settings cell.
    #[must_use]
    pub fn from_cell(cell: Arc<SnapshotCell<DitherSettings>>) -> Self {
        Self { cell }
    }

    /// The settings cell, for handing to the render pass.
    #[must_use]
    pub fn cell(&self) -> Arc<SnapshotCell<DitherSettings>> {
        Arc::clone(&self.cell)
    }

    /// Last published settings.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DitherSettings> {
        self.cell.load()
    }

    /// Applies a fallible edit as one publication. Nothing is published on
    /// error.
    ///
    /// # Errors
    ///
    /// Returns whatever `edit` returns.
    pub fn edit<R>(
        &self,
        edit: impl FnOnce(&mut DitherSettings) -> DitherResult<R>,
    ) -> DitherResult<R> {
        self.cell.try_update(edit)
    }

    // =========================================================================
    // Matrix
    // =========================================================================

    /// Sets the matrix width.
    ///
    /// # Errors
    ///
    /// Returns `ZeroMatrixDimension` for zero.
    pub fn set_matrix_width(&self, width: u32) -> DitherResult<()> {
        self.edit(|s| s.params.set_matrix_width(width))
    }

    /// Sets the matrix height.
    ///
    /// # Errors
    ///
    /// Returns `ZeroMatrixDimension` for zero.
    pub fn set_matrix_height(&self, height: u32) -> DitherResult<()> {
        self.edit(|s| s.params.set_matrix_height(height))
    }

    /// Sets both matrix dimensions.
    ///
    /// # Errors
    ///
    /// Returns `ZeroMatrixDimension` if either is zero.
    pub fn set_matrix_size(&self, width: u32, height: u32) -> DitherResult<()> {
        self.edit(|s| s.params.set_matrix_size(width, height))
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    /// Sets the noise scale.
    pub fn set_noise_scale(&self, noise_scale: f32) {
        self.cell.update(|s| s.params.set_noise_scale(noise_scale));
    }

    /// Sets the dither offset.
    pub fn set_dither_offset(&self, dither_offset: f32) {
        self.cell.update(|s| s.params.set_dither_offset(dither_offset));
    }

    /// Sets jitter speed, frequency and intensity.
    pub fn set_jitter(&self, speed: f32, frequency: f32, intensity: f32) {
        self.cell
            .update(|s| s.params.set_jitter(speed, frequency, intensity));
    }

    // =========================================================================
    // Palette
    // =========================================================================

    /// Replaces palette entry `index` with a linear color.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `index` is not an active slot.
    pub fn set_color(&self, index: usize, color: Color) -> DitherResult<()> {
        self.edit(|s| s.palette.set_at(index, color))
    }

    /// Replaces palette entry `index` from a `#rrggbb` string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHexColor` or `OutOfRange`.
    pub fn set_color_hex(&self, index: usize, hex: &str) -> DitherResult<()> {
        let color = Color::parse_hex(hex)?;
        self.set_color(index, color)
    }

    /// Appends a white entry. At capacity this is a no-op and returns `None`.
    pub fn add_color(&self) -> Option<usize> {
        match self.edit(|s| s.palette.append(Color::WHITE)) {
            Ok(index) => Some(index),
            Err(err) => {
                debug!(%err, "add color ignored");
                None
            }
        }
    }

    /// Replaces the whole palette with linear colors.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPalette` for an empty slice.
    pub fn reset_palette(&self, colors: &[Color]) -> DitherResult<()> {
        self.edit(|s| s.palette.reset(colors))
    }

    /// Active palette as `#rrggbb` strings, for display.
    #[must_use]
    pub fn palette_hex(&self) -> Vec<String> {
        self.snapshot()
            .palette
            .active()
            .iter()
            .map(|c| c.to_hex_string())
            .collect()
    }

    // =========================================================================
    // Presets
    // =========================================================================

    /// Applies a preset's palette, matrix and noise in one publication.
    ///
    /// # Errors
    ///
    /// Propagates validation errors; nothing is published on error.
    pub fn apply_preset(&self, preset: Preset) -> DitherResult<()> {
        self.edit(|s| s.apply_preset(preset))
    }

    /// Applies a preset by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPreset` for an unrecognized name.
    pub fn apply_preset_named(&self, name: &str) -> DitherResult<()> {
        self.apply_preset(name.parse()?)
    }

    // =========================================================================
    // Pass toggle
    // =========================================================================

    /// Enables the dither pass.
    pub fn enable(&self) {
        self.cell.update(|s| s.enabled = true);
    }

    /// Disables the dither pass (frames are copied through).
    pub fn disable(&self) {
        self.cell.update(|s| s.enabled = false);
    }

    /// Flips the pass on/off and returns the new state.
    pub fn toggle(&self) -> bool {
        self.cell.update(|s| {
            s.enabled = !s.enabled;
            s.enabled
        })
    }

    /// Whether the last published settings have the pass enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.snapshot().enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ditherwave_core::DitherError;
    use ditherwave_shared::MAX_PALETTE_SIZE;

    #[test]
    fn test_add_color_is_noop_at_capacity() {
        let controls = DitherControls::default();
        for _ in 2..MAX_PALETTE_SIZE {
            assert!(controls.add_color().is_some());
        }
        let generation = controls.cell().generation();

        assert_eq!(controls.add_color(), None);
        assert_eq!(controls.snapshot().palette.size(), MAX_PALETTE_SIZE);
        assert_eq!(controls.cell().generation(), generation);
    }

    #[test]
    fn test_failed_edit_publishes_nothing() {
        let controls = DitherControls::default();
        let before = controls.snapshot();

        assert_eq!(controls.set_matrix_width(0), Err(DitherError::ZeroMatrixDimension));
        assert_eq!(
            controls.set_color(5, Color::WHITE),
            Err(DitherError::OutOfRange { index: 5, size: 2 })
        );
        assert_eq!(*controls.snapshot(), *before);
        assert_eq!(controls.cell().generation(), 0);
    }

    #[test]
    fn test_set_color_hex() {
        let controls = DitherControls::default();
        controls.set_color_hex(0, "#b967ff").unwrap();
        assert_eq!(controls.palette_hex(), vec!["#b967ff", "#ffffff"]);

        assert!(matches!(
            controls.set_color_hex(0, "purple"),
            Err(DitherError::InvalidHexColor(_))
        ));
    }

    #[test]
    fn test_toggle() {
        let controls = DitherControls::default();
        assert!(controls.is_enabled());
        assert!(!controls.toggle());
        assert!(!controls.is_enabled());
        assert!(controls.toggle());
        controls.disable();
        assert!(!controls.is_enabled());
        controls.enable();
        assert!(controls.is_enabled());
    }

    #[test]
    fn test_apply_preset_named() {
        let controls = DitherControls::default();
        controls.apply_preset_named("zx spectrum").unwrap();
        assert_eq!(controls.snapshot().palette.size(), 15);

        assert_eq!(
            controls.apply_preset_named("sepia"),
            Err(DitherError::UnknownPreset("sepia".to_string()))
        );
        assert_eq!(controls.snapshot().palette.size(), 15);
    }

    #[test]
    fn test_scalar_setters_publish() {
        let controls = DitherControls::default();
        controls.set_noise_scale(0.8);
        controls.set_dither_offset(0.25);
        controls.set_jitter(1.0, 2.0, 3.0);

        let params = controls.snapshot().params;
        assert_eq!(params.noise_scale(), 0.8);
        assert_eq!(params.dither_offset(), 0.25);
        assert_eq!(params.jitter_intensity(), 3.0);
        assert_eq!(controls.cell().generation(), 3);
    }
}
