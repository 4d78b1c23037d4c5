//! CPU reference implementation of the dither pass.
//!
//! One compositor is built per frame from the published settings snapshot.
//! Building resolves the matrix and copies the palette view, so the pixel loop
//! touches no shared state and takes no locks.

use ditherwave_shared::{luma, Rgba};
use rayon::prelude::*;

use super::params::{DitherParams, DitherSettings};
use crate::bayer::BayerMatrix;
use crate::frame::{uv_of, FrameBuffer};
use crate::palette::PaletteView;

/// Per-frame dither state.
#[derive(Debug, Clone, Copy)]
pub struct DitherCompositor {
    matrix: BayerMatrix,
    palette: PaletteView,
    params: DitherParams,
}

impl DitherCompositor {
    /// Captures everything the pass needs from a settings snapshot.
    #[must_use]
    pub fn new(settings: &DitherSettings) -> Self {
        Self::from_parts(settings.params, settings.palette.view())
    }

    /// Builds a compositor from explicit parameters and palette.
    #[must_use]
    pub fn from_parts(params: DitherParams, palette: PaletteView) -> Self {
        Self {
            matrix: params.matrix(),
            palette,
            params,
        }
    }

    /// Resolved threshold matrix.
    #[inline]
    #[must_use]
    pub const fn matrix(&self) -> BayerMatrix {
        self.matrix
    }

    /// Palette snapshot in use.
    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &PaletteView {
        &self.palette
    }

    /// Un-jittered threshold for pixel `(px, py)`.
    #[inline]
    #[must_use]
    pub fn threshold_at(&self, px: u32, py: u32) -> f32 {
        let x = px % self.params.matrix_width().max(1);
        let y = py % self.params.matrix_height().max(1);
        self.matrix.threshold(x, y)
    }

    /// Quantizes one pixel.
    ///
    /// `uv` is the texture coordinate of the pixel center. Jitter is applied
    /// only when `time > 0`. Alpha passes through unchanged.
    #[inline]
    #[must_use]
    pub fn shade_pixel(&self, input: Rgba, px: u32, py: u32, uv: [f32; 2], time: f32) -> Rgba {
        let color = input.rgb();
        let mut threshold = self.threshold_at(px, py);

        if time > 0.0 {
            let params = &self.params;
            let phase = time * params.jitter_speed() + (uv[0] + uv[1]) * params.jitter_frequency();
            threshold += phase.sin() * params.jitter_intensity() * luma(color);
        }

        let perturbed = color.offset((threshold - self.params.dither_offset()) * self.params.noise_scale());
        self.palette.nearest(perturbed).with_alpha(input.a)
    }

    /// Runs the pass over `source`, writing into `target`.
    ///
    /// `target` is resized to match. Rows are processed in parallel.
    pub fn composite(&self, source: &FrameBuffer, time: f32, target: &mut FrameBuffer) {
        let (width, height) = (source.width(), source.height());
        target.resize(width, height);
        if source.is_empty() {
            return;
        }

        target
            .pixels_mut()
            .par_chunks_mut(width as usize)
            .zip(source.pixels().par_chunks(width as usize))
            .enumerate()
            .for_each(|(y, (out_row, in_row))| {
                let py = y as u32;
                for (x, (out, input)) in out_row.iter_mut().zip(in_row).enumerate() {
                    let px = x as u32;
                    *out = self.shade_pixel(*input, px, py, uv_of(px, py, width, height), time);
                }
            });
    }

    /// Runs the pass over `frame` in place.
    pub fn composite_in_place(&self, frame: &mut FrameBuffer, time: f32) {
        let (width, height) = (frame.width(), frame.height());
        if frame.is_empty() {
            return;
        }

        frame
            .pixels_mut()
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let py = y as u32;
                for (x, pixel) in row.iter_mut().enumerate() {
                    let px = x as u32;
                    *pixel = self.shade_pixel(*pixel, px, py, uv_of(px, py, width, height), time);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteStore, Preset};
    use ditherwave_shared::Color;

    fn gradient(width: u32, height: u32) -> FrameBuffer {
        let mut frame = FrameBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = (x + y * width) as f32 / (width * height) as f32;
                frame.set(x, y, Rgba::new(v, 1.0 - v, v * 0.5, 1.0));
            }
        }
        frame
    }

    #[test]
    fn test_mid_gray_at_origin_goes_black() {
        let settings = DitherSettings::new();
        let compositor = DitherCompositor::new(&settings);

        let out = compositor.shade_pixel(Rgba::new(0.5, 0.5, 0.5, 0.8), 0, 0, [0.0, 0.0], 0.0);
        assert_eq!(out.rgb(), settings.palette.active()[0]);
        assert_eq!(out.a, 0.8);
    }

    #[test]
    fn test_time_zero_ignores_jitter() {
        let settings = DitherSettings::new();
        let calm = DitherCompositor::new(&settings);

        let mut wild = settings.clone();
        wild.params.set_jitter(123.0, 77.0, 5.0);
        let wild = DitherCompositor::new(&wild);

        let source = gradient(16, 16);
        let mut a = FrameBuffer::new(0, 0);
        let mut b = FrameBuffer::new(0, 0);
        calm.composite(&source, 0.0, &mut a);
        wild.composite(&source, 0.0, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_jitter_changes_output_when_running() {
        let mut settings = DitherSettings::new();
        settings.params.set_jitter(8.0, 20.0, 1.0);
        let compositor = DitherCompositor::new(&settings);

        let source = FrameBuffer::filled(32, 32, Rgba::new(0.5, 0.5, 0.5, 1.0));
        let mut still = FrameBuffer::new(0, 0);
        let mut moving = FrameBuffer::new(0, 0);
        compositor.composite(&source, 0.0, &mut still);
        compositor.composite(&source, 1.3, &mut moving);
        assert_ne!(still, moving);
    }

    #[test]
    fn test_output_only_uses_active_palette() {
        let mut settings = DitherSettings::new();
        settings.apply_preset(Preset::Vaporwave).unwrap();
        let compositor = DitherCompositor::new(&settings);

        let source = gradient(24, 12);
        let mut out = FrameBuffer::new(0, 0);
        compositor.composite(&source, 2.0, &mut out);

        let active = settings.palette.active();
        assert!(out.pixels().iter().all(|p| active.contains(&p.rgb())));
    }

    #[test]
    fn test_tall_matrix_ignores_x() {
        let mut settings = DitherSettings::new();
        settings.params.set_matrix_size(1, 4).unwrap();
        let compositor = DitherCompositor::new(&settings);

        for y in 0..8 {
            let column = compositor.threshold_at(0, y);
            for x in 1..8 {
                assert_eq!(compositor.threshold_at(x, y), column);
            }
        }
        assert_eq!(compositor.matrix(), BayerMatrix::Bayer4);
    }

    #[test]
    fn test_flat_threshold_is_centered() {
        let mut settings = DitherSettings::new();
        settings.params.set_matrix_size(5, 5).unwrap();
        let compositor = DitherCompositor::new(&settings);

        // threshold 0.5 minus offset 0.5 leaves the color unperturbed
        let dark = Rgba::new(0.4, 0.4, 0.4, 1.0);
        assert_eq!(compositor.shade_pixel(dark, 3, 1, [0.2, 0.7], 0.0).rgb(), Color::BLACK);
    }

    #[test]
    fn test_in_place_matches_copy() {
        let mut settings = DitherSettings::new();
        settings.palette = PaletteStore::from_colors(&Preset::ZxSpectrum.palette()).unwrap();
        let compositor = DitherCompositor::new(&settings);

        let source = gradient(9, 7);
        let mut copied = FrameBuffer::new(0, 0);
        compositor.composite(&source, 0.75, &mut copied);

        let mut in_place = source.clone();
        compositor.composite_in_place(&mut in_place, 0.75);
        assert_eq!(copied, in_place);
    }

    #[test]
    fn test_empty_frame() {
        let compositor = DitherCompositor::new(&DitherSettings::new());
        let mut out = FrameBuffer::new(4, 4);
        compositor.composite(&FrameBuffer::new(0, 0), 1.0, &mut out);
        assert!(out.is_empty());
    }
}
