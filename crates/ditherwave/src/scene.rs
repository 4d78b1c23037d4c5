//! Frame sources.
//!
//! The dither pass only needs one color+alpha sample per pixel per frame.
//! Anything that can fill a [`FrameBuffer`] can stand in for the 3D scene.

use ditherwave_rendering::FrameBuffer;
use ditherwave_shared::Rgba;

use crate::modulation::LightLevels;

/// Produces the frame the dither pass consumes.
pub trait FrameSource {
    /// Renders one frame into `target`, resizing it if needed.
    fn render(&mut self, time: f32, lights: &LightLevels, target: &mut FrameBuffer);

    /// Output size in pixels.
    fn size(&self) -> (u32, u32);
}

/// Exposure response to total light: `1 - exp(-k * light)`.
const EXPOSURE_RESPONSE: f32 = 0.5;

/// Spotlights contribute a tenth of their intensity to exposure.
const SPOT_WEIGHT: f32 = 0.1;

/// Procedural stand-in for the 3D scene.
///
/// Draws a drifting diagonal gradient with soft bands. Overall brightness
/// follows the light levels, so louder audio gives a brighter frame.
#[derive(Debug, Clone)]
pub struct GradientScene {
    width: u32,
    height: u32,
}

impl GradientScene {
    /// Creates a scene of the given size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Brightness multiplier for a set of light levels, in `[0, 1)`.
    #[must_use]
    pub fn exposure(lights: &LightLevels) -> f32 {
        let light = (lights.ambient + SPOT_WEIGHT * lights.mean_spot()).max(0.0);
        1.0 - (-EXPOSURE_RESPONSE * light).exp()
    }
}

impl FrameSource for GradientScene {
    fn render(&mut self, time: f32, lights: &LightLevels, target: &mut FrameBuffer) {
        target.resize(self.width, self.height);
        let exposure = Self::exposure(lights);
        let (width, height) = (self.width.max(1) as f32, self.height.max(1) as f32);

        for y in 0..self.height {
            for x in 0..self.width {
                let u = x as f32 / width;
                let v = y as f32 / height;
                let band = 0.5 + 0.5 * ((u * 6.0 + v * 3.0) + time * 0.7).sin();

                let pixel = Rgba::new(
                    exposure * (0.25 + 0.75 * u) * band,
                    exposure * (0.2 + 0.6 * v),
                    exposure * (1.0 - 0.5 * u) * (1.0 - band * 0.4),
                    1.0,
                );
                target.set(x, y, pixel);
            }
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
