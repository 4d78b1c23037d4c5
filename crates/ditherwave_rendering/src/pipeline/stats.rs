//! Dither pass statistics.

/// Counters kept by [`super::DitherPass`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PassStats {
    /// Frames run through the pass.
    pub frames: u64,
    /// Frames copied through because the pass was disabled.
    pub passthrough_frames: u64,
    /// Settings generation used by the last frame.
    pub settings_generation: u64,
    /// Pixels in the last frame.
    pub pixels: u64,
    /// Wall-clock time of the last frame in milliseconds.
    pub last_frame_ms: f32,
    /// Sum of frame times in milliseconds.
    pub total_ms: f64,
}

impl PassStats {
    /// Frames that were actually dithered.
    #[must_use]
    pub const fn dithered_frames(&self) -> u64 {
        self.frames - self.passthrough_frames
    }

    /// Average time per frame in milliseconds.
    #[must_use]
    pub fn average_ms(&self) -> f64 {
        if self.frames > 0 {
            self.total_ms / self.frames as f64
        } else {
            0.0
        }
    }
}
