//! Post-process pass orchestration.
//!
//! Loads the settings snapshot once per frame, then either dithers the frame
//! or copies it through when the pass is disabled.

mod stats;

pub use stats::PassStats;

use std::sync::Arc;
use std::time::Instant;

use ditherwave_core::SnapshotCell;
use tracing::trace;

use crate::dither::{DitherCompositor, DitherSettings};
use crate::frame::FrameBuffer;

/// The dither post-process stage of the frame pipeline.
pub struct DitherPass {
    settings: Arc<SnapshotCell<DitherSettings>>,
    stats: PassStats,
}

impl DitherPass {
    /// Creates a pass reading from `settings`.
    #[must_use]
    pub fn new(settings: Arc<SnapshotCell<DitherSettings>>) -> Self {
        Self {
            settings,
            stats: PassStats::default(),
        }
    }

    /// Processes one frame from `source` into `target`.
    ///
    /// Changes published before this call are visible; changes published
    /// during it apply from the next frame.
    pub fn run(&mut self, source: &FrameBuffer, time: f32, target: &mut FrameBuffer) -> PassStats {
        let start = Instant::now();
        let generation = self.settings.generation();
        let settings = self.settings.load();

        if settings.enabled {
            DitherCompositor::new(&settings).composite(source, time, target);
        } else {
            target.copy_from(source);
            self.stats.passthrough_frames += 1;
        }

        let elapsed_ms = start.elapsed().as_secs_f32() * 1000.0;
        self.stats.frames += 1;
        self.stats.settings_generation = generation;
        self.stats.pixels = source.pixels().len() as u64;
        self.stats.last_frame_ms = elapsed_ms;
        self.stats.total_ms += f64::from(elapsed_ms);

        trace!(
            frame = self.stats.frames,
            enabled = settings.enabled,
            generation,
            ms = elapsed_ms,
            "dither pass"
        );
        self.stats
    }

    /// Accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> PassStats {
        self.stats
    }

    /// Settings cell the pass reads from.
    #[must_use]
    pub fn settings(&self) -> &Arc<SnapshotCell<DitherSettings>> {
        &self.settings
    }
}
