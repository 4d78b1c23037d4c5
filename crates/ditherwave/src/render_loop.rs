//! # Render Loop
//!
//! ```text
//! tick(dt):
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. ADVANCE CLOCK        elapsed += dt (time reads 0 when jitter off) │
//! │ 2. PUMP AUDIO           apply every pending loudness sample once      │
//! │ 3. FRAME LIMITER        skip unless > 1/60 s accumulated              │
//! │ 4. SCENE                frame source renders with current lights      │
//! │ 5. DITHER PASS          one settings snapshot, whole frame            │
//! │ 6. STATS                per-frame timings, budget check               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use ditherwave_core::{FrameClock, FrameLimiter, SnapshotCell};
use ditherwave_rendering::{DitherPass, DitherSettings, FrameBuffer};
use tracing::warn;

use crate::audio::RmsReceiver;
use crate::modulation::{LightLevels, ModulationDriver};
use crate::scene::FrameSource;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Frame time above which a warning is logged.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Render loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLoopConfig {
    /// Frame cap; 0 renders every tick.
    pub target_fps: u32,
    /// Drive jitter with elapsed time.
    pub animate_jitter: bool,
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            animate_jitter: true,
        }
    }
}

/// Timings for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 0.
    pub frame: u64,
    /// Time value passed to the dither pass.
    pub time: f32,
    /// Loudness samples applied since the previous tick.
    pub samples_applied: usize,
    /// Scene render time in microseconds.
    pub scene_us: u64,
    /// Dither pass time in microseconds.
    pub dither_us: u64,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Whether the dither pass ran (false when copied through).
    pub dithered: bool,
}

/// Aggregate statistics over a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderLoopStats {
    /// Frames rendered.
    pub frames_rendered: u64,
    /// Ticks skipped by the frame limiter.
    pub ticks_skipped: u64,
    /// Loudness samples applied.
    pub samples_applied: u64,
    /// Sum of frame times.
    pub total_us_sum: u64,
    /// Sum of scene times.
    pub scene_us_sum: u64,
    /// Sum of dither times.
    pub dither_us_sum: u64,
    /// Shortest frame.
    pub min_frame_us: u64,
    /// Longest frame.
    pub max_frame_us: u64,
    /// Frames over [`TARGET_FRAME_TIME`].
    pub frames_over_budget: u64,
}

impl Default for RenderLoopStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoopStats {
    /// Empty statistics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_rendered: 0,
            ticks_skipped: 0,
            samples_applied: 0,
            total_us_sum: 0,
            scene_us_sum: 0,
            dither_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records one rendered frame.
    pub fn record(&mut self, stats: &FrameStats) {
        self.frames_rendered += 1;
        self.total_us_sum += stats.total_us;
        self.scene_us_sum += stats.scene_us;
        self.dither_us_sum += stats.dither_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);

        if stats.total_us > TARGET_FRAME_TIME.as_micros() as u64 {
            self.frames_over_budget += 1;
        }
    }

    /// Average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_rendered == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_rendered as f64) / 1000.0
    }

    /// Fraction of frames over budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_rendered == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_rendered as f64
    }

    /// Prints a summary to stdout.
    pub fn print_summary(&self) {
        let per_frame = |sum: u64| {
            if self.frames_rendered == 0 {
                0.0
            } else {
                (sum as f64 / self.frames_rendered as f64) / 1000.0
            }
        };
        let min_ms = if self.frames_rendered == 0 {
            0.0
        } else {
            self.min_frame_us as f64 / 1000.0
        };

        println!("┌─ FRAMES ─────────────────────────────────────────────────────────┐");
        println!("│ Rendered:           {}", self.frames_rendered);
        println!("│ Skipped (limiter):  {}", self.ticks_skipped);
        println!("│ Audio samples:      {}", self.samples_applied);
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ TIMING ─────────────────────────────────────────────────────────┐");
        println!("│ Average Frame:      {:.3} ms", self.avg_frame_ms());
        println!("│ Min / Max:          {:.3} / {:.3} ms", min_ms, self.max_frame_us as f64 / 1000.0);
        println!("│ Scene:              {:.3} ms", per_frame(self.scene_us_sum));
        println!("│ Dither:             {:.3} ms", per_frame(self.dither_us_sum));
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");
    }
}

/// Drives scene rendering, audio modulation and the dither pass.
pub struct RenderLoop<S: FrameSource> {
    scene: S,
    pass: DitherPass,
    driver: ModulationDriver,
    audio: RmsReceiver,
    clock: FrameClock,
    limiter: FrameLimiter,
    scene_frame: FrameBuffer,
    output: FrameBuffer,
    stats: RenderLoopStats,
    pending_samples: usize,
    frame: u64,
}

impl<S: FrameSource> RenderLoop<S> {
    /// Creates a loop over `scene`, reading settings from `settings`.
    #[must_use]
    pub fn new(
        scene: S,
        settings: Arc<SnapshotCell<DitherSettings>>,
        driver: ModulationDriver,
        audio: RmsReceiver,
        config: RenderLoopConfig,
    ) -> Self {
        let (width, height) = scene.size();
        Self {
            scene,
            pass: DitherPass::new(settings),
            driver,
            audio,
            clock: FrameClock::new(config.animate_jitter),
            limiter: FrameLimiter::with_fps(config.target_fps),
            scene_frame: FrameBuffer::new(width, height),
            output: FrameBuffer::new(width, height),
            stats: RenderLoopStats::new(),
            pending_samples: 0,
            frame: 0,
        }
    }

    /// Advances by `delta_secs` of wall-clock time.
    ///
    /// Returns the frame's stats if the limiter let a frame through.
    pub fn tick(&mut self, delta_secs: f32) -> Option<FrameStats> {
        self.clock.advance(delta_secs);
        self.pump_audio();

        if !self.limiter.tick(delta_secs) {
            self.stats.ticks_skipped += 1;
            return None;
        }
        Some(self.render_frame())
    }

    /// Renders one frame now, ignoring the limiter.
    pub fn render_frame(&mut self) -> FrameStats {
        self.pump_audio();
        let start = Instant::now();
        let time = self.clock.time();
        let lights = self.driver.levels();

        self.scene.render(time, &lights, &mut self.scene_frame);
        let scene_done = Instant::now();

        let before = self.pass.stats();
        let pass_stats = self.pass.run(&self.scene_frame, time, &mut self.output);
        let end = Instant::now();

        let stats = FrameStats {
            frame: self.frame,
            time,
            samples_applied: std::mem::take(&mut self.pending_samples),
            scene_us: duration_us(scene_done - start),
            dither_us: duration_us(end - scene_done),
            total_us: duration_us(end - start),
            dithered: pass_stats.passthrough_frames == before.passthrough_frames,
        };

        if stats.total_us > MAX_FRAME_TIME.as_micros() as u64 {
            warn!(
                frame = stats.frame,
                ms = stats.total_us as f64 / 1000.0,
                "frame exceeded budget"
            );
        }

        self.stats.record(&stats);
        self.frame += 1;
        stats
    }

    fn pump_audio(&mut self) {
        let applied = self.driver.pump(&self.audio);
        self.pending_samples += applied;
        self.stats.samples_applied += applied as u64;
    }

    /// Last dithered frame.
    #[must_use]
    pub fn output(&self) -> &FrameBuffer {
        &self.output
    }

    /// Current light levels.
    #[must_use]
    pub fn lights(&self) -> LightLevels {
        self.driver.levels()
    }

    /// Modulation driver.
    #[must_use]
    pub fn driver(&self) -> &ModulationDriver {
        &self.driver
    }

    /// Frame clock, e.g. to switch jitter animation on or off.
    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    /// Aggregate statistics.
    #[must_use]
    pub fn stats(&self) -> &RenderLoopStats {
        &self.stats
    }

    /// Frames rendered so far.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame
    }
}

fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
