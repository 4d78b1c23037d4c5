//! Frame timing.
//!
//! `FrameClock` feeds the compositor's `time` input. `FrameLimiter` gates
//! rendering to a fixed cadence by accumulating wall-clock delta and keeping
//! the remainder, so a slow callback rate never renders faster than the cap.

use ditherwave_shared::FRAME_INTERVAL_SECS;

/// Seconds since the viewer started, as seen by the dither jitter.
///
/// With animation disabled the clock always reports `0.0`, which the
/// compositor treats as "jitter off".
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    elapsed: f32,
    animate: bool,
}

impl FrameClock {
    /// Creates a clock at `t = 0`.
    #[must_use]
    pub const fn new(animate: bool) -> Self {
        Self {
            elapsed: 0.0,
            animate,
        }
    }

    /// Advances the clock. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, delta_secs: f32) {
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.elapsed += delta_secs;
        }
    }

    /// Time value for the compositor (`0.0` when animation is off).
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        if self.animate {
            self.elapsed
        } else {
            0.0
        }
    }

    /// Wall-clock seconds accumulated, regardless of animation.
    #[inline]
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Enables or disables jitter animation.
    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    /// Returns whether jitter animation is on.
    #[inline]
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animate
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Fixed-cadence frame gate.
///
/// ```text
/// accumulated += dt
/// if accumulated > interval: render, accumulated %= interval
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    interval: f32,
    accumulated: f32,
}

impl FrameLimiter {
    /// Creates a limiter targeting `fps` frames per second.
    ///
    /// `fps == 0` disables limiting (every tick renders).
    #[must_use]
    pub fn with_fps(fps: u32) -> Self {
        let interval = if fps == 0 { 0.0 } else { 1.0 / fps as f32 };
        Self {
            interval,
            accumulated: 0.0,
        }
    }

    /// Feeds wall-clock delta; returns true when a frame should render.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.accumulated += delta_secs;
        }

        if self.interval <= 0.0 {
            return true;
        }

        if self.accumulated > self.interval {
            self.accumulated %= self.interval;
            true
        } else {
            false
        }
    }

    /// Target interval in seconds.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> f32 {
        self.interval
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self {
            interval: FRAME_INTERVAL_SECS,
            accumulated: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_disabled_reports_zero() {
        let mut clock = FrameClock::new(false);
        clock.advance(1.5);
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.elapsed(), 1.5);

        clock.set_animate(true);
        assert_eq!(clock.time(), 1.5);
    }

    #[test]
    fn test_clock_ignores_bad_deltas() {
        let mut clock = FrameClock::new(true);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_limiter_caps_rate() {
        let mut limiter = FrameLimiter::with_fps(60);

        // ~213 Hz callbacks for one second, about 60 renders
        let rendered = (0..213).filter(|_| limiter.tick(0.0047)).count();
        assert!((55..=60).contains(&rendered), "rendered {rendered}");
    }

    #[test]
    fn test_limiter_keeps_remainder() {
        let mut limiter = FrameLimiter::with_fps(10);
        assert!(!limiter.tick(0.05));
        assert!(limiter.tick(0.06));
        // 0.01 carried over
        assert!(!limiter.tick(0.08));
        assert!(limiter.tick(0.02));
    }

    #[test]
    fn test_limiter_zero_fps_always_renders() {
        let mut limiter = FrameLimiter::with_fps(0);
        assert!(limiter.tick(0.0));
        assert!(limiter.tick(0.001));
    }
}
