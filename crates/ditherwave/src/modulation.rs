//! # Modulation Driver
//!
//! Maps loudness samples onto scene light intensities.
//!
//! Every accepted sample moves each target halfway toward `rms * gain`:
//!
//! ```text
//! value = lerp(value, rms * gain, 0.5)
//! ```
//!
//! A constant input therefore converges geometrically: after `n` identical
//! samples the distance to `rms * gain` is at most `0.5^n` of the initial one.
//! With no samples, nothing changes.

use ditherwave_shared::lerp;
use tracing::warn;

use crate::audio::RmsReceiver;

/// Fraction of the distance to the target covered per sample.
pub const SMOOTHING: f32 = 0.5;

/// Gain applied to the ambient light.
pub const AMBIENT_GAIN: f32 = 7.0;

/// Ambient light intensity before the first sample.
pub const AMBIENT_INITIAL: f32 = 2.0;

/// Gain applied to each spotlight.
pub const SPOT_GAIN: f32 = 90.0;

/// Spotlight intensity before the first sample.
pub const SPOT_INITIAL: f32 = 20.0;

/// Spotlights in the reference rig.
pub const SPOT_COUNT: usize = 7;

/// One smoothed, loudness-driven value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationTarget {
    gain: f32,
    value: f32,
}

impl ModulationTarget {
    /// Creates a target with its gain and starting value.
    #[must_use]
    pub const fn new(gain: f32, initial: f32) -> Self {
        Self {
            gain,
            value: initial,
        }
    }

    /// Applies one loudness sample.
    #[inline]
    pub fn apply(&mut self, rms: f32) {
        self.value = lerp(self.value, rms * self.gain, SMOOTHING);
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Gain.
    #[inline]
    #[must_use]
    pub const fn gain(&self) -> f32 {
        self.gain
    }
}

/// Light intensities read by the frame source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LightLevels {
    /// Ambient light intensity.
    pub ambient: f32,
    /// One intensity per spotlight.
    pub spots: Vec<f32>,
}

impl LightLevels {
    /// Mean spotlight intensity, 0 with no spotlights.
    #[must_use]
    pub fn mean_spot(&self) -> f32 {
        if self.spots.is_empty() {
            0.0
        } else {
            self.spots.iter().sum::<f32>() / self.spots.len() as f32
        }
    }
}

/// Owns the ambient and spotlight targets and feeds them samples.
#[derive(Debug, Clone)]
pub struct ModulationDriver {
    ambient: ModulationTarget,
    spots: Vec<ModulationTarget>,
    applied: u64,
    rejected: u64,
}

impl Default for ModulationDriver {
    fn default() -> Self {
        Self::reference_rig(SPOT_INITIAL)
    }
}

impl ModulationDriver {
    /// Creates a driver over explicit targets.
    #[must_use]
    pub fn new(ambient: ModulationTarget, spots: Vec<ModulationTarget>) -> Self {
        Self {
            ambient,
            spots,
            applied: 0,
            rejected: 0,
        }
    }

    /// The scene's default rig: one ambient light and seven spotlights.
    #[must_use]
    pub fn reference_rig(spot_initial: f32) -> Self {
        Self::new(
            ModulationTarget::new(AMBIENT_GAIN, AMBIENT_INITIAL),
            vec![ModulationTarget::new(SPOT_GAIN, spot_initial); SPOT_COUNT],
        )
    }

    /// Applies one sample to every target.
    ///
    /// Negative or non-finite samples are dropped and return false.
    pub fn on_sample(&mut self, rms: f32) -> bool {
        if !rms.is_finite() || rms < 0.0 {
            self.rejected += 1;
            warn!(rms, "dropping invalid loudness sample");
            return false;
        }

        self.ambient.apply(rms);
        for spot in &mut self.spots {
            spot.apply(rms);
        }
        self.applied += 1;
        true
    }

    /// Applies every pending sample on `receiver`, each exactly once.
    ///
    /// Returns how many were applied.
    pub fn pump(&mut self, receiver: &RmsReceiver) -> usize {
        let mut applied = 0;
        while let Some(rms) = receiver.try_recv() {
            if self.on_sample(rms) {
                applied += 1;
            }
        }
        applied
    }

    /// Current light intensities.
    #[must_use]
    pub fn levels(&self) -> LightLevels {
        LightLevels {
            ambient: self.ambient.value(),
            spots: self.spots.iter().map(ModulationTarget::value).collect(),
        }
    }

    /// Ambient target.
    #[must_use]
    pub const fn ambient(&self) -> &ModulationTarget {
        &self.ambient
    }

    /// Spotlight targets.
    #[must_use]
    pub fn spots(&self) -> &[ModulationTarget] {
        &self.spots
    }

    /// Samples applied so far.
    #[must_use]
    pub const fn samples_applied(&self) -> u64 {
        self.applied
    }

    /// Samples rejected so far.
    #[must_use]
    pub const fn samples_rejected(&self) -> u64 {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioBus;

    #[test]
    fn test_single_sample() {
        let mut target = ModulationTarget::new(7.0, 2.0);
        target.apply(1.0);
        assert_eq!(target.value(), 4.5);
    }

    #[test]
    fn test_geometric_convergence() {
        let rms = 0.3;
        let mut driver = ModulationDriver::reference_rig(0.0);
        let ambient_goal = rms * AMBIENT_GAIN;
        let spot_goal = rms * SPOT_GAIN;
        let ambient_start = (driver.ambient().value() - ambient_goal).abs();
        let spot_start = (driver.spots()[0].value() - spot_goal).abs();

        for n in 1..=20 {
            driver.on_sample(rms);
            let bound = 0.5_f32.powi(n);
            let ambient_err = (driver.ambient().value() - ambient_goal).abs();
            let spot_err = (driver.spots()[0].value() - spot_goal).abs();
            assert!(ambient_err <= ambient_start * bound + 1e-5, "ambient step {n}");
            assert!(spot_err <= spot_start * bound + 1e-4, "spot step {n}");
        }
    }

    #[test]
    fn test_no_samples_no_change() {
        let (_tx, rx) = AudioBus::create_pair(4);
        let mut driver = ModulationDriver::default();
        let before = driver.levels();

        assert_eq!(driver.pump(&rx), 0);
        assert_eq!(driver.levels(), before);
        assert_eq!(before.ambient, AMBIENT_INITIAL);
        assert_eq!(before.spots.len(), SPOT_COUNT);
    }

    #[test]
    fn test_invalid_samples_are_dropped() {
        let mut driver = ModulationDriver::default();
        let before = driver.levels();

        assert!(!driver.on_sample(-0.1));
        assert!(!driver.on_sample(f32::NAN));
        assert!(!driver.on_sample(f32::INFINITY));
        assert_eq!(driver.levels(), before);
        assert_eq!(driver.samples_rejected(), 3);
    }

    #[test]
    fn test_pump_applies_each_sample_once() {
        let (tx, rx) = AudioBus::create_pair(16);
        for _ in 0..3 {
            tx.send(1.0);
        }
        tx.send(-1.0);

        let mut driver = ModulationDriver::new(ModulationTarget::new(8.0, 0.0), Vec::new());
        assert_eq!(driver.pump(&rx), 3);
        // 0 -> 4 -> 6 -> 7
        assert_eq!(driver.ambient().value(), 7.0);
        assert_eq!(driver.samples_applied(), 3);
        assert_eq!(driver.pump(&rx), 0);
    }

    #[test]
    fn test_mean_spot() {
        let levels = LightLevels {
            ambient: 1.0,
            spots: vec![2.0, 4.0],
        };
        assert_eq!(levels.mean_spot(), 3.0);
        assert_eq!(LightLevels::default().mean_spot(), 0.0);
    }
}
