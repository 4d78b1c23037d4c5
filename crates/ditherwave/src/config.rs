//! # Viewer Configuration
//!
//! Initial state loaded once at startup from TOML. Every field has a default,
//! so an empty file (or no file) gives the reference viewer.
//!
//! ```toml
//! [render]
//! width = 320
//! height = 180
//! target_fps = 60
//! frames = 240
//! animate_jitter = true
//! output = "last_frame.png"
//!
//! [dither]
//! preset = "vaporwave"
//! noise_scale = 0.55
//!
//! [audio]
//! spot_initial = 20.0
//! bus_capacity = 64
//! ```
//!
//! `[dither]` is applied in order: preset, then an explicit `palette`, then the
//! individual overrides. The whole section is one publication.

use std::fs;
use std::path::{Path, PathBuf};

use ditherwave_core::{DitherError, DitherResult};
use ditherwave_rendering::Preset;
use ditherwave_shared::{
    Color, DEFAULT_DITHER_OFFSET, DEFAULT_JITTER_FREQUENCY, DEFAULT_JITTER_INTENSITY,
    DEFAULT_JITTER_SPEED,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::DEFAULT_BUS_CAPACITY;
use crate::controls::DitherControls;
use crate::modulation::{
    ModulationDriver, ModulationTarget, AMBIENT_GAIN, AMBIENT_INITIAL, SPOT_COUNT, SPOT_GAIN,
    SPOT_INITIAL,
};

/// Errors from loading or applying a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("config file {}: {source}", path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be produced.
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted field name.
        field: &'static str,
        /// What is wrong.
        reason: String,
    },

    /// The dither section was rejected by the engine.
    #[error(transparent)]
    Dither(#[from] DitherError),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// `[render]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame cap; 0 renders every tick.
    pub target_fps: u32,
    /// Frames to render before the headless viewer exits.
    pub frames: u32,
    /// Drive jitter with elapsed time (false keeps time at 0).
    pub animate_jitter: bool,
    /// Where to save the last frame as PNG.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
            target_fps: 60,
            frames: 240,
            animate_jitter: true,
            output: None,
        }
    }
}

/// `[dither]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DitherConfig {
    /// Preset name applied first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Explicit palette as `#rrggbb` strings, replacing the preset's.
    pub palette: Vec<String>,
    /// Matrix width override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_width: Option<u32>,
    /// Matrix height override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_height: Option<u32>,
    /// Noise scale override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_scale: Option<f32>,
    /// Dither offset.
    pub dither_offset: f32,
    /// Jitter angular speed.
    pub jitter_speed: f32,
    /// Jitter spatial frequency.
    pub jitter_frequency: f32,
    /// Jitter amplitude.
    pub jitter_intensity: f32,
    /// Whether the pass starts enabled.
    pub enabled: bool,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            preset: None,
            palette: Vec::new(),
            matrix_width: None,
            matrix_height: None,
            noise_scale: None,
            dither_offset: DEFAULT_DITHER_OFFSET,
            jitter_speed: DEFAULT_JITTER_SPEED,
            jitter_frequency: DEFAULT_JITTER_FREQUENCY,
            jitter_intensity: DEFAULT_JITTER_INTENSITY,
            enabled: true,
        }
    }
}

/// `[audio]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Ambient light gain.
    pub ambient_gain: f32,
    /// Ambient light starting intensity.
    pub ambient_initial: f32,
    /// Spotlight gain.
    pub spot_gain: f32,
    /// Spotlight starting intensity.
    pub spot_initial: f32,
    /// Number of spotlights.
    pub spot_count: usize,
    /// Pending samples the bus holds before dropping.
    pub bus_capacity: usize,
    /// Seed of the synthetic loudness source.
    pub seed: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ambient_gain: AMBIENT_GAIN,
            ambient_initial: AMBIENT_INITIAL,
            spot_gain: SPOT_GAIN,
            spot_initial: SPOT_INITIAL,
            spot_count: SPOT_COUNT,
            bus_capacity: DEFAULT_BUS_CAPACITY,
            seed: 0x00d1_7e7a,
        }
    }
}

impl AudioConfig {
    /// Builds the modulation driver described by this section.
    #[must_use]
    pub fn driver(&self) -> ModulationDriver {
        ModulationDriver::new(
            ModulationTarget::new(self.ambient_gain, self.ambient_initial),
            vec![ModulationTarget::new(self.spot_gain, self.spot_initial); self.spot_count],
        )
    }
}

/// Complete viewer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Frame size and pacing.
    pub render: RenderConfig,
    /// Initial dither settings.
    pub dither: DitherConfig,
    /// Modulation rig.
    pub audio: AudioConfig,
}

impl ViewerConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns `Io`, `Parse`, `Invalid` or `Dither` errors.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Parse`, `Invalid` or `Dither` errors.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns `Serialize` if a value cannot be represented.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks every value that the engine would reject or that makes the
    /// viewer meaningless.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.render.width == 0 || self.render.height == 0 {
            return Err(invalid("render.width/height", "frame size must be non-zero"));
        }

        if let Some(name) = &self.dither.preset {
            name.parse::<Preset>()?;
        }
        self.palette_colors()?;
        if self.dither.matrix_width == Some(0) || self.dither.matrix_height == Some(0) {
            return Err(DitherError::ZeroMatrixDimension.into());
        }

        let scalars = [
            ("dither.noise_scale", self.dither.noise_scale.unwrap_or(0.0)),
            ("dither.dither_offset", self.dither.dither_offset),
            ("dither.jitter_speed", self.dither.jitter_speed),
            ("dither.jitter_frequency", self.dither.jitter_frequency),
            ("dither.jitter_intensity", self.dither.jitter_intensity),
            ("audio.ambient_gain", self.audio.ambient_gain),
            ("audio.ambient_initial", self.audio.ambient_initial),
            ("audio.spot_gain", self.audio.spot_gain),
            ("audio.spot_initial", self.audio.spot_initial),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                return Err(invalid(field, "must be a finite number"));
            }
        }

        if self.audio.bus_capacity == 0 {
            return Err(invalid("audio.bus_capacity", "must be at least 1"));
        }
        Ok(())
    }

    /// Parsed `[dither] palette`, empty when not set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHexColor` for a malformed entry.
    pub fn palette_colors(&self) -> DitherResult<Vec<Color>> {
        self.dither
            .palette
            .iter()
            .map(|hex| Color::parse_hex(hex).map_err(DitherError::from))
            .collect()
    }

    /// Applies the `[dither]` section as one publication.
    ///
    /// # Errors
    ///
    /// Returns the first engine error; nothing is published in that case.
    pub fn apply_to(&self, controls: &DitherControls) -> ConfigResult<()> {
        let preset = self
            .dither
            .preset
            .as_deref()
            .map(str::parse::<Preset>)
            .transpose()?;
        let palette = self.palette_colors()?;
        let dither = &self.dither;

        controls.edit(|settings| {
            if let Some(preset) = preset {
                settings.apply_preset(preset)?;
            }
            if !palette.is_empty() {
                settings.palette.reset(&palette)?;
            }

            let params = &mut settings.params;
            let width = dither.matrix_width.unwrap_or(params.matrix_width());
            let height = dither.matrix_height.unwrap_or(params.matrix_height());
            params.set_matrix_size(width, height)?;
            if let Some(noise_scale) = dither.noise_scale {
                params.set_noise_scale(noise_scale);
            }
            params.set_dither_offset(dither.dither_offset);
            params.set_jitter(
                dither.jitter_speed,
                dither.jitter_frequency,
                dither.jitter_intensity,
            );

            settings.enabled = dither.enabled;
            Ok(())
        })?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
