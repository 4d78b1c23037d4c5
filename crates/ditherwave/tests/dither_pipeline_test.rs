//! # Dither Pipeline Verification Tests
//!
//! End-to-end checks across the crates:
//!
//! 1. **Presets**: palettes round-trip, publication is atomic under a reader
//! 2. **Compositor**: reference pixels through the whole render loop
//! 3. **Modulation**: loudness samples through the bus converge the lights
//! 4. **Config**: TOML round trip drives the same settings
//!
//! Run with: cargo test --package ditherwave --test dither_pipeline_test

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use ditherwave::modulation::{AMBIENT_GAIN, SPOT_GAIN};
use ditherwave::rendering::{BayerMatrix, DitherPass, FrameBuffer, Preset};
use ditherwave::scene::FrameSource;
use ditherwave::shared::Rgba;
use ditherwave::{
    AudioBus, DitherControls, LightLevels, ModulationDriver, RenderLoop, RenderLoopConfig,
    ViewerConfig,
};

/// Fills every pixel with one color, ignoring lights.
struct SolidScene {
    width: u32,
    height: u32,
    color: Rgba,
}

impl FrameSource for SolidScene {
    fn render(&mut self, _time: f32, _lights: &LightLevels, target: &mut FrameBuffer) {
        *target = FrameBuffer::filled(self.width, self.height, self.color);
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn mid_gray_loop(controls: &DitherControls) -> RenderLoop<SolidScene> {
    let (_tx, rx) = AudioBus::create_pair(4);
    RenderLoop::new(
        SolidScene {
            width: 8,
            height: 8,
            color: Rgba::new(0.5, 0.5, 0.5, 0.75),
        },
        controls.cell(),
        ModulationDriver::default(),
        rx,
        RenderLoopConfig {
            target_fps: 0,
            animate_jitter: false,
        },
    )
}

// ============================================================================
// PRESETS
// ============================================================================

#[test]
fn verify_vaporwave_palette_hex() {
    let controls = DitherControls::default();
    controls.apply_preset(Preset::Vaporwave).unwrap();

    assert_eq!(
        controls.palette_hex(),
        vec!["#ff71ce", "#01cdfe", "#073444", "#b967ff", "#fffb96"]
    );
    let settings = controls.snapshot();
    assert_eq!(settings.params.matrix_width(), 1);
    assert_eq!(settings.params.matrix_height(), 4);
    assert_eq!(settings.params.noise_scale(), 0.6);
    assert_eq!(settings.params.matrix(), BayerMatrix::Bayer4);
}

#[test]
fn verify_preset_publication_is_atomic() {
    let controls = DitherControls::default();
    let running = Arc::new(AtomicBool::new(true));

    let reader = {
        let cell = controls.cell();
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut observed = 0u64;
            loop {
                let settings = cell.load();
                let shape = (
                    settings.palette.size(),
                    settings.params.matrix_width(),
                    settings.params.matrix_height(),
                );
                assert!(
                    matches!(shape, (2, 8, 8) | (5, 1, 4) | (15, 4, 4)),
                    "torn settings: {shape:?}"
                );
                observed += 1;
                if !running.load(Ordering::Relaxed) {
                    break;
                }
            }
            observed
        })
    };

    for round in 0..2_000 {
        let preset = Preset::ALL[round % Preset::ALL.len()];
        controls.apply_preset(preset).unwrap();
    }
    running.store(false, Ordering::Relaxed);

    let observed = reader.join().unwrap();
    assert!(observed > 0);
    assert_eq!(controls.cell().generation(), 2_000);
}

#[test]
fn verify_unknown_preset_leaves_settings() {
    let controls = DitherControls::default();
    controls.apply_preset(Preset::ZxSpectrum).unwrap();
    let before = controls.snapshot();

    assert!(controls.apply_preset_named("gameboy").is_err());
    assert_eq!(*controls.snapshot(), *before);
}

// ============================================================================
// COMPOSITOR
// ============================================================================

#[test]
fn verify_mid_gray_reference_pixels() {
    let controls = DitherControls::default();
    controls.apply_preset(Preset::BlackAndWhite).unwrap();
    let mut render_loop = mid_gray_loop(&controls);

    let stats = render_loop.tick(0.1).unwrap();
    assert!(stats.dithered);
    assert_eq!(stats.time, 0.0);

    let frame = render_loop.output();
    // (0,0): threshold 0     -> 0.5 + (0 - 0.5) * 0.5     = 0.25   -> black
    let origin = frame.get(0, 0).unwrap();
    assert!(origin.r < 0.01, "expected black, got {origin:?}");
    assert_eq!(origin.a, 0.75);

    // (3,0): threshold 40/64 -> 0.5 + (0.625 - 0.5) * 0.5 = 0.5625 -> white
    let bright = frame.get(3, 0).unwrap();
    assert!(bright.r > 0.99, "expected white, got {bright:?}");
    assert_eq!(bright.a, 0.75);
}

#[test]
fn verify_only_palette_colors_reach_output() {
    let controls = DitherControls::default();
    controls.apply_preset(Preset::Vaporwave).unwrap();
    let mut render_loop = RenderLoop::new(
        ditherwave::GradientScene::new(48, 27),
        controls.cell(),
        ModulationDriver::default(),
        AudioBus::create_pair(4).1,
        RenderLoopConfig::default(),
    );

    for _ in 0..5 {
        render_loop.render_frame();
    }

    let settings = controls.snapshot();
    let active = settings.palette.active();
    for pixel in render_loop.output().pixels() {
        assert!(active.contains(&pixel.rgb()), "{pixel:?} not in palette");
    }
}

#[test]
fn verify_disabled_pass_copies_frames() {
    let controls = DitherControls::default();
    controls.disable();

    let source = FrameBuffer::filled(4, 4, Rgba::new(0.3, 0.6, 0.9, 1.0));
    let mut target = FrameBuffer::new(0, 0);
    let mut pass = DitherPass::new(controls.cell());
    let stats = pass.run(&source, 1.0, &mut target);

    assert_eq!(target, source);
    assert_eq!(stats.passthrough_frames, 1);
    assert_eq!(stats.dithered_frames(), 0);
}

// ============================================================================
// MODULATION
// ============================================================================

#[test]
fn verify_bus_drives_lights_toward_goal() {
    let (tx, rx) = AudioBus::create_pair(64);
    let mut driver = ModulationDriver::reference_rig(0.0);

    let rms = 0.2;
    for _ in 0..24 {
        assert!(tx.send(rms));
    }
    assert_eq!(driver.pump(&rx), 24);

    let lights = driver.levels();
    assert!((lights.ambient - rms * AMBIENT_GAIN).abs() < 1e-4);
    for spot in &lights.spots {
        assert!((spot - rms * SPOT_GAIN).abs() < 1e-3);
    }
}

#[test]
fn verify_full_bus_drops_without_blocking() {
    let (tx, rx) = AudioBus::create_pair(4);
    let producer = thread::spawn(move || {
        let sent = (0..100).filter(|_| tx.send(0.1)).count();
        (sent, tx.dropped())
    });

    let (sent, dropped) = producer.join().unwrap();
    assert_eq!(sent, 4);
    assert_eq!(dropped, 96);
    assert_eq!(rx.pending_count(), 4);
}

// ============================================================================
// CONFIG
// ============================================================================

#[test]
fn verify_config_round_trip_applies_same_settings() {
    let config = ViewerConfig::from_toml_str(
        r##"
        [render]
        width = 96
        height = 54

        [dither]
        preset = "vaporwave"
        palette = ["#ff71ce", "#01cdfe", "#b967ff"]
        noise_scale = 0.45
        jitter_intensity = 0.2

        [audio]
        spot_count = 3
        "##,
    )
    .unwrap();

    let text = config.to_toml_string().unwrap();
    let reparsed = ViewerConfig::from_toml_str(&text).unwrap();
    assert_eq!(reparsed, config);

    let first = DitherControls::default();
    let second = DitherControls::default();
    config.apply_to(&first).unwrap();
    reparsed.apply_to(&second).unwrap();
    assert_eq!(*first.snapshot(), *second.snapshot());

    let settings = first.snapshot();
    assert_eq!(first.palette_hex(), vec!["#ff71ce", "#01cdfe", "#b967ff"]);
    assert_eq!(settings.params.matrix_width(), 1);
    assert_eq!(settings.params.noise_scale(), 0.45);
    assert_eq!(settings.params.jitter_intensity(), 0.2);
    assert_eq!(reparsed.audio.driver().spots().len(), 3);
}

#[test]
fn verify_config_palette_wins_over_preset() {
    let config = ViewerConfig::from_toml_str(
        "[dither]\npreset = \"zx-spectrum\"\npalette = [\"#000000\", \"#ffffff\"]",
    )
    .unwrap();
    let controls = DitherControls::default();
    config.apply_to(&controls).unwrap();

    let settings = controls.snapshot();
    assert_eq!(settings.palette.size(), 2);
    assert_eq!(settings.params.matrix(), BayerMatrix::Bayer4);
    assert_eq!(controls.palette_hex(), vec!["#000000", "#ffffff"]);
}
