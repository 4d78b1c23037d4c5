//! # DITHERWAVE Headless Viewer
//!
//! Renders the procedural scene through the dither pass, driven by a
//! synthetic loudness source on its own thread, and optionally saves the last
//! frame as PNG.
//!
//! ```bash
//! ditherwave                          # defaults
//! ditherwave ditherwave.toml          # config file
//! ditherwave ditherwave.toml --out frame.png --frames 600
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ditherwave::rendering::{DitherSettings, FrameBuffer};
use ditherwave::{
    AudioBus, DitherControls, GradientScene, RenderLoop, RenderLoopConfig, RmsSender, ViewerConfig,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Analysis frames per second of the synthetic source (512-sample buffers at 44.1 kHz).
const ANALYSIS_RATE_HZ: u64 = 86;

/// Every Nth analysis frame is a kick.
const KICK_EVERY: u64 = 22;

struct Args {
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    frames: Option<u32>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        output: None,
        frames: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                let path = iter.next().ok_or("--out needs a path")?;
                args.output = Some(PathBuf::from(path));
            }
            "--frames" | "-n" => {
                let count = iter.next().ok_or("--frames needs a number")?;
                let count = count
                    .parse()
                    .map_err(|_| format!("--frames: not a number: {count}"))?;
                args.frames = Some(count);
            }
            other if other.starts_with('-') => return Err(format!("unknown flag {other}")),
            other => args.config = Some(PathBuf::from(other)),
        }
    }
    Ok(args)
}

fn spawn_audio_source(
    sender: RmsSender,
    seed: u64,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let period = Duration::from_micros(1_000_000 / ANALYSIS_RATE_HZ);
        let mut frame = 0u64;

        while running.load(Ordering::Relaxed) {
            let floor = 0.02 + 0.06 * rng.gen::<f32>();
            let rms = if frame % KICK_EVERY == 0 {
                floor + 0.25 + 0.1 * rng.gen::<f32>()
            } else {
                floor
            };
            sender.send(rms);
            frame += 1;
            thread::sleep(period);
        }
    })
}

fn save_png(frame: &FrameBuffer, path: &Path) -> Result<(), String> {
    let image = image::RgbaImage::from_raw(frame.width(), frame.height(), frame.to_rgba8())
        .ok_or("frame buffer size mismatch")?;
    image
        .save(path)
        .map_err(|err| format!("failed to write {}: {err}", path.display()))
}

fn run(args: Args) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path).map_err(|e| e.to_string())?,
        None => ViewerConfig::default(),
    };
    if let Some(frames) = args.frames {
        config.render.frames = frames;
    }
    if args.output.is_some() {
        config.render.output.clone_from(&args.output);
    }

    let controls = DitherControls::new(DitherSettings::new());
    config.apply_to(&controls).map_err(|e| e.to_string())?;

    let settings = controls.snapshot();
    println!("  Frame:    {}x{}", config.render.width, config.render.height);
    println!(
        "  Matrix:   {}x{} ({:?})",
        settings.params.matrix_width(),
        settings.params.matrix_height(),
        settings.params.matrix()
    );
    println!("  Palette:  {}", controls.palette_hex().join(" "));
    println!("  Noise:    {}", settings.params.noise_scale());
    println!("  Pass:     {}", if settings.enabled { "ENABLED" } else { "DISABLED" });
    println!();

    let bus = AudioBus::new(config.audio.bus_capacity);
    let sender = bus.sender();
    let running = Arc::new(AtomicBool::new(true));
    let audio_thread = spawn_audio_source(bus.sender(), config.audio.seed, Arc::clone(&running));

    let mut render_loop = RenderLoop::new(
        GradientScene::new(config.render.width, config.render.height),
        controls.cell(),
        config.audio.driver(),
        bus.receiver(),
        RenderLoopConfig {
            target_fps: config.render.target_fps,
            animate_jitter: config.render.animate_jitter,
        },
    );

    println!("▶ Rendering {} frames ...", config.render.frames);
    let mut last = Instant::now();
    while render_loop.frame_count() < u64::from(config.render.frames) {
        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32();
        last = now;

        if render_loop.tick(delta).is_none() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    running.store(false, Ordering::Relaxed);
    if audio_thread.join().is_err() {
        eprintln!("   ✗ audio thread panicked");
    }

    let lights = render_loop.lights();
    println!("   ✓ Done");
    println!();
    render_loop.stats().print_summary();
    println!();
    println!(
        "  Lights:   ambient {:.2}, spots {:.2} (dropped samples: {})",
        lights.ambient,
        lights.mean_spot(),
        sender.dropped()
    );

    if let Some(path) = &config.render.output {
        save_png(render_loop.output(), path)?;
        println!("  Saved:    {}", path.display());
    }
    Ok(())
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    DITHERWAVE VIEWER v0.1.0");
    println!("                         HEADLESS MODE");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let result = parse_args().and_then(run);
    if let Err(err) = result {
        eprintln!("   ✗ FATAL: {err}");
        std::process::exit(1);
    }
}
