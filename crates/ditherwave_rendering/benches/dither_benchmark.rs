//! # Dither Pass Benchmark
//!
//! Budget: a 1080p frame must composite well inside one 60 FPS interval
//! (16.6 ms) on the CPU path.
//!
//! Run with: `cargo bench --package ditherwave_rendering`

// Benchmarks don't need strict docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ditherwave_rendering::{
    threshold, DitherCompositor, DitherSettings, FrameBuffer, PaletteStore, Preset,
};
use ditherwave_shared::{Color, Rgba};

fn gradient_frame(width: u32, height: u32) -> FrameBuffer {
    let mut frame = FrameBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / width as f32;
            let v = y as f32 / height as f32;
            frame.set(x, y, Rgba::new(u, v, 1.0 - u * v, 1.0));
        }
    }
    frame
}

/// Benchmark: threshold lookup for every canonical size plus the fallback.
fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("bayer_threshold");

    for size in [2u32, 3, 4, 8, 5] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0;
                for y in 0..size.max(1) {
                    for x in 0..size.max(1) {
                        sum += threshold(black_box(x), black_box(y), size);
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

/// Benchmark: nearest-color search, worst case is a full palette.
fn bench_nearest_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_color");

    for preset in Preset::ALL {
        let view = PaletteStore::from_colors(&preset.palette())
            .map(|store| store.view())
            .unwrap_or_else(|_| PaletteStore::new().view());
        group.bench_function(preset.key(), |b| {
            let probe = Color::new(0.42, 0.17, 0.83);
            b.iter(|| black_box(view.nearest_index(black_box(probe))));
        });
    }

    group.finish();
}

/// Benchmark: full-frame composite at common resolutions.
fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    group.sample_size(20);

    for (width, height) in [(320u32, 180u32), (1280, 720), (1920, 1080)] {
        let source = gradient_frame(width, height);
        let mut target = FrameBuffer::new(width, height);

        let mut settings = DitherSettings::new();
        let _ = settings.apply_preset(Preset::ZxSpectrum);
        let compositor = DitherCompositor::new(&settings);

        group.throughput(Throughput::Elements(u64::from(width) * u64::from(height)));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(),
            |b, ()| {
                b.iter(|| compositor.composite(&source, black_box(1.25), &mut target));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_threshold, bench_nearest_color, bench_composite);
criterion_main!(benches);
