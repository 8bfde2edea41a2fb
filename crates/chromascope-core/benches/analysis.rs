use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chromascope_core::capture::{CaptureRect, Frame};
use chromascope_core::cloud;
use chromascope_core::histogram;
use chromascope_core::models::HistogramMode;

fn bench_frame(width: u32, height: u32) -> Frame {
    let mut frame = Frame::new(width, height);
    for (i, px) in frame.pixels.iter_mut().enumerate() {
        // Mix of repeated and unique colors
        *px = if i % 3 == 0 {
            0x336699
        } else {
            (i as u32).wrapping_mul(2654435761) & 0xffffff
        };
    }
    frame
}

fn bench_counting(c: &mut Criterion) {
    let frame = bench_frame(640, 360);
    let rect = CaptureRect::full(&frame);

    c.bench_function("count_colors 640x360", |b| {
        b.iter(|| cloud::count_colors(black_box(&frame), black_box(&rect)))
    });
}

fn bench_compaction(c: &mut Criterion) {
    let frame = bench_frame(640, 360);
    let rect = CaptureRect::full(&frame);
    let counter = cloud::count_colors(&frame, &rect);

    c.bench_function("compact_grid 640x360", |b| {
        b.iter(|| cloud::compact_grid(black_box(&counter)))
    });
}

fn bench_histogram(c: &mut Criterion) {
    let frame = bench_frame(640, 360);
    let rect = CaptureRect::full(&frame);

    c.bench_function("histogram rgb 640x360", |b| {
        b.iter(|| histogram::accumulate_histogram(black_box(&frame), &rect, HistogramMode::Rgb))
    });

    c.bench_function("histogram hue 640x360", |b| {
        b.iter(|| histogram::accumulate_histogram(black_box(&frame), &rect, HistogramMode::Hue))
    });
}

criterion_group!(benches, bench_counting, bench_compaction, bench_histogram);
criterion_main!(benches);
