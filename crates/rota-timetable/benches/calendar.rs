//! Benchmarks for the calendar algebra on the subscribe hot path.
//!
//! Every subscribe request performs one three-way collide, one day
//! segmentation and a handful of range edits; these benchmarks track those
//! primitives in isolation.
//!
//! Run with:
//! ```bash
//! cargo bench --bench calendar
//! ```

#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rota_timetable::{WeekCalendar, segment};
use std::hint::black_box;

fn bench_collide(c: &mut Criterion) {
    let location = WeekCalendar::open_week(6, 8);
    let course = WeekCalendar::from_days(vec![0b0011_1100; 6]);
    let profile = WeekCalendar::from_days(vec![0b1110_0111; 6]);

    let mut group = c.benchmark_group("collide");

    group.bench_function(BenchmarkId::new("three_way", "6_days"), |b| {
        b.iter(|| black_box(&location).collide(&[black_box(&course), black_box(&profile)]));
    });

    group.finish();
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");

    for (name, mask) in [
        ("sparse", 0b10110u32),
        ("dense", 0x00FF_FFFFu32),
        ("full", u32::MAX),
    ] {
        group.bench_function(BenchmarkId::new("unit_2", name), |b| {
            b.iter(|| segment(black_box(mask), black_box(2)));
        });
    }

    group.finish();
}

fn bench_range_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_edits");

    group.bench_function("close_then_reopen", |b| {
        b.iter(|| {
            let mut cal = WeekCalendar::open_week(6, 8);
            cal.clear_range(black_box(2), black_box(1), black_box(3));
            cal.set_range(black_box(2), black_box(1), black_box(3));
            cal
        });
    });

    group.finish();
}

criterion_group!(benches, bench_collide, bench_segment, bench_range_edits);
criterion_main!(benches);
