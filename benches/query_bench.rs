//! Benchmarks for the locstash query pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use locstash::query::engine::{annotate_distance, rate_breakdown, sort_locs, updated_breakdown};
use locstash::query::{SortBy, SortDir, SortKey};
use locstash::store::{Geo, Loc, Position};
use locstash::DistanceUnit;

fn create_test_locs(count: usize) -> Vec<Loc> {
    (0..count)
        .map(|i| {
            let mut loc = Loc::new(
                format!("place-{i}"),
                (i % 5 + 1) as u8,
                Geo::new(format!("address {i}"), 28.0 + (i % 90) as f64 * 0.1, 34.0, 11),
            );
            loc.id = format!("id{i}");
            loc.created_at = 1_700_000_000_000 + i as i64 * 1000;
            if i % 3 == 0 {
                loc.updated_at = Some(loc.created_at + 86_400_000);
            }
            loc
        })
        .collect()
}

fn bench_distance_annotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate_distance");
    let reference = Some(Position::new(32.0853, 34.7818));

    for size in [100, 1000, 10000] {
        let locs = create_test_locs(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("annotate_{}", size), |b| {
            b.iter(|| {
                let mut locs = locs.clone();
                annotate_distance(black_box(&mut locs), reference, DistanceUnit::Kilometers);
                locs
            })
        });
    }

    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    let locs = create_test_locs(10000);

    for key in [SortKey::Rate, SortKey::Name, SortKey::CreatedAt] {
        group.bench_function(format!("{:?}_10000", key), |b| {
            b.iter(|| {
                let mut locs = locs.clone();
                sort_locs(black_box(&mut locs), SortBy::new(key, SortDir::Desc));
                locs
            })
        });
    }

    group.finish();
}

fn bench_breakdowns(c: &mut Criterion) {
    let mut group = c.benchmark_group("breakdowns");
    let locs = create_test_locs(10000);
    let now = chrono::Utc::now();

    group.bench_function("rate_10000", |b| {
        b.iter(|| rate_breakdown(black_box(&locs)))
    });
    group.bench_function("updated_10000", |b| {
        b.iter(|| updated_breakdown(black_box(&locs), now))
    });

    group.finish();
}

criterion_group!(benches, bench_distance_annotation, bench_sort, bench_breakdowns);
criterion_main!(benches);
