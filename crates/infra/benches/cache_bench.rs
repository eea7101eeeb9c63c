//! Tiered cache benchmarks
//!
//! Benchmarks for the foreground get/put path, context compaction and the
//! expiry sweep.
//!
//! Run with: `cargo bench --bench cache_bench -p convointel-infra`

use std::time::Duration;

use chrono::Utc;
use convointel_common::MockClock;
use convointel_domain::{
    CacheSettings, ConversationContext, ConversationTurn, EmotionalPoint, Speaker, TurnAnalysis,
};
use convointel_infra::cache::TieredCache;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn context(turns: usize, points: usize) -> ConversationContext {
    let mut context = ConversationContext::new("bench", "en", "de");
    context.history = (0..turns)
        .map(|i| ConversationTurn::new(format!("t{i}"), Speaker::User, "how are you", "wie geht's", Utc::now()))
        .collect();
    context.emotional_trajectory = (0..points)
        .map(|i| EmotionalPoint::new((i as f64 * 0.37).sin(), (i as f64 * 0.11).cos(), Utc::now()))
        .collect();
    context
}

// ============================================================================
// Foreground Operations
// ============================================================================

fn bench_analysis_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_put");

    for capacity in [50, 200, 1000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("lru", capacity), &capacity, |b, &capacity| {
            let settings = CacheSettings::builder().analysis_capacity(capacity).build();
            let cache = TieredCache::new(settings).unwrap();
            let mut counter = 0u64;
            b.iter(|| {
                let key = format!("turn_{}", counter);
                cache.put_analysis(black_box(key.clone()), TurnAnalysis::new(key, "ask")).unwrap();
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_analysis_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_get_hit");

    for capacity in [50, 200, 1000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("lru", capacity), &capacity, |b, &capacity| {
            let settings = CacheSettings::builder().analysis_capacity(capacity).build();
            let cache = TieredCache::new(settings).unwrap();
            let keys: Vec<String> = (0..capacity).map(|i| format!("turn_{}", i)).collect();
            for key in &keys {
                cache.put_analysis(key.clone(), TurnAnalysis::new(key.clone(), "ask")).unwrap();
            }
            let mut counter = 0usize;
            b.iter(|| {
                let key = &keys[counter % capacity];
                let _ = black_box(cache.get_analysis(black_box(key)));
                counter = counter.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_context_put_with_compaction(c: &mut Criterion) {
    let cache = TieredCache::new(CacheSettings::default()).unwrap();
    let oversized = context(60, 40);

    c.bench_function("context_put_compacting", |b| {
        b.iter(|| cache.put_context("conv", black_box(oversized.clone())).unwrap());
    });
}

// ============================================================================
// Maintenance
// ============================================================================

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_expired");

    for size in [200, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("all_expired", size), &size, |b, &size| {
            let clock = MockClock::new();
            let settings = CacheSettings::builder()
                .analysis_capacity(size)
                .ttl(Duration::from_secs(60))
                .build();
            let cache = TieredCache::with_clock(settings, clock.clone()).unwrap();
            b.iter(|| {
                clock.set_elapsed(Duration::ZERO);
                for i in 0..size {
                    cache.put_analysis(format!("turn_{}", i), TurnAnalysis::new("t", "ask")).unwrap();
                }
                clock.advance(Duration::from_secs(61));
                black_box(cache.sweep_expired())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_analysis_put,
    bench_analysis_get_hit,
    bench_context_put_with_compaction,
    bench_sweep
);
criterion_main!(benches);
