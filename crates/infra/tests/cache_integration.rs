//! Integration tests for the tiered cache and its facade
//!
//! Drives the public API end to end: LRU ordering, lazy expiry, sweeps,
//! context compaction and the facade lifecycle.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use convointel_common::MockClock;
use convointel_domain::constants::{ANALYSIS_ENTRY_COST_BYTES, CONTEXT_ENTRY_COST_BYTES};
use convointel_domain::{
    CacheSettings, ConversationContext, ConversationTurn, EmotionalPoint, PredictedResponse,
    PredictionBundle, Speaker, TurnAnalysis,
};
use convointel_infra::cache::{CacheTier, TieredCache};
use convointel_infra::{CacheStatus, IntelligenceCache};

fn analysis(id: &str) -> TurnAnalysis {
    TurnAnalysis::new(id, "request")
}

fn context_with_turns(id: &str, turns: usize) -> ConversationContext {
    let mut context = ConversationContext::new(id, "en", "ja");
    context.history = (0..turns)
        .map(|i| {
            let speaker = if i % 2 == 0 { Speaker::User } else { Speaker::Counterpart };
            ConversationTurn::new(format!("turn-{i}"), speaker, "hello", "こんにちは", Utc::now())
        })
        .collect();
    context
}

fn facade(settings: CacheSettings) -> (IntelligenceCache<MockClock>, MockClock) {
    let clock = MockClock::new();
    let cache = IntelligenceCache::with_clock(settings, clock.clone()).expect("valid settings");
    (cache, clock)
}

/// Validates LRU order on a capacity-2 tier.
///
/// Assertions:
/// - Confirms put A, put B, get A, put C evicts B.
#[test]
fn test_capacity_two_evicts_least_recently_used() {
    let (cache, _) = facade(CacheSettings::builder().capacities(2, 2, 2).build());

    cache.cache_analysis("A", analysis("A"));
    cache.cache_analysis("B", analysis("B"));
    assert!(cache.get_cached_analysis("A").is_some());
    cache.cache_analysis("C", analysis("C"));

    assert!(cache.get_cached_analysis("A").is_some());
    assert!(cache.get_cached_analysis("B").is_none());
    assert!(cache.get_cached_analysis("C").is_some());
}

#[test]
fn test_capacity_three_keeps_recently_read_entry() {
    let (cache, _) = facade(CacheSettings::builder().capacities(3, 3, 3).build());

    for key in ["a", "b", "c"] {
        cache.cache_predictions(key, PredictionBundle::new(key, Vec::new()));
    }
    assert!(cache.get_cached_predictions("a").is_some());
    cache.cache_predictions("d", PredictionBundle::new("d", Vec::new()));

    let stats = cache.get_cache_statistics().expect("statistics available");
    assert_eq!(stats.predictions.size, 3);
    assert_eq!(stats.predictions.evictions, 1);
    for key in ["a", "c", "d"] {
        assert!(cache.get_cached_predictions(key).is_some(), "{key} should be resident");
    }
    assert!(cache.get_cached_predictions("b").is_none());
}

/// Validates the capacity invariant under concurrent writers.
///
/// Assertions:
/// - Confirms no tier ever exceeds its capacity.
/// - Confirms every write was counted.
#[test]
fn test_capacity_holds_under_concurrent_puts() {
    let cache = Arc::new(
        TieredCache::new(CacheSettings::builder().capacities(8, 16, 4).build())
            .expect("valid settings"),
    );

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("{worker}-{i}");
                    cache.put_analysis(key.clone(), analysis(&key)).expect("put analysis");
                    cache.put_predictions(key.clone(), PredictionBundle::new(key, Vec::new())).expect("put predictions");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    assert_eq!(cache.len(CacheTier::Analysis).unwrap(), 16);
    assert_eq!(cache.len(CacheTier::Predictions).unwrap(), 4);
    let counts = cache.metrics().counts(CacheTier::Analysis);
    assert_eq!(counts.writes, 400);
    assert_eq!(counts.evictions, 400 - 16);
}

/// Validates lazy expiry with a one hour TTL.
///
/// Assertions:
/// - Confirms a read at +61 minutes misses.
/// - Confirms the entry stays resident until a sweep.
#[test]
fn test_expired_entry_misses_while_resident() {
    let (cache, clock) = facade(CacheSettings::builder().ttl(Duration::from_secs(3600)).build());

    cache.cache_analysis("turn", analysis("turn"));
    clock.advance(Duration::from_secs(61 * 60));

    assert!(cache.get_cached_analysis("turn").is_none());
    let stats = cache.get_cache_statistics().unwrap();
    assert_eq!(stats.analysis.size, 1);
    assert_eq!(stats.analysis.misses, 1);

    let report = cache.run_sweep_now().expect("sweep ran");
    assert_eq!(report.sweep.analysis, 1);
    assert_eq!(cache.get_cache_statistics().unwrap().analysis.size, 0);
}

/// Validates the two hour TTL scenario end to end.
///
/// Assertions:
/// - Confirms a read at 2h1m misses.
/// - Confirms clearing then reading still misses.
/// - Confirms the size is zero after a sweep.
#[test]
fn test_two_hour_ttl_scenario() {
    let (cache, clock) = facade(CacheSettings::default());

    cache.cache_optimized_context("x", context_with_turns("x", 3));
    assert!(cache.get_optimized_context("x").is_some());

    clock.advance(Duration::from_secs(2 * 3600 + 60));
    assert!(cache.get_optimized_context("x").is_none());

    cache.clear_all_caches();
    assert!(cache.get_optimized_context("x").is_none());

    cache.run_sweep_now();
    assert_eq!(cache.get_cache_statistics().unwrap().total_entries(), 0);
}

#[test]
fn test_sweep_removes_exactly_the_expired_entries() {
    let (cache, clock) = facade(CacheSettings::builder().ttl(Duration::from_secs(600)).build());

    cache.cache_analysis("old-1", analysis("old-1"));
    cache.cache_analysis("old-2", analysis("old-2"));
    clock.advance(Duration::from_secs(300));
    cache.cache_analysis("fresh", analysis("fresh"));
    clock.advance(Duration::from_secs(301));

    let report = cache.run_sweep_now().unwrap();

    assert_eq!(report.sweep.total(), 2);
    assert!(report.optimization.is_none());
    assert!(cache.get_cached_analysis("fresh").is_some());
    let stats = cache.get_cache_statistics().unwrap();
    assert_eq!(stats.analysis.size, 1);
    assert_eq!(stats.analysis.expirations, 2);
}

#[test]
fn test_hit_rate_reflects_reads() {
    let (cache, _) = facade(CacheSettings::default());
    assert_eq!(cache.get_cache_statistics().unwrap().context.hit_rate, 0.0);

    cache.cache_analysis("k", analysis("k"));
    for _ in 0..3 {
        cache.get_cached_analysis("k");
    }
    cache.get_cached_analysis("missing");

    let stats = cache.get_cache_statistics().unwrap();
    assert!((stats.analysis.hit_rate - 0.75).abs() < f64::EPSILON);
    assert_eq!(stats.analysis.total_accesses(), 4);
}

/// Validates context compaction through the facade.
///
/// Assertions:
/// - Confirms 25 turns are truncated to the newest 20.
/// - Confirms re-caching the compacted context loses nothing more.
/// - Confirms the emotional trajectory is capped.
#[test]
fn test_context_compaction_is_idempotent() {
    let (cache, _) = facade(CacheSettings::default());

    let mut context = context_with_turns("conv", 25);
    context.emotional_trajectory = (0..30)
        .map(|i| {
            let valence = if i % 2 == 0 { -0.8 } else { 0.8 };
            EmotionalPoint::new(valence, 0.1, Utc::now())
        })
        .collect();

    cache.cache_optimized_context("conv", context);
    let first = cache.get_optimized_context("conv").expect("context cached");
    assert_eq!(first.history.len(), 20);
    assert_eq!(first.history[0].id, "turn-5");
    assert_eq!(first.emotional_trajectory.len(), 10);

    cache.cache_optimized_context("conv", first.clone());
    let second = cache.get_optimized_context("conv").expect("context cached");
    assert_eq!(second.history, first.history);
    assert_eq!(second.emotional_trajectory, first.emotional_trajectory);
}

#[test]
fn test_tiers_are_independent() {
    let (cache, _) = facade(CacheSettings::builder().capacities(1, 1, 1).build());

    cache.cache_optimized_context("same", context_with_turns("same", 1));
    cache.cache_analysis("same", analysis("same"));
    let bundle = PredictionBundle::new(
        "same",
        vec![PredictedResponse { text: "sure".into(), probability: 0.9 }],
    );
    cache.cache_predictions("same", bundle);

    assert!(cache.get_optimized_context("same").is_some());
    assert!(cache.get_cached_analysis("same").is_some());
    let cached = cache.get_cached_predictions("same").unwrap();
    assert_eq!(cached.most_likely().map(|r| r.text.as_str()), Some("sure"));
}

#[test]
fn test_memory_estimate_and_manual_optimization() {
    let (cache, _) = facade(CacheSettings::default());

    cache.cache_optimized_context("c", context_with_turns("c", 4));
    cache.cache_analysis("a", analysis("a"));

    let stats = cache.get_cache_statistics().unwrap();
    assert_eq!(stats.estimated_memory_bytes, CONTEXT_ENTRY_COST_BYTES + ANALYSIS_ENTRY_COST_BYTES);

    let report = cache.optimize_memory_usage().expect("optimization ran");
    assert_eq!(report.marked, 0);
    let again = cache.optimize_memory_usage().expect("optimization ran");
    assert_eq!(again, report);
    assert_eq!(cache.get_cache_statistics().unwrap().optimization_runs, 2);
}

/// Validates manual sweeps against the default memory threshold.
///
/// Assertions:
/// - Confirms a half-full default cache stays under the threshold.
/// - Confirms a full default cache triggers optimization on the next sweep.
#[test]
fn test_full_default_cache_triggers_optimization_on_sweep() {
    let (cache, _) = facade(CacheSettings::default());
    let settings = cache.settings().clone();

    for i in 0..settings.context_capacity / 2 {
        cache.cache_optimized_context(&format!("c{i}"), context_with_turns(&format!("c{i}"), 2));
    }
    let quiet = cache.run_sweep_now().unwrap();
    assert!(quiet.estimated_memory_bytes.unwrap() < settings.memory_threshold_bytes);
    assert!(quiet.optimization.is_none());

    for i in 0..settings.context_capacity {
        cache.cache_optimized_context(&format!("c{i}"), context_with_turns(&format!("c{i}"), 2));
    }
    for i in 0..settings.analysis_capacity {
        cache.cache_analysis(&format!("a{i}"), analysis(&format!("a{i}")));
    }
    for i in 0..settings.predictions_capacity {
        let key = format!("p{i}");
        cache.cache_predictions(&key, PredictionBundle::new(&key, Vec::new()));
    }

    let pressured = cache.run_sweep_now().unwrap();
    assert!(pressured.estimated_memory_bytes.unwrap() > settings.memory_threshold_bytes);
    assert!(pressured.optimization.is_some());
    assert_eq!(cache.get_cache_statistics().unwrap().optimization_runs, 1);
}

/// Validates the facade lifecycle on a paused runtime.
///
/// Assertions:
/// - Confirms initialize moves to Running and the sweep task runs on cadence.
/// - Confirms dispose stops the tasks and clears every tier.
#[tokio::test(start_paused = true)]
async fn test_background_sweep_and_dispose() {
    let settings = CacheSettings::builder()
        .ttl(Duration::from_secs(60))
        .sweep_interval(Duration::from_secs(120))
        .log_interval(Duration::from_secs(30))
        .build();
    let (cache, clock) = facade(settings);

    cache.initialize();
    assert_eq!(cache.status(), CacheStatus::Running);

    cache.cache_analysis("stale", analysis("stale"));
    cache.cache_analysis("kept", analysis("kept"));
    clock.advance(Duration::from_secs(90));
    cache.cache_analysis("fresh", analysis("fresh"));

    tokio::time::sleep(Duration::from_secs(121)).await;

    let stats = cache.get_cache_statistics().unwrap();
    assert_eq!(stats.analysis.size, 1);
    assert_eq!(stats.analysis.expirations, 2);

    cache.dispose().await;
    assert_eq!(cache.status(), CacheStatus::Disposed);
    assert!(cache.get_cache_statistics().is_none());
}
