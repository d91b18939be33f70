//! Tests for lookup queries
//!
//! Invariants are checked over a pseudo-random event stream (fixed seed) as
//! well as hand-written cases.

use buffscope_types::{FightWindow, Interval, RawBuffEvent, Side};

use super::{CombinedLookup, LookupIndex, contains_point, is_active_on_any_target, is_active_on_target};
use crate::intervals::{BuildOptions, build_lookup_index};

const WINDOW: FightWindow = FightWindow {
    start: 0,
    end: 15_000,
};

fn raw(ts: i64, ability: i64, target: i64, kind: &str) -> RawBuffEvent {
    RawBuffEvent {
        timestamp: ts,
        ability_id: ability,
        source_id: None,
        target_id: Some(target),
        kind: kind.to_string(),
    }
}

fn index_for(side: Side, events: &[RawBuffEvent], window: FightWindow) -> LookupIndex {
    build_lookup_index(side, events, window, &BuildOptions::default(), &|_| {}).unwrap()
}

fn example_index() -> LookupIndex {
    index_for(
        Side::Friendly,
        &[
            raw(0, 5, 1, "applybuff"),
            raw(5_000, 5, 1, "refreshbuff"),
            raw(12_000, 5, 1, "removebuff"),
            raw(3_000, 5, 2, "applybuff"),
        ],
        WINDOW,
    )
}

/// Small deterministic LCG so the stream is reproducible without extra crates
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn noisy_events(seed: u64, count: usize) -> Vec<RawBuffEvent> {
    const KINDS: [&str; 5] = ["applybuff", "refreshbuff", "removebuff", "fade", "applybuff"];
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            raw(
                rng.next(WINDOW.end as u64 + 1) as i64,
                rng.next(6) as i64,
                rng.next(8) as i64,
                KINDS[rng.next(KINDS.len() as u64) as usize],
            )
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Example scenario
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_example_scenario_queries() {
    let index = example_index();

    assert!(is_active_on_target(&index, 5, 1, 6_000));
    assert!(!is_active_on_target(&index, 5, 1, 13_000));
    assert!(is_active_on_any_target(&index, 5, 14_000));
    assert!(!is_active_on_any_target(&index, 5, 15_000));
    assert!(is_active_on_target(&index, 5, 2, 3_000));
    assert!(!is_active_on_target(&index, 5, 2, 2_999));
}

#[test]
fn test_outside_fight_window_is_false() {
    let index = index_for(
        Side::Hostile,
        &[raw(1_000, 9, 1, "applybuff"), raw(9_000, 9, 1, "removebuff")],
        FightWindow::new(1_000, 10_000),
    );
    assert!(index.is_active_on_target(9, 1, 1_000));
    assert!(!index.is_active_on_target(9, 1, 999));
    assert!(!index.is_active_on_target(9, 1, 10_001));
    assert!(!index.is_active_on_any_target(9, -5));
    assert!(!index.is_active_on_any_target(9, 20_000));
}

#[test]
fn test_absent_ability_and_target() {
    let index = example_index();
    assert!(!index.is_active_on_target(42, 1, 6_000));
    assert!(!index.is_active_on_any_target(42, 6_000));
    assert!(!index.is_active_on_target(5, 77, 6_000));
    assert!(index.intervals(42, 1).is_empty());
    assert!(index.any_target_intervals(42).is_empty());
}

#[test]
fn test_contains_point_edges() {
    let intervals = [
        Interval { start: 10, end: 20 },
        Interval { start: 30, end: 40 },
    ];
    assert!(!contains_point(&intervals, 9));
    assert!(contains_point(&intervals, 10));
    assert!(contains_point(&intervals, 19));
    assert!(!contains_point(&intervals, 20));
    assert!(!contains_point(&intervals, 25));
    assert!(contains_point(&intervals, 30));
    assert!(!contains_point(&intervals, 40));
    assert!(!contains_point(&[], 0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Invariants over a noisy stream
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_containment_invariant() {
    for seed in 1..=8 {
        let index = index_for(Side::Friendly, &noisy_events(seed, 400), WINDOW);
        for ability in index.abilities() {
            for (&target, intervals) in index.targets(ability).unwrap() {
                for iv in intervals {
                    assert!(index.is_active_on_target(ability, target, iv.start));
                    assert!(index.is_active_on_target(ability, target, iv.end - 1));
                    assert!(!index.is_active_on_target(ability, target, iv.end));
                }
            }
        }
    }
}

#[test]
fn test_non_overlap_invariant() {
    for seed in 1..=8 {
        let index = index_for(Side::Friendly, &noisy_events(seed, 400), WINDOW);
        for ability in index.abilities() {
            for intervals in index.targets(ability).unwrap().values() {
                assert!(!intervals.is_empty());
                for iv in intervals {
                    assert!(iv.end > iv.start);
                }
                for pair in intervals.windows(2) {
                    assert!(pair[0].end < pair[1].start, "{:?} / {:?}", pair[0], pair[1]);
                }
            }
            for pair in index.any_target_intervals(ability).windows(2) {
                assert!(pair[0].end < pair[1].start);
            }
        }
    }
}

#[test]
fn test_any_target_is_union_of_targets() {
    let index = index_for(Side::Debuff, &noisy_events(99, 600), WINDOW);
    for ability in 0..7 {
        for ts in (-100..=WINDOW.end + 100).step_by(37) {
            let expected = index
                .targets(ability)
                .map(|targets| {
                    targets
                        .keys()
                        .any(|&target| index.is_active_on_target(ability, target, ts))
                })
                .unwrap_or(false);
            assert_eq!(index.is_active_on_any_target(ability, ts), expected, "a={ability} ts={ts}");

            // The precomputed union view agrees with the per-target OR
            let in_window = WINDOW.contains(ts);
            assert_eq!(
                in_window && contains_point(index.any_target_intervals(ability), ts),
                expected
            );
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived queries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_active_targets() {
    let index = example_index();
    let mut at_6s: Vec<i64> = index.active_targets(5, 6_000).collect();
    at_6s.sort_unstable();
    assert_eq!(at_6s, vec![1, 2]);
    assert_eq!(index.active_targets(5, 13_000).collect::<Vec<_>>(), vec![2]);
    assert_eq!(index.active_targets(5, 20_000).count(), 0);
    assert_eq!(index.active_targets(8, 6_000).count(), 0);
}

#[test]
fn test_uptime() {
    let index = example_index();
    assert_eq!(index.uptime_on_target(5, 1), 12_000);
    assert_eq!(index.uptime_on_target(5, 2), 12_000);
    // Union of [0,12000) and [3000,15000)
    assert_eq!(index.uptime_any_target(5), 15_000);
    assert!((index.uptime_fraction(5) - 1.0).abs() < f64::EPSILON);
    assert_eq!(index.uptime_fraction(8), 0.0);

    let empty_window = index_for(Side::Friendly, &[], FightWindow::new(100, 100));
    assert_eq!(empty_window.uptime_fraction(5), 0.0);
}

#[test]
fn test_uptime_is_clipped_to_fight_window() {
    let window = FightWindow::new(0, 10_000);
    let index = index_for(
        Side::Friendly,
        &[
            // Applied before the pull, never removed
            raw(-5_000, 5, 1, "applybuff"),
            // Removed well after the fight ended
            raw(2_000, 6, 1, "applybuff"),
            raw(20_000, 6, 1, "removebuff"),
        ],
        window,
    );

    assert_eq!(index.intervals(5, 1), &[Interval { start: -5_000, end: 10_000 }]);
    assert!(!index.is_active_on_target(5, 1, -1_000));

    assert_eq!(index.uptime_on_target(5, 1), 10_000);
    assert_eq!(index.uptime_any_target(5), 10_000);
    assert!((index.uptime_fraction(5) - 1.0).abs() < f64::EPSILON);

    assert_eq!(index.uptime_on_target(6, 1), 8_000);
    assert_eq!(index.uptime_any_target(6), 8_000);
    assert!((index.uptime_fraction(6) - 0.8).abs() < 1e-9);
}

#[test]
fn test_summary_counts() {
    let summary = example_index().summary();
    assert_eq!(summary.side, Side::Friendly);
    assert_eq!(summary.fight_window, WINDOW);
    assert_eq!(summary.abilities, 1);
    assert_eq!(summary.carriers, 2);
    assert_eq!(summary.intervals, 2);
}

#[test]
fn test_combined_lookup_ors_sides() {
    let friendly = index_for(
        Side::Friendly,
        &[raw(0, 5, 1, "applybuff"), raw(4_000, 5, 1, "removebuff")],
        WINDOW,
    );
    let hostile = index_for(
        Side::Hostile,
        &[raw(6_000, 5, 1, "applybuff"), raw(8_000, 5, 1, "removebuff")],
        WINDOW,
    );
    let sides = [&friendly, &hostile];
    let combined = CombinedLookup::new(&sides);

    assert!(combined.is_active_on_target(5, 1, 1_000));
    assert!(combined.is_active_on_target(5, 1, 7_000));
    assert!(!combined.is_active_on_target(5, 1, 5_000));
    assert!(combined.is_active_on_any_target(5, 7_999));
    assert!(!combined.is_active_on_any_target(5, 8_000));
    assert!(!combined.is_active_on_any_target(6, 1_000));

    // Each side stays independent
    assert!(!friendly.is_active_on_target(5, 1, 7_000));
    assert!(!hostile.is_active_on_target(5, 1, 1_000));
}
