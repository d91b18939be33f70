use buffscope_types::{FightWindow, Interval, Side};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::intervals::merge_intervals;

/// Immutable ability → target → intervals index for one side of one fight.
#[derive(Debug, Clone)]
pub struct LookupIndex {
    side: Side,
    fight_window: FightWindow,
    /// Per-target lists are sorted by start and pairwise disjoint (never touching)
    by_ability: HashMap<i64, HashMap<i64, Vec<Interval>>>,
    /// Union across targets, per ability
    any_target: HashMap<i64, Vec<Interval>>,
}

/// Size figures for logging and worker output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub side: Side,
    pub fight_window: FightWindow,
    pub abilities: usize,
    /// Distinct (ability, target) pairs with at least one interval
    pub carriers: usize,
    pub intervals: usize,
}

impl LookupIndex {
    /// Takes per-target lists as produced by the interval builder.
    pub(crate) fn new(
        side: Side,
        fight_window: FightWindow,
        by_ability: HashMap<i64, HashMap<i64, Vec<Interval>>>,
    ) -> Self {
        let any_target = by_ability
            .iter()
            .map(|(&ability_id, targets)| {
                let all: Vec<Interval> = targets.values().flatten().copied().collect();
                (ability_id, merge_intervals(all))
            })
            .collect();

        Self {
            side,
            fight_window,
            by_ability,
            any_target,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn fight_window(&self) -> FightWindow {
        self.fight_window
    }

    pub fn is_empty(&self) -> bool {
        self.by_ability.is_empty()
    }

    /// Ability ids present in the index, in no particular order
    pub fn abilities(&self) -> impl Iterator<Item = i64> + '_ {
        self.by_ability.keys().copied()
    }

    /// Targets that carried `ability_id` at some point, or `None` if it never appeared
    pub fn targets(&self, ability_id: i64) -> Option<&HashMap<i64, Vec<Interval>>> {
        self.by_ability.get(&ability_id)
    }

    /// Intervals for one ability on one target. Empty when absent; never allocates.
    pub fn intervals(&self, ability_id: i64, target_id: i64) -> &[Interval] {
        self.by_ability
            .get(&ability_id)
            .and_then(|targets| targets.get(&target_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Merged union of every target's intervals for `ability_id`
    pub fn any_target_intervals(&self, ability_id: i64) -> &[Interval] {
        self.any_target
            .get(&ability_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn interval_count(&self) -> usize {
        self.by_ability
            .values()
            .flat_map(|targets| targets.values())
            .map(Vec::len)
            .sum()
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            side: self.side,
            fight_window: self.fight_window,
            abilities: self.by_ability.len(),
            carriers: self.by_ability.values().map(HashMap::len).sum(),
            intervals: self.interval_count(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────────

    pub fn is_active_on_target(&self, ability_id: i64, target_id: i64, timestamp: i64) -> bool {
        super::is_active_on_target(self, ability_id, target_id, timestamp)
    }

    pub fn is_active_on_any_target(&self, ability_id: i64, timestamp: i64) -> bool {
        super::is_active_on_any_target(self, ability_id, timestamp)
    }

    /// Targets carrying `ability_id` at `timestamp`
    pub fn active_targets(&self, ability_id: i64, timestamp: i64) -> impl Iterator<Item = i64> + '_ {
        let in_window = self.fight_window.contains(timestamp);
        self.by_ability
            .get(&ability_id)
            .into_iter()
            .flat_map(|targets| targets.iter())
            .filter(move |(_, intervals)| in_window && super::contains_point(intervals, timestamp))
            .map(|(&target_id, _)| target_id)
    }

    /// Total active milliseconds of `ability_id` on `target_id`
    pub fn uptime_on_target(&self, ability_id: i64, target_id: i64) -> i64 {
        clipped_uptime(self.intervals(ability_id, target_id), self.fight_window)
    }

    /// Total milliseconds during which at least one target carried `ability_id`
    pub fn uptime_any_target(&self, ability_id: i64) -> i64 {
        clipped_uptime(self.any_target_intervals(ability_id), self.fight_window)
    }

    /// Share of the fight with `ability_id` active on any target, 0.0 for an empty window
    pub fn uptime_fraction(&self, ability_id: i64) -> f64 {
        let duration = self.fight_window.duration();
        if duration == 0 {
            return 0.0;
        }
        self.uptime_any_target(ability_id) as f64 / duration as f64
    }
}

/// Active milliseconds inside `[window.start, window.end)`. Intervals may
/// start before the fight or end after it.
fn clipped_uptime(intervals: &[Interval], window: FightWindow) -> i64 {
    intervals
        .iter()
        .map(|iv| (iv.end.min(window.end) - iv.start.max(window.start)).max(0))
        .sum()
}
