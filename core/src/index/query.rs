use buffscope_types::Interval;

use super::LookupIndex;

/// Is `timestamp` inside any interval of a sorted, disjoint list?
///
/// Finds the last interval starting at or before `timestamp` and checks its end.
#[inline]
pub fn contains_point(intervals: &[Interval], timestamp: i64) -> bool {
    let pos = intervals.partition_point(|iv| iv.start <= timestamp);
    pos > 0 && timestamp < intervals[pos - 1].end
}

/// Is `ability_id` active on `target_id` at `timestamp`? O(log n).
pub fn is_active_on_target(
    index: &LookupIndex,
    ability_id: i64,
    target_id: i64,
    timestamp: i64,
) -> bool {
    if !index.fight_window().contains(timestamp) {
        return false;
    }
    contains_point(index.intervals(ability_id, target_id), timestamp)
}

/// Is `ability_id` active on at least one target at `timestamp`?
///
/// Short-circuits on the first carrying target. Absent abilities cost one map lookup.
pub fn is_active_on_any_target(index: &LookupIndex, ability_id: i64, timestamp: i64) -> bool {
    if !index.fight_window().contains(timestamp) {
        return false;
    }
    let Some(targets) = index.targets(ability_id) else {
        return false;
    };
    targets
        .values()
        .any(|intervals| contains_point(intervals, timestamp))
}
