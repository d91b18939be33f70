use buffscope_types::{BuffEvent, BuffEventKind, FightWindow, Interval, RawBuffEvent, Side};
use hashbrown::HashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::BuildPhase;
use crate::error::BuildError;
use crate::events::{GroupKey, NormalizedEvents, normalize};
use crate::index::LookupIndex;

/// How to read a Remove/Fade that arrives before any Apply in its group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanRemovePolicy {
    /// No-op: the group stays Inactive
    #[default]
    Ignore,
    /// The effect was up when recording began; emit `[fight start, remove)`
    OpenAtFightStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub orphan_removes: OrphanRemovePolicy,
    /// Group count at which per-group folding runs on the rayon pool
    pub parallel_group_threshold: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            orphan_removes: OrphanRemovePolicy::Ignore,
            parallel_group_threshold: 4_096,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum GroupState {
    Inactive,
    Active { since: i64 },
}

/// Fold one time-ordered event group into merged, sorted intervals.
///
/// Zero-length spans are dropped. A group left Active is closed at `window.end`.
pub fn build_group_intervals(
    events: &[BuffEvent],
    window: FightWindow,
    orphan_removes: OrphanRemovePolicy,
) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut state = GroupState::Inactive;

    for (i, event) in events.iter().enumerate() {
        state = match (state, event.kind) {
            (GroupState::Inactive, BuffEventKind::Apply | BuffEventKind::Refresh) => {
                GroupState::Active {
                    since: event.timestamp,
                }
            }
            // Refresh keeps the open span; a repeated Apply is a double-fire, not a restart
            (active @ GroupState::Active { .. }, BuffEventKind::Apply | BuffEventKind::Refresh) => {
                active
            }
            (GroupState::Active { since }, BuffEventKind::Remove | BuffEventKind::Fade) => {
                intervals.extend(Interval::new(since, event.timestamp));
                GroupState::Inactive
            }
            (GroupState::Inactive, BuffEventKind::Remove | BuffEventKind::Fade) => {
                if i == 0 && orphan_removes == OrphanRemovePolicy::OpenAtFightStart {
                    intervals.extend(Interval::new(window.start, event.timestamp));
                }
                GroupState::Inactive
            }
        };
    }

    if let GroupState::Active { since } = state {
        intervals.extend(Interval::new(since, window.end));
    }

    merge_intervals(intervals)
}

/// Sort by start and merge every pair that overlaps or touches.
///
/// `[a,b)` and `[c,d)` with `c <= b` become `[min(a,c), max(b,d))`.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    if intervals.len() < 2 {
        return intervals;
    }
    intervals.sort_unstable_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => {
                last.end = last.end.max(iv.end);
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Build interval lists for every group of an already-normalized event set.
pub fn build_from_normalized(
    normalized: &NormalizedEvents,
    window: FightWindow,
    options: &BuildOptions,
) -> HashMap<i64, HashMap<i64, Vec<Interval>>> {
    let groups: Vec<(&GroupKey, &Vec<BuffEvent>)> = normalized.groups.iter().collect();

    let built: Vec<(GroupKey, Vec<Interval>)> = if groups.len() >= options.parallel_group_threshold
    {
        groups
            .par_iter()
            .map(|(key, events)| {
                (**key, build_group_intervals(events, window, options.orphan_removes))
            })
            .collect()
    } else {
        groups
            .iter()
            .map(|(key, events)| {
                (**key, build_group_intervals(events, window, options.orphan_removes))
            })
            .collect()
    };

    let mut by_ability: HashMap<i64, HashMap<i64, Vec<Interval>>> = HashMap::new();
    for ((ability_id, target_id), intervals) in built {
        if intervals.is_empty() {
            continue;
        }
        by_ability
            .entry(ability_id)
            .or_default()
            .insert(target_id, intervals);
    }
    by_ability
}

/// Full pipeline for one side: normalize, fold, index.
///
/// `progress` is called once per phase, from the calling thread.
pub fn build_lookup_index(
    side: Side,
    raw: &[RawBuffEvent],
    window: FightWindow,
    options: &BuildOptions,
    progress: &dyn Fn(BuildPhase),
) -> Result<LookupIndex, BuildError> {
    if window.end < window.start {
        return Err(BuildError::InvalidWindow {
            start: window.start,
            end: window.end,
        });
    }

    progress(BuildPhase::Grouping);
    let normalized = normalize(side, raw);

    progress(BuildPhase::BuildingIntervals);
    let intervals = build_from_normalized(&normalized, window, options);

    progress(BuildPhase::Indexing);
    let index = LookupIndex::new(side, window, intervals);

    tracing::debug!(
        side = %side,
        events = raw.len(),
        groups = normalized.group_count(),
        intervals = index.interval_count(),
        "Built buff lookup index"
    );
    Ok(index)
}
