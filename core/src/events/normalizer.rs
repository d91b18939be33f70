use buffscope_types::{BuffEvent, BuffEventKind, RawBuffEvent, Side};
use hashbrown::HashMap;

/// `(ability_id, target_id)`
pub type GroupKey = (i64, i64);

/// Counts of what the normalizer kept and dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub accepted: usize,
    pub missing_target: usize,
    pub unknown_kind: usize,
}

impl NormalizeStats {
    pub fn dropped(&self) -> usize {
        self.missing_target + self.unknown_kind
    }
}

/// Validated events for one side, grouped and time-ordered.
#[derive(Debug, Clone)]
pub struct NormalizedEvents {
    pub side: Side,
    /// Each group is sorted by timestamp; equal timestamps keep input order.
    pub groups: HashMap<GroupKey, Vec<BuffEvent>>,
    pub stats: NormalizeStats,
}

impl NormalizedEvents {
    pub fn group(&self, ability_id: i64, target_id: i64) -> Option<&[BuffEvent]> {
        self.groups.get(&(ability_id, target_id)).map(Vec::as_slice)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Validate and group the raw event list for one side.
///
/// Records without a target or with an unrecognized kind are dropped.
/// Upstream log data is occasionally incomplete, so this is counted, not an error.
/// Duplicates are kept; the interval builder decides what they mean.
pub fn normalize(side: Side, raw: &[RawBuffEvent]) -> NormalizedEvents {
    let mut groups: HashMap<GroupKey, Vec<BuffEvent>> = HashMap::new();
    let mut stats = NormalizeStats::default();

    for record in raw {
        let Some(target_id) = record.target_id else {
            stats.missing_target += 1;
            continue;
        };
        let Some(kind) = BuffEventKind::parse(&record.kind) else {
            stats.unknown_kind += 1;
            continue;
        };

        groups
            .entry((record.ability_id, target_id))
            .or_default()
            .push(BuffEvent {
                timestamp: record.timestamp,
                ability_id: record.ability_id,
                source_id: record.source_id,
                target_id,
                kind,
                side,
            });
        stats.accepted += 1;
    }

    // sort_by_key is stable, so ties keep input order
    for events in groups.values_mut() {
        events.sort_by_key(|e| e.timestamp);
    }

    if stats.dropped() > 0 {
        tracing::debug!(
            side = %side,
            missing_target = stats.missing_target,
            unknown_kind = stats.unknown_kind,
            "Dropped malformed buff events"
        );
    }

    NormalizedEvents {
        side,
        groups,
        stats,
    }
}
