//! Input and output contract of the index worker.
//!
//! The caller writes one [`FightEvents`] JSON file per fight and side; the
//! worker answers with one [`IndexWorkerOutput`] line on stdout.

use buffscope_core::formatting::{format_duration_ms, format_uptime};
use buffscope_core::{FightWindow, IndexSummary, LookupIndex, RawBuffEvent, Side, TaskKey};
use serde::{Deserialize, Serialize};

/// Already-fetched events for one side of one fight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightEvents {
    pub fight_id: i64,
    pub side: Side,
    pub window: FightWindow,
    pub events: Vec<RawBuffEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityUptime {
    pub ability_id: i64,
    /// Targets that carried the ability at some point
    pub targets: usize,
    pub uptime_ms: i64,
    /// Display string, e.g. `"1:15.0"`
    pub uptime: String,
    /// Display string, e.g. `"62.5%"`
    pub uptime_pct: String,
}

impl AbilityUptime {
    pub fn from_index(index: &LookupIndex, ability_id: i64) -> Self {
        let uptime_ms = index.uptime_any_target(ability_id);
        Self {
            ability_id,
            targets: index.targets(ability_id).map_or(0, |t| t.len()),
            uptime_ms,
            uptime: format_duration_ms(uptime_ms),
            uptime_pct: format_uptime(index.uptime_fraction(ability_id)),
        }
    }
}

/// Output from the index worker subprocess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexWorkerOutput {
    pub task_key: TaskKey,
    pub summary: IndexSummary,
    /// Sorted by descending uptime, then ability id
    pub abilities: Vec<AbilityUptime>,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u128,
}

impl IndexWorkerOutput {
    pub fn new(task_key: TaskKey, index: &LookupIndex) -> Self {
        let mut abilities: Vec<AbilityUptime> = index
            .abilities()
            .map(|ability_id| AbilityUptime::from_index(index, ability_id))
            .collect();
        abilities.sort_by(|a, b| {
            b.uptime_ms
                .cmp(&a.uptime_ms)
                .then(a.ability_id.cmp(&b.ability_id))
        });

        Self {
            task_key,
            summary: index.summary(),
            abilities,
            elapsed_ms: 0,
        }
    }
}
