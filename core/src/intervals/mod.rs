//! Interval building
//!
//! Folds each time-ordered `(ability, target)` event group into half-open
//! intervals of "active" status, then assembles them into a [`LookupIndex`].
//!
//! # Per-group state machine
//!
//! ```text
//!              Apply | Refresh
//!   ┌──────────┐ ───────────────▶ ┌────────┐ ◀─┐ Apply | Refresh
//!   │ Inactive │                  │ Active │ ──┘ (no new interval)
//!   └──────────┘ ◀─────────────── └────────┘
//!               Remove | Fade
//!            (close at event time)
//! ```
//!
//! A group still Active after its last event closes at the fight end.
//!
//! [`LookupIndex`]: crate::index::LookupIndex

mod builder;


pub use builder::{
    BuildOptions, OrphanRemovePolicy, build_group_intervals, build_lookup_index,
    build_from_normalized, merge_intervals,
};

use serde::{Deserialize, Serialize};

/// Coarse build phase, reported for progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    /// Accepted by the coordinator, waiting for a worker
    Queued,
    /// Validating and grouping raw events
    Grouping,
    /// Running the per-group state machine
    BuildingIntervals,
    /// Assembling the lookup structure
    Indexing,
}

impl BuildPhase {
    /// Rough completion estimate. Only meant to drive a spinner.
    pub fn percent(&self) -> u8 {
        match self {
            BuildPhase::Queued => 0,
            BuildPhase::Grouping => 10,
            BuildPhase::BuildingIntervals => 40,
            BuildPhase::Indexing => 85,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BuildPhase::Queued => "queued",
            BuildPhase::Grouping => "grouping",
            BuildPhase::BuildingIntervals => "building intervals",
            BuildPhase::Indexing => "indexing",
        }
    }
}
