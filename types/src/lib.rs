//! Shared value types for buff interval indexing.
//!
//! These are the plain data records passed between the event source, the
//! index builder and the index worker. Everything here is `Serialize` so it
//! can cross a process boundary unchanged.

pub mod formatting;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Side
// ─────────────────────────────────────────────────────────────────────────────

/// Effect namespace. The same ability id can exist independently in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Buffs carried by friendly units
    Friendly,
    /// Buffs carried by hostile units
    Hostile,
    /// Debuffs, regardless of who carries them
    Debuff,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Friendly => "friendly",
            Side::Hostile => "hostile",
            Side::Debuff => "debuff",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle transition of an effect on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffEventKind {
    Apply,
    Refresh,
    Remove,
    Fade,
}

impl BuffEventKind {
    /// Parse the kind string emitted by the log service.
    ///
    /// Accepts the bare names plus the `buff`/`debuff` suffixed variants
    /// (`applybuff`, `removedebuff`, ...). Stack changes are not lifecycle
    /// transitions and return `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "apply" | "applybuff" | "applydebuff" => Some(Self::Apply),
            "refresh" | "refreshbuff" | "refreshdebuff" => Some(Self::Refresh),
            "remove" | "removebuff" | "removedebuff" => Some(Self::Remove),
            "fade" => Some(Self::Fade),
            _ => None,
        }
    }

    /// Remove and Fade both end the effect.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Remove | Self::Fade)
    }
}

/// Untrusted event record as delivered by the event source.
///
/// Field presence is not guaranteed; validation happens at the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBuffEvent {
    pub timestamp: i64,
    pub ability_id: i64,
    #[serde(default)]
    pub source_id: Option<i64>,
    #[serde(default)]
    pub target_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Validated lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffEvent {
    /// Milliseconds, monotonic within a fight
    pub timestamp: i64,
    pub ability_id: i64,
    /// Who applied it. Informational only, not part of any key.
    pub source_id: Option<i64>,
    /// Who carries it
    pub target_id: i64,
    pub kind: BuffEventKind,
    pub side: Side,
}

// ─────────────────────────────────────────────────────────────────────────────
// Time ranges
// ─────────────────────────────────────────────────────────────────────────────

/// Timestamp bounds of a recorded encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FightWindow {
    pub start: i64,
    pub end: i64,
}

impl FightWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends: the final timestamp of a fight is still "in" the fight.
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    pub fn duration(&self) -> i64 {
        (self.end - self.start).max(0)
    }
}

/// Half-open span `[start, end)` during which an effect is continuously active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    /// Returns `None` for empty or inverted spans.
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    #[inline]
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}
