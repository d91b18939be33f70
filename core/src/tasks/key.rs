use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use buffscope_types::{RawBuffEvent, Side};
use serde::{Deserialize, Serialize};

/// Identity of one index computation: which side of which fight, built from which events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub side: Side,
    pub fight_id: i64,
    /// Fingerprint of the event list, see [`fingerprint_events`]
    pub event_set: u64,
}

impl TaskKey {
    pub fn new(side: Side, fight_id: i64, event_set: u64) -> Self {
        Self {
            side,
            fight_id,
            event_set,
        }
    }

    pub fn for_events(side: Side, fight_id: i64, events: &[RawBuffEvent]) -> Self {
        Self::new(side, fight_id, fingerprint_events(events))
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/fight-{}/{:016x}", self.side, self.fight_id, self.event_set)
    }
}

/// Order-sensitive 64-bit fingerprint of an event list.
///
/// Stable for the lifetime of the process, which is as long as the registry lives.
pub fn fingerprint_events(events: &[RawBuffEvent]) -> u64 {
    let mut hasher = DefaultHasher::new();
    events.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(ts: i64, kind: &str) -> RawBuffEvent {
        RawBuffEvent {
            timestamp: ts,
            ability_id: 1,
            source_id: None,
            target_id: Some(2),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn test_fingerprint_is_stable_and_order_sensitive() {
        let a = vec![raw(0, "applybuff"), raw(10, "removebuff")];
        let b = vec![raw(10, "removebuff"), raw(0, "applybuff")];
        assert_eq!(fingerprint_events(&a), fingerprint_events(&a.clone()));
        assert_ne!(fingerprint_events(&a), fingerprint_events(&b));
        assert_ne!(fingerprint_events(&a), fingerprint_events(&a[..1]));
    }

    #[test]
    fn test_key_distinguishes_side_and_fight() {
        let events = vec![raw(0, "applybuff")];
        let friendly = TaskKey::for_events(Side::Friendly, 3, &events);
        assert_ne!(friendly, TaskKey::for_events(Side::Hostile, 3, &events));
        assert_ne!(friendly, TaskKey::for_events(Side::Friendly, 4, &events));
        assert_eq!(friendly, TaskKey::for_events(Side::Friendly, 3, &events));
    }

    #[test]
    fn test_display() {
        let key = TaskKey::new(Side::Debuff, 12, 0xabc);
        assert_eq!(key.to_string(), "debuff/fight-12/0000000000000abc");
    }
}
