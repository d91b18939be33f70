use super::LookupIndex;

/// Read-only union of several side indexes (e.g. friendly + hostile buffs).
///
/// Answers by OR-ing the per-index queries; intervals are never merged across sides.
#[derive(Debug, Clone, Copy)]
pub struct CombinedLookup<'a> {
    indexes: &'a [&'a LookupIndex],
}

impl<'a> CombinedLookup<'a> {
    pub fn new(indexes: &'a [&'a LookupIndex]) -> Self {
        Self { indexes }
    }

    pub fn is_active_on_target(&self, ability_id: i64, target_id: i64, timestamp: i64) -> bool {
        self.indexes
            .iter()
            .any(|index| index.is_active_on_target(ability_id, target_id, timestamp))
    }

    pub fn is_active_on_any_target(&self, ability_id: i64, timestamp: i64) -> bool {
        self.indexes
            .iter()
            .any(|index| index.is_active_on_any_target(ability_id, timestamp))
    }
}
