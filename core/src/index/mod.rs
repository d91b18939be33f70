//! Lookup index and point-in-time queries
//!
//! A [`LookupIndex`] is built once per (fight, side, event set) and never
//! mutated. Queries are pure reads: binary search over a target's sorted,
//! disjoint interval list.

mod combined;
mod lookup;
mod query;

#[cfg(test)]
mod query_tests;

pub use combined::CombinedLookup;
pub use lookup::{IndexSummary, LookupIndex};
pub use query::{contains_point, is_active_on_any_target, is_active_on_target};
