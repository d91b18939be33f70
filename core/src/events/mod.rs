//! Event normalization
//!
//! Turns the untrusted per-side event list into validated [`BuffEvent`]s,
//! grouped by `(ability_id, target_id)` and ordered by timestamp.

mod normalizer;

pub use normalizer::{GroupKey, NormalizeStats, NormalizedEvents, normalize};
