pub mod config;
pub mod error;
pub mod events;
pub mod index;
pub mod intervals;
pub mod tasks;

// Re-exports for convenience
pub use buffscope_types::{
    BuffEvent, BuffEventKind, FightWindow, Interval, RawBuffEvent, Side, formatting,
};
pub use config::CoreConfig;
pub use error::{BuildError, ConfigError, CoordinatorError, IndexError};
pub use events::{NormalizedEvents, normalize};
pub use index::{CombinedLookup, IndexSummary, LookupIndex, is_active_on_any_target, is_active_on_target};
pub use intervals::{BuildOptions, BuildPhase, OrphanRemovePolicy, build_lookup_index};
pub use tasks::{IndexBuild, TaskCoordinator, TaskHandle, TaskKey, TaskState, fingerprint_events};
