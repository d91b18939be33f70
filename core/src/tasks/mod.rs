//! Background index building
//!
//! The coordinator owns the task registry and a rayon pool. Submissions are
//! moved into the pool; workers report back over a channel that the owner
//! drains with [`TaskCoordinator::pump`]. Observers hold [`TaskHandle`]s that
//! read the latest [`TaskState`] snapshot through a `tokio::sync::watch`.
//!
//! ```text
//!   caller ──submit(key, events)──▶ TaskCoordinator ──spawn──▶ rayon worker
//!     ▲                                   │    ▲                     │
//!     │ state() / changed()               │    └──── WorkerMessage ──┘
//!     └──────────── TaskHandle ◀── watch ─┘         (progress, finished)
//! ```
//!
//! Results are memoized per [`TaskKey`]. A result whose key is no longer the
//! current selection when it arrives is discarded.

mod build;
mod coordinator;
mod handle;
mod key;
mod state;


pub use build::{BuildRequest, IndexBuild, IntervalIndexBuilder};
pub use coordinator::TaskCoordinator;
pub use handle::TaskHandle;
pub use key::{TaskKey, fingerprint_events};
pub use state::TaskState;

pub use crate::intervals::BuildPhase;
