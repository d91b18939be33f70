use buffscope_types::{FightWindow, RawBuffEvent};

use super::TaskKey;
use crate::error::BuildError;
use crate::index::LookupIndex;
use crate::intervals::{BuildOptions, BuildPhase, build_lookup_index};

/// Everything a worker needs for one build. Moved into the worker whole.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub key: TaskKey,
    pub events: Vec<RawBuffEvent>,
    pub window: FightWindow,
}

/// Index construction as seen by the coordinator.
///
/// Runs on a worker thread. Must be pure given the request.
pub trait IndexBuild: Send + Sync + 'static {
    fn build(
        &self,
        request: &BuildRequest,
        progress: &dyn Fn(BuildPhase),
    ) -> Result<LookupIndex, BuildError>;
}

/// Normalize + interval fold + index
#[derive(Debug, Clone, Default)]
pub struct IntervalIndexBuilder {
    options: BuildOptions,
}

impl IntervalIndexBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }
}

impl IndexBuild for IntervalIndexBuilder {
    fn build(
        &self,
        request: &BuildRequest,
        progress: &dyn Fn(BuildPhase),
    ) -> Result<LookupIndex, BuildError> {
        build_lookup_index(
            request.key.side,
            &request.events,
            request.window,
            &self.options,
            progress,
        )
    }
}
