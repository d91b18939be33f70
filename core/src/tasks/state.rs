use std::sync::Arc;

use crate::index::LookupIndex;
use crate::intervals::BuildPhase;

/// Observable state of one index task
#[derive(Debug, Clone, Default)]
pub enum TaskState {
    /// Not submitted, or discarded as stale
    #[default]
    Idle,
    Running {
        phase: BuildPhase,
    },
    Done(Arc<LookupIndex>),
    Failed(String),
}

impl TaskState {
    /// Done or Failed
    pub fn is_settled(&self) -> bool {
        matches!(self, TaskState::Done(_) | TaskState::Failed(_))
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TaskState::Running { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskState::Idle => "idle",
            TaskState::Running { .. } => "running",
            TaskState::Done(_) => "done",
            TaskState::Failed(_) => "failed",
        }
    }

    pub fn index(&self) -> Option<&Arc<LookupIndex>> {
        match self {
            TaskState::Done(index) => Some(index),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TaskState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Coarse percent for a spinner; `None` unless running
    pub fn progress_percent(&self) -> Option<u8> {
        match self {
            TaskState::Running { phase } => Some(phase.percent()),
            _ => None,
        }
    }
}
