use std::sync::Arc;

use tokio::sync::watch;

use super::{TaskKey, TaskState};
use crate::error::IndexError;
use crate::index::LookupIndex;

/// Caller-side view of one index task. Cheap to clone.
///
/// Handles for the same task compare equal. State updates only land when the
/// owning coordinator is pumped.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    key: TaskKey,
    state: watch::Receiver<TaskState>,
}

impl TaskHandle {
    pub(crate) fn new(id: u64, key: TaskKey, state: watch::Receiver<TaskState>) -> Self {
        Self { id, key, state }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> TaskKey {
        self.key
    }

    /// Latest snapshot
    pub fn state(&self) -> TaskState {
        self.state.borrow().clone()
    }

    /// Wait for the next transition and return it.
    ///
    /// Returns `None` once the task has been dropped from the registry.
    pub async fn changed(&mut self) -> Option<TaskState> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Wait until the task is Done, Failed, or discarded (Idle).
    pub async fn settled(&mut self) -> TaskState {
        let settled = self
            .state
            .wait_for(|s| s.is_settled() || matches!(s, TaskState::Idle))
            .await
            .map(|state| TaskState::clone(&state));
        match settled {
            Ok(state) => state,
            // Sender gone: the last value is final
            Err(_) => self.state.borrow().clone(),
        }
    }

    /// The built index. Reading before Done is a caller error.
    pub fn lookup(&self) -> Result<Arc<LookupIndex>, IndexError> {
        match &*self.state.borrow() {
            TaskState::Done(index) => Ok(Arc::clone(index)),
            TaskState::Failed(message) => Err(IndexError::Failed {
                key: self.key,
                message: message.clone(),
            }),
            other => Err(IndexError::NotReady {
                key: self.key,
                state: other.name(),
            }),
        }
    }
}

impl PartialEq for TaskHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaskHandle {}
