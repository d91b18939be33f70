use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use buffscope_types::{FightWindow, RawBuffEvent};
use tokio::sync::watch;

use super::{BuildRequest, IndexBuild, IntervalIndexBuilder, TaskHandle, TaskKey, TaskState};
use crate::config::CoreConfig;
use crate::error::{BuildError, CoordinatorError};
use crate::index::LookupIndex;
use crate::intervals::BuildPhase;

// ─────────────────────────────────────────────────────────────────────────────
// Worker Messages
// ─────────────────────────────────────────────────────────────────────────────

/// Posted by a worker. For one task, progress always precedes the finish.
enum WorkerMessage {
    Progress {
        id: u64,
        key: TaskKey,
        phase: BuildPhase,
    },
    Finished {
        id: u64,
        key: TaskKey,
        result: Result<LookupIndex, BuildError>,
    },
}

struct TaskEntry {
    id: u64,
    state_tx: watch::Sender<TaskState>,
    handle: TaskHandle,
}

impl TaskEntry {
    fn is_failed(&self) -> bool {
        matches!(*self.state_tx.borrow(), TaskState::Failed(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Coordinator
// ─────────────────────────────────────────────────────────────────────────────

/// Schedules index builds off the caller's thread and memoizes them by [`TaskKey`].
///
/// Owned by whoever composes the core with the UI layer; it is the single
/// writer of every task's state. Nothing here blocks except `pump_blocking`.
pub struct TaskCoordinator {
    pool: rayon::ThreadPool,
    builder: Arc<dyn IndexBuild>,
    registry: HashMap<TaskKey, TaskEntry>,
    current: Option<TaskKey>,
    next_id: u64,
    tx: mpsc::Sender<WorkerMessage>,
    rx: mpsc::Receiver<WorkerMessage>,
}

impl TaskCoordinator {
    pub fn new(config: &CoreConfig) -> Result<Self, CoordinatorError> {
        let builder = IntervalIndexBuilder::new(config.build_options());
        Self::with_builder(config, Arc::new(builder))
    }

    pub fn with_builder(
        config: &CoreConfig,
        builder: Arc<dyn IndexBuild>,
    ) -> Result<Self, CoordinatorError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("buffscope-index-{i}"))
            .build()
            .map_err(CoordinatorError::ThreadPool)?;
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            pool,
            builder,
            registry: HashMap::new(),
            current: None,
            next_id: 0,
            tx,
            rx,
        })
    }

    /// Select `key` and make sure an index for it exists or is being built.
    ///
    /// Returns the existing handle if the key is in flight or cached. A failed
    /// task is replaced, so resubmitting is how a caller retries.
    pub fn submit(
        &mut self,
        key: TaskKey,
        events: Vec<RawBuffEvent>,
        window: FightWindow,
    ) -> TaskHandle {
        self.current = Some(key);

        if let Some(entry) = self.registry.get(&key) {
            if !entry.is_failed() {
                tracing::debug!(task = %key, state = entry.handle.state().name(), "Reusing index task");
                return entry.handle.clone();
            }
            tracing::info!(task = %key, "Retrying failed index task");
        }
        self.registry.remove(&key);

        let id = self.next_id;
        self.next_id += 1;

        let (state_tx, state_rx) = watch::channel(TaskState::Running {
            phase: BuildPhase::Queued,
        });
        let handle = TaskHandle::new(id, key, state_rx);
        self.registry.insert(
            key,
            TaskEntry {
                id,
                state_tx,
                handle: handle.clone(),
            },
        );

        tracing::info!(task = %key, events = events.len(), "Submitting index build");

        let request = BuildRequest {
            key,
            events,
            window,
        };
        let builder = Arc::clone(&self.builder);
        let tx = self.tx.clone();
        self.pool
            .spawn(move || run_build(id, request, builder.as_ref(), &tx));

        handle
    }

    /// Change the current selection without submitting anything.
    pub fn select(&mut self, key: TaskKey) -> Option<TaskHandle> {
        self.current = Some(key);
        self.handle_of(&key)
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    pub fn current_key(&self) -> Option<TaskKey> {
        self.current
    }

    /// State of the current selection; Idle when nothing is selected or submitted.
    pub fn current_state(&self) -> TaskState {
        self.current
            .and_then(|key| self.state_of(&key))
            .unwrap_or_default()
    }

    pub fn state_of(&self, key: &TaskKey) -> Option<TaskState> {
        self.registry.get(key).map(|entry| entry.handle.state())
    }

    pub fn handle_of(&self, key: &TaskKey) -> Option<TaskHandle> {
        self.registry.get(key).map(|entry| entry.handle.clone())
    }

    /// Drop a memoized entry, e.g. after the fight's events were refetched.
    pub fn forget(&mut self, key: &TaskKey) -> bool {
        match self.registry.remove(key) {
            Some(entry) => {
                entry.state_tx.send_replace(TaskState::Idle);
                true
            }
            None => false,
        }
    }

    /// Number of registered tasks (running, done or failed)
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Apply every worker message that has arrived. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message);
            applied += 1;
        }
        applied
    }

    /// Apply worker messages until the current selection settles or `timeout` passes.
    pub fn pump_blocking(&mut self, timeout: Duration) -> TaskState {
        let deadline = Instant::now() + timeout;
        self.pump();

        loop {
            let state = self.current_state();
            if !state.is_running() {
                return state;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return state;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(message) => {
                    self.apply(message);
                    self.pump();
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return self.current_state();
                }
            }
        }
    }

    fn entry(&self, id: u64, key: &TaskKey) -> Option<&TaskEntry> {
        self.registry.get(key).filter(|entry| entry.id == id)
    }

    fn apply(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Progress { id, key, phase } => {
                if let Some(entry) = self.entry(id, &key) {
                    entry.state_tx.send_replace(TaskState::Running { phase });
                }
            }
            WorkerMessage::Finished { id, key, result } => {
                if self.entry(id, &key).is_none() {
                    tracing::debug!(task = %key, "Dropping result for evicted index task");
                    return;
                }

                if self.current != Some(key) {
                    tracing::debug!(task = %key, "Discarding stale index result");
                    self.forget(&key);
                    return;
                }

                let state = match result {
                    Ok(index) => {
                        let summary = index.summary();
                        tracing::info!(
                            task = %key,
                            abilities = summary.abilities,
                            intervals = summary.intervals,
                            "Index build finished"
                        );
                        TaskState::Done(Arc::new(index))
                    }
                    Err(e) => {
                        tracing::warn!(task = %key, error = %e, "Index build failed");
                        TaskState::Failed(e.to_string())
                    }
                };
                if let Some(entry) = self.entry(id, &key) {
                    entry.state_tx.send_replace(state);
                }
            }
        }
    }
}

/// Worker body. Owns its thread until the build returns.
fn run_build(
    id: u64,
    request: BuildRequest,
    builder: &dyn IndexBuild,
    tx: &mpsc::Sender<WorkerMessage>,
) {
    let key = request.key;
    let progress = |phase: BuildPhase| {
        let _ = tx.send(WorkerMessage::Progress { id, key, phase });
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| builder.build(&request, &progress)))
        .unwrap_or_else(|payload| {
            Err(BuildError::Panicked {
                message: panic_message(payload.as_ref()),
            })
        });

    // Send only fails once the coordinator is gone
    let _ = tx.send(WorkerMessage::Finished { id, key, result });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
