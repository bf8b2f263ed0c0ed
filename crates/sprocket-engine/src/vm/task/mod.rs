//! Tasks: single-settlement futures
//!
//! A `Task` starts pending and is settled exactly once. The first settlement
//! wins; every later call is a no-op. Settling runs the task's continuation,
//! which wakes every thread parked on it.
//!
//! Tasks are cheap handles (`Arc`) and travel through the value system like
//! any other value: they can be stored in variables, passed between blocks,
//! and shown in monitors.

mod bridge;
mod intrinsics;

pub use bridge::{spawn_async, spawn_with_terminal};
pub use intrinsics::{await_task, resolve, status, Awaited};

use super::value::Value;
use super::{VmError, VmResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Text shown for a task that has not settled yet
pub const PENDING_TASK_TEXT: &str = "<pending task>";

/// Callback run once when a task settles
pub type Waker = Box<dyn FnOnce() + Send>;

/// Unique identifier for a Task
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

impl TaskId {
    fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the numeric ID value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task{}", self.0)
    }
}

/// Single-use continuation releasing everyone parked on the task
#[derive(Default)]
struct Continuation {
    wakers: Vec<Waker>,
}

impl Continuation {
    fn fire(self) {
        for waker in self.wakers {
            waker();
        }
    }
}

struct TaskState {
    /// Settled result (meaningful only once `done`)
    result: Option<Value>,
    /// Settlement flag
    done: bool,
    /// Present from construction until the first settlement
    continuation: Option<Continuation>,
}

/// A value that may not exist yet
#[derive(Clone)]
pub struct Task {
    id: TaskId,
    state: Arc<Mutex<TaskState>>,
}

impl Task {
    /// Create a pending task
    pub fn new() -> Self {
        Self {
            id: TaskId::next(),
            state: Arc::new(Mutex::new(TaskState {
                result: None,
                done: false,
                continuation: Some(Continuation::default()),
            })),
        }
    }

    /// Create a task that is already settled with `value`
    pub fn resolved(value: Value) -> Self {
        let task = Self::new();
        let mut state = task.state.lock();
        state.result = Some(value);
        state.done = true;
        state.continuation = None;
        drop(state);
        task
    }

    /// Get the task's unique ID
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Settle the task. Returns `Ok(false)` if it was already settled.
    pub fn settle(&self, value: Value) -> VmResult<bool> {
        let continuation = {
            let mut state = self.state.lock();
            if state.done {
                return Ok(false);
            }
            let continuation = state.continuation.take().ok_or(VmError::TaskUninitialized)?;
            state.result = Some(value);
            state.done = true;
            continuation
        };
        trace!(task = %self.id, waiters = continuation.wakers.len(), "task settled");
        // Wakers run after the lock is released so they may query the task
        continuation.fire();
        Ok(true)
    }

    /// Whether the task has settled
    pub fn is_done(&self) -> bool {
        self.state.lock().done
    }

    /// Settled result, or `None` while pending
    pub fn result(&self) -> Option<Value> {
        let state = self.state.lock();
        if state.done {
            state.result.clone()
        } else {
            None
        }
    }

    /// Run `waker` once the task settles (immediately if it already has)
    pub fn on_settle(&self, waker: Waker) -> VmResult<()> {
        let mut state = self.state.lock();
        if state.done {
            drop(state);
            waker();
            return Ok(());
        }
        state
            .continuation
            .as_mut()
            .ok_or(VmError::TaskUninitialized)?
            .wakers
            .push(waker);
        Ok(())
    }

    /// Whether two handles refer to the same task
    pub fn ptr_eq(&self, other: &Task) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Plain string cast: the result once settled, empty while pending
    pub fn to_plain_string(&self) -> String {
        self.result().map(|v| v.to_string()).unwrap_or_default()
    }

    /// Display text used by monitors and value reports
    pub fn display(&self) -> String {
        match self.result() {
            Some(result) => format!("<fulfilled task with {}>", result),
            None => PENDING_TASK_TEXT.to_string(),
        }
    }

    /// A task whose continuation was never wired
    #[cfg(test)]
    pub(crate) fn uninitialized() -> Self {
        let task = Self::new();
        task.state.lock().continuation = None;
        task
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("done", &self.is_done())
            .finish()
    }
}
