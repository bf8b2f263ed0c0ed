//! Thread records

use crate::project::{BlockId, TargetId};
use crate::vm::task::Task;
use crate::vm::VmResult;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a Thread
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadId(u64);

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

impl ThreadId {
    fn next() -> Self {
        ThreadId(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the numeric ID value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "thread{}", self.0)
    }
}

/// Status of a thread
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ThreadStatus {
    /// Runnable (or currently executing)
    Running,
    /// Parked until an awaited task settles
    PromiseWait,
    /// Gave up the rest of this tick; runnable next tick
    Yield,
    /// Finished or stopped
    Done,
}

impl ThreadStatus {
    /// Whether the scheduler should step a thread in this status
    pub fn is_runnable(self) -> bool {
        matches!(self, ThreadStatus::Running | ThreadStatus::Yield)
    }
}

/// Callback invoked on every status set
pub type StatusObserver = Box<dyn FnMut(ThreadStatus) -> VmResult<()> + Send>;

/// One cooperative thread of execution
pub struct Thread {
    id: ThreadId,
    /// Target the script runs against
    pub target: TargetId,
    /// First block of the script
    pub top_block: BlockId,
    status: Mutex<ThreadStatus>,
    observers: Mutex<Vec<StatusObserver>>,
    /// Task attached by an async spawn
    task: Mutex<Option<Task>>,
    /// Task this thread is parked on
    awaiting: Mutex<Option<Task>>,
}

impl Thread {
    /// Create a running thread
    pub fn new(top_block: BlockId, target: TargetId) -> Self {
        Self {
            id: ThreadId::next(),
            target,
            top_block,
            status: Mutex::new(ThreadStatus::Running),
            observers: Mutex::new(Vec::new()),
            task: Mutex::new(None),
            awaiting: Mutex::new(None),
        }
    }

    /// Get the thread's unique ID
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Current status
    pub fn status(&self) -> ThreadStatus {
        *self.status.lock()
    }

    /// Set the status and notify every observer
    pub fn set_status(&self, status: ThreadStatus) -> VmResult<()> {
        *self.status.lock() = status;
        let mut observers = self.observers.lock();
        for observer in observers.iter_mut() {
            observer(status)?;
        }
        Ok(())
    }

    /// Subscribe to status sets
    pub fn observe_status(&self, observer: StatusObserver) {
        self.observers.lock().push(observer);
    }

    /// Attach the task that represents this thread
    pub fn attach_task(&self, task: Task) {
        *self.task.lock() = Some(task);
    }

    /// Task attached to this thread, if any
    pub fn task(&self) -> Option<Task> {
        self.task.lock().clone()
    }

    /// Record the task this thread is parked on
    pub fn set_awaiting(&self, task: Task) {
        *self.awaiting.lock() = Some(task);
    }

    /// Take the task this thread was parked on
    pub fn take_awaiting(&self) -> Option<Task> {
        self.awaiting.lock().take()
    }
}

impl std::fmt::Debug for Thread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("top_block", &self.top_block)
            .field("status", &self.status())
            .finish()
    }
}
