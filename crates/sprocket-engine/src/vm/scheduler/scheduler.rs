//! Tick-driven scheduler coordinating cooperative threads

use super::thread::{Thread, ThreadId, ThreadStatus};
use crate::project::{BlockId, TargetId};
use crate::vm::task::Task;
use crate::vm::VmResult;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// What a thread did with its turn
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Gave up the rest of the tick
    Yield,
    /// Must park until the task settles
    Wait(Task),
    /// Ran off the end of its script
    Done,
}

/// Scheduler capabilities consumed by async spawning
pub trait ThreadHost {
    /// Push a thread running `top_block` against `target`
    fn push_thread(&mut self, top_block: BlockId, target: TargetId) -> Arc<Thread>;

    /// Status a thread holds once it has finished
    fn terminal_status(&self) -> ThreadStatus;
}

/// Scheduler statistics
#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    /// Total threads pushed
    pub threads_spawned: u64,

    /// Total threads retired after finishing
    pub threads_retired: u64,

    /// Total ticks run
    pub ticks: u64,
}

/// Cooperative thread scheduler
#[derive(Default)]
pub struct Scheduler {
    /// Threads in execution order
    threads: Vec<Arc<Thread>>,

    /// Threads whose awaited task settled during the current tick
    wake_queue: Arc<Mutex<Vec<ThreadId>>>,

    stats: SchedulerStats,
}

impl Scheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick.
    ///
    /// Every runnable thread is handed to `step` once, in list order; threads
    /// pushed during the tick are stepped in the same tick. Afterwards finished
    /// threads are retired and threads whose task settled become runnable for
    /// the next tick. Returns the number of threads stepped.
    pub fn tick<F>(&mut self, mut step: F) -> VmResult<usize>
    where
        F: FnMut(&mut Scheduler, &Arc<Thread>) -> VmResult<StepOutcome>,
    {
        self.stats.ticks += 1;
        let mut stepped = 0;
        let mut index = 0;
        while index < self.threads.len() {
            let thread = self.threads[index].clone();
            index += 1;
            if !thread.status().is_runnable() {
                continue;
            }

            thread.set_status(ThreadStatus::Running)?;
            stepped += 1;
            let outcome = match step(self, &thread) {
                Ok(outcome) => outcome,
                Err(err) => {
                    // A failed thread ends here; it is never re-stepped from its hat.
                    warn!(thread = %thread.id(), error = %err, "thread aborted");
                    thread.set_status(ThreadStatus::Done)?;
                    self.retire_done();
                    return Err(err);
                }
            };
            match outcome {
                StepOutcome::Yield => thread.set_status(ThreadStatus::Yield)?,
                StepOutcome::Wait(task) => self.park(&thread, task)?,
                StepOutcome::Done => thread.set_status(ThreadStatus::Done)?,
            }
        }

        self.retire_done();
        self.wake_settled()?;
        Ok(stepped)
    }

    /// Park `thread` until `task` settles
    fn park(&mut self, thread: &Arc<Thread>, task: Task) -> VmResult<()> {
        debug!(thread = %thread.id(), task = %task.id(), "thread parked");
        thread.set_awaiting(task.clone());
        thread.set_status(ThreadStatus::PromiseWait)?;
        let queue = self.wake_queue.clone();
        let id = thread.id();
        task.on_settle(Box::new(move || queue.lock().push(id)))
    }

    fn retire_done(&mut self) {
        let before = self.threads.len();
        self.threads.retain(|t| t.status() != ThreadStatus::Done);
        let retired = before - self.threads.len();
        if retired > 0 {
            trace!(retired, "threads retired");
            self.stats.threads_retired += retired as u64;
        }
    }

    fn wake_settled(&mut self) -> VmResult<()> {
        let woken: Vec<ThreadId> = std::mem::take(&mut *self.wake_queue.lock());
        for id in woken {
            if let Some(thread) = self.thread(id) {
                if thread.status() == ThreadStatus::PromiseWait {
                    debug!(thread = %id, "thread woken");
                    thread.set_status(ThreadStatus::Running)?;
                }
            }
        }
        Ok(())
    }

    /// Stop every thread. Each is set to done (notifying observers) and removed.
    pub fn stop_all(&mut self) -> VmResult<()> {
        let threads = std::mem::take(&mut self.threads);
        debug!(count = threads.len(), "stopping all threads");
        for thread in &threads {
            thread.set_status(ThreadStatus::Done)?;
        }
        self.stats.threads_retired += threads.len() as u64;
        self.wake_queue.lock().clear();
        Ok(())
    }

    /// Whether any thread can make progress on the next tick
    pub fn has_runnable(&self) -> bool {
        self.threads.iter().any(|t| t.status().is_runnable())
    }

    /// All live threads in execution order
    pub fn threads(&self) -> &[Arc<Thread>] {
        &self.threads
    }

    /// Find a live thread
    pub fn thread(&self, id: ThreadId) -> Option<&Arc<Thread>> {
        self.threads.iter().find(|t| t.id() == id)
    }

    /// Get statistics
    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }
}

impl ThreadHost for Scheduler {
    fn push_thread(&mut self, top_block: BlockId, target: TargetId) -> Arc<Thread> {
        let thread = Arc::new(Thread::new(top_block, target));
        debug!(thread = %thread.id(), top = %thread.top_block, %target, "thread pushed");
        self.threads.push(thread.clone());
        self.stats.threads_spawned += 1;
        thread
    }

    fn terminal_status(&self) -> ThreadStatus {
        ThreadStatus::Done
    }
}
