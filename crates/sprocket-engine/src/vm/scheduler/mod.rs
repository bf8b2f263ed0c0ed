//! Cooperative Thread Scheduler
//!
//! A single-threaded, tick-driven scheduler. Each tick steps every runnable
//! thread once, in list order, until it yields, parks on a task, or finishes.

#[allow(clippy::module_inception)]
mod scheduler;
mod thread;

pub use scheduler::{Scheduler, SchedulerStats, StepOutcome, ThreadHost};
pub use thread::{StatusObserver, Thread, ThreadId, ThreadStatus};
