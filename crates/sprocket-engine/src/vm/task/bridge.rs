//! Spawning async branches as scheduler threads
//!
//! The spawned thread carries the task it settles, so `current task` inside
//! the branch can find it. The task settles with `""` the first time the
//! thread's status is set to the terminal status.

use super::Task;
use crate::project::{BlockId, TargetId};
use crate::vm::scheduler::{ThreadHost, ThreadStatus};
use crate::vm::value::Value;
use crate::vm::VmResult;
use tracing::debug;

/// Spawn `body` as a new thread and return the task tracking it.
///
/// An absent body yields an already-settled task and schedules nothing.
pub fn spawn_async(
    host: &mut dyn ThreadHost,
    body: Option<&BlockId>,
    target: TargetId,
) -> VmResult<Task> {
    let terminal = host.terminal_status();
    spawn_with_terminal(host, body, target, terminal)
}

/// Like [`spawn_async`], with the terminal status fixed by the caller.
///
/// Generated code bakes the terminal status in at code generation time and
/// enters here.
pub fn spawn_with_terminal(
    host: &mut dyn ThreadHost,
    body: Option<&BlockId>,
    target: TargetId,
    terminal: ThreadStatus,
) -> VmResult<Task> {
    let Some(body) = body else {
        return Ok(Task::resolved(Value::empty()));
    };

    let task = Task::new();
    let thread = host.push_thread(body.clone(), target);
    thread.attach_task(task.clone());

    let observed = task.clone();
    thread.observe_status(Box::new(move |status| {
        if status == terminal {
            observed.settle(Value::empty())?;
        }
        Ok(())
    }));

    debug!(task = %task.id(), thread = %thread.id(), body = %body, "async branch spawned");
    Ok(task)
}
