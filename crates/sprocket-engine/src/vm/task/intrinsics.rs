//! Task operations shared by the interpreter and generated code
//!
//! Non-task operands are treated as already-settled values: `status` reports
//! true, `await_task` hands the value straight back, `resolve` ignores it.

use super::Task;
use crate::vm::value::Value;
use crate::vm::VmResult;

/// Outcome of awaiting a value
#[derive(Debug, Clone)]
pub enum Awaited {
    /// The value is available now
    Ready(Value),
    /// The caller must park until the task settles
    Pending(Task),
}

/// Whether a value is settled
pub fn status(value: &Value) -> bool {
    match value {
        Value::Task(task) => task.is_done(),
        _ => true,
    }
}

/// Settle `task` with `value` if it is a task
pub fn resolve(task: &Value, value: Value) -> VmResult<()> {
    if let Value::Task(task) = task {
        task.settle(value)?;
    }
    Ok(())
}

/// Synchronous fast path of await; pending tasks are returned for parking
pub fn await_task(value: Value) -> Awaited {
    match value {
        Value::Task(task) => match task.result() {
            Some(result) => Awaited::Ready(result),
            None => Awaited::Pending(task),
        },
        other => Awaited::Ready(other),
    }
}
