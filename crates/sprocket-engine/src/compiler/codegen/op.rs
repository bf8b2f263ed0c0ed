//! Generated code operations
//!
//! Generated scripts are flat op lists run by a resumable executor. Each op
//! pops its operands from the frame's value stack and pushes its result.
//! Jump targets are absolute op indices.

use crate::project::BlockId;
use crate::vm::scheduler::ThreadStatus;
use crate::vm::value::Value;
use std::fmt;

/// One generated operation
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    // ===== Values =====
    /// Push a constant
    Push(Value),
    /// Push a variable's value
    LoadVar(String),
    /// Pop a value into a variable
    StoreVar(String),
    /// Pop a number and add it to a variable
    ChangeVar(String),
    /// Pop right, pop left, push their concatenation
    Join,
    /// Pop right, pop left, push loose equality
    Equals,
    /// Convert the top value to a boolean
    ToBool,
    /// Convert the top value to a number
    ToNum,
    /// Convert the top value to a string
    ToStr,
    /// Pop a value and say it
    Say,
    /// Discard the top value
    Pop,

    // ===== Control =====
    /// Jump unconditionally
    Jump(usize),
    /// Pop a value; jump if it is falsy
    JumpIfFalse(usize),
    /// Pop an iteration count into a loop counter
    LoopInit(usize),
    /// Jump to `exit` if the counter is exhausted, otherwise decrement it
    LoopNext {
        /// Counter slot
        counter: usize,
        /// Op index after the loop
        exit: usize,
    },
    /// Suspend until the next tick
    Yield,
    /// Run a procedure to completion
    Call(String),

    // ===== Tasks =====
    /// Push a new pending task
    NewTask,
    /// Push a task already settled with `""`
    ResolvedTask,
    /// Spawn a branch thread and push its task
    SpawnAsync {
        /// First block of the branch
        body: BlockId,
        /// Status that settles the task, fixed at generation time
        terminal: ThreadStatus,
    },
    /// Pop a value, push whether it is settled
    TaskStatus,
    /// Push the running thread's task, or `""`
    CurrentTask,
    /// Pop value, pop task, settle the task
    ResolveTask,
    /// Pop a value; suspend until it settles if it is a pending task, then
    /// push the result
    AwaitTask,
}

impl Op {
    /// Whether this op may suspend the thread
    pub fn suspends(&self) -> bool {
        matches!(self, Op::Yield | Op::AwaitTask)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Push(value) => write!(f, "PUSH {:?}", value.to_string()),
            Op::LoadVar(name) => write!(f, "LOAD_VAR {}", name),
            Op::StoreVar(name) => write!(f, "STORE_VAR {}", name),
            Op::ChangeVar(name) => write!(f, "CHANGE_VAR {}", name),
            Op::Join => write!(f, "JOIN"),
            Op::Equals => write!(f, "EQUALS"),
            Op::ToBool => write!(f, "TO_BOOL"),
            Op::ToNum => write!(f, "TO_NUM"),
            Op::ToStr => write!(f, "TO_STR"),
            Op::Say => write!(f, "SAY"),
            Op::Pop => write!(f, "POP"),
            Op::Jump(target) => write!(f, "JUMP {:04}", target),
            Op::JumpIfFalse(target) => write!(f, "JUMP_IF_FALSE {:04}", target),
            Op::LoopInit(counter) => write!(f, "LOOP_INIT c{}", counter),
            Op::LoopNext { counter, exit } => write!(f, "LOOP_NEXT c{} {:04}", counter, exit),
            Op::Yield => write!(f, "YIELD"),
            Op::Call(name) => write!(f, "CALL {}", name),
            Op::NewTask => write!(f, "NEW_TASK"),
            Op::ResolvedTask => write!(f, "RESOLVED_TASK"),
            Op::SpawnAsync { body, terminal } => {
                write!(f, "SPAWN_ASYNC @{} until {:?}", body, terminal)
            }
            Op::TaskStatus => write!(f, "TASK_STATUS"),
            Op::CurrentTask => write!(f, "CURRENT_TASK"),
            Op::ResolveTask => write!(f, "RESOLVE_TASK"),
            Op::AwaitTask => write!(f, "AWAIT_TASK"),
        }
    }
}
