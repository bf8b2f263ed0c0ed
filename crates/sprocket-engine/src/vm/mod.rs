//! Sprocket VM Core Runtime
//!
//! This module provides the execution side of the engine:
//! - Tagged values (`Value`) and single-settlement tasks (`Task`)
//! - Cooperative thread scheduler (`Scheduler`, `Thread`)
//! - Tree-walking interpreter over the block graph
//! - Generator executor for compiled scripts
//! - Display conversion for monitors and reports

pub mod generator;
pub mod interpreter;
pub mod render;
pub mod scheduler;
pub mod task;
pub mod value;
pub mod world;

pub use generator::Generator;
pub use interpreter::{ExecContext, InterpState};
pub use render::{MonitorEntry, PlainRenderer, TaskRenderer, ValueRenderer};
pub use scheduler::{Scheduler, StepOutcome, Thread, ThreadHost, ThreadId, ThreadStatus};
pub use task::{Awaited, Task, TaskId};
pub use value::Value;
pub use world::{SayEntry, World};

use crate::compiler::CompileError;

/// VM execution errors
#[derive(Debug, thiserror::Error)]
pub enum VmError {
    /// A block referenced by a running thread is missing
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// The interpreter has no handler for an opcode
    #[error("Unknown opcode '{opcode}' on block {block}")]
    UnknownOpcode {
        /// Opcode
        opcode: String,
        /// Block carrying the opcode
        block: String,
    },

    /// A block is missing a required field
    #[error("Block {block} is missing field {field}")]
    MissingField {
        /// Block ID
        block: String,
        /// Field name
        field: String,
    },

    /// The instruction instance spawning an async branch cannot be located
    #[error("task: cannot get active block {0}")]
    ActiveBlockNotFound(String),

    /// A task was settled before its continuation was wired
    #[error("Task is not initialized")]
    TaskUninitialized,

    /// Procedure calls nested deeper than the configured limit
    #[error("Call stack overflow (depth {0})")]
    CallStackOverflow(usize),

    /// Generated code popped from an empty value stack
    #[error("Value stack underflow in {0}")]
    StackUnderflow(String),

    /// A thread refers to a target that does not exist
    #[error("Target not found: {0}")]
    TargetNotFound(usize),

    /// Compiling a script for a new thread failed
    #[error("{0}")]
    Compile(#[from] CompileError),
}

/// VM execution result
pub type VmResult<T> = Result<T, VmError>;
