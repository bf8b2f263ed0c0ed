//! Sprocket Engine
//!
//! This crate provides a cooperative block-script engine with first-class tasks:
//! - **Project**: Targets, blocks, and the JSON project loader (`project` module)
//! - **Compiler**: IR lowering and generator code generation (`compiler` module)
//! - **VM**: Values, tasks, scheduler, interpreter, and generator executor (`vm` module)
//! - **Runtime**: Composition root that wires the pieces together (`runtime` module)
//!
//! Scripts run either interpreted (per-tick block dispatch) or compiled (lowered to IR,
//! then to resumable generator code). Both paths share the same task and scheduler
//! logic, so a project behaves identically in either mode.
//!
//! # Example
//!
//! ```rust,ignore
//! use sprocket_engine::{EngineOptions, ExecutionMode, Project, Runtime};
//!
//! let project = Project::from_json(source)?;
//! let options = EngineOptions { mode: ExecutionMode::Compiled, ..Default::default() };
//! let mut runtime = Runtime::new(project, options);
//! runtime.green_flag()?;
//! let summary = runtime.run_until_idle()?;
//! for entry in runtime.say_log() {
//!     println!("[{}] {}: {}", entry.tick, entry.target, entry.text);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![allow(clippy::new_without_default)]

// ============================================================================
// Core Modules
// ============================================================================

/// Project model: targets, blocks, and loading
pub mod project;

/// Compiler module: IR, lowering, and generator code generation
pub mod compiler;

/// VM module: values, tasks, scheduler, interpreter, and generator executor
pub mod vm;

/// Runtime module: options and the composition root
pub mod runtime;

// ============================================================================
// Re-exports
// ============================================================================

pub use project::{Block, BlockContainer, BlockId, Input, Project, ProjectError, Target, TargetId};

pub use compiler::{
    compile, ir, lower, CodeGenerator, CompileError, CompileResult, GeneratedProgram,
    GeneratedScript, Op,
};

pub use vm::{
    Scheduler, Task, Thread, ThreadHost, ThreadId, ThreadStatus, Value, VmError, VmResult,
};

pub use runtime::{EngineOptions, ExecutionMode, RunSummary, Runtime, RuntimeError};
