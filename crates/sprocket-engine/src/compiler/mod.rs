//! Script compiler
//!
//! Compilation runs in two passes:
//! - **Lowering** turns a block script into an `IrProgram` (entry script plus
//!   every procedure it can reach) and marks scripts that may suspend.
//! - **Code generation** turns each `IrScript` into a flat list of `Op`s that
//!   the VM's generator executor runs and resumes across ticks.

pub mod codegen;
pub mod error;
pub mod ir;
pub mod lower;

pub use codegen::{CodeGenerator, GeneratedProgram, GeneratedScript, Op, TypedExpr, ValueType};
pub use error::{CompileError, CompileResult};
pub use lower::lower;

use crate::project::{BlockContainer, BlockId};
use crate::vm::ThreadStatus;
use tracing::debug;

/// Lower and generate code for the script starting at `top`.
///
/// `terminal` is the scheduler's "done" status; spawned branches settle their
/// task when their thread reaches it.
pub fn compile(
    blocks: &BlockContainer,
    top: &BlockId,
    terminal: ThreadStatus,
) -> CompileResult<GeneratedProgram> {
    let program = lower(blocks, top)?;
    let generated = CodeGenerator::new(terminal).generate(&program)?;
    debug!(
        top = %top,
        procedures = generated.procedures.len(),
        ops = generated.entry.ops.len(),
        yields = generated.entry.yields,
        "script compiled"
    );
    Ok(generated)
}
