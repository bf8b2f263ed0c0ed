//! Lowering for task blocks

use super::{unknown_opcode, Lowerer};
use crate::compiler::error::CompileResult;
use crate::compiler::ir::{TaskInput, TaskStack};
use crate::project::Block;

impl<'a> Lowerer<'a> {
    /// Lower a task reporter
    pub(super) fn descend_task_input(&mut self, block: &Block) -> CompileResult<TaskInput> {
        match block.opcode.as_str() {
            "task_create" => Ok(TaskInput::Create),

            "task_await" => {
                self.yields = true;
                Ok(TaskInput::Await {
                    task: Box::new(self.descend_input_of_block(block, "TASK")?),
                })
            }

            "task_status" => Ok(TaskInput::Status {
                task: Box::new(self.descend_input_of_block(block, "TASK")?),
            }),

            "task_current" => Ok(TaskInput::Current),

            "task_async" => Ok(TaskInput::Async {
                substack: block.input_block("SUBSTACK").cloned(),
            }),

            _ => Err(unknown_opcode(block)),
        }
    }

    /// Lower a task statement
    pub(super) fn descend_task_stacked(&mut self, block: &Block) -> CompileResult<TaskStack> {
        match block.opcode.as_str() {
            "task_resolve" => Ok(TaskStack::Resolve {
                task: self.descend_input_of_block(block, "TASK")?,
                value: self.descend_input_of_block(block, "VALUE")?,
            }),

            "task_awaitNoReturn" => {
                self.yields = true;
                Ok(TaskStack::AwaitNoReturn {
                    task: self.descend_input_of_block(block, "TASK")?,
                })
            }

            _ => Err(unknown_opcode(block)),
        }
    }
}
