//! Task handlers: create, resolve, status, await, awaitNoReturn, async, current

use crate::project::{Block, BlockId};
use crate::vm::interpreter::{unknown_opcode, ExecResult, Flow, Interpreter, Interrupt};
use crate::vm::task::{self, Awaited, Task};
use crate::vm::value::Value;
use crate::vm::{VmError, VmResult};

impl<'a, 'c> Interpreter<'a, 'c> {
    pub(in crate::vm::interpreter) fn exec_task_stacked(
        &mut self,
        block: &Block,
    ) -> ExecResult<Flow> {
        match block.opcode.as_str() {
            "task_resolve" => {
                let target = self.eval_input(block, "TASK")?;
                let value = self.eval_input(block, "VALUE")?;
                task::resolve(&target, value)?;
                Ok(Flow::Advance)
            }

            "task_awaitNoReturn" => {
                // Present once the awaited task has settled and this thread resumed
                if self.frame().reported.contains_key(&block.id) {
                    return Ok(Flow::Advance);
                }
                let awaited = self.eval_input(block, "TASK")?;
                match task::await_task(awaited) {
                    Awaited::Ready(_) => Ok(Flow::Advance),
                    Awaited::Pending(task) => Err(Interrupt::Wait {
                        task,
                        report: block.id.clone(),
                    }),
                }
            }

            _ => Err(unknown_opcode(block).into()),
        }
    }

    pub(in crate::vm::interpreter) fn eval_task_reporter(
        &mut self,
        block: &Block,
    ) -> ExecResult<Value> {
        match block.opcode.as_str() {
            "task_create" => Ok(Value::Task(Task::new())),

            "task_status" => {
                let value = self.eval_input(block, "TASK")?;
                Ok(Value::Bool(task::status(&value)))
            }

            "task_await" => {
                let value = self.eval_input(block, "TASK")?;
                match task::await_task(value) {
                    Awaited::Ready(result) => Ok(result),
                    Awaited::Pending(task) => Err(Interrupt::Wait {
                        task,
                        report: block.id.clone(),
                    }),
                }
            }

            "task_current" => Ok(self
                .ctx
                .thread
                .task()
                .map(Value::Task)
                .unwrap_or_else(Value::empty)),

            "task_async" => Ok(Value::Task(self.spawn_branch(&block.id)?)),

            _ => Err(unknown_opcode(block).into()),
        }
    }

    /// Spawn the branch attached to the given `task_async` instance
    fn spawn_branch(&mut self, instance: &BlockId) -> VmResult<Task> {
        let block = self
            .blocks
            .get(instance)
            .ok_or_else(|| VmError::ActiveBlockNotFound(instance.to_string()))?;
        let body = block.input_block("SUBSTACK");
        task::spawn_async(&mut *self.ctx.host, body, self.ctx.thread.target)
    }
}
