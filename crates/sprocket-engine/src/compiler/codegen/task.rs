//! Code generation for task nodes

use super::{Op, ScriptContext, TypedExpr, ValueType};
use crate::compiler::error::CompileResult;
use crate::compiler::ir::{TaskInput, TaskStack};

impl<'s> ScriptContext<'s> {
    pub(super) fn descend_task_input(&mut self, node: &TaskInput) -> CompileResult<TypedExpr> {
        Ok(match node {
            TaskInput::Create => TypedExpr::new(vec![Op::NewTask], ValueType::Unknown),

            TaskInput::Await { task } => {
                // Plain values pass straight through; pending tasks suspend here
                let mut ops = self.descend_input(task)?.as_unknown();
                ops.push(Op::AwaitTask);
                TypedExpr::new(ops, ValueType::Unknown)
            }

            TaskInput::Status { task } => {
                let mut ops = self.descend_input(task)?.as_unknown();
                ops.push(Op::TaskStatus);
                TypedExpr::new(ops, ValueType::Boolean)
            }

            TaskInput::Current => TypedExpr::new(vec![Op::CurrentTask], ValueType::Unknown),

            TaskInput::Async { substack: None } => {
                TypedExpr::new(vec![Op::ResolvedTask], ValueType::Unknown)
            }

            TaskInput::Async {
                substack: Some(body),
            } => TypedExpr::new(
                vec![Op::SpawnAsync {
                    body: body.clone(),
                    terminal: self.terminal,
                }],
                ValueType::Unknown,
            ),
        })
    }

    pub(super) fn descend_task_stacked(&mut self, node: &TaskStack) -> CompileResult<()> {
        match node {
            TaskStack::Resolve { task, value } => {
                let task = self.descend_input(task)?.as_unknown();
                let value = self.descend_input(value)?.as_unknown();
                self.emit_all(task)?;
                self.emit_all(value)?;
                self.emit(Op::ResolveTask)?;
            }

            TaskStack::AwaitNoReturn { task } => {
                let task = self.descend_input(task)?.as_unknown();
                self.emit_all(task)?;
                self.emit(Op::AwaitTask)?;
                self.emit(Op::Pop)?;
            }
        }
        Ok(())
    }
}
