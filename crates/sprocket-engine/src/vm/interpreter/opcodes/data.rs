//! Data, operator, and looks handlers

use crate::project::Block;
use crate::vm::interpreter::{unknown_opcode, ExecResult, Flow, Interpreter};
use crate::vm::value::Value;

impl<'a, 'c> Interpreter<'a, 'c> {
    pub(in crate::vm::interpreter) fn exec_data_stacked(
        &mut self,
        block: &Block,
    ) -> ExecResult<Flow> {
        let target = self.ctx.thread.target;
        match block.opcode.as_str() {
            "data_setvariableto" => {
                let value = self.eval_input(block, "VALUE")?;
                let name = self.field(block, "VARIABLE")?;
                self.ctx.world.set_variable(target, name, value)?;
                Ok(Flow::Advance)
            }

            "data_changevariableby" => {
                let delta = self.eval_input(block, "VALUE")?.to_number();
                let name = self.field(block, "VARIABLE")?;
                let current = self.ctx.world.variable(target, name).to_number();
                self.ctx
                    .world
                    .set_variable(target, name, Value::Num(current + delta))?;
                Ok(Flow::Advance)
            }

            "looks_say" => {
                let message = self.eval_input(block, "MESSAGE")?;
                self.ctx.world.say(target, message.to_string())?;
                Ok(Flow::Advance)
            }

            _ => Err(unknown_opcode(block).into()),
        }
    }

    pub(in crate::vm::interpreter) fn eval_data_reporter(
        &mut self,
        block: &Block,
    ) -> ExecResult<Value> {
        match block.opcode.as_str() {
            "data_variable" => {
                let name = self.field(block, "VARIABLE")?;
                Ok(self.ctx.world.variable(self.ctx.thread.target, name))
            }

            "operator_join" => {
                let left = self.eval_input(block, "STRING1")?;
                let right = self.eval_input(block, "STRING2")?;
                Ok(Value::Str(format!("{}{}", left, right)))
            }

            "operator_equals" => {
                let left = self.eval_input(block, "OPERAND1")?;
                let right = self.eval_input(block, "OPERAND2")?;
                Ok(Value::Bool(left.loosely_equals(&right)))
            }

            _ => Err(unknown_opcode(block).into()),
        }
    }
}
