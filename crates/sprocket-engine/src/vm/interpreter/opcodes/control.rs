//! Control handlers: hats, if, repeat, yield, procedure calls

use crate::project::{Block, GREEN_FLAG_HAT, PROCEDURE_DEFINITION};
use crate::vm::interpreter::{unknown_opcode, ExecResult, Flow, Frame, FrameExit, Interpreter};
use crate::vm::VmError;

impl<'a, 'c> Interpreter<'a, 'c> {
    pub(in crate::vm::interpreter) fn exec_control_stacked(
        &mut self,
        block: &Block,
    ) -> ExecResult<Flow> {
        match block.opcode.as_str() {
            GREEN_FLAG_HAT | PROCEDURE_DEFINITION => Ok(Flow::Advance),

            "control_yield" => Ok(Flow::Yield),

            "control_if" => {
                let condition = self.eval_input(block, "CONDITION")?.to_bool();
                match block.input_block("SUBSTACK") {
                    Some(body) if condition => Ok(Flow::Enter(Frame::new(
                        Some(body.clone()),
                        FrameExit::Branch,
                    ))),
                    _ => Ok(Flow::Advance),
                }
            }

            "control_repeat" => {
                let remaining = match self.frame().loop_counter {
                    Some(remaining) => remaining,
                    None => self.eval_input(block, "TIMES")?.to_count(),
                };
                if remaining <= 0 {
                    return Ok(Flow::Advance);
                }
                self.frame_mut().loop_counter = Some(remaining - 1);
                Ok(Flow::Enter(Frame::new(
                    block.input_block("SUBSTACK").cloned(),
                    FrameExit::Loop,
                )))
            }

            "procedures_call" => {
                let name = self.field(block, "NAME")?;
                let Some(definition) = self.blocks.procedure(name) else {
                    return Ok(Flow::Advance);
                };
                let depth = self
                    .state
                    .frames
                    .iter()
                    .filter(|f| f.exit == FrameExit::Procedure)
                    .count();
                if depth >= self.ctx.max_call_depth {
                    return Err(VmError::CallStackOverflow(self.ctx.max_call_depth).into());
                }
                Ok(Flow::Enter(Frame::new(
                    definition.next.clone(),
                    FrameExit::Procedure,
                )))
            }

            _ => Err(unknown_opcode(block).into()),
        }
    }
}
