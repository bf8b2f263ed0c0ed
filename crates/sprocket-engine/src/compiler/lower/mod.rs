//! Block graph to IR lowering
//!
//! Converts a green-flag script and every procedure it reaches into an
//! `IrProgram`. Scripts containing a suspension point (task await, loop
//! iteration, explicit yield) are marked as yielding here, before code
//! generation runs; the flag then propagates from callees to callers.

mod task;

use crate::compiler::error::{CompileError, CompileResult};
use crate::compiler::ir::{InputNode, IrProgram, IrScript, StackNode};
use crate::project::{Block, BlockContainer, BlockId, Input, GREEN_FLAG_HAT, PROCEDURE_DEFINITION};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::trace;

/// Lower the script starting at `top` together with its procedures
pub fn lower(blocks: &BlockContainer, top: &BlockId) -> CompileResult<IrProgram> {
    let mut lowerer = Lowerer::new(blocks);
    let entry = lowerer.lower_script(format!("script {}", top), top)?;

    let mut pending: VecDeque<String> = entry.calls.iter().cloned().collect();
    let mut seen: FxHashSet<String> = pending.iter().cloned().collect();
    let mut procedures = Vec::new();
    while let Some(name) = pending.pop_front() {
        // Calls are only recorded for procedures that exist
        let Some(definition) = blocks.procedure(&name) else {
            continue;
        };
        let script = lowerer.lower_script(name, &definition.id)?;
        for call in &script.calls {
            if seen.insert(call.clone()) {
                pending.push_back(call.clone());
            }
        }
        procedures.push(script);
    }

    let mut program = IrProgram { entry, procedures };
    program.propagate_yields();
    Ok(program)
}

/// Lowering state for one target's blocks
pub struct Lowerer<'a> {
    blocks: &'a BlockContainer,
    /// Whether the script being lowered may suspend
    yields: bool,
    /// Procedures called by the script being lowered
    calls: Vec<String>,
}

impl<'a> Lowerer<'a> {
    /// Create a lowerer over a block container
    pub fn new(blocks: &'a BlockContainer) -> Self {
        Self {
            blocks,
            yields: false,
            calls: Vec::new(),
        }
    }

    /// Lower the stack starting at `top` as one script
    pub fn lower_script(&mut self, name: impl Into<String>, top: &BlockId) -> CompileResult<IrScript> {
        self.yields = false;
        self.calls.clear();

        let mut script = IrScript::new(name, top.clone());
        script.body = self.descend_stack(Some(top))?;
        script.yields = self.yields;
        script.calls = std::mem::take(&mut self.calls);
        trace!(script = %script.name, yields = script.yields, "script lowered");
        Ok(script)
    }

    fn block(&self, id: &BlockId) -> CompileResult<&'a Block> {
        self.blocks
            .get(id)
            .ok_or_else(|| CompileError::BlockNotFound(id.to_string()))
    }

    fn field<'b>(&self, block: &'b Block, name: &str) -> CompileResult<&'b str> {
        block.field(name).ok_or_else(|| CompileError::MissingField {
            block: block.id.to_string(),
            field: name.to_string(),
        })
    }

    /// Lower a chain of stacked blocks
    pub fn descend_stack(&mut self, start: Option<&BlockId>) -> CompileResult<Vec<StackNode>> {
        let mut nodes = Vec::new();
        let mut cursor = start.cloned();
        while let Some(id) = cursor {
            let block = self.block(&id)?;
            if let Some(node) = self.descend_stacked_block(block)? {
                nodes.push(node);
            }
            cursor = block.next.clone();
        }
        Ok(nodes)
    }

    /// Lower one stacked block; hats and calls to missing procedures lower to nothing
    pub fn descend_stacked_block(&mut self, block: &Block) -> CompileResult<Option<StackNode>> {
        let node = match block.opcode.as_str() {
            GREEN_FLAG_HAT | PROCEDURE_DEFINITION => return Ok(None),

            "data_setvariableto" => StackNode::SetVariable {
                name: self.field(block, "VARIABLE")?.to_string(),
                value: self.descend_input_of_block(block, "VALUE")?,
            },

            "data_changevariableby" => StackNode::ChangeVariable {
                name: self.field(block, "VARIABLE")?.to_string(),
                delta: self.descend_input_of_block(block, "VALUE")?,
            },

            "looks_say" => StackNode::Say {
                message: self.descend_input_of_block(block, "MESSAGE")?,
            },

            "control_if" => StackNode::If {
                condition: self.descend_input_of_block(block, "CONDITION")?,
                body: self.descend_stack(block.input_block("SUBSTACK"))?,
            },

            "control_repeat" => {
                self.yields = true;
                StackNode::Repeat {
                    times: self.descend_input_of_block(block, "TIMES")?,
                    body: self.descend_stack(block.input_block("SUBSTACK"))?,
                }
            }

            "control_yield" => {
                self.yields = true;
                StackNode::Yield
            }

            "procedures_call" => {
                let name = self.field(block, "NAME")?;
                if self.blocks.procedure(name).is_none() {
                    return Ok(None);
                }
                if !self.calls.iter().any(|c| c == name) {
                    self.calls.push(name.to_string());
                }
                StackNode::Call {
                    procedure: name.to_string(),
                }
            }

            op if op.starts_with("task_") => StackNode::Task(self.descend_task_stacked(block)?),

            _ => return Err(unknown_opcode(block)),
        };
        Ok(Some(node))
    }

    /// Lower an input slot; absent inputs become the empty string
    pub fn descend_input_of_block(&mut self, block: &Block, name: &str) -> CompileResult<InputNode> {
        match block.input(name) {
            None => Ok(InputNode::Constant(crate::vm::Value::empty())),
            Some(Input::Literal(literal)) => Ok(InputNode::Constant(literal.into())),
            Some(Input::Block { block: id }) => {
                let reporter = self.block(id)?;
                self.descend_input(reporter)
            }
        }
    }

    /// Lower a reporter block
    pub fn descend_input(&mut self, block: &Block) -> CompileResult<InputNode> {
        match block.opcode.as_str() {
            "data_variable" => Ok(InputNode::Variable {
                name: self.field(block, "VARIABLE")?.to_string(),
            }),

            "operator_join" => Ok(InputNode::Join {
                left: Box::new(self.descend_input_of_block(block, "STRING1")?),
                right: Box::new(self.descend_input_of_block(block, "STRING2")?),
            }),

            "operator_equals" => Ok(InputNode::Equals {
                left: Box::new(self.descend_input_of_block(block, "OPERAND1")?),
                right: Box::new(self.descend_input_of_block(block, "OPERAND2")?),
            }),

            op if op.starts_with("task_") => Ok(InputNode::Task(self.descend_task_input(block)?)),

            _ => Err(unknown_opcode(block)),
        }
    }
}

fn unknown_opcode(block: &Block) -> CompileError {
    CompileError::UnknownOpcode {
        opcode: block.opcode.clone(),
        block: block.id.to_string(),
    }
}
