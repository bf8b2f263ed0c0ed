//! IR to generator code
//!
//! Each `IrScript` becomes a `GeneratedScript`: a flat op list the VM runs as
//! a resumable generator. Suspension ops (`Yield`, `AwaitTask`) are only
//! allowed in scripts the lowering pass marked as yielding.

mod op;
mod task;
mod typed;

pub use op::Op;
pub use typed::{TypedExpr, ValueType};

use crate::compiler::error::{CompileError, CompileResult};
use crate::compiler::ir::{InputNode, IrProgram, IrScript, StackNode};
use crate::vm::scheduler::ThreadStatus;
use crate::vm::value::Value;
use rustc_hash::FxHashMap;
use std::fmt::Write;
use std::sync::Arc;

/// Generated code for one script
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedScript {
    /// Script name
    pub name: String,
    /// Ops in execution order
    pub ops: Vec<Op>,
    /// Number of loop counter slots a frame needs
    pub counters: usize,
    /// Whether the script may suspend
    pub yields: bool,
}

impl GeneratedScript {
    /// Render the ops, one per line, prefixed with their index
    pub fn disassemble(&self) -> String {
        let mut output = String::new();
        let marker = if self.yields { " (yields)" } else { "" };
        writeln!(output, "{}{}:", self.name, marker).unwrap();
        for (index, op) in self.ops.iter().enumerate() {
            writeln!(output, "  {:04}  {}", index, op).unwrap();
        }
        output
    }
}

/// Generated code for an entry script and its procedures
#[derive(Debug, Clone)]
pub struct GeneratedProgram {
    /// Script the thread starts in
    pub entry: Arc<GeneratedScript>,
    /// Procedures by name
    pub procedures: FxHashMap<String, Arc<GeneratedScript>>,
    /// Procedure names in discovery order
    order: Vec<String>,
}

impl GeneratedProgram {
    /// Find a procedure
    pub fn procedure(&self, name: &str) -> Option<&Arc<GeneratedScript>> {
        self.procedures.get(name)
    }

    /// Disassemble the entry script followed by each procedure
    pub fn disassemble(&self) -> String {
        let mut output = self.entry.disassemble();
        for name in &self.order {
            if let Some(script) = self.procedures.get(name) {
                writeln!(output).unwrap();
                output.push_str(&script.disassemble());
            }
        }
        output
    }
}

/// Code generator from IR to ops
pub struct CodeGenerator {
    /// Scheduler status that settles spawned branches' tasks
    terminal: ThreadStatus,
}

impl CodeGenerator {
    /// Create a generator that bakes in the scheduler's terminal status
    pub fn new(terminal: ThreadStatus) -> Self {
        Self { terminal }
    }

    /// Generate code for every script of a program
    pub fn generate(&self, program: &IrProgram) -> CompileResult<GeneratedProgram> {
        let entry = Arc::new(self.generate_script(&program.entry)?);
        let mut procedures = FxHashMap::default();
        let mut order = Vec::with_capacity(program.procedures.len());
        for procedure in &program.procedures {
            procedures.insert(
                procedure.name.clone(),
                Arc::new(self.generate_script(procedure)?),
            );
            order.push(procedure.name.clone());
        }
        Ok(GeneratedProgram {
            entry,
            procedures,
            order,
        })
    }

    /// Generate code for one script
    pub fn generate_script(&self, script: &IrScript) -> CompileResult<GeneratedScript> {
        let mut ctx = ScriptContext {
            script,
            terminal: self.terminal,
            ops: Vec::new(),
            counters: 0,
        };
        ctx.descend_stack(&script.body)?;
        Ok(GeneratedScript {
            name: script.name.clone(),
            ops: ctx.ops,
            counters: ctx.counters,
            yields: script.yields,
        })
    }
}

/// State while generating a single script
struct ScriptContext<'s> {
    script: &'s IrScript,
    terminal: ThreadStatus,
    ops: Vec<Op>,
    counters: usize,
}

impl<'s> ScriptContext<'s> {
    /// Append an op, returning its index
    fn emit(&mut self, op: Op) -> CompileResult<usize> {
        if op.suspends() && !self.script.yields {
            return Err(CompileError::SuspensionNotEnabled {
                script: self.script.name.clone(),
            });
        }
        self.ops.push(op);
        Ok(self.ops.len() - 1)
    }

    fn emit_all(&mut self, ops: Vec<Op>) -> CompileResult<()> {
        for op in ops {
            self.emit(op)?;
        }
        Ok(())
    }

    /// Point a placeholder jump at `target`
    fn patch(&mut self, index: usize, target: usize) {
        match &mut self.ops[index] {
            Op::Jump(to) | Op::JumpIfFalse(to) => *to = target,
            Op::LoopNext { exit, .. } => *exit = target,
            _ => {}
        }
    }

    fn descend_stack(&mut self, nodes: &[StackNode]) -> CompileResult<()> {
        for node in nodes {
            self.descend_stacked_block(node)?;
        }
        Ok(())
    }

    fn descend_stacked_block(&mut self, node: &StackNode) -> CompileResult<()> {
        match node {
            StackNode::SetVariable { name, value } => {
                let value = self.descend_input(value)?.as_unknown();
                self.emit_all(value)?;
                self.emit(Op::StoreVar(name.clone()))?;
            }

            StackNode::ChangeVariable { name, delta } => {
                let delta = self.descend_input(delta)?.as_number();
                self.emit_all(delta)?;
                self.emit(Op::ChangeVar(name.clone()))?;
            }

            StackNode::Say { message } => {
                let message = self.descend_input(message)?.as_string();
                self.emit_all(message)?;
                self.emit(Op::Say)?;
            }

            StackNode::If { condition, body } => {
                let condition = self.descend_input(condition)?.as_boolean();
                self.emit_all(condition)?;
                let skip = self.emit(Op::JumpIfFalse(0))?;
                self.descend_stack(body)?;
                let end = self.ops.len();
                self.patch(skip, end);
            }

            StackNode::Repeat { times, body } => {
                let counter = self.counters;
                self.counters += 1;
                let times = self.descend_input(times)?.as_number();
                self.emit_all(times)?;
                self.emit(Op::LoopInit(counter))?;
                let top = self.ops.len();
                let next = self.emit(Op::LoopNext { counter, exit: 0 })?;
                self.descend_stack(body)?;
                self.emit(Op::Yield)?;
                self.emit(Op::Jump(top))?;
                let end = self.ops.len();
                self.patch(next, end);
            }

            StackNode::Yield => {
                self.emit(Op::Yield)?;
            }

            StackNode::Call { procedure } => {
                self.emit(Op::Call(procedure.clone()))?;
            }

            StackNode::Task(task) => self.descend_task_stacked(task)?,
        }
        Ok(())
    }

    fn descend_input(&mut self, node: &InputNode) -> CompileResult<TypedExpr> {
        Ok(match node {
            InputNode::Constant(value) => {
                let ty = match value {
                    Value::Num(_) => ValueType::Number,
                    Value::Str(_) => ValueType::String,
                    Value::Bool(_) => ValueType::Boolean,
                    Value::Task(_) => ValueType::Unknown,
                };
                TypedExpr::new(vec![Op::Push(value.clone())], ty)
            }

            InputNode::Variable { name } => {
                TypedExpr::new(vec![Op::LoadVar(name.clone())], ValueType::Unknown)
            }

            InputNode::Join { left, right } => {
                let mut ops = self.descend_input(left)?.as_string();
                ops.extend(self.descend_input(right)?.as_string());
                ops.push(Op::Join);
                TypedExpr::new(ops, ValueType::String)
            }

            InputNode::Equals { left, right } => {
                let mut ops = self.descend_input(left)?.as_unknown();
                ops.extend(self.descend_input(right)?.as_unknown());
                ops.push(Op::Equals);
                TypedExpr::new(ops, ValueType::Boolean)
            }

            InputNode::Task(task) => self.descend_task_input(task)?,
        })
    }
}
