//! Generator executor for compiled scripts
//!
//! Runs a `GeneratedProgram` as a resumable generator: the program counter,
//! value stack and loop counters survive across ticks, so a thread resumes
//! exactly at the op that suspended it. When that op was `AwaitTask`, the
//! settled result is pushed before execution continues.

use crate::compiler::{GeneratedProgram, GeneratedScript, Op};
use crate::vm::interpreter::ExecContext;
use crate::vm::scheduler::StepOutcome;
use crate::vm::task::{self, Awaited, Task};
use crate::vm::value::Value;
use crate::vm::{VmError, VmResult};
use std::sync::Arc;

/// One active script invocation
#[derive(Debug)]
struct GenFrame {
    script: Arc<GeneratedScript>,
    pc: usize,
    stack: Vec<Value>,
    counters: Vec<i64>,
}

impl GenFrame {
    fn new(script: Arc<GeneratedScript>) -> Self {
        let counters = vec![0; script.counters];
        Self {
            script,
            pc: 0,
            stack: Vec::new(),
            counters,
        }
    }

    fn pop(&mut self) -> VmResult<Value> {
        self.stack
            .pop()
            .ok_or_else(|| VmError::StackUnderflow(self.script.name.clone()))
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }
}

/// Per-thread state of a compiled script
#[derive(Debug)]
pub struct Generator {
    program: Arc<GeneratedProgram>,
    frames: Vec<GenFrame>,
    started: bool,
    /// Suspended on `AwaitTask`; the result is pushed on resume
    awaiting: bool,
}

impl Generator {
    /// Create a generator positioned at the start of the entry script
    pub fn new(program: Arc<GeneratedProgram>) -> Self {
        Self {
            program,
            frames: Vec::new(),
            started: false,
            awaiting: false,
        }
    }

    /// Current frame depth
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Run until the thread yields, parks, or finishes
    pub fn resume(&mut self, ctx: &mut ExecContext<'_>) -> VmResult<StepOutcome> {
        if !self.started {
            self.started = true;
            self.frames.push(GenFrame::new(self.program.entry.clone()));
        }
        if self.awaiting {
            self.awaiting = false;
            let result = ctx
                .thread
                .take_awaiting()
                .and_then(|task| task.result())
                .unwrap_or_else(Value::empty);
            if let Some(frame) = self.frames.last_mut() {
                frame.push(result);
            }
        }

        let target = ctx.thread.target;
        loop {
            let depth = self.frames.len();
            let Some(frame) = self.frames.last_mut() else {
                return Ok(StepOutcome::Done);
            };
            let script = frame.script.clone();
            let Some(op) = script.ops.get(frame.pc) else {
                self.frames.pop();
                continue;
            };
            frame.pc += 1;

            match op {
                Op::Push(value) => frame.push(value.clone()),
                Op::LoadVar(name) => frame.push(ctx.world.variable(target, name)),
                Op::StoreVar(name) => {
                    let value = frame.pop()?;
                    ctx.world.set_variable(target, name, value)?;
                }
                Op::ChangeVar(name) => {
                    let delta = frame.pop()?.to_number();
                    let current = ctx.world.variable(target, name).to_number();
                    ctx.world
                        .set_variable(target, name, Value::Num(current + delta))?;
                }
                Op::Join => {
                    let right = frame.pop()?;
                    let left = frame.pop()?;
                    frame.push(Value::Str(format!("{}{}", left, right)));
                }
                Op::Equals => {
                    let right = frame.pop()?;
                    let left = frame.pop()?;
                    frame.push(Value::Bool(left.loosely_equals(&right)));
                }
                Op::ToBool => {
                    let value = frame.pop()?;
                    frame.push(Value::Bool(value.to_bool()));
                }
                Op::ToNum => {
                    let value = frame.pop()?;
                    frame.push(Value::Num(value.to_number()));
                }
                Op::ToStr => {
                    let value = frame.pop()?;
                    frame.push(Value::Str(value.to_string()));
                }
                Op::Say => {
                    let message = frame.pop()?;
                    ctx.world.say(target, message.to_string())?;
                }
                Op::Pop => {
                    frame.pop()?;
                }

                Op::Jump(to) => frame.pc = *to,
                Op::JumpIfFalse(to) => {
                    if !frame.pop()?.to_bool() {
                        frame.pc = *to;
                    }
                }
                Op::LoopInit(counter) => {
                    let count = frame.pop()?.to_count();
                    frame.counters[*counter] = count;
                }
                Op::LoopNext { counter, exit } => {
                    if frame.counters[*counter] <= 0 {
                        frame.pc = *exit;
                    } else {
                        frame.counters[*counter] -= 1;
                    }
                }
                Op::Yield => return Ok(StepOutcome::Yield),
                Op::Call(name) => {
                    let Some(procedure) = self.program.procedure(name).cloned() else {
                        continue;
                    };
                    // The entry frame is not a procedure
                    if depth > ctx.max_call_depth {
                        return Err(VmError::CallStackOverflow(ctx.max_call_depth));
                    }
                    self.frames.push(GenFrame::new(procedure));
                }

                Op::NewTask => frame.push(Value::Task(Task::new())),
                Op::ResolvedTask => frame.push(Value::Task(Task::resolved(Value::empty()))),
                Op::SpawnAsync { body, terminal } => {
                    let spawned =
                        task::spawn_with_terminal(&mut *ctx.host, Some(body), target, *terminal)?;
                    frame.push(Value::Task(spawned));
                }
                Op::TaskStatus => {
                    let value = frame.pop()?;
                    frame.push(Value::Bool(task::status(&value)));
                }
                Op::CurrentTask => {
                    let current = ctx.thread.task().map(Value::Task).unwrap_or_else(Value::empty);
                    frame.push(current);
                }
                Op::ResolveTask => {
                    let value = frame.pop()?;
                    let settled = frame.pop()?;
                    task::resolve(&settled, value)?;
                }
                Op::AwaitTask => match task::await_task(frame.pop()?) {
                    Awaited::Ready(result) => frame.push(result),
                    Awaited::Pending(pending) => {
                        self.awaiting = true;
                        return Ok(StepOutcome::Wait(pending));
                    }
                },
            }
        }
    }
}
