//! Tree-walking interpreter over the block graph
//!
//! Each thread owns an `InterpState`: a stack of frames, one per nested
//! substack (script, `if` branch, loop body, procedure body). A step runs
//! stacked blocks from the top frame until the thread yields, parks on a
//! task, or runs off the end of its script.
//!
//! Reporter values are cached per frame while the current stacked block
//! executes. When a reporter suspends, the block is re-executed on resume and
//! the cache supplies every reporter that already ran, with the awaited
//! result filled in for the one that suspended.

pub mod opcodes;

use crate::project::{Block, BlockContainer, BlockId, Input};
use crate::vm::scheduler::{StepOutcome, Thread, ThreadHost};
use crate::vm::task::Task;
use crate::vm::value::Value;
use crate::vm::world::World;
use crate::vm::{VmError, VmResult};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Everything a running thread can touch during one step
pub struct ExecContext<'a> {
    /// Scheduler, for spawning threads
    pub host: &'a mut dyn ThreadHost,
    /// Targets, variables, and the say log
    pub world: &'a mut World,
    /// Thread being stepped
    pub thread: &'a Arc<Thread>,
    /// Deepest allowed procedure nesting
    pub max_call_depth: usize,
}

/// How a frame hands control back when its substack ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameExit {
    /// Bottom frame: the thread is done
    Script,
    /// `if` body: continue after the `if`
    Branch,
    /// Loop body: yield, then re-enter the loop block
    Loop,
    /// Procedure body: continue after the call
    Procedure,
}

#[derive(Debug)]
pub(crate) struct Frame {
    /// Block about to execute; `None` once the substack is exhausted
    current: Option<BlockId>,
    exit: FrameExit,
    /// Remaining iterations of the `repeat` at `current`
    loop_counter: Option<i64>,
    /// Reporter results for the block at `current`
    reported: FxHashMap<BlockId, Value>,
}

impl Frame {
    fn new(current: Option<BlockId>, exit: FrameExit) -> Self {
        Self {
            current,
            exit,
            loop_counter: None,
            reported: FxHashMap::default(),
        }
    }
}

/// Per-thread interpreter state
#[derive(Debug, Default)]
pub struct InterpState {
    frames: Vec<Frame>,
    started: bool,
    /// Block whose result is the awaited task's value on resume
    pending_report: Option<BlockId>,
}

impl InterpState {
    /// Create state for a fresh thread
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the thread until it yields, parks, or finishes
    pub fn step(&mut self, ctx: &mut ExecContext<'_>) -> VmResult<StepOutcome> {
        let blocks = ctx.world.blocks(ctx.thread.target)?;
        if !self.started {
            self.started = true;
            self.frames.push(Frame::new(
                Some(ctx.thread.top_block.clone()),
                FrameExit::Script,
            ));
        }
        Interpreter {
            ctx,
            blocks,
            state: self,
        }
        .run()
    }

    /// Current frame depth
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Why evaluation stopped before the block finished
#[derive(Debug)]
pub(crate) enum Interrupt {
    /// Park until `task` settles, then feed its result to `report`
    Wait {
        /// Task to wait on
        task: Task,
        /// Block that receives the settled result
        report: BlockId,
    },
    /// Execution failed
    Error(VmError),
}

impl From<VmError> for Interrupt {
    fn from(err: VmError) -> Self {
        Interrupt::Error(err)
    }
}

pub(crate) type ExecResult<T> = Result<T, Interrupt>;

/// What the dispatcher does after a stacked block ran
#[derive(Debug)]
pub(crate) enum Flow {
    /// Move on to the next block
    Advance,
    /// Move on, then end this thread's turn
    Yield,
    /// Enter a nested substack
    Enter(Frame),
}

/// Interpreter for one step of one thread
pub(crate) struct Interpreter<'a, 'c> {
    ctx: &'a mut ExecContext<'c>,
    blocks: Arc<BlockContainer>,
    state: &'a mut InterpState,
}

impl<'a, 'c> Interpreter<'a, 'c> {
    fn run(mut self) -> VmResult<StepOutcome> {
        self.resume_awaited();

        loop {
            let Some(frame) = self.state.frames.last() else {
                return Ok(StepOutcome::Done);
            };

            let Some(current) = frame.current.clone() else {
                let exit = frame.exit;
                self.state.frames.pop();
                match exit {
                    FrameExit::Script => return Ok(StepOutcome::Done),
                    FrameExit::Branch | FrameExit::Procedure => self.advance(),
                    FrameExit::Loop => return Ok(StepOutcome::Yield),
                }
                continue;
            };

            match self.execute(&current) {
                Ok(Flow::Advance) => self.advance(),
                Ok(Flow::Yield) => {
                    self.advance();
                    return Ok(StepOutcome::Yield);
                }
                Ok(Flow::Enter(frame)) => self.state.frames.push(frame),
                Err(Interrupt::Wait { task, report }) => {
                    self.state.pending_report = Some(report);
                    return Ok(StepOutcome::Wait(task));
                }
                Err(Interrupt::Error(err)) => return Err(err),
            }
        }
    }

    /// Feed the result of the task this thread was parked on
    fn resume_awaited(&mut self) {
        let Some(task) = self.ctx.thread.take_awaiting() else {
            return;
        };
        let result = task.result().unwrap_or_else(Value::empty);
        if let (Some(report), Some(frame)) =
            (self.state.pending_report.take(), self.state.frames.last_mut())
        {
            frame.reported.insert(report, result);
        }
    }

    /// Move the top frame to the block after its current one
    fn advance(&mut self) {
        let blocks = self.blocks.clone();
        if let Some(frame) = self.state.frames.last_mut() {
            frame.current = frame
                .current
                .as_ref()
                .and_then(|id| blocks.get(id))
                .and_then(|block| block.next.clone());
            frame.loop_counter = None;
            frame.reported.clear();
        }
    }

    fn frame(&self) -> &Frame {
        // run() only executes blocks while a frame exists
        &self.state.frames[self.state.frames.len() - 1]
    }

    fn frame_mut(&mut self) -> &mut Frame {
        let top = self.state.frames.len() - 1;
        &mut self.state.frames[top]
    }

    fn block(&self, id: &BlockId) -> VmResult<Block> {
        self.blocks
            .get(id)
            .cloned()
            .ok_or_else(|| VmError::BlockNotFound(id.to_string()))
    }

    /// Execute one stacked block
    fn execute(&mut self, id: &BlockId) -> ExecResult<Flow> {
        let block = self.block(id)?;
        match block.opcode.as_str() {
            op if op.starts_with("task_") => self.exec_task_stacked(&block),
            op if op.starts_with("control_")
                || op.starts_with("procedures_")
                || op.starts_with("event_") =>
            {
                self.exec_control_stacked(&block)
            }
            _ => self.exec_data_stacked(&block),
        }
    }

    /// Evaluate an input slot; absent inputs are the empty string
    fn eval_input(&mut self, block: &Block, name: &str) -> ExecResult<Value> {
        match block.input(name) {
            None => Ok(Value::empty()),
            Some(Input::Literal(literal)) => Ok(literal.into()),
            Some(Input::Block { block }) => self.eval_reporter(block),
        }
    }

    /// Evaluate a reporter block, consulting the frame cache first
    fn eval_reporter(&mut self, id: &BlockId) -> ExecResult<Value> {
        if let Some(value) = self.frame().reported.get(id) {
            return Ok(value.clone());
        }
        let block = self.block(id)?;
        let value = if block.opcode.starts_with("task_") {
            self.eval_task_reporter(&block)?
        } else {
            self.eval_data_reporter(&block)?
        };
        self.frame_mut().reported.insert(id.clone(), value.clone());
        Ok(value)
    }

    fn field<'b>(&self, block: &'b Block, name: &str) -> VmResult<&'b str> {
        block.field(name).ok_or_else(|| VmError::MissingField {
            block: block.id.to_string(),
            field: name.to_string(),
        })
    }
}

pub(crate) fn unknown_opcode(block: &Block) -> VmError {
    VmError::UnknownOpcode {
        opcode: block.opcode.clone(),
        block: block.id.to_string(),
    }
}
