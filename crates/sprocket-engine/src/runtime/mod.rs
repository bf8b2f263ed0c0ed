//! Runtime composition root
//!
//! `Runtime` owns the world, the scheduler, and per-thread executor state, and
//! wires the configured back-end into each scheduler tick:
//!
//! - **Interpreted**: every thread gets an `InterpState` that walks blocks.
//! - **Compiled**: a thread's script is compiled on first step (cached per
//!   target and top block) and run by a `Generator`.

mod error;
mod options;

pub use error::RuntimeError;
pub use options::{EngineOptions, ExecutionMode};

use crate::compiler::{compile, GeneratedProgram};
use crate::project::{BlockId, Project, TargetId, GREEN_FLAG_HAT};
use crate::vm::render::{MonitorEntry, PlainRenderer, TaskRenderer, ValueRenderer};
use crate::vm::scheduler::{Scheduler, StepOutcome, Thread, ThreadHost, ThreadId, ThreadStatus};
use crate::vm::world::{SayEntry, World};
use crate::vm::{ExecContext, Generator, InterpState, Value, VmResult};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of `run_until_idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks run
    pub ticks: u64,
    /// Threads that finished during the run
    pub finished: u64,
    /// Threads still parked on a task afterwards
    pub parked: usize,
    /// Whether the run stopped because the tick budget ran out
    pub hit_tick_limit: bool,
}

/// Back-end state of one thread
enum ThreadExec {
    Interpreted(InterpState),
    Compiled(Generator),
}

/// Per-thread executor bookkeeping
struct Engine {
    mode: ExecutionMode,
    max_call_depth: usize,
    /// Compiled scripts keyed by target and top block
    compiled: FxHashMap<(TargetId, BlockId), Arc<GeneratedProgram>>,
    execs: FxHashMap<ThreadId, ThreadExec>,
}

impl Engine {
    fn new(options: &EngineOptions) -> Self {
        Self {
            mode: options.mode,
            max_call_depth: options.max_call_depth,
            compiled: FxHashMap::default(),
            execs: FxHashMap::default(),
        }
    }

    /// Create executor state for a thread's first step
    fn start(
        &mut self,
        world: &World,
        thread: &Thread,
        terminal: ThreadStatus,
    ) -> VmResult<ThreadExec> {
        match self.mode {
            ExecutionMode::Interpreted => Ok(ThreadExec::Interpreted(InterpState::new())),
            ExecutionMode::Compiled => {
                let key = (thread.target, thread.top_block.clone());
                let program = match self.compiled.get(&key) {
                    Some(program) => program.clone(),
                    None => {
                        let blocks = world.blocks(thread.target)?;
                        let program = Arc::new(compile(&blocks, &thread.top_block, terminal)?);
                        self.compiled.insert(key, program.clone());
                        program
                    }
                };
                Ok(ThreadExec::Compiled(Generator::new(program)))
            }
        }
    }

    fn step(
        &mut self,
        scheduler: &mut Scheduler,
        world: &mut World,
        thread: &Arc<Thread>,
    ) -> VmResult<StepOutcome> {
        let id = thread.id();
        let mut exec = match self.execs.remove(&id) {
            Some(exec) => exec,
            None => self.start(world, thread, scheduler.terminal_status())?,
        };

        let mut ctx = ExecContext {
            host: scheduler,
            world,
            thread,
            max_call_depth: self.max_call_depth,
        };
        let outcome = match &mut exec {
            ThreadExec::Interpreted(state) => state.step(&mut ctx)?,
            ThreadExec::Compiled(generator) => generator.resume(&mut ctx)?,
        };

        if !matches!(outcome, StepOutcome::Done) {
            self.execs.insert(id, exec);
        }
        Ok(outcome)
    }
}

/// A loaded project ready to run
pub struct Runtime {
    world: World,
    scheduler: Scheduler,
    engine: Engine,
    options: EngineOptions,
    renderer: Box<dyn ValueRenderer>,
}

impl Runtime {
    /// Create a runtime for a project
    pub fn new(project: Project, options: EngineOptions) -> Self {
        Self {
            world: World::new(project.targets),
            scheduler: Scheduler::new(),
            engine: Engine::new(&options),
            options,
            renderer: Box::new(TaskRenderer::new(PlainRenderer)),
        }
    }

    /// Replace the renderer used by monitors and `render`
    pub fn with_renderer(mut self, renderer: impl ValueRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Stop everything, then start every green-flag script.
    /// Returns the number of threads started.
    pub fn green_flag(&mut self) -> Result<usize, RuntimeError> {
        self.stop_all()?;
        let mut hats = Vec::new();
        for target in &self.world.targets {
            for hat in target.blocks.hats(GREEN_FLAG_HAT) {
                hats.push((hat.id.clone(), target.id));
            }
        }
        for (top, target) in &hats {
            self.scheduler.push_thread(top.clone(), *target);
        }
        info!(threads = hats.len(), mode = %self.options.mode, "green flag");
        Ok(hats.len())
    }

    /// Run one tick; returns the number of threads stepped
    pub fn step(&mut self) -> Result<usize, RuntimeError> {
        self.world.tick += 1;
        let engine = &mut self.engine;
        let world = &mut self.world;
        let stepped = self
            .scheduler
            .tick(|scheduler, thread| engine.step(scheduler, world, thread))?;
        Ok(stepped)
    }

    /// Tick until no thread is runnable or the tick budget is spent
    pub fn run_until_idle(&mut self) -> Result<RunSummary, RuntimeError> {
        let retired_before = self.scheduler.stats().threads_retired;
        let mut ticks = 0;
        let mut hit_tick_limit = false;
        while self.scheduler.has_runnable() {
            if ticks >= self.options.max_ticks {
                hit_tick_limit = true;
                break;
            }
            self.step()?;
            ticks += 1;
        }

        let summary = RunSummary {
            ticks,
            finished: self.scheduler.stats().threads_retired - retired_before,
            parked: self
                .scheduler
                .threads()
                .iter()
                .filter(|t| t.status() == ThreadStatus::PromiseWait)
                .count(),
            hit_tick_limit,
        };
        debug!(?summary, "run finished");
        Ok(summary)
    }

    /// Stop every thread. Tasks of spawned branches settle with `""`.
    pub fn stop_all(&mut self) -> Result<(), RuntimeError> {
        self.scheduler.stop_all()?;
        self.engine.execs.clear();
        Ok(())
    }

    /// Read a variable of the named target (falling back to the stage)
    pub fn variable(&self, target: &str, name: &str) -> Option<Value> {
        let target = self.world.targets.iter().find(|t| t.name == target)?;
        target
            .variable(name)
            .or_else(|| {
                self.world
                    .targets
                    .get(TargetId::STAGE.index())
                    .and_then(|stage| stage.variable(name))
            })
            .cloned()
    }

    /// Everything said so far
    pub fn say_log(&self) -> &[SayEntry] {
        &self.world.say_log
    }

    /// Every variable of every target, rendered for display
    pub fn monitors(&self) -> Vec<MonitorEntry> {
        self.world
            .targets
            .iter()
            .flat_map(|target| {
                target.variables.iter().map(move |variable| MonitorEntry {
                    target: target.name.clone(),
                    name: variable.name.clone(),
                    text: self.renderer.render(&variable.value),
                })
            })
            .collect()
    }

    /// Render a value the way "show value" surfaces do
    pub fn render(&self, value: &Value) -> String {
        self.renderer.render(value)
    }

    /// Current tick number
    pub fn tick(&self) -> u64 {
        self.world.tick
    }

    /// Live threads
    pub fn threads(&self) -> &[Arc<Thread>] {
        self.scheduler.threads()
    }

    /// Active options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}
