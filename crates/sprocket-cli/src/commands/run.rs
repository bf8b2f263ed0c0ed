//! `sprocket run`: run a project from the green flag and report what it said.

use crate::output::StyledOutput;
use anyhow::Context;
use sprocket_engine::{EngineOptions, ExecutionMode, Runtime};
use std::path::PathBuf;
use termcolor::ColorChoice;
use tracing::{debug, info};

pub struct RunArgs {
    pub project: PathBuf,
    pub mode: Option<ExecutionMode>,
    pub max_ticks: Option<u64>,
    pub config: Option<PathBuf>,
    pub color: ColorChoice,
}

/// Resolve options: config file first, then command-line overrides
fn engine_options(args: &RunArgs) -> anyhow::Result<EngineOptions> {
    let mut options = match &args.config {
        Some(path) => EngineOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineOptions::default(),
    };
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(max_ticks) = args.max_ticks {
        options.max_ticks = max_ticks;
    }
    Ok(options)
}

pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let options = engine_options(&args)?;
    let project = super::load_project(&args.project)?;
    let mut out = StyledOutput::new(args.color);

    info!(mode = %options.mode, max_ticks = options.max_ticks, "running project");
    let mut runtime = Runtime::new(project, options);
    let started = runtime.green_flag()?;
    debug!(threads = started, "green flag");
    let summary = runtime
        .run_until_idle()
        .with_context(|| format!("{} failed", args.project.display()))?;
    debug!(ticks = summary.ticks, parked = summary.parked, "run finished");

    for entry in runtime.say_log() {
        out.tick_stamp(entry.tick);
        out.line(&format!("{}: {}", entry.target, entry.text));
    }

    let monitors = runtime.monitors();
    if !monitors.is_empty() {
        out.newline();
        out.heading("Variables");
        for monitor in &monitors {
            out.line(&format!("  {}.{} = {}", monitor.target, monitor.name, monitor.text));
        }
    }

    out.newline();
    let status = format!(
        "{} ticks, {} threads finished, {} parked ({} mode)",
        summary.ticks,
        summary.finished,
        summary.parked,
        runtime.options().mode
    );
    let label = if summary.hit_tick_limit {
        "Tick limit reached"
    } else {
        "Idle"
    };
    out.summary(&format!("{}: {}", label, status), summary.hit_tick_limit);
    out.flush();
    Ok(())
}
