//! `sprocket emit`: disassemble the generated code of each green-flag script.

use crate::output::StyledOutput;
use anyhow::Context;
use sprocket_engine::{compile, Scheduler, ThreadHost};
use std::path::Path;
use termcolor::ColorChoice;
use tracing::debug;

pub fn execute(path: &Path, color: ColorChoice) -> anyhow::Result<()> {
    let project = super::load_project(path)?;
    let terminal = Scheduler::new().terminal_status();
    let mut out = StyledOutput::new(color);

    for (target, top) in super::green_flag_scripts(&project) {
        let generated = compile(&target.blocks, &top, terminal)
            .with_context(|| format!("failed to compile {} / {}", target.name, top))?;
        debug!(
            sprite = %target.name,
            top = %top,
            procedures = generated.procedures.len(),
            "script compiled"
        );
        out.heading(&format!("{} / {}", target.name, top));
        out.plain(&generated.disassemble());
        out.newline();
    }
    out.flush();
    Ok(())
}
