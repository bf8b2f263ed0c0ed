//! `sprocket ir`: print the lowered IR of each green-flag script.

use crate::output::StyledOutput;
use sprocket_engine::ir::PrettyPrint;
use sprocket_engine::lower;
use std::path::Path;
use termcolor::ColorChoice;
use tracing::debug;

pub fn execute(path: &Path, color: ColorChoice) -> anyhow::Result<()> {
    let project = super::load_project(path)?;
    let mut out = StyledOutput::new(color);

    for (target, top) in super::green_flag_scripts(&project) {
        let program = lower(&target.blocks, &top)?;
        debug!(
            sprite = %target.name,
            top = %top,
            yields = program.entry.yields,
            "script lowered"
        );
        out.heading(&format!("{} / {}", target.name, top));
        out.plain(&program.pretty_print());
    }
    out.flush();
    Ok(())
}
