//! Subcommand implementations

pub mod emit;
pub mod ir;
pub mod run;

use anyhow::Context;
use sprocket_engine::project::GREEN_FLAG_HAT;
use sprocket_engine::{BlockId, Project, Target};
use std::path::Path;
use tracing::debug;

/// Load a project file, naming the path in errors
pub fn load_project(path: &Path) -> anyhow::Result<Project> {
    let project = Project::load(path)
        .with_context(|| format!("failed to load project {}", path.display()))?;
    debug!(path = %path.display(), targets = project.targets.len(), "project loaded");
    Ok(project)
}

/// Green-flag scripts with their target, in target order
pub fn green_flag_scripts(project: &Project) -> Vec<(&Target, BlockId)> {
    project
        .targets
        .iter()
        .flat_map(|target| {
            target
                .blocks
                .hats(GREEN_FLAG_HAT)
                .map(move |hat| (target, hat.id.clone()))
        })
        .collect()
}
