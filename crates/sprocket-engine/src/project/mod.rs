//! Project model
//!
//! A project is a list of targets; the first target is the stage. Projects are
//! loaded from JSON:
//!
//! ```json
//! {
//!   "targets": [{
//!     "name": "Stage",
//!     "variables": [{ "name": "result", "value": "" }],
//!     "blocks": [
//!       { "id": "hat", "opcode": "event_whenflagclicked", "topLevel": true, "next": "say" },
//!       { "id": "say", "opcode": "looks_say", "parent": "hat", "inputs": { "MESSAGE": "hi" } }
//!     ]
//!   }]
//! }
//! ```

mod block;
mod target;

pub use block::{
    Block, BlockContainer, BlockId, Input, Literal, GREEN_FLAG_HAT, PROCEDURE_DEFINITION,
};
pub use target::{Target, TargetId, Variable};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;

/// Errors raised while loading a project
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// File could not be read
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Project has no targets
    #[error("Project has no targets")]
    NoTargets,

    /// Two blocks in one target share an ID
    #[error("Duplicate block '{block}' in target '{target}'")]
    DuplicateBlock {
        /// Target name
        target: String,
        /// Block ID
        block: String,
    },

    /// A block refers to a block that does not exist
    #[error("Block '{block}' in target '{target}' refers to missing block '{missing}'")]
    DanglingReference {
        /// Target name
        target: String,
        /// Referring block
        block: String,
        /// Missing block
        missing: String,
    },

    /// Blocks refer to each other in a cycle
    #[error("Block '{block}' in target '{target}' is part of a reference cycle")]
    Cycle {
        /// Target name
        target: String,
        /// A block on the cycle
        block: String,
    },
}

#[derive(Debug, Deserialize)]
struct ProjectDef {
    targets: Vec<TargetDef>,
}

#[derive(Debug, Deserialize)]
struct TargetDef {
    name: String,
    #[serde(default)]
    variables: Vec<VariableDef>,
    #[serde(default)]
    blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct VariableDef {
    name: String,
    #[serde(default = "empty_literal")]
    value: Literal,
}

fn empty_literal() -> Literal {
    Literal::Str(String::new())
}

/// A loaded, validated project
#[derive(Debug, Clone)]
pub struct Project {
    /// Targets; index 0 is the stage
    pub targets: Vec<Target>,
}

impl Project {
    /// Parse and validate a project from JSON text
    pub fn from_json(source: &str) -> Result<Self, ProjectError> {
        let def: ProjectDef = serde_json::from_str(source)?;
        Self::from_def(def)
    }

    /// Load a project file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Build a project from already constructed targets
    pub fn from_targets(targets: Vec<Target>) -> Result<Self, ProjectError> {
        if targets.is_empty() {
            return Err(ProjectError::NoTargets);
        }
        for target in &targets {
            validate(target)?;
        }
        Ok(Self { targets })
    }

    fn from_def(def: ProjectDef) -> Result<Self, ProjectError> {
        let mut targets = Vec::with_capacity(def.targets.len());
        for (index, target_def) in def.targets.into_iter().enumerate() {
            let mut blocks = BlockContainer::new();
            for block in target_def.blocks {
                let id = block.id.to_string();
                if !blocks.insert(block) {
                    return Err(ProjectError::DuplicateBlock {
                        target: target_def.name,
                        block: id,
                    });
                }
            }
            let mut target = Target::new(TargetId(index), target_def.name, blocks);
            for variable in target_def.variables {
                target.set_variable(&variable.name, (&variable.value).into());
            }
            targets.push(target);
        }
        Self::from_targets(targets)
    }

    /// Get a target by ID
    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.get(id.0)
    }

    /// Find a target by name
    pub fn target_by_name(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Check that every reference resolves and that no block reaches itself
fn validate(target: &Target) -> Result<(), ProjectError> {
    let blocks = &target.blocks;
    for block in blocks.iter() {
        for reference in block.references() {
            if !blocks.contains(reference) {
                return Err(ProjectError::DanglingReference {
                    target: target.name.clone(),
                    block: block.id.to_string(),
                    missing: reference.to_string(),
                });
            }
        }
    }

    let mut marks: FxHashMap<&BlockId, Mark> = FxHashMap::default();
    for root in blocks.iter() {
        if marks.contains_key(&root.id) {
            continue;
        }
        // Iterative DFS; the stack holds (block, whether its children were pushed)
        let mut stack = vec![(&root.id, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                marks.insert(id, Mark::Done);
                continue;
            }
            match marks.get(id) {
                Some(Mark::Done) => continue,
                Some(Mark::Visiting) => {
                    return Err(ProjectError::Cycle {
                        target: target.name.clone(),
                        block: id.to_string(),
                    })
                }
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            stack.push((id, true));
            if let Some(block) = blocks.get(id) {
                for child in block.references() {
                    match marks.get(child) {
                        Some(Mark::Visiting) => {
                            return Err(ProjectError::Cycle {
                                target: target.name.clone(),
                                block: child.to_string(),
                            })
                        }
                        Some(Mark::Done) => {}
                        None => stack.push((child, false)),
                    }
                }
            }
        }
    }
    Ok(())
}
