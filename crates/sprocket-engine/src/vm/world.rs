//! Mutable world state shared by both back-ends

use super::value::Value;
use super::{VmError, VmResult};
use crate::project::{BlockContainer, Target, TargetId};
use std::sync::Arc;

/// One line produced by a `say` block
#[derive(Debug, Clone, PartialEq)]
pub struct SayEntry {
    /// Tick on which the line was said (1-based)
    pub tick: u64,
    /// Name of the speaking target
    pub target: String,
    /// Spoken text
    pub text: String,
}

/// Targets, their variables, and the say log
#[derive(Debug, Clone)]
pub struct World {
    /// Targets; index 0 is the stage
    pub targets: Vec<Target>,
    /// Everything said so far
    pub say_log: Vec<SayEntry>,
    /// Current tick number
    pub tick: u64,
}

impl World {
    /// Create a world from a project's targets
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            say_log: Vec::new(),
            tick: 0,
        }
    }

    /// Get a target
    pub fn target(&self, id: TargetId) -> VmResult<&Target> {
        self.targets
            .get(id.index())
            .ok_or(VmError::TargetNotFound(id.index()))
    }

    /// Blocks of a target
    pub fn blocks(&self, id: TargetId) -> VmResult<Arc<BlockContainer>> {
        Ok(self.target(id)?.blocks.clone())
    }

    /// Read a variable; the target is searched first, then the stage.
    /// Unknown variables read as the empty string.
    pub fn variable(&self, target: TargetId, name: &str) -> Value {
        self.targets
            .get(target.index())
            .and_then(|t| t.variable(name))
            .or_else(|| {
                self.targets
                    .get(TargetId::STAGE.index())
                    .and_then(|stage| stage.variable(name))
            })
            .cloned()
            .unwrap_or_else(Value::empty)
    }

    /// Write a variable where it is visible from `target`.
    /// Unknown variables are created on `target`.
    pub fn set_variable(&mut self, target: TargetId, name: &str, value: Value) -> VmResult<()> {
        let local = self.target(target)?.variable(name).is_some();
        let owner = if !local
            && self
                .targets
                .get(TargetId::STAGE.index())
                .is_some_and(|stage| stage.variable(name).is_some())
        {
            TargetId::STAGE
        } else {
            target
        };
        self.targets[owner.index()].set_variable(name, value);
        Ok(())
    }

    /// Append a line to the say log
    pub fn say(&mut self, target: TargetId, text: String) -> VmResult<()> {
        let name = self.target(target)?.name.clone();
        self.say_log.push(SayEntry {
            tick: self.tick,
            target: name,
            text,
        });
        Ok(())
    }
}
