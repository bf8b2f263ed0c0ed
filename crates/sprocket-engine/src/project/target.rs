//! Targets (the stage and sprites)

use super::block::BlockContainer;
use crate::vm::value::Value;
use std::sync::Arc;

/// Index of a target within its project
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub usize);

impl TargetId {
    /// The stage is always the first target
    pub const STAGE: TargetId = TargetId(0);

    /// Get the numeric index
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "target{}", self.0)
    }
}

/// A named variable slot
#[derive(Debug, Clone)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Current value
    pub value: Value,
}

/// A target: variables plus the blocks that run against it
#[derive(Debug, Clone)]
pub struct Target {
    /// Index in the project
    pub id: TargetId,
    /// Display name
    pub name: String,
    /// Variables in declaration order
    pub variables: Vec<Variable>,
    /// Instruction graph (shared with running threads)
    pub blocks: Arc<BlockContainer>,
}

impl Target {
    /// Create a target with no variables
    pub fn new(id: TargetId, name: impl Into<String>, blocks: BlockContainer) -> Self {
        Self {
            id,
            name: name.into(),
            variables: Vec::new(),
            blocks: Arc::new(blocks),
        }
    }

    /// Look up a variable
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .map(|v| &v.value)
    }

    /// Look up a variable mutably
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.variables
            .iter_mut()
            .find(|v| v.name == name)
            .map(|v| &mut v.value)
    }

    /// Set a variable, creating it if it does not exist
    pub fn set_variable(&mut self, name: &str, value: Value) {
        match self.variable_mut(name) {
            Some(slot) => *slot = value,
            None => self.variables.push(Variable {
                name: name.to_string(),
                value,
            }),
        }
    }
}
