//! IR scripts and programs

use super::node::StackNode;
use crate::project::BlockId;

/// One lowered stack of blocks
#[derive(Debug, Clone, PartialEq)]
pub struct IrScript {
    /// Display name (`script <top>` or the procedure name)
    pub name: String,
    /// First block (the hat)
    pub top: BlockId,
    /// Whether running the script may suspend its thread
    pub yields: bool,
    /// Statements
    pub body: Vec<StackNode>,
    /// Procedures called directly from this script, in call order
    pub calls: Vec<String>,
}

impl IrScript {
    /// Create an empty, non-yielding script
    pub fn new(name: impl Into<String>, top: BlockId) -> Self {
        Self {
            name: name.into(),
            top,
            yields: false,
            body: Vec::new(),
            calls: Vec::new(),
        }
    }
}

/// A lowered green-flag script and the procedures it reaches
#[derive(Debug, Clone, PartialEq)]
pub struct IrProgram {
    /// Script the thread starts in
    pub entry: IrScript,
    /// Reachable procedures in discovery order
    pub procedures: Vec<IrScript>,
}

impl IrProgram {
    /// Find a procedure by name
    pub fn procedure(&self, name: &str) -> Option<&IrScript> {
        self.procedures.iter().find(|p| p.name == name)
    }

    /// Iterate over the entry script and every procedure
    pub fn scripts(&self) -> impl Iterator<Item = &IrScript> {
        std::iter::once(&self.entry).chain(self.procedures.iter())
    }

    /// Mark every script that calls a yielding script as yielding, until
    /// nothing changes.
    pub fn propagate_yields(&mut self) {
        loop {
            let yielding: Vec<String> = self
                .procedures
                .iter()
                .filter(|p| p.yields)
                .map(|p| p.name.clone())
                .collect();
            let mut changed = false;
            for script in std::iter::once(&mut self.entry).chain(self.procedures.iter_mut()) {
                if !script.yields && script.calls.iter().any(|c| yielding.contains(c)) {
                    script.yields = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }
}
