//! Blocks and block containers
//!
//! A block is one instruction instance in a target's instruction graph. Stacked
//! blocks are chained through `next`; reporters and substacks hang off `inputs`.

use crate::vm::value::Value;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::sync::Arc;

/// Opcode of the hat that starts a script on green flag
pub const GREEN_FLAG_HAT: &str = "event_whenflagclicked";

/// Opcode of a procedure definition hat
pub const PROCEDURE_DEFINITION: &str = "procedures_definition";

/// Block identifier (unique within a target)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct BlockId(Arc<str>);

impl BlockId {
    /// Create a block ID from a string
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A literal value written directly into an input slot
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal
    Bool(bool),
    /// Numeric literal
    Num(f64),
    /// Text literal
    Str(String),
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Num(n) => Value::Num(*n),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}

/// An input slot: either a nested block (reporter or substack) or a literal
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Input {
    /// Reference to another block
    Block {
        /// Referenced block
        block: BlockId,
    },
    /// Literal value
    Literal(Literal),
}

/// A single instruction instance
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    /// Unique identifier
    pub id: BlockId,
    /// Instruction kind (e.g. `data_setvariableto`, `task_await`)
    pub opcode: String,
    /// Next block in the stack
    #[serde(default)]
    pub next: Option<BlockId>,
    /// Parent block (previous stacked block, or the block owning this input)
    #[serde(default)]
    pub parent: Option<BlockId>,
    /// Input slots
    #[serde(default)]
    pub inputs: FxHashMap<String, Input>,
    /// Fields (variable names, procedure names)
    #[serde(default)]
    pub fields: FxHashMap<String, String>,
    /// Whether this block starts a script
    #[serde(default, rename = "topLevel")]
    pub top_level: bool,
}

impl Block {
    /// Create a block with no inputs or fields
    pub fn new(id: impl AsRef<str>, opcode: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(id),
            opcode: opcode.into(),
            next: None,
            parent: None,
            inputs: FxHashMap::default(),
            fields: FxHashMap::default(),
            top_level: false,
        }
    }

    /// Get an input slot
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.get(name)
    }

    /// Get the block referenced by an input slot (substacks, reporters)
    pub fn input_block(&self, name: &str) -> Option<&BlockId> {
        match self.inputs.get(name) {
            Some(Input::Block { block }) => Some(block),
            _ => None,
        }
    }

    /// Get a field value
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Iterate over every block this block refers to (next and block inputs)
    pub fn references(&self) -> impl Iterator<Item = &BlockId> {
        self.next.iter().chain(self.inputs.values().filter_map(|input| match input {
            Input::Block { block } => Some(block),
            Input::Literal(_) => None,
        }))
    }
}

/// All blocks of one target, in declaration order
#[derive(Debug, Clone, Default)]
pub struct BlockContainer {
    /// Blocks in declaration order
    blocks: Vec<Block>,
    /// Block lookup map for fast access
    index: FxHashMap<BlockId, usize>,
    /// Procedure definitions by name
    procedures: FxHashMap<String, usize>,
}

impl BlockContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block, returning `false` if the ID is already taken
    pub fn insert(&mut self, block: Block) -> bool {
        if self.index.contains_key(&block.id) {
            return false;
        }
        let position = self.blocks.len();
        if block.opcode == PROCEDURE_DEFINITION {
            if let Some(name) = block.field("NAME") {
                self.procedures.entry(name.to_string()).or_insert(position);
            }
        }
        self.index.insert(block.id.clone(), position);
        self.blocks.push(block);
        true
    }

    /// Get a block by ID
    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.index.get(id).map(|&idx| &self.blocks[idx])
    }

    /// Check whether a block exists
    pub fn contains(&self, id: &BlockId) -> bool {
        self.index.contains_key(id)
    }

    /// Get the definition hat of a procedure
    pub fn procedure(&self, name: &str) -> Option<&Block> {
        self.procedures.get(name).map(|&idx| &self.blocks[idx])
    }

    /// Top-level blocks with the given opcode, in declaration order
    pub fn hats<'a>(&'a self, opcode: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks
            .iter()
            .filter(move |b| b.top_level && b.opcode == opcode)
    }

    /// Iterate over all blocks
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the container has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
