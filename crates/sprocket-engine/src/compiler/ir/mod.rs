//! Intermediate Representation (IR) for block scripts
//!
//! The IR is a tree: each script is a list of stack nodes, and stack nodes
//! carry their input expressions as nested input nodes.
//!
//! # Structure
//!
//! - `IrProgram` - Entry script plus every procedure it reaches
//! - `IrScript` - One stack of blocks and whether it may suspend
//! - `StackNode` - A statement (stacked block)
//! - `InputNode` - An expression (reporter or literal)

pub mod node;
pub mod pretty;
pub mod script;

pub use node::{InputNode, StackNode, TaskInput, TaskStack};
pub use pretty::PrettyPrint;
pub use script::{IrProgram, IrScript};
