//! Opcode handler modules for the interpreter
//!
//! Each module implements a category of block handlers as methods on `Interpreter`.

pub mod control;
pub mod data;
pub mod task;
