//! Runtime errors

use crate::compiler::CompileError;
use crate::project::ProjectError;
use crate::vm::VmError;

/// Errors surfaced by the `Runtime`
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File could not be read
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Project failed to load
    #[error("{0}")]
    Project(#[from] ProjectError),

    /// Script failed to compile
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// Script failed while running
    #[error("Runtime error: {0}")]
    Vm(#[from] VmError),

    /// Malformed options file
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}
