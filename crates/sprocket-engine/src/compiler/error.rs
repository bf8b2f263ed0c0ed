//! Compiler errors

/// Errors raised while lowering blocks or generating code
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The lowering pass has no rule for an opcode
    #[error("Unknown opcode '{opcode}' on block {block}")]
    UnknownOpcode {
        /// Opcode
        opcode: String,
        /// Block carrying the opcode
        block: String,
    },

    /// A referenced block does not exist
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// A block is missing a required field
    #[error("Block {block} is missing field {field}")]
    MissingField {
        /// Block ID
        block: String,
        /// Field name
        field: String,
    },

    /// A suspension point was emitted into a script not marked as yielding
    #[error("Script '{script}' suspends but was not lowered as yielding")]
    SuspensionNotEnabled {
        /// Script name
        script: String,
    },
}

/// Compiler result type
pub type CompileResult<T> = Result<T, CompileError>;
