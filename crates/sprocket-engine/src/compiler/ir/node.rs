//! IR nodes
//!
//! Every node reports a `kind` string (`task.await`, `data.setVariable`, ...)
//! used by the pretty printer and in diagnostics.

use crate::project::BlockId;
use crate::vm::value::Value;

/// Task expressions
#[derive(Debug, Clone, PartialEq)]
pub enum TaskInput {
    /// New pending task
    Create,
    /// Wait for a task and produce its result
    Await {
        /// Task expression
        task: Box<InputNode>,
    },
    /// Whether a task has settled
    Status {
        /// Task expression
        task: Box<InputNode>,
    },
    /// Task attached to the running thread, or `""`
    Current,
    /// Spawn a branch as a new thread; the branch is not lowered here
    Async {
        /// First block of the branch, if one is attached
        substack: Option<BlockId>,
    },
}

/// Task statements
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStack {
    /// Settle a task
    Resolve {
        /// Task expression
        task: InputNode,
        /// Value expression
        value: InputNode,
    },
    /// Wait for a task, discarding its result
    AwaitNoReturn {
        /// Task expression
        task: InputNode,
    },
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum InputNode {
    /// Literal value
    Constant(Value),
    /// Variable read
    Variable {
        /// Variable name
        name: String,
    },
    /// String concatenation
    Join {
        /// Left operand
        left: Box<InputNode>,
        /// Right operand
        right: Box<InputNode>,
    },
    /// Loose equality
    Equals {
        /// Left operand
        left: Box<InputNode>,
        /// Right operand
        right: Box<InputNode>,
    },
    /// Task expression
    Task(TaskInput),
}

/// A statement
#[derive(Debug, Clone, PartialEq)]
pub enum StackNode {
    /// Assign a variable
    SetVariable {
        /// Variable name
        name: String,
        /// New value
        value: InputNode,
    },
    /// Add to a variable
    ChangeVariable {
        /// Variable name
        name: String,
        /// Amount
        delta: InputNode,
    },
    /// Append to the say log
    Say {
        /// Message
        message: InputNode,
    },
    /// Conditional
    If {
        /// Condition
        condition: InputNode,
        /// Body run when the condition holds
        body: Vec<StackNode>,
    },
    /// Counted loop; yields after every iteration
    Repeat {
        /// Iteration count
        times: InputNode,
        /// Loop body
        body: Vec<StackNode>,
    },
    /// End the thread's turn
    Yield,
    /// Run a procedure to completion
    Call {
        /// Procedure name
        procedure: String,
    },
    /// Task statement
    Task(TaskStack),
}

impl TaskInput {
    /// Node kind
    pub fn kind(&self) -> &'static str {
        match self {
            TaskInput::Create => "task.create",
            TaskInput::Await { .. } => "task.await",
            TaskInput::Status { .. } => "task.status",
            TaskInput::Current => "task.current",
            TaskInput::Async { .. } => "task.async",
        }
    }
}

impl TaskStack {
    /// Node kind
    pub fn kind(&self) -> &'static str {
        match self {
            TaskStack::Resolve { .. } => "task.resolve",
            TaskStack::AwaitNoReturn { .. } => "task.awaitNoReturn",
        }
    }
}

impl InputNode {
    /// Node kind
    pub fn kind(&self) -> &'static str {
        match self {
            InputNode::Constant(_) => "constant",
            InputNode::Variable { .. } => "data.variable",
            InputNode::Join { .. } => "op.join",
            InputNode::Equals { .. } => "op.equals",
            InputNode::Task(task) => task.kind(),
        }
    }
}

impl StackNode {
    /// Node kind
    pub fn kind(&self) -> &'static str {
        match self {
            StackNode::SetVariable { .. } => "var.set",
            StackNode::ChangeVariable { .. } => "var.change",
            StackNode::Say { .. } => "looks.say",
            StackNode::If { .. } => "control.if",
            StackNode::Repeat { .. } => "control.repeat",
            StackNode::Yield => "control.yield",
            StackNode::Call { .. } => "procedures.call",
            StackNode::Task(task) => task.kind(),
        }
    }
}
