//! Pretty-printing for IR
//!
//! Provides human-readable output for debugging IR structures.

use super::node::{InputNode, StackNode, TaskInput, TaskStack};
use super::script::{IrProgram, IrScript};
use std::fmt::Write;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    /// Render as indented text
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for IrProgram {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        for script in self.scripts() {
            output.push_str(&script.pretty_print());
            writeln!(output).unwrap();
        }
        output
    }
}

impl PrettyPrint for IrScript {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        let marker = if self.yields { " yields" } else { "" };
        writeln!(output, "{} @{}{} {{", self.name, self.top, marker).unwrap();
        for node in &self.body {
            write_stack(&mut output, node, 2);
        }
        writeln!(output, "}}").unwrap();
        output
    }
}

impl PrettyPrint for InputNode {
    fn pretty_print(&self) -> String {
        match self {
            InputNode::Constant(value) => format!("{:?}", value.to_string()),
            InputNode::Variable { name } => format!("var({})", name),
            InputNode::Join { left, right } => {
                format!("join({}, {})", left.pretty_print(), right.pretty_print())
            }
            InputNode::Equals { left, right } => {
                format!("equals({}, {})", left.pretty_print(), right.pretty_print())
            }
            InputNode::Task(task) => match task {
                TaskInput::Create | TaskInput::Current => task.kind().to_string(),
                TaskInput::Await { task: inner } | TaskInput::Status { task: inner } => {
                    format!("{}({})", task.kind(), inner.pretty_print())
                }
                TaskInput::Async { substack: Some(body) } => {
                    format!("{}(@{})", task.kind(), body)
                }
                TaskInput::Async { substack: None } => format!("{}()", task.kind()),
            },
        }
    }
}

fn write_stack(output: &mut String, node: &StackNode, indent: usize) {
    let prefix = " ".repeat(indent);
    let written = match node {
        StackNode::SetVariable { name, value } => {
            writeln!(output, "{}{} {} = {}", prefix, node.kind(), name, value.pretty_print())
        }
        StackNode::ChangeVariable { name, delta } => {
            writeln!(output, "{}{} {} += {}", prefix, node.kind(), name, delta.pretty_print())
        }
        StackNode::Say { message } => {
            writeln!(output, "{}{} {}", prefix, node.kind(), message.pretty_print())
        }
        StackNode::If { condition, body } => {
            writeln!(output, "{}{} {} {{", prefix, node.kind(), condition.pretty_print()).unwrap();
            for child in body {
                write_stack(output, child, indent + 2);
            }
            writeln!(output, "{}}}", prefix)
        }
        StackNode::Repeat { times, body } => {
            writeln!(output, "{}{} {} {{", prefix, node.kind(), times.pretty_print()).unwrap();
            for child in body {
                write_stack(output, child, indent + 2);
            }
            writeln!(output, "{}}}", prefix)
        }
        StackNode::Yield => writeln!(output, "{}{}", prefix, node.kind()),
        StackNode::Call { procedure } => {
            writeln!(output, "{}{} {}", prefix, node.kind(), procedure)
        }
        StackNode::Task(TaskStack::Resolve { task, value }) => writeln!(
            output,
            "{}{} {} <- {}",
            prefix,
            node.kind(),
            task.pretty_print(),
            value.pretty_print()
        ),
        StackNode::Task(TaskStack::AwaitNoReturn { task }) => {
            writeln!(output, "{}{} {}", prefix, node.kind(), task.pretty_print())
        }
    };
    written.unwrap();
}
