//! Display conversion for monitors and value reports
//!
//! Monitors and "show value" surfaces go through a `ValueRenderer` instead of
//! the plain string cast. `TaskRenderer` shows tasks with their status and
//! result and defers every other value to the renderer it wraps.

use super::value::Value;

/// Converts values to display text
pub trait ValueRenderer: Send + Sync {
    /// Render a value
    fn render(&self, value: &Value) -> String;
}

/// Renders every value with its plain string cast
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl ValueRenderer for PlainRenderer {
    fn render(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Renders tasks as `<pending task>` / `<fulfilled task with ...>`
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskRenderer<R> {
    inner: R,
}

impl<R: ValueRenderer> TaskRenderer<R> {
    /// Wrap a renderer
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: ValueRenderer> ValueRenderer for TaskRenderer<R> {
    fn render(&self, value: &Value) -> String {
        match value {
            Value::Task(task) => task.display(),
            other => self.inner.render(other),
        }
    }
}

/// One monitored variable
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorEntry {
    /// Owning target
    pub target: String,
    /// Variable name
    pub name: String,
    /// Rendered value
    pub text: String,
}
