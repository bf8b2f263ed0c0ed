//! Tagged runtime values
//!
//! Every value flowing between blocks is a `Value`. Tasks are one variant among
//! the ordinary scalar kinds, so consumers decide "is this a task?" by matching
//! on the tag rather than by inspecting the value at runtime.

use super::task::Task;
use std::fmt;

/// A runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// Text
    Str(String),
    /// Number
    Num(f64),
    /// Boolean
    Bool(bool),
    /// Task (future)
    Task(Task),
}

impl Value {
    /// The empty string, used wherever the host has "no value"
    pub fn empty() -> Self {
        Value::Str(String::new())
    }

    /// Get the task if this value is one
    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Value::Task(task) => Some(task),
            _ => None,
        }
    }

    /// Check if this value is a task
    pub fn is_task(&self) -> bool {
        matches!(self, Value::Task(_))
    }

    /// Numeric conversion; anything unparsable becomes 0
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Num(n) if n.is_nan() => 0.0,
            Value::Num(n) => *n,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Str(s) => parse_number(s).filter(|n| !n.is_nan()).unwrap_or(0.0),
            Value::Task(task) => parse_number(&task.to_plain_string())
                .filter(|n| !n.is_nan())
                .unwrap_or(0.0),
        }
    }

    /// Iteration count for `repeat`: the number rounded to the nearest integer
    pub fn to_count(&self) -> i64 {
        // `as` saturates, so Infinity repeats "forever" in practice
        self.to_number().round() as i64
    }

    /// Truthiness: `""`, `"0"`, `"false"`, 0 and NaN are false
    pub fn to_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => text_truthy(s),
            Value::Task(task) => text_truthy(&task.to_plain_string()),
        }
    }

    /// Loose equality: numeric when both sides look like numbers,
    /// case-insensitive text comparison otherwise
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string().to_lowercase() == other.to_string().to_lowercase(),
        }
    }

    /// Numeric interpretation for comparisons (None for text and whitespace)
    fn numeric(&self) -> Option<f64> {
        match self {
            Value::Num(n) if n.is_nan() => None,
            Value::Num(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Str(s) => parse_number(s).filter(|n| !n.is_nan()),
            Value::Task(task) => parse_number(&task.to_plain_string()).filter(|n| !n.is_nan()),
        }
    }
}

fn text_truthy(s: &str) -> bool {
    !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
}

/// Parse host number syntax (decimal, exponent, `Infinity`)
fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Reject Rust-only spellings such as "inf" and "nan"
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Format a number the way the host prints it (no trailing `.0`)
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    /// Plain string cast. A task casts to its result once settled and to the
    /// empty string while pending.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Num(n) => f.write_str(&format_number(*n)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Task(task) => f.write_str(&task.to_plain_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Task(a), Value::Task(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Task> for Value {
    fn from(task: Task) -> Self {
        Value::Task(task)
    }
}
