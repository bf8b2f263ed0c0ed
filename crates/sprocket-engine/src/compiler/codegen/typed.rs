//! Typed expression fragments
//!
//! Every generated expression declares the runtime type it leaves on the
//! stack. Consumers ask for the type they need and a conversion op is
//! appended only when the declared type differs.

use super::op::Op;

/// Static type of an expression's result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Any value, including tasks
    Unknown,
    /// Always a boolean
    Boolean,
    /// Always a number
    Number,
    /// Always a string
    String,
}

/// Ops computing one value, plus its declared type
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    /// Ops leaving exactly one value on the stack
    pub ops: Vec<Op>,
    /// Declared type
    pub ty: ValueType,
}

impl TypedExpr {
    /// Create a typed expression
    pub fn new(ops: Vec<Op>, ty: ValueType) -> Self {
        Self { ops, ty }
    }

    /// Use the value as-is
    pub fn as_unknown(self) -> Vec<Op> {
        self.ops
    }

    /// Use the value as a boolean
    pub fn as_boolean(self) -> Vec<Op> {
        self.convert(ValueType::Boolean, Op::ToBool)
    }

    /// Use the value as a number
    pub fn as_number(self) -> Vec<Op> {
        self.convert(ValueType::Number, Op::ToNum)
    }

    /// Use the value as a string
    pub fn as_string(self) -> Vec<Op> {
        self.convert(ValueType::String, Op::ToStr)
    }

    fn convert(mut self, wanted: ValueType, cast: Op) -> Vec<Op> {
        if self.ty != wanted {
            self.ops.push(cast);
        }
        self.ops
    }
}
