use std::{fmt, rc::Rc};

use crate::{
    ast::Literal,
    interpreter::{
        semantic::types::Type,
        value::function::{Builtin, FunctionValue},
    },
};

/// Represents a runtime value in the interpreter.
///
/// Values are immutable; assignment replaces the binding, never the value.
/// Function values are reference counted so that every binding of the same
/// function shares one body and one closure handle.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer. Arithmetic wraps on overflow.
    Int(i64),
    /// A string.
    String(String),
    /// `true` or `false`. The only type accepted as a condition.
    Boolean(bool),
    /// The result of statements and of functions without a return value.
    Unit,
    /// A user-defined function together with its closure environment.
    Function(Rc<FunctionValue>),
    /// A native function provided by the interpreter.
    Builtin(Builtin),
}

impl Value {
    /// The runtime counterpart of the value's static type.
    ///
    /// Functions have no nominal type in the language and report `Any`.
    ///
    /// # Example
    /// ```
    /// use ktinterp::interpreter::{semantic::types::Type, value::core::Value};
    ///
    /// assert_eq!(Value::Int(3).runtime_type(), Type::Int);
    /// assert_eq!(Value::Unit.runtime_type(), Type::Unit);
    /// ```
    #[must_use]
    pub const fn runtime_type(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::String(_) => Type::String,
            Self::Boolean(_) => Type::Boolean,
            Self::Unit => Type::Unit,
            Self::Function(_) | Self::Builtin(_) => Type::Any,
        }
    }

    /// The type name used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Function(_) | Self::Builtin(_) => "Function",
            _ => self.runtime_type().name(),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(n) => Self::Int(*n),
            Literal::String(s) => Self::String(s.clone()),
            Literal::Boolean(b) => Self::Boolean(*b),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl PartialEq for Value {
    /// Structural equality for data, identity for functions and name equality
    /// for built-ins. Values of different kinds are never equal.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Unit, Self::Unit) => true,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Unit => f.write_str("kotlin.Unit"),
            Self::Function(function) => {
                let names: Vec<_> = function.parameters.iter().map(|p| p.name.as_str()).collect();
                write!(f, "<function({})>", names.join(", "))
            },
            Self::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Unit.to_string(), "kotlin.Unit");
    }

    #[test]
    fn kinds_never_compare_equal() {
        assert_ne!(Value::Int(1), Value::from("1"));
        assert_ne!(Value::Unit, Value::Boolean(false));
        assert_eq!(Value::from(true), Value::Boolean(true));
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Int(0).type_name(), "Int");
        assert_eq!(Value::from("").type_name(), "String");
        assert_eq!(Value::Unit.type_name(), "Unit");
    }
}
