use std::fmt;

use crate::ast::{BinaryOperator, UnaryOperator};

/// The six nominal types of the language.
///
/// `Any` accepts every type as a source, `Nothing` is accepted by every target;
/// otherwise types must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    String,
    Boolean,
    Unit,
    Any,
    Nothing,
}

impl Type {
    /// Resolves a type name.
    ///
    /// # Example
    /// ```
    /// use ktinterp::interpreter::semantic::types::Type;
    ///
    /// assert_eq!(Type::from_name("Int"), Some(Type::Int));
    /// assert_eq!(Type::from_name("Double"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "Int" => Self::Int,
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "Unit" => Self::Unit,
            "Any" => Self::Any,
            "Nothing" => Self::Nothing,
            _ => return None,
        };
        Some(ty)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Unit => "Unit",
            Self::Any => "Any",
            Self::Nothing => "Nothing",
        }
    }

    /// Whether a value of type `source` can be used where `target` is
    /// expected. The relation is asymmetric.
    ///
    /// # Example
    /// ```
    /// use ktinterp::interpreter::semantic::types::Type;
    ///
    /// assert!(Type::is_compatible(Type::Int, Type::Any));
    /// assert!(!Type::is_compatible(Type::Any, Type::Int));
    /// assert!(Type::is_compatible(Type::Nothing, Type::String));
    /// ```
    #[must_use]
    pub fn is_compatible(source: Self, target: Self) -> bool {
        source == target || target == Self::Any || source == Self::Nothing
    }

    /// Whether a value of type `value` may be stored in a binding declared as
    /// `target`.
    #[must_use]
    pub fn can_assign(target: Self, value: Self) -> bool {
        Self::is_compatible(value, target)
    }

    /// Result type of `left op right`, or `None` if the operator does not
    /// apply to these operand types.
    ///
    /// - `+` yields `String` if either side is `String`, else needs two `Int`s.
    /// - `- * / %` and the ordering operators need two `Int`s.
    /// - `== !=` need one side compatible with the other.
    /// - `&& ||` need two `Boolean`s.
    #[must_use]
    pub fn binary_result_type(op: BinaryOperator, left: Self, right: Self) -> Option<Self> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub,
        };

        match op {
            Add if left == Self::String || right == Self::String => Some(Self::String),
            Add | Sub | Mul | Div | Mod => {
                (left == Self::Int && right == Self::Int).then_some(Self::Int)
            },
            Equal | NotEqual => {
                (Self::is_compatible(left, right) || Self::is_compatible(right, left))
                    .then_some(Self::Boolean)
            },
            Less | LessEqual | Greater | GreaterEqual => {
                (left == Self::Int && right == Self::Int).then_some(Self::Boolean)
            },
            And | Or => (left == Self::Boolean && right == Self::Boolean).then_some(Self::Boolean),
        }
    }

    /// Result type of `op operand`, or `None` if the operator does not apply.
    #[must_use]
    pub fn unary_result_type(op: UnaryOperator, operand: Self) -> Option<Self> {
        match op {
            UnaryOperator::Negate => (operand == Self::Int).then_some(Self::Int),
            UnaryOperator::Not => (operand == Self::Boolean).then_some(Self::Boolean),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_concatenates_when_either_side_is_a_string() {
        assert_eq!(Type::binary_result_type(BinaryOperator::Add, Type::String, Type::Int),
                   Some(Type::String));
        assert_eq!(Type::binary_result_type(BinaryOperator::Add, Type::Boolean, Type::String),
                   Some(Type::String));
        assert_eq!(Type::binary_result_type(BinaryOperator::Add, Type::Int, Type::Int),
                   Some(Type::Int));
        assert_eq!(Type::binary_result_type(BinaryOperator::Add, Type::Int, Type::Boolean), None);
    }

    #[test]
    fn arithmetic_requires_ints() {
        assert_eq!(Type::binary_result_type(BinaryOperator::Sub, Type::Int, Type::String), None);
        assert_eq!(Type::binary_result_type(BinaryOperator::Mod, Type::Int, Type::Int),
                   Some(Type::Int));
    }

    #[test]
    fn equality_uses_compatibility_in_either_direction() {
        assert_eq!(Type::binary_result_type(BinaryOperator::Equal, Type::Int, Type::Any),
                   Some(Type::Boolean));
        assert_eq!(Type::binary_result_type(BinaryOperator::NotEqual, Type::Any, Type::String),
                   Some(Type::Boolean));
        assert_eq!(Type::binary_result_type(BinaryOperator::Equal, Type::Int, Type::String), None);
    }

    #[test]
    fn logic_and_ordering() {
        assert_eq!(Type::binary_result_type(BinaryOperator::And, Type::Boolean, Type::Boolean),
                   Some(Type::Boolean));
        assert_eq!(Type::binary_result_type(BinaryOperator::Or, Type::Boolean, Type::Int), None);
        assert_eq!(Type::binary_result_type(BinaryOperator::Less, Type::Int, Type::Int),
                   Some(Type::Boolean));
        assert_eq!(Type::binary_result_type(BinaryOperator::Less, Type::String, Type::String),
                   None);
    }

    #[test]
    fn unary_operators() {
        assert_eq!(Type::unary_result_type(UnaryOperator::Negate, Type::Int), Some(Type::Int));
        assert_eq!(Type::unary_result_type(UnaryOperator::Negate, Type::Boolean), None);
        assert_eq!(Type::unary_result_type(UnaryOperator::Not, Type::Boolean),
                   Some(Type::Boolean));
    }

    #[test]
    fn assignment_direction() {
        assert!(Type::can_assign(Type::Any, Type::Int));
        assert!(!Type::can_assign(Type::Int, Type::Any));
        assert!(Type::can_assign(Type::Unit, Type::Nothing));
    }
}
