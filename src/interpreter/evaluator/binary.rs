use std::io::Write;

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        semantic::types::Type,
        value::core::Value,
    },
    location::SourceLocation,
};

impl<W: Write> Evaluator<W> {
    /// Evaluates the operands of a binary expression and combines them.
    ///
    /// `&&` and `||` skip their right operand when the left one decides the
    /// result. Every other operator evaluates left to right.
    pub(crate) fn eval_binary_expr(&mut self,
                                   op: BinaryOperator,
                                   left: &Expr,
                                   right: &Expr,
                                   location: &SourceLocation)
                                   -> EvalResult<Value> {
        let left = self.eval(left)?;

        match (op, &left) {
            (BinaryOperator::And, Value::Boolean(false)) => return Ok(Value::Boolean(false)),
            (BinaryOperator::Or, Value::Boolean(true)) => return Ok(Value::Boolean(true)),
            _ => {},
        }

        let right = self.eval(right)?;
        Self::eval_binary(op, &left, &right, location)
    }

    /// Evaluates a binary operation between two values.
    ///
    /// The operand types are checked with the same rules the type system uses
    /// for static types, applied to the values' runtime types:
    /// - `+` concatenates when either side is a string, else adds integers.
    /// - `- * / %` and ordering need integers. Arithmetic wraps; division
    ///   and remainder truncate toward zero and fail on a zero divisor.
    /// - `==` and `!=` need types compatible in either direction.
    /// - `&&` and `||` need booleans.
    ///
    /// # Errors
    /// `InvalidOperands` on a type mismatch; `DivisionByZero` or
    /// `ModuloByZero` for a zero divisor.
    ///
    /// # Example
    /// ```
    /// use ktinterp::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    ///     location::SourceLocation,
    /// };
    ///
    /// type Eval = Evaluator<Vec<u8>>;
    /// let at = SourceLocation::start();
    ///
    /// let sum = Eval::eval_binary(BinaryOperator::Add, &Value::Int(3), &Value::Int(4), &at);
    /// assert_eq!(sum.unwrap(), Value::Int(7));
    ///
    /// let text = Eval::eval_binary(BinaryOperator::Add, &Value::from("n="), &Value::Int(4), &at);
    /// assert_eq!(text.unwrap(), Value::from("n=4"));
    ///
    /// assert!(Eval::eval_binary(BinaryOperator::Div, &Value::Int(1), &Value::Int(0), &at).is_err());
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       location: &SourceLocation)
                       -> EvalResult<Value> {
        use BinaryOperator::{Add, And, Equal, NotEqual, Or};

        if Type::binary_result_type(op, left.runtime_type(), right.runtime_type()).is_none() {
            return Err(RuntimeError::InvalidOperands { op:       op.as_str(),
                                                       left:     left.type_name().to_string(),
                                                       right:    right.type_name().to_string(),
                                                       location: location.clone(), });
        }

        let value = match (op, left, right) {
            (Add, Value::String(_), _) | (Add, _, Value::String(_)) => {
                Value::String(format!("{left}{right}"))
            },
            (Equal, ..) => Value::Boolean(left == right),
            (NotEqual, ..) => Value::Boolean(left != right),
            (And, Value::Boolean(a), Value::Boolean(b)) => Value::Boolean(*a && *b),
            (Or, Value::Boolean(a), Value::Boolean(b)) => Value::Boolean(*a || *b),
            (_, Value::Int(a), Value::Int(b)) => Self::eval_integer(op, *a, *b, location)?,
            _ => {
                return Err(RuntimeError::InvalidOperands { op:       op.as_str(),
                                                           left:     left.type_name().to_string(),
                                                           right:    right.type_name().to_string(),
                                                           location: location.clone(), });
            },
        };

        Ok(value)
    }

    fn eval_integer(op: BinaryOperator,
                    a: i64,
                    b: i64,
                    location: &SourceLocation)
                    -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, Sub};

        let value = match op {
            Add => Value::Int(a.wrapping_add(b)),
            Sub => Value::Int(a.wrapping_sub(b)),
            Mul => Value::Int(a.wrapping_mul(b)),
            Div => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero { location: location.clone() });
                }
                Value::Int(a.wrapping_div(b))
            },
            Mod => {
                if b == 0 {
                    return Err(RuntimeError::ModuloByZero { location: location.clone() });
                }
                Value::Int(a.wrapping_rem(b))
            },
            Less => Value::Boolean(a < b),
            LessEqual => Value::Boolean(a <= b),
            Greater => Value::Boolean(a > b),
            GreaterEqual => Value::Boolean(a >= b),
            _ => {
                return Err(RuntimeError::InvalidOperands { op:       op.as_str(),
                                                           left:     "Int".to_string(),
                                                           right:    "Int".to_string(),
                                                           location: location.clone(), });
            },
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Eval = Evaluator<Vec<u8>>;

    fn binary(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        Eval::eval_binary(op, &left, &right, &SourceLocation::start())
    }

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn arithmetic_wraps_and_truncates() {
        assert_eq!(binary(BinaryOperator::Add, int(i64::MAX), int(1)).unwrap(), int(i64::MIN));
        assert_eq!(binary(BinaryOperator::Div, int(-7), int(2)).unwrap(), int(-3));
        assert_eq!(binary(BinaryOperator::Mod, int(-7), int(2)).unwrap(), int(-1));
        assert_eq!(binary(BinaryOperator::Div, int(i64::MIN), int(-1)).unwrap(), int(i64::MIN));
    }

    #[test]
    fn zero_divisors() {
        assert!(matches!(binary(BinaryOperator::Div, int(1), int(0)),
                         Err(RuntimeError::DivisionByZero { .. })));
        assert!(matches!(binary(BinaryOperator::Mod, int(1), int(0)),
                         Err(RuntimeError::ModuloByZero { .. })));
    }

    #[test]
    fn string_concatenation_uses_display() {
        assert_eq!(binary(BinaryOperator::Add, int(1), "x".into()).unwrap(), Value::from("1x"));
        assert_eq!(binary(BinaryOperator::Add, "ok: ".into(), true.into()).unwrap(),
                   Value::from("ok: true"));
    }

    #[test]
    fn mismatched_operands() {
        let err = binary(BinaryOperator::Sub, int(10), "hello".into()).unwrap_err();
        assert_eq!(err.to_string(), "Error at 1:1: Invalid operands for -: Int, String");
        assert!(binary(BinaryOperator::Equal, int(1), "1".into()).is_err());
        assert!(binary(BinaryOperator::Less, true.into(), false.into()).is_err());
        assert!(binary(BinaryOperator::And, int(1), true.into()).is_err());
    }

    #[test]
    fn equality_and_ordering() {
        assert_eq!(binary(BinaryOperator::Equal, "a".into(), "a".into()).unwrap(),
                   Value::Boolean(true));
        assert_eq!(binary(BinaryOperator::NotEqual, int(1), int(2)).unwrap(), Value::Boolean(true));
        assert_eq!(binary(BinaryOperator::GreaterEqual, int(2), int(2)).unwrap(),
                   Value::Boolean(true));
        assert_eq!(binary(BinaryOperator::Or, false.into(), true.into()).unwrap(),
                   Value::Boolean(true));
    }
}
