use std::io::Write;

use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        semantic::types::Type,
        value::core::Value,
    },
    location::SourceLocation,
};

impl<W: Write> Evaluator<W> {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: wrapping integer negation.
    /// - `Not`: boolean negation.
    ///
    /// # Errors
    /// `InvalidOperand` if the operator does not apply to the value's type.
    ///
    /// # Example
    /// ```
    /// use ktinterp::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Evaluator, value::core::Value},
    ///     location::SourceLocation,
    /// };
    ///
    /// type Eval = Evaluator<Vec<u8>>;
    /// let at = SourceLocation::start();
    ///
    /// let v = Eval::eval_unary(UnaryOperator::Negate, &Value::Int(5), &at).unwrap();
    /// assert_eq!(v, Value::Int(-5));
    ///
    /// let v = Eval::eval_unary(UnaryOperator::Not, &Value::Boolean(false), &at).unwrap();
    /// assert_eq!(v, Value::Boolean(true));
    /// ```
    pub fn eval_unary(op: UnaryOperator,
                      value: &Value,
                      location: &SourceLocation)
                      -> EvalResult<Value> {
        let invalid = || RuntimeError::InvalidOperand { op:       op.as_str(),
                                                        operand:  value.type_name().to_string(),
                                                        location: location.clone(), };

        Type::unary_result_type(op, value.runtime_type()).ok_or_else(invalid)?;

        match (op, value) {
            (UnaryOperator::Negate, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
            (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            _ => Err(invalid()),
        }
    }
}
