use thiserror::Error;

use crate::location::SourceLocation;

/// Represents all errors that can occur while evaluating a program.
///
/// Runtime errors abort evaluation. Every variant records the location of the
/// AST node that caused it.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A name that is not bound in any enclosing environment.
    #[error("Error at {location}: Undefined variable: '{name}'")]
    UndefinedVariable {
        /// The name that failed to resolve.
        name:     String,
        /// Where it was referenced.
        location: SourceLocation,
    },
    /// A binary operator applied to an unsupported pair of types.
    #[error("Error at {location}: Invalid operands for {op}: {left}, {right}")]
    InvalidOperands {
        /// The operator's spelling.
        op:       &'static str,
        /// Type name of the left operand.
        left:     String,
        /// Type name of the right operand.
        right:    String,
        /// Location of the operator expression.
        location: SourceLocation,
    },
    /// A unary operator applied to an unsupported type.
    #[error("Error at {location}: Invalid operand for {op}: {operand}")]
    InvalidOperand {
        /// The operator's spelling.
        op:       &'static str,
        /// Type name of the operand.
        operand:  String,
        /// Location of the operator expression.
        location: SourceLocation,
    },
    /// Integer division with a zero divisor.
    #[error("Error at {location}: Division by zero")]
    DivisionByZero {
        /// Location of the division.
        location: SourceLocation,
    },
    /// Integer remainder with a zero divisor.
    #[error("Error at {location}: Modulo by zero")]
    ModuloByZero {
        /// Location of the remainder operation.
        location: SourceLocation,
    },
    /// A call supplied the wrong number of arguments.
    #[error("Error at {location}: Function '{name}' expects {expected} argument(s), got {found}")]
    ArgumentCountMismatch {
        /// The called function.
        name:     String,
        /// Accepted argument count(s), e.g. `2` or `0 or 1`.
        expected: String,
        /// Number of arguments supplied.
        found:    usize,
        /// Location of the call.
        location: SourceLocation,
    },
    /// A call whose callee is bound to something other than a function.
    #[error("Error at {location}: '{name}' is not a function")]
    NotCallable {
        /// The callee name.
        name:     String,
        /// Location of the call.
        location: SourceLocation,
    },
    /// A non-Boolean value was used as a condition.
    #[error("Error at {location}: Type {type_name} cannot be used as condition")]
    InvalidCondition {
        /// Type name of the condition's value.
        type_name: String,
        /// Location of the condition.
        location:  SourceLocation,
    },
    /// Reassignment of a `val` binding or a function parameter.
    #[error("Error at {location}: Cannot assign to val '{name}'")]
    ImmutableAssignment {
        /// The binding name.
        name:     String,
        /// Location of the assignment.
        location: SourceLocation,
    },
    /// A value bound to a name whose declared type does not accept it.
    #[error("Error at {location}: Type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        /// The declared type.
        expected: String,
        /// The runtime type of the value.
        found:    String,
        /// Location of the binding.
        location: SourceLocation,
    },
    /// The output sink rejected a write.
    #[error("Error at {location}: Failed to write output: {source}")]
    Output {
        /// Underlying I/O error.
        source:   std::io::Error,
        /// Location of the printing call.
        location: SourceLocation,
    },
}

impl RuntimeError {
    /// Returns where the error occurred.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::UndefinedVariable { location, .. }
            | Self::InvalidOperands { location, .. }
            | Self::InvalidOperand { location, .. }
            | Self::DivisionByZero { location }
            | Self::ModuloByZero { location }
            | Self::ArgumentCountMismatch { location, .. }
            | Self::NotCallable { location, .. }
            | Self::InvalidCondition { location, .. }
            | Self::ImmutableAssignment { location, .. }
            | Self::TypeMismatch { location, .. }
            | Self::Output { location, .. } => location,
        }
    }
}
