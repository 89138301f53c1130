/// Binary operator evaluation logic.
///
/// Handles short-circuiting logic, integer arithmetic and comparison,
/// string concatenation and equality.
pub mod binary;
/// Native functions.
///
/// The builtin table and the `println` and `print` implementations.
pub mod builtin;
/// Core evaluation logic and program entry.
///
/// Contains the evaluator state, expression dispatch, variable declaration
/// and assignment.
pub mod core;
/// Runtime variable frames.
///
/// A generational arena of frames linked by parent handles, implementing
/// lexical scoping and closures.
pub mod environment;
/// Function call evaluation.
///
/// Handles user-defined and built-in calls, argument checking and the
/// frame switch into the callee's closure.
pub mod function;
/// Statement evaluation.
///
/// Blocks, `if`, `while`, `return` and local declarations, with explicit
/// propagation of early returns.
pub mod statement;
/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;
