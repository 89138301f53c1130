/// Lexical errors.
///
/// Malformed token streams: unterminated strings or templates, unknown escape
/// sequences, stray characters and oversized integer literals.
pub mod lex_error;
/// Parsing errors.
///
/// Grammar violations detected while building the AST. Each error carries the
/// token at which the parser gave up.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, such as
/// undefined names, operand type mismatches, division by zero and bad calls.
pub mod runtime_error;
/// Semantic diagnostics.
///
/// Errors and warnings collected (not thrown) by the semantic passes, plus the
/// factory functions that build the common ones.
pub mod semantic_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use semantic_error::{Diagnostic, Diagnostics, Severity};
use thiserror::Error;

/// Any failure of the full source-to-result pipeline.
#[derive(Debug, Error)]
pub enum KtError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The semantic passes reported errors, so the program was not run.
    #[error("{0}")]
    Semantic(Diagnostics),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
