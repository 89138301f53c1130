//! Recursive-descent parser producing a [`Program`] from tokens.
//!
//! Expressions are parsed by precedence climbing, lowest first:
//! assignment, `||`, `&&`, equality, comparison, additive, multiplicative,
//! unary, call, primary.

use tracing::debug;

use crate::{
    ast::Program,
    error::ParseError,
    interpreter::lexer::{Token, TokenKind},
};

/// Binary operator parsing.
///
/// One function per left-associative precedence level, from logical OR down
/// to multiplication.
pub mod binary;
/// Block parsing.
///
/// Parses brace-delimited statement sequences.
pub mod block;
/// Core parsing helpers.
///
/// Contains the expression entry point, the token cursor helpers shared by
/// every other parser module and the error-recovery routine.
pub mod core;
/// Declaration parsing.
///
/// Parses `fun`, `val` and `var` declarations together with parameters and
/// type annotations.
pub mod declaration;
/// Statement parsing.
///
/// Implements `if`, `while`, `return`, local declarations, blocks and
/// expression statements.
pub mod statement;
/// Unary, call and primary expression parsing.
///
/// Handles prefix operators, function calls, literals, string templates,
/// grouping and `if` expressions.
pub mod unary;
/// Utility functions for the parser.
///
/// Provides comma-separated list parsing and identifier parsing.
pub mod utils;

use self::core::{peek_kind, skip_terminators, synchronize};
use declaration::parse_declaration;

/// Parses a token sequence into a program.
///
/// On a syntax error the parser resynchronizes to the next statement boundary
/// and then reports that first error; the run does not continue.
///
/// # Errors
/// The first [`ParseError`] encountered.
///
/// # Example
/// ```
/// use ktinterp::interpreter::{lexer::tokenize, parser::parse};
///
/// let tokens = tokenize("fun main() { println(1 + 2) }").unwrap();
/// let program = parse(&tokens).unwrap();
///
/// assert_eq!(program.declarations.len(), 1);
/// assert_eq!(program.declarations[0].name(), "main");
/// ```
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    let (program, mut errors) = parse_declarations(tokens, true);
    if errors.is_empty() { Ok(program) } else { Err(errors.swap_remove(0)) }
}

/// Parses a token sequence, recovering from every syntax error.
///
/// Returns all declarations that parsed successfully together with one error
/// per declaration that did not.
#[must_use]
pub fn parse_recovering(tokens: &[Token]) -> (Program, Vec<ParseError>) {
    parse_declarations(tokens, false)
}

fn parse_declarations(tokens: &[Token], stop_at_first: bool) -> (Program, Vec<ParseError>) {
    let mut iter = tokens.iter().peekable();
    let mut program = Program::default();
    let mut errors = Vec::new();

    loop {
        skip_terminators(&mut iter);
        if peek_kind(&mut iter) == TokenKind::Eof {
            break;
        }

        match parse_declaration(&mut iter) {
            Ok(declaration) => program.declarations.push(declaration),
            Err(error) => {
                synchronize(&mut iter);
                errors.push(error);
                if stop_at_first {
                    break;
                }
            },
        }
    }

    debug!(declarations = program.declarations.len(), errors = errors.len(), "parsed program");
    (program, errors)
}
