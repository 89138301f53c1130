//! # ktinterp
//!
//! ktinterp is an interpreter for a small, statically scoped subset of Kotlin
//! written in Rust. Source text goes through four stages: the lexer, the
//! recursive-descent parser, the semantic passes and the tree-walking
//! evaluator.
//!
//! # Logging
//!
//! Every stage emits `tracing` events. Call [`init_tracing`] and set
//! `RUST_LOG`, for example `RUST_LOG=ktinterp=debug`, to see them on stderr.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{io::Write, sync::Once};

use tracing::{debug, info};

use crate::{
    ast::Program,
    error::{Diagnostics, KtError, RuntimeError},
    interpreter::{
        evaluator::core::Evaluator,
        lexer::{Lexer, Token},
        semantic::symbol_table::SymbolTable,
        value::core::Value,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the declaration, statement and expression types that
/// represent a program as a tree. The AST is built by the parser, checked by
/// the semantic passes and walked by the evaluator.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches source locations to every node for error reporting.
/// - Prints nodes back as re-parseable source.
pub mod ast;
/// Provides unified error types for every stage.
///
/// This module defines the errors raised while lexing, parsing and evaluating
/// code, and the diagnostics collected by the semantic passes. Every error
/// carries the source location it refers to.
///
/// # Responsibilities
/// - Defines one error type per stage plus the combined [`KtError`].
/// - Provides structured diagnostics with severity and hint.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, semantic analysis, evaluation
/// and value representations.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, semantic passes,
///   evaluator and value types.
/// - Provides entry points for each stage.
pub mod interpreter;
/// Source positions attached to tokens, nodes and errors.
pub mod location;
/// General utilities shared by several stages.
pub mod util;

/// Library-level configuration of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Withhold execution when the semantic passes report an error.
    pub check_semantics: bool,
    /// File name attached to every source location.
    pub filename:        Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { check_semantics: true,
               filename:        None, }
    }
}

/// What a successful run produced besides its output.
#[derive(Debug)]
pub struct Outcome {
    /// The result of `main`, or `Unit`.
    pub value:       Value,
    /// Semantic errors and warnings. Errors are only present if semantic
    /// checking was disabled.
    pub diagnostics: Diagnostics,
}

static TRACING_INIT: Once = Once::new();

/// Initializes tracing output on stderr.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, so
/// program output stays clean by default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
                    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

                    if std::env::var("RUST_LOG").is_ok() {
                        tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)
                                                                        .with_target(true))
                                                      .with(EnvFilter::from_default_env())
                                                      .init();
                    }
                });
}

/// Splits source text into tokens.
///
/// # Example
/// ```
/// use ktinterp::{interpreter::lexer::TokenKind, tokenize};
///
/// let tokens = tokenize("val x = 1").unwrap();
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, KtError> {
    Ok(Lexer::new(source).tokenize()?)
}

/// Splits source text into tokens whose locations carry `filename`.
///
/// # Example
/// ```
/// use ktinterp::tokenize_named;
///
/// let tokens = tokenize_named("val x = 1", Some("main.kt")).unwrap();
/// assert_eq!(tokens[1].location.to_string(), "main.kt:1:5");
/// ```
pub fn tokenize_named(source: &str, filename: Option<&str>) -> Result<Vec<Token>, KtError> {
    let lexer = match filename {
        Some(filename) => Lexer::new(source).with_filename(filename),
        None => Lexer::new(source),
    };
    Ok(lexer.tokenize()?)
}

/// Lexes and parses source text into a program.
///
/// # Example
/// ```
/// use ktinterp::parse;
///
/// let program = parse("fun main() { println(\"hi\") }").unwrap();
/// assert_eq!(program.to_string(), "fun main() { println(\"hi\"); }");
/// ```
pub fn parse(source: &str) -> Result<Program, KtError> {
    let tokens = tokenize(source)?;
    Ok(interpreter::parser::parse(&tokens)?)
}

/// Runs the semantic passes over a parsed program.
#[must_use]
pub fn analyze(program: &Program) -> (SymbolTable, Diagnostics) {
    interpreter::semantic::analyze(program)
}

/// Evaluates a parsed program, writing its output to `output`.
pub fn run<W: Write>(program: &Program, output: W) -> Result<Value, RuntimeError> {
    Evaluator::new(output).evaluate(program)
}

/// Runs source text through the whole pipeline.
///
/// Lexical and syntax errors abort the run. Semantic errors abort it too
/// unless `options.check_semantics` is off; warnings never do.
///
/// # Errors
/// The [`KtError`] of the first stage that failed.
///
/// # Example
/// ```
/// use ktinterp::{RunOptions, interpreter::value::core::Value, run_source};
///
/// let source = "fun main() { val x = 10; var y = 20; y = y + x; println(y) }";
/// let mut output = Vec::new();
/// let outcome = run_source(source, &RunOptions::default(), &mut output).unwrap();
///
/// assert_eq!(output, b"30\n");
/// assert_eq!(outcome.value, Value::Unit);
/// ```
pub fn run_source<W: Write>(source: &str,
                            options: &RunOptions,
                            output: W)
                            -> Result<Outcome, KtError> {
    let tokens = tokenize_named(source, options.filename.as_deref())?;
    let program = interpreter::parser::parse(&tokens)?;

    let (_, diagnostics) = analyze(&program);
    if options.check_semantics && diagnostics.has_errors() {
        info!(errors = diagnostics.errors().len(), "execution withheld");
        return Err(KtError::Semantic(diagnostics));
    }

    let value = run(&program, output)?;
    debug!(%value, "run finished");
    Ok(Outcome { value,
                 diagnostics })
}
