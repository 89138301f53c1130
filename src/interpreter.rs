/// The evaluator module executes programs.
///
/// The evaluator walks the AST, binding top-level functions and variables in
/// the global frame and then running `main`. It is the core execution engine
/// of the interpreter.
///
/// # Responsibilities
/// - Evaluates expressions and statements against a chain of frames.
/// - Calls user-defined functions as closures and native builtins.
/// - Reports runtime errors such as division by zero or invalid operands.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a sequence of
/// tokens, each corresponding to a meaningful language element such as a
/// literal, keyword, identifier, operator or delimiter. This is the first stage
/// of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with kind, value and
///   source location.
/// - Resolves string escapes and splits string templates into segments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token sequence produced by the lexer and
/// constructs a [`Program`](crate::ast::Program) of declarations, statements
/// and expressions.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Validates grammar, reporting errors with the offending token.
/// - Resynchronizes at statement boundaries after an error.
pub mod parser;
/// The semantic module checks a program before it runs.
///
/// # Responsibilities
/// - Defines the nominal type system.
/// - Builds the symbol table of declarations.
/// - Reports redefinitions, unknown types and unreachable code.
pub mod semantic;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares every value a program can produce: integers, strings,
/// booleans, `Unit`, function values and builtins.
pub mod value;
