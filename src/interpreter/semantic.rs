//! Static checks run between parsing and evaluation.
//!
//! The collection pass fills a [`SymbolTable`] with every top-level
//! declaration and reports bad annotations and redefinitions as errors. The
//! reachability pass adds warnings for dead code. Neither looks at expression
//! types; operator type errors surface at runtime.

use tracing::debug;

use crate::{ast::Program, error::Diagnostics};

/// Declaration collection.
///
/// Registers functions, their parameters and top-level variables.
pub mod collection;
/// Dead-code detection.
pub mod reachability;
/// Scoped symbol storage.
///
/// An arena of scopes with a current pointer, supporting shadowing across
/// scopes and rejecting redefinition within one.
pub mod symbol_table;
/// The nominal type universe and its compatibility and operator rules.
pub mod types;

use collection::CollectionPass;
use reachability::check_reachability;
use symbol_table::SymbolTable;

/// Runs every semantic pass over `program`.
///
/// # Example
/// ```
/// use ktinterp::interpreter::{lexer::tokenize, parser::parse, semantic::analyze};
///
/// let program = parse(&tokenize("fun main() {} fun main() {}").unwrap()).unwrap();
/// let (_, diagnostics) = analyze(&program);
///
/// assert!(diagnostics.has_errors());
/// assert_eq!(diagnostics.errors()[0].message, "Redefinition of function 'main'");
/// ```
#[must_use]
pub fn analyze(program: &Program) -> (SymbolTable, Diagnostics) {
    let mut table = SymbolTable::new();
    let mut diagnostics = Diagnostics::new();

    CollectionPass::new(&mut table, &mut diagnostics).collect(program);
    check_reachability(program, &mut diagnostics);

    debug!(errors = diagnostics.errors().len(),
           warnings = diagnostics.warnings().len(),
           "semantic analysis finished");
    (table, diagnostics)
}
