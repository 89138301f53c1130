use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    interpreter::{evaluator::builtin::BUILTIN_FUNCTIONS, semantic::types::Type},
    location::SourceLocation,
};

/// Index of a scope inside a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The global scope, always present.
    pub const GLOBAL: Self = Self(0);
}

/// What a name was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
}

impl SymbolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Parameter => "parameter",
        }
    }
}

/// Parameter and return types of a function symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub parameter_types: Vec<Type>,
    pub return_type:     Type,
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name:      String,
    pub kind:      SymbolKind,
    pub ty:        Type,
    pub mutable:   bool,
    pub location:  SourceLocation,
    /// Present only for [`SymbolKind::Function`].
    pub signature: Option<FunctionSignature>,
}

impl Symbol {
    /// Creates a variable or parameter symbol.
    #[must_use]
    pub fn variable(name: impl Into<String>,
                    kind: SymbolKind,
                    ty: Type,
                    mutable: bool,
                    location: SourceLocation)
                    -> Self {
        Self { name: name.into(),
               kind,
               ty,
               mutable,
               location,
               signature: None }
    }

    /// Creates a function symbol. Its type is its return type.
    #[must_use]
    pub fn function(name: impl Into<String>,
                    parameter_types: Vec<Type>,
                    return_type: Type,
                    location: SourceLocation)
                    -> Self {
        Self { name: name.into(),
               kind: SymbolKind::Function,
               ty: return_type,
               mutable: false,
               location,
               signature: Some(FunctionSignature { parameter_types,
                                                   return_type }) }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.signature {
            Some(signature) => {
                let params: Vec<_> =
                    signature.parameter_types.iter().map(|ty| ty.name()).collect();
                write!(f, "fun {}({}): {}", self.name, params.join(", "), signature.return_type)
            },
            None => {
                let keyword = if self.mutable { "var" } else { "val" };
                write!(f, "{} {} {}: {}", self.kind.as_str(), keyword, self.name, self.ty)
            },
        }
    }
}

/// One lexical scope: its own bindings plus a link to the enclosing scope.
#[derive(Debug, Clone)]
pub struct Scope {
    pub name:    String,
    pub parent:  Option<ScopeId>,
    pub symbols: FxHashMap<String, Symbol>,
}

impl Scope {
    fn new(name: impl Into<String>, parent: Option<ScopeId>) -> Self {
        Self { name: name.into(),
               parent,
               symbols: FxHashMap::default() }
    }

    /// Symbols sorted by position, then by name for the built-ins.
    #[must_use]
    pub fn sorted_symbols(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<_> = self.symbols.values().collect();
        symbols.sort_by(|a, b| {
                   a.location
                    .sort_key()
                    .cmp(&b.location.sort_key())
                    .then_with(|| a.name.cmp(&b.name))
               });
        symbols
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    #[error("Cannot exit global scope")]
    ExitGlobalScope,
}

/// Compile-time name bindings organised as a tree of scopes.
///
/// Scopes are stored in an arena and never removed; exiting a scope only moves
/// the current pointer back to its parent, so the whole tree stays available
/// for display after the walk.
///
/// # Example
/// ```
/// use ktinterp::{
///     interpreter::semantic::{
///         symbol_table::{Symbol, SymbolKind, SymbolTable},
///         types::Type,
///     },
///     location::SourceLocation,
/// };
///
/// let mut table = SymbolTable::new();
/// let x = Symbol::variable("x", SymbolKind::Variable, Type::Int, false, SourceLocation::start());
/// assert!(table.define(x.clone()));
/// assert!(!table.define(x));
///
/// table.enter_scope("main");
/// assert_eq!(table.lookup("x").map(|s| s.ty), Some(Type::Int));
/// assert!(table.lookup_local("x").is_none());
/// table.exit_scope().unwrap();
/// assert!(table.exit_scope().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes:  Vec<Scope>,
    current: ScopeId,
}

impl SymbolTable {
    /// Creates a table whose global scope holds the built-in functions.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self { scopes:  vec![Scope::new("global", None)],
                               current: ScopeId::GLOBAL, };

        // Built-ins sort before any user declaration.
        let builtin_location = SourceLocation::new(0, 0);
        for &name in BUILTIN_FUNCTIONS {
            table.define(Symbol::function(name, vec![Type::Any], Type::Unit,
                                          builtin_location.clone()));
        }
        table
    }

    /// Opens a child of the current scope and makes it current.
    pub fn enter_scope(&mut self, name: impl Into<String>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(name, Some(self.current)));
        self.current = id;
        id
    }

    /// Returns to the parent of the current scope.
    ///
    /// # Errors
    /// [`SymbolTableError::ExitGlobalScope`] if the current scope is global.
    pub fn exit_scope(&mut self) -> Result<(), SymbolTableError> {
        let parent = self.scopes[self.current.0].parent
                                                .ok_or(SymbolTableError::ExitGlobalScope)?;
        self.current = parent;
        Ok(())
    }

    /// Adds a symbol to the current scope.
    ///
    /// Returns `false`, leaving the table unchanged, if the name is already
    /// defined in the current scope. Shadowing an outer scope is allowed.
    pub fn define(&mut self, symbol: Symbol) -> bool {
        let symbols = &mut self.scopes[self.current.0].symbols;
        if symbols.contains_key(&symbol.name) {
            return false;
        }
        symbols.insert(symbol.name.clone(), symbol);
        true
    }

    /// Resolves a name from the current scope outwards.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scope_chain()
            .into_iter()
            .find_map(|id| self.scopes[id.0].symbols.get(name))
    }

    /// Resolves a name in the current scope only.
    #[must_use]
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current.0].symbols.get(name)
    }

    #[must_use]
    pub fn is_global_scope(&self) -> bool {
        self.current == ScopeId::GLOBAL
    }

    #[must_use]
    pub const fn current(&self) -> ScopeId {
        self.current
    }

    /// Scope ids from the current scope up to the global scope.
    #[must_use]
    pub fn scope_chain(&self) -> Vec<ScopeId> {
        let mut chain = vec![self.current];
        let mut id = self.current;
        while let Some(parent) = self.scopes[id.0].parent {
            chain.push(parent);
            id = parent;
        }
        chain
    }

    /// Every scope ever opened, in creation order.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    #[must_use]
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, scope) in self.scopes.iter().enumerate() {
            let depth = {
                let mut depth = 0;
                let mut parent = scope.parent;
                while let Some(id) = parent {
                    depth += 1;
                    parent = self.scopes[id.0].parent;
                }
                depth
            };
            let indent = "  ".repeat(depth);

            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{indent}scope {}:", scope.name)?;
            for symbol in scope.sorted_symbols() {
                write!(f, "\n{indent}  {symbol}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn var(name: &str, ty: Type) -> Symbol {
        Symbol::variable(name, SymbolKind::Variable, ty, true, SourceLocation::new(1, 1))
    }

    #[test]
    fn builtins_are_global_functions() {
        let table = SymbolTable::new();
        let println = table.lookup("println").unwrap();
        assert_eq!(println.kind, SymbolKind::Function);
        assert_eq!(println.signature,
                   Some(FunctionSignature { parameter_types: vec![Type::Any],
                                            return_type:     Type::Unit, }));
        assert!(table.lookup("print").is_some());
        for name in BUILTIN_FUNCTIONS {
            assert!(table.lookup_local(name).is_some(), "missing builtin {name}");
        }
    }

    #[test]
    fn function_symbols_display_their_signature() {
        let add = Symbol::function("add",
                                   vec![Type::Int, Type::String],
                                   Type::Boolean,
                                   SourceLocation::new(1, 1));
        assert_eq!(add.to_string(), "fun add(Int, String): Boolean");
        assert_eq!(var("x", Type::Int).to_string(), "variable var x: Int");
    }

    #[test]
    fn redefinition_in_same_scope_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.define(var("x", Type::Int)));
        assert!(!table.define(var("x", Type::String)));
        assert_eq!(table.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn inner_scopes_shadow_outer_ones() {
        let mut table = SymbolTable::new();
        table.define(var("x", Type::Int));
        table.enter_scope("block");
        assert!(table.define(var("x", Type::String)));
        assert_eq!(table.lookup("x").unwrap().ty, Type::String);
        table.exit_scope().unwrap();
        assert_eq!(table.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn scope_chain_walks_to_global() {
        let mut table = SymbolTable::new();
        let outer = table.enter_scope("f");
        let inner = table.enter_scope("block");
        assert!(!table.is_global_scope());
        assert_eq!(table.scope_chain(), vec![inner, outer, ScopeId::GLOBAL]);
        table.exit_scope().unwrap();
        table.exit_scope().unwrap();
        assert!(table.is_global_scope());
        assert_eq!(table.exit_scope(), Err(SymbolTableError::ExitGlobalScope));
        assert_eq!(table.scopes().len(), 3);
    }

    #[test]
    fn display_nests_scopes() {
        let mut table = SymbolTable::new();
        table.define(Symbol::function("add", vec![Type::Int, Type::Int], Type::Int,
                                      SourceLocation::new(1, 1)));
        table.enter_scope("add");
        table.define(Symbol::variable("a", SymbolKind::Parameter, Type::Int, false,
                                      SourceLocation::new(1, 9)));
        table.exit_scope().unwrap();

        let expected = "scope global:\n  \
                        fun print(Any): Unit\n  \
                        fun println(Any): Unit\n  \
                        fun add(Int, Int): Int\n  \
                        scope add:\n    \
                        parameter val a: Int";
        assert_eq!(table.to_string(), expected);
    }
}
