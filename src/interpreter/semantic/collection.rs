use tracing::debug;

use crate::{
    ast::{Declaration, FunctionDeclaration, Program, TypeAnnotation, VariableDeclaration},
    error::{
        Diagnostics,
        semantic_error::{redefinition, unknown_type},
    },
    interpreter::semantic::{
        symbol_table::{Symbol, SymbolKind, SymbolTable},
        types::Type,
    },
};

/// Registers every top-level declaration before anything runs.
///
/// For each function the pass validates its annotations, defines a function
/// symbol in the global scope and opens a scope named after the function that
/// holds its parameters. For each top-level variable it defines a variable
/// symbol whose type is the annotation, or `Any` when there is none.
///
/// Bodies are not type-checked. Problems are recorded in the diagnostics; the
/// walk itself never fails.
///
/// # Example
/// ```
/// use ktinterp::{
///     error::Diagnostics,
///     interpreter::{
///         lexer::tokenize,
///         parser::parse,
///         semantic::{collection::CollectionPass, symbol_table::SymbolTable, types::Type},
///     },
/// };
///
/// let program = parse(&tokenize("val limit: Int = 3 fun main() {}").unwrap()).unwrap();
/// let mut table = SymbolTable::new();
/// let mut diagnostics = Diagnostics::new();
/// CollectionPass::new(&mut table, &mut diagnostics).collect(&program);
///
/// assert!(!diagnostics.has_errors());
/// assert_eq!(table.lookup("limit").map(|s| s.ty), Some(Type::Int));
/// assert!(table.lookup("main").is_some());
/// ```
pub struct CollectionPass<'a> {
    table:       &'a mut SymbolTable,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> CollectionPass<'a> {
    pub const fn new(table: &'a mut SymbolTable, diagnostics: &'a mut Diagnostics) -> Self {
        Self { table,
               diagnostics }
    }

    /// Walks the program's declarations in source order.
    pub fn collect(&mut self, program: &Program) {
        for declaration in &program.declarations {
            match declaration {
                Declaration::Function(function) => self.collect_function(function),
                Declaration::Variable(variable) => self.collect_variable(variable),
            }
        }
        debug!(errors = self.diagnostics.errors().len(), "collection pass finished");
    }

    fn collect_function(&mut self, function: &FunctionDeclaration) {
        let return_type = match &function.return_type {
            Some(annotation) => self.resolve(annotation, Type::Unit),
            None => Type::Unit,
        };
        let parameter_types: Vec<_> = function.parameters
                                              .iter()
                                              .map(|p| self.resolve(&p.type_annotation, Type::Any))
                                              .collect();

        let symbol = Symbol::function(&function.name,
                                      parameter_types.clone(),
                                      return_type,
                                      function.location.clone());
        if !self.table.define(symbol) {
            self.diagnostics
                .push(redefinition(&function.name, "function", function.location.clone()));
        }

        self.table.enter_scope(&function.name);
        for (parameter, ty) in function.parameters.iter().zip(parameter_types) {
            let symbol = Symbol::variable(&parameter.name,
                                          SymbolKind::Parameter,
                                          ty,
                                          false,
                                          parameter.location.clone());
            if !self.table.define(symbol) {
                self.diagnostics
                    .push(redefinition(&parameter.name, "parameter", parameter.location.clone()));
            }
        }
        let exited = self.table.exit_scope();
        debug_assert!(exited.is_ok(), "a function scope always has a parent");
    }

    fn collect_variable(&mut self, variable: &VariableDeclaration) {
        let ty = match &variable.type_annotation {
            Some(annotation) => self.resolve(annotation, Type::Any),
            None => Type::Any,
        };

        let symbol = Symbol::variable(&variable.name,
                                      SymbolKind::Variable,
                                      ty,
                                      variable.mutable,
                                      variable.location.clone());
        if !self.table.define(symbol) {
            self.diagnostics
                .push(redefinition(&variable.name, "variable", variable.location.clone()));
        }
    }

    /// Resolves an annotation, reporting it and substituting `fallback` when
    /// the name is unknown.
    fn resolve(&mut self, annotation: &TypeAnnotation, fallback: Type) -> Type {
        Type::from_name(&annotation.name).unwrap_or_else(|| {
                                             self.diagnostics
                                                 .push(unknown_type(&annotation.name,
                                                                    annotation.location.clone()));
                                             fallback
                                         })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::{Block, Parameter},
        interpreter::{lexer::tokenize, parser::parse},
        location::SourceLocation,
    };

    fn collect(program: &Program) -> (SymbolTable, Diagnostics) {
        let mut table = SymbolTable::new();
        let mut diagnostics = Diagnostics::new();
        CollectionPass::new(&mut table, &mut diagnostics).collect(program);
        (table, diagnostics)
    }

    fn collect_source(source: &str) -> (SymbolTable, Diagnostics) {
        collect(&parse(&tokenize(source).unwrap()).unwrap())
    }

    fn annotation(name: &str, line: usize) -> TypeAnnotation {
        TypeAnnotation { name:     name.to_string(),
                         location: SourceLocation::new(line, 1), }
    }

    #[test]
    fn functions_and_variables_are_registered() {
        let (table, diagnostics) =
            collect_source("fun add(a: Int, b: Int): Int { return a + b }\nvar count = 0");
        assert!(!diagnostics.has_errors());

        let add = table.lookup("add").unwrap();
        assert_eq!(add.kind, SymbolKind::Function);
        assert_eq!(add.signature.as_ref().unwrap().parameter_types, vec![Type::Int, Type::Int]);
        assert_eq!(add.ty, Type::Int);

        let count = table.lookup("count").unwrap();
        assert_eq!(count.ty, Type::Any);
        assert!(count.mutable);
    }

    #[test]
    fn parameters_live_in_a_function_scope() {
        let (table, _) = collect_source("fun greet(name: String) { println(name) }");
        assert!(table.lookup("name").is_none());

        let scope = &table.scopes()[1];
        assert_eq!(scope.name, "greet");
        assert_eq!(scope.symbols["name"].kind, SymbolKind::Parameter);
        assert_eq!(scope.symbols["name"].ty, Type::String);
    }

    #[test]
    fn redefinitions_are_reported() {
        let (_, diagnostics) =
            collect_source("fun f() {}\nfun f() {}\nval x = 1\nvar x = 2\nfun g(a: Int, a: Int) {}");
        let messages: Vec<_> = diagnostics.errors().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages,
                   vec!["Redefinition of function 'f'",
                        "Redefinition of variable 'x'",
                        "Redefinition of parameter 'a'"]);
        assert_eq!(diagnostics.errors()[0].location.line, 2);
    }

    #[test]
    fn builtins_cannot_be_redeclared() {
        let (_, diagnostics) = collect_source("fun println(x: Int) {}");
        assert_eq!(diagnostics.errors()[0].message, "Redefinition of function 'println'");
    }

    #[test]
    fn unknown_types_fall_back() {
        let function = FunctionDeclaration { name:        "f".to_string(),
                                             parameters:  vec![Parameter {
                                                 name:            "p".to_string(),
                                                 type_annotation: annotation("Double", 1),
                                                 location:        SourceLocation::new(1, 7),
                                             }],
                                             return_type: Some(annotation("Float", 1)),
                                             body:        Block { statements: vec![],
                                                                  location:   SourceLocation::new(1, 20), },
                                             location:    SourceLocation::new(1, 1), };
        let variable = VariableDeclaration { mutable:         false,
                                             name:            "v".to_string(),
                                             type_annotation: Some(annotation("Long", 2)),
                                             initializer:     None,
                                             location:        SourceLocation::new(2, 1), };
        let program = Program { declarations: vec![Declaration::Function(function),
                                                   Declaration::Variable(variable)], };

        let (table, diagnostics) = collect(&program);
        assert_eq!(diagnostics.errors().len(), 3);
        assert_eq!(diagnostics.errors()[0].message, "Unknown type: Float");
        assert_eq!(diagnostics.errors()[0].hint.as_deref(), Some("Use Int, String, Boolean, or Unit"));

        let f = table.lookup("f").unwrap();
        assert_eq!(f.ty, Type::Unit);
        assert_eq!(f.signature.as_ref().unwrap().parameter_types, vec![Type::Any]);
        assert_eq!(table.lookup("v").unwrap().ty, Type::Any);
    }
}
