use std::{fmt, io, rc::Rc};

use crate::{
    ast::{Block, FunctionDeclaration},
    interpreter::{
        evaluator::environment::EnvId, semantic::types::Type, value::core::Value,
    },
};

/// A parameter of a function value with its resolved declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionParameter {
    pub name: String,
    pub ty:   Type,
}

/// A user-defined function bound at runtime.
///
/// The body is shared with every copy of the value. `closure` is the
/// environment the function was defined in; calls run in a fresh child of it.
#[derive(Debug)]
pub struct FunctionValue {
    pub name:       String,
    pub parameters: Vec<FunctionParameter>,
    pub body:       Rc<Block>,
    pub closure:    EnvId,
}

impl FunctionValue {
    /// Creates the runtime value for `declaration`, closing over `closure`.
    ///
    /// Parameter annotations that name no known type are treated as `Any`.
    #[must_use]
    pub fn new(declaration: &FunctionDeclaration, closure: EnvId) -> Self {
        let parameters = declaration.parameters
                                    .iter()
                                    .map(|p| FunctionParameter {
                                        name: p.name.clone(),
                                        ty:   Type::from_name(&p.type_annotation.name)
                                                  .unwrap_or(Type::Any),
                                    })
                                    .collect();

        Self { name: declaration.name.clone(),
               parameters,
               body: Rc::new(declaration.body.clone()),
               closure }
    }
}

/// Signature of a native function.
///
/// A builtin receives its evaluated arguments and the program's output sink.
pub type BuiltinFn = fn(&[Value], &mut dyn io::Write) -> io::Result<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(counts) => counts.contains(&n),
        }
    }
}

impl fmt::Display for Arity {
    /// Formats the accepted counts as `2` or `0 or 1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(counts) => {
                let counts: Vec<_> = counts.iter().map(ToString::to_string).collect();
                f.write_str(&counts.join(" or "))
            },
        }
    }
}

/// A native function value.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name:  &'static str,
    pub arity: Arity,
    pub func:  BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_display_and_check() {
        assert_eq!(Arity::Exact(2).to_string(), "2");
        assert_eq!(Arity::OneOf(&[0, 1]).to_string(), "0 or 1");
        assert!(Arity::OneOf(&[0, 1]).check(0));
        assert!(!Arity::Exact(1).check(0));
    }
}
