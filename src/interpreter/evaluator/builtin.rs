use std::io::{self, Write};

use crate::interpreter::{
    evaluator::environment::{Binding, EnvId, Environments},
    value::{
        core::Value,
        function::{Arity, Builtin},
    },
};

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table of [`Builtin`] values),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[Builtin] = &[
            $(
                Builtin { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names bound in the global frame before a program runs.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "println" => { arity: Arity::OneOf(&[0, 1]), func: println },
    "print"   => { arity: Arity::Exact(1),       func: print },
}

/// Binds every builtin as an immutable value in `frame`.
pub fn install_builtins(environments: &mut Environments, frame: EnvId) {
    for builtin in BUILTIN_TABLE {
        environments.define(frame, builtin.name, Binding::new(Value::Builtin(*builtin), false));
    }
}

/// Writes the argument's display form, if any, followed by a newline.
///
/// # Example
/// ```
/// use ktinterp::interpreter::{evaluator::builtin::println, value::core::Value};
///
/// let mut out = Vec::new();
/// println(&[Value::Int(30)], &mut out).unwrap();
/// println(&[], &mut out).unwrap();
///
/// assert_eq!(out, b"30\n\n");
/// ```
pub fn println(args: &[Value], out: &mut dyn Write) -> io::Result<Value> {
    if let Some(value) = args.first() {
        write!(out, "{value}")?;
    }
    writeln!(out)?;
    Ok(Value::Unit)
}

/// Writes the argument's display form without a trailing newline.
pub fn print(args: &[Value], out: &mut dyn Write) -> io::Result<Value> {
    if let Some(value) = args.first() {
        write!(out, "{value}")?;
    }
    Ok(Value::Unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_names() {
        assert_eq!(BUILTIN_FUNCTIONS, &["println", "print"]);
        let names: Vec<_> = BUILTIN_TABLE.iter().map(|b| b.name).collect();
        assert_eq!(names, BUILTIN_FUNCTIONS);
        assert_eq!(BUILTIN_TABLE[1].arity, Arity::Exact(1));
    }

    #[test]
    fn print_has_no_newline() {
        let mut out = Vec::new();
        print(&[Value::from("a")], &mut out).unwrap();
        print(&[Value::Boolean(true)], &mut out).unwrap();
        assert_eq!(out, b"atrue");
    }

    #[test]
    fn install_binds_immutable_values() {
        let mut environments = Environments::new();
        let global = environments.push(None);
        install_builtins(&mut environments, global);

        let binding = environments.get(global, "println").unwrap();
        assert!(!binding.mutable);
        assert!(matches!(binding.value, Value::Builtin(b) if b.name == "println"));
    }
}
