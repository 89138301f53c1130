use std::{io::Write, rc::Rc};

use tracing::trace;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, check_declared_type},
            environment::Binding,
        },
        value::{
            core::Value,
            function::{Builtin, FunctionValue},
        },
    },
    location::SourceLocation,
    util::stack::ensure_sufficient_stack,
};

impl<W: Write> Evaluator<W> {
    /// Evaluates a call expression.
    ///
    /// The callee is resolved by name through the current environment chain,
    /// then the arguments are evaluated left to right and the value is
    /// invoked.
    ///
    /// # Errors
    /// - `UndefinedVariable` if `name` is not bound.
    /// - `NotCallable` if it is bound to something other than a function.
    /// - Any error raised by the arguments or the callee.
    pub(crate) fn eval_call(&mut self,
                            name: &str,
                            arguments: &[Expr],
                            location: &SourceLocation)
                            -> EvalResult<Value> {
        let callee = self.environments
                         .get(self.current, name)
                         .map(|b| b.value.clone())
                         .ok_or_else(|| RuntimeError::UndefinedVariable {
                             name:     name.to_string(),
                             location: location.clone(),
                         })?;

        let args = arguments.iter()
                            .map(|arg| self.eval(arg))
                            .collect::<EvalResult<Vec<_>>>()?;

        match callee {
            Value::Function(function) => self.call_function(&function, args, location),
            Value::Builtin(builtin) => self.call_builtin(builtin, &args, location),
            _ => Err(RuntimeError::NotCallable { name:     name.to_string(),
                                                 location: location.clone(), }),
        }
    }

    /// Executes a user-defined function.
    ///
    /// The argument count must match the parameter count exactly and every
    /// argument must fit its parameter's declared type. The body runs in a
    /// fresh frame whose parent is the function's closure, not the caller's
    /// frame. The caller's frame is restored on every exit path.
    ///
    /// # Returns
    /// The value of the executed `return`, or the value of the body's last
    /// statement if none ran.
    pub(crate) fn call_function(&mut self,
                                function: &Rc<FunctionValue>,
                                args: Vec<Value>,
                                location: &SourceLocation)
                                -> EvalResult<Value> {
        if args.len() != function.parameters.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name:     function.name.clone(),
                                                             expected: function.parameters
                                                                               .len()
                                                                               .to_string(),
                                                             found:    args.len(),
                                                             location: location.clone(), });
        }
        for (parameter, arg) in function.parameters.iter().zip(&args) {
            check_declared_type(Some(parameter.ty), arg, location)?;
        }

        trace!(function = %function.name, arguments = args.len(), "call");

        let frame = self.environments.push(Some(function.closure));
        for (parameter, arg) in function.parameters.iter().zip(args) {
            self.environments.define(frame,
                                     &parameter.name,
                                     Binding { value:         arg,
                                               mutable:       false,
                                               initialized:   true,
                                               declared_type: Some(parameter.ty), });
        }

        let caller = std::mem::replace(&mut self.current, frame);
        let body = Rc::clone(&function.body);
        let result = ensure_sufficient_stack(|| self.eval_statements(&body.statements));
        self.current = caller;
        self.environments.release(frame);

        result.map(|flow| flow.into_value())
    }

    /// Invokes a builtin after checking its arity.
    fn call_builtin(&mut self,
                    builtin: Builtin,
                    args: &[Value],
                    location: &SourceLocation)
                    -> EvalResult<Value> {
        if !builtin.arity.check(args.len()) {
            return Err(RuntimeError::ArgumentCountMismatch { name:     builtin.name.to_string(),
                                                             expected: builtin.arity.to_string(),
                                                             found:    args.len(),
                                                             location: location.clone(), });
        }

        (builtin.func)(args, &mut self.output).map_err(|source| {
                                                  RuntimeError::Output { source,
                                                                         location: location.clone() }
                                              })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::{lexer::tokenize, parser::parse};

    fn run(source: &str) -> EvalResult<(Value, String)> {
        let program = parse(&tokenize(source).unwrap()).unwrap();
        let mut evaluator = Evaluator::new(Vec::new());
        let value = evaluator.evaluate(&program)?;
        Ok((value, String::from_utf8(evaluator.into_output()).unwrap()))
    }

    #[test]
    fn recursion() {
        let source = "fun fib(n: Int): Int { if (n < 2) return n\n return fib(n - 1) + fib(n - 2) }
                      fun main(): Int { return fib(15) }";
        assert_eq!(run(source).unwrap().0, Value::Int(610));
    }

    #[test]
    fn deep_recursion_grows_the_stack() {
        let source = "fun depth(n: Int): Int { if (n == 0) return 0\n return 1 + depth(n - 1) }
                      fun main(): Int { return depth(20000) }";
        assert_eq!(run(source).unwrap().0, Value::Int(20000));
    }

    #[test]
    fn body_value_without_return() {
        let source = "fun last(): Int { 1\n 2 }\nfun main(): Int { return last() }";
        assert_eq!(run(source).unwrap().0, Value::Int(2));
    }

    #[test]
    fn argument_count_is_checked() {
        let err = run("fun f(a: Int) {}\nfun main() { f() }").unwrap_err();
        assert_eq!(err.to_string(), "Error at 2:14: Function 'f' expects 1 argument(s), got 0");

        let err = run("fun main() { println(1, 2) }").unwrap_err();
        assert_eq!(err.to_string(),
                   "Error at 1:14: Function 'println' expects 0 or 1 argument(s), got 2");
    }

    #[test]
    fn parameter_types_are_checked() {
        let err = run("fun f(a: Int) {}\nfun main() { f(\"x\") }").unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { ref expected, ref found, .. }
                              if expected == "Int" && found == "String"));
    }

    #[test]
    fn parameters_are_immutable() {
        let err = run("fun f(a: Int) { a = 2 }\nfun main() { f(1) }").unwrap_err();
        assert!(matches!(err, RuntimeError::ImmutableAssignment { .. }));
    }

    #[test]
    fn calling_a_non_function() {
        let err = run("val x = 3\nfun main() { x() }").unwrap_err();
        assert_eq!(err.to_string(), "Error at 2:14: 'x' is not a function");
    }

    #[test]
    fn functions_are_values() {
        let (_, output) = run("fun f(a: Int, b: Int) {}\nfun main() { val g = f\n println(g)\n println(println) }").unwrap();
        assert_eq!(output, "<function(a, b)>\n<builtin println>\n");
    }
}
