use std::{io::Write, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Declaration, Expr, Program, TemplatePart, VariableDeclaration},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            builtin::install_builtins,
            environment::{Binding, EnvId, Environments},
        },
        semantic::types::Type,
        value::{core::Value, function::FunctionValue},
    },
    location::SourceLocation,
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Executes programs and holds the runtime state between calls.
///
/// The evaluator owns the environment arena, the handle of the global frame,
/// the handle of the frame currently in scope and the sink that `println`
/// and `print` write to.
///
/// ## Usage
///
/// Create one evaluator per run with [`Evaluator::new`], call
/// [`Evaluator::evaluate`] and recover the captured output with
/// [`Evaluator::into_output`].
pub struct Evaluator<W: Write> {
    pub(crate) environments: Environments,
    pub(crate) global:       EnvId,
    pub(crate) current:      EnvId,
    pub(crate) output:       W,
}

impl<W: Write> Evaluator<W> {
    /// Creates an evaluator whose global frame holds the built-in functions.
    pub fn new(output: W) -> Self {
        let mut environments = Environments::new();
        let global = environments.push(None);
        install_builtins(&mut environments, global);

        Self { environments,
               global,
               current: global,
               output }
    }

    /// Runs a whole program.
    ///
    /// Every function declaration is bound first, so functions may call one
    /// another regardless of order. Top-level variables are then evaluated in
    /// source order. Finally `main` is called if it is a function taking no
    /// parameters; its result is the run's result, otherwise the result is
    /// `Unit`.
    ///
    /// # Errors
    /// The first [`RuntimeError`] raised anywhere in the program.
    ///
    /// # Example
    /// ```
    /// use ktinterp::interpreter::{
    ///     evaluator::core::Evaluator, lexer::tokenize, parser::parse, value::core::Value,
    /// };
    ///
    /// let program = parse(&tokenize("fun main() { println(6 * 7) }").unwrap()).unwrap();
    /// let mut evaluator = Evaluator::new(Vec::new());
    ///
    /// assert_eq!(evaluator.evaluate(&program).unwrap(), Value::Unit);
    /// assert_eq!(evaluator.into_output(), b"42\n");
    /// ```
    pub fn evaluate(&mut self, program: &Program) -> EvalResult<Value> {
        for declaration in &program.declarations {
            if let Declaration::Function(function) = declaration {
                let value = FunctionValue::new(function, self.current);
                self.environments.capture(self.current);
                self.environments.define(self.current,
                                         &function.name,
                                         Binding::new(Value::Function(Rc::new(value)), false));
            }
        }

        for declaration in &program.declarations {
            if let Declaration::Variable(variable) = declaration {
                self.eval_variable_declaration(variable)?;
            }
        }

        let main = self.environments.get(self.global, "main").map(|b| b.value.clone());
        let result = match main {
            Some(Value::Function(function)) if function.parameters.is_empty() => {
                let location = SourceLocation::default();
                self.call_function(&function, Vec::new(), &location)?
            },
            _ => Value::Unit,
        };

        debug!(live_frames = self.environments.live_frames(), "evaluation finished");
        Ok(result)
    }

    /// Returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches on the expression variant: literals, identifiers, operators,
    /// calls, assignments, `if` expressions and string templates.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_unguarded(expr))
    }

    fn eval_unguarded(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.into()),
            Expr::Identifier { name, location } => self.eval_identifier(name, location),
            Expr::Binary { op,
                           left,
                           right,
                           location, } => self.eval_binary_expr(*op, left, right, location),
            Expr::Unary { op,
                          operand,
                          location, } => {
                let value = self.eval(operand)?;
                Self::eval_unary(*op, &value, location)
            },
            Expr::Call { name,
                         arguments,
                         location, } => self.eval_call(name, arguments, location),
            Expr::Assignment { target,
                               value,
                               location, } => {
                let value = self.eval(value)?;
                self.assign(target, value, location)
            },
            Expr::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                if self.eval_condition(condition)? {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            },
            Expr::StringTemplate { parts, .. } => {
                let mut text = String::new();
                for part in parts {
                    match part {
                        TemplatePart::Text(s) => text.push_str(s),
                        TemplatePart::Expr(expr) => text.push_str(&self.eval(expr)?.to_string()),
                    }
                }
                Ok(Value::String(text))
            },
        }
    }

    /// Evaluates a condition, which must produce a `Boolean`.
    pub(crate) fn eval_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        match self.eval(condition)? {
            Value::Boolean(b) => Ok(b),
            other => {
                Err(RuntimeError::InvalidCondition { type_name: other.type_name().to_string(),
                                                     location:  condition.location().clone(), })
            },
        }
    }

    /// Declares a `val` or `var` in the current frame.
    ///
    /// An annotated initializer must match the annotation. Without an
    /// initializer the binding starts uninitialized and reads as `Unit`.
    pub(crate) fn eval_variable_declaration(&mut self,
                                            declaration: &VariableDeclaration)
                                            -> EvalResult<()> {
        let declared_type = declaration.type_annotation
                                       .as_ref()
                                       .and_then(|t| Type::from_name(&t.name));

        let binding = match &declaration.initializer {
            Some(initializer) => {
                let value = self.eval(initializer)?;
                check_declared_type(declared_type, &value, initializer.location())?;
                Binding { value,
                          mutable: declaration.mutable,
                          initialized: true,
                          declared_type }
            },
            None => Binding { value: Value::Unit,
                              mutable: declaration.mutable,
                              initialized: false,
                              declared_type },
        };

        self.environments.define(self.current, &declaration.name, binding);
        Ok(())
    }

    fn eval_identifier(&self, name: &str, location: &SourceLocation) -> EvalResult<Value> {
        self.environments
            .get(self.current, name)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| RuntimeError::UndefinedVariable { name:     name.to_string(),
                                                             location: location.clone(), })
    }

    /// Stores `value` into the nearest existing binding of `name`.
    ///
    /// Assignment never declares a variable.
    fn assign(&mut self, name: &str, value: Value, location: &SourceLocation) -> EvalResult<Value> {
        use crate::interpreter::evaluator::environment::SetError;

        let declared_type = self.environments
                                .get(self.current, name)
                                .ok_or_else(|| RuntimeError::UndefinedVariable {
                                    name:     name.to_string(),
                                    location: location.clone(),
                                })?
                                .declared_type;
        check_declared_type(declared_type, &value, location)?;

        match self.environments.set(self.current, name, value.clone()) {
            Ok(()) => Ok(value),
            Err(SetError::Undefined) => {
                Err(RuntimeError::UndefinedVariable { name:     name.to_string(),
                                                      location: location.clone(), })
            },
            Err(SetError::Immutable) => {
                Err(RuntimeError::ImmutableAssignment { name:     name.to_string(),
                                                        location: location.clone(), })
            },
        }
    }
}

/// Checks that `value` may be stored in a binding declared as `declared`.
pub(crate) fn check_declared_type(declared: Option<Type>,
                                  value: &Value,
                                  location: &SourceLocation)
                                  -> EvalResult<()> {
    match declared {
        Some(expected) if !Type::can_assign(expected, value.runtime_type()) => {
            Err(RuntimeError::TypeMismatch { expected: expected.name().to_string(),
                                             found:    value.type_name().to_string(),
                                             location: location.clone(), })
        },
        _ => Ok(()),
    }
}
