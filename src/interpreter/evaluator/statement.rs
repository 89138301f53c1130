use std::io::Write;

use crate::{
    ast::{Block, Statement},
    interpreter::{
        evaluator::core::{EvalResult, Evaluator},
        value::core::Value,
    },
};

/// How a statement finished.
///
/// `Returning` travels up through enclosing blocks and loops until the
/// function call that owns it turns it back into a plain value.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Completed normally with this value.
    Normal(Value),
    /// A `return` executed with this value.
    Returning(Value),
}

impl Flow {
    /// The carried value, regardless of how the statement finished.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Normal(value) | Self::Returning(value) => value,
        }
    }
}

impl<W: Write> Evaluator<W> {
    /// Evaluates a single statement.
    ///
    /// - Blocks run in a fresh child frame.
    /// - `if` runs exactly one branch; a missing `else` yields `Unit`.
    /// - `while` yields the value of its last iteration, or `Unit`.
    /// - `return` yields [`Flow::Returning`], `Unit` when no value is given.
    /// - Declarations bind into the current frame and yield `Unit`.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Block(block) => self.eval_block(block),
            Statement::Expression { expr, .. } => Ok(Flow::Normal(self.eval(expr)?)),
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval_condition(condition)? {
                    self.eval_statement(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval_statement(else_branch)
                } else {
                    Ok(Flow::Normal(Value::Unit))
                }
            },
            Statement::While { condition, body, .. } => {
                let mut last = Value::Unit;
                while self.eval_condition(condition)? {
                    match self.eval_statement(body)? {
                        Flow::Normal(value) => last = value,
                        flow @ Flow::Returning(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal(last))
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Unit,
                };
                Ok(Flow::Returning(value))
            },
            Statement::Declaration(declaration) => {
                self.eval_variable_declaration(declaration)?;
                Ok(Flow::Normal(Value::Unit))
            },
        }
    }

    /// Runs a block in a new child of the current frame.
    ///
    /// The previous frame is restored and the block's frame released however
    /// the block ends: normally, by `return` or with an error.
    pub fn eval_block(&mut self, block: &Block) -> EvalResult<Flow> {
        let previous = self.current;
        self.current = self.environments.push(Some(previous));

        let result = self.eval_statements(&block.statements);

        let frame = std::mem::replace(&mut self.current, previous);
        self.environments.release(frame);
        result
    }

    /// Runs statements in order in the current frame. The last statement's
    /// value is the sequence's value; a `return` stops the sequence.
    pub(crate) fn eval_statements(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        let mut last = Value::Unit;
        for statement in statements {
            match self.eval_statement(statement)? {
                Flow::Normal(value) => last = value,
                flow @ Flow::Returning(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal(last))
    }
}
