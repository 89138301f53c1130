use crate::{
    ast::{Block, Declaration, Program, Statement},
    error::{Diagnostics, semantic_error::unreachable_code},
};

/// Warns about statements that follow an unconditional `return`.
///
/// Each block gets at most one warning, placed on the first statement that
/// can never run. Nested blocks and branch bodies are checked independently.
pub fn check_reachability(program: &Program, diagnostics: &mut Diagnostics) {
    for declaration in &program.declarations {
        if let Declaration::Function(function) = declaration {
            check_block(&function.body, diagnostics);
        }
    }
}

fn check_block(block: &Block, diagnostics: &mut Diagnostics) {
    let mut warned = false;
    let mut returned = false;

    for statement in &block.statements {
        if returned && !warned {
            diagnostics.push(unreachable_code(statement.location().clone()));
            warned = true;
        }
        check_nested(statement, diagnostics);
        returned = returned || always_returns(statement);
    }
}

fn check_nested(statement: &Statement, diagnostics: &mut Diagnostics) {
    match statement {
        Statement::Block(block) => check_block(block, diagnostics),
        Statement::If { then_branch,
                        else_branch,
                        .. } => {
            check_nested(then_branch, diagnostics);
            if let Some(else_branch) = else_branch {
                check_nested(else_branch, diagnostics);
            }
        },
        Statement::While { body, .. } => check_nested(body, diagnostics),
        Statement::Expression { .. } | Statement::Return { .. } | Statement::Declaration(_) => {},
    }
}

/// Whether control can never fall through `statement`.
fn always_returns(statement: &Statement) -> bool {
    match statement {
        Statement::Return { .. } => true,
        Statement::Block(block) => block.statements.iter().any(always_returns),
        Statement::If { then_branch,
                        else_branch: Some(else_branch),
                        .. } => always_returns(then_branch) && always_returns(else_branch),
        _ => false,
    }
}
