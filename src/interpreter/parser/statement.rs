use std::iter::Peekable;

use crate::{
    ast::Statement,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, advance, current, expect, match_kind, parse_expression, peek_kind,
                   skip_terminators},
            declaration::parse_variable,
        },
    },
    location::SourceLocation,
    util::stack::ensure_sufficient_stack,
};

/// Parses a single statement.
///
/// Dispatches on the leading token:
/// - `if`, `while`, `return` and `{` start their respective statements.
/// - `val`/`var` start a local declaration.
/// - Anything else is parsed as an expression statement.
///
/// Any `;` terminators after the statement are consumed.
///
/// Grammar:
/// ```text
///     statement := if_statement
///                | while_statement
///                | return_statement
///                | block
///                | variable
///                | expression
/// ```
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| parse_statement_unguarded(tokens))
}

fn parse_statement_unguarded<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = current(tokens);
    let location = token.location.clone();

    let statement = match token.kind {
        TokenKind::If => {
            advance(tokens);
            parse_if_statement(tokens, location)?
        },
        TokenKind::While => {
            advance(tokens);
            parse_while_statement(tokens, location)?
        },
        TokenKind::Return => {
            advance(tokens);
            let value = if peek_kind(tokens).starts_expression() {
                Some(parse_expression(tokens)?)
            } else {
                None
            };
            Statement::Return { value,
                                location }
        },
        TokenKind::LBrace => {
            advance(tokens);
            Statement::Block(parse_block(tokens, location)?)
        },
        TokenKind::Val | TokenKind::Var => {
            advance(tokens);
            Statement::Declaration(parse_variable(tokens, token)?)
        },
        _ => {
            let expr = parse_expression(tokens)?;
            Statement::Expression { location: expr.location().clone(),
                                    expr }
        },
    };

    skip_terminators(tokens);
    Ok(statement)
}

/// Parses an `if` statement after its keyword; `else` is optional.
///
/// Grammar:
/// ```text
///     if_statement := "if" "(" expression ")" statement ("else" statement)?
/// ```
fn parse_if_statement<'a, I>(tokens: &mut Peekable<I>,
                             location: SourceLocation)
                             -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::LParen, "Expected '(' after 'if'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, TokenKind::RParen, "Expected ')' after condition")?;

    let then_branch = Box::new(parse_statement(tokens)?);
    let else_branch = match match_kind(tokens, TokenKind::Else) {
        Some(_) => Some(Box::new(parse_statement(tokens)?)),
        None => None,
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       location })
}

/// Parses a `while` loop after its keyword.
///
/// Grammar:
/// ```text
///     while_statement := "while" "(" expression ")" statement
/// ```
fn parse_while_statement<'a, I>(tokens: &mut Peekable<I>,
                                location: SourceLocation)
                                -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::LParen, "Expected '(' after 'while'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, TokenKind::RParen, "Expected ')' after condition")?;

    let body = Box::new(parse_statement(tokens)?);

    Ok(Statement::While { condition,
                          body,
                          location })
}
