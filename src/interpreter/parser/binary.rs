use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, advance, current},
            unary::parse_unary,
        },
    },
};

/// Maps an operator token to its binary operator, if it is one.
const fn token_to_binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    let op = match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::EqualEqual => BinaryOperator::Equal,
        TokenKind::BangEqual => BinaryOperator::NotEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::AndAnd => BinaryOperator::And,
        TokenKind::OrOr => BinaryOperator::Or,
        _ => return None,
    };
    Some(op)
}

/// Parses one left-associative precedence level.
///
/// Repeatedly parses `operand`, joining the results with any operator from
/// `operators` into a left-leaning tree. Each node is located at its operator
/// token.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operators: &[BinaryOperator],
                                 operand: fn(&mut Peekable<I>) -> ParseResult<Expr>)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut left = operand(tokens)?;
    loop {
        let token = current(tokens);
        if let Some(op) = token_to_binary_operator(token.kind)
           && operators.contains(&op)
        {
            advance(tokens);
            let right = operand(tokens)?;
            left = Expr::Binary { op,
                                  left: Box::new(left),
                                  right: Box::new(right),
                                  location: token.location.clone() };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Parses logical OR expressions.
///
/// The rule is: `logical_or := logical_and ("||" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, &[BinaryOperator::Or], parse_logical_and)
}

/// Parses logical AND expressions.
///
/// The rule is: `logical_and := equality ("&&" equality)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, &[BinaryOperator::And], parse_equality)
}

/// Parses equality expressions.
///
/// The rule is: `equality := comparison (("==" | "!=") comparison)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Equal, BinaryOperator::NotEqual],
                           parse_comparison)
}

/// Parses ordering comparisons.
///
/// The rule is: `comparison := additive (("<" | "<=" | ">" | ">=") additive)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Less,
                             BinaryOperator::LessEqual,
                             BinaryOperator::Greater,
                             BinaryOperator::GreaterEqual],
                           parse_additive)
}

/// Parses addition and subtraction expressions.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Add, BinaryOperator::Sub],
                           parse_multiplicative)
}

/// Parses multiplication-level expressions.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           &[BinaryOperator::Mul, BinaryOperator::Div, BinaryOperator::Mod],
                           parse_unary)
}
