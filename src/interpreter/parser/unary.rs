use std::iter::Peekable;

use crate::{
    ast::{Expr, Literal, TemplatePart, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::{TemplateSegment, Token, TokenKind, TokenValue},
        parser::{
            core::{ParseResult, advance, current, expect, match_kind, parse_expression, peek_kind},
            utils::parse_comma_separated,
        },
    },
    location::SourceLocation,
    util::stack::ensure_sufficient_stack,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (integer negation)
/// - `!`  (logical not)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`. If no unary operator is present, the function delegates to
/// [`parse_call`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "!") unary
///            | call
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = current(tokens);
    let op = match token.kind {
        TokenKind::Minus => UnaryOperator::Negate,
        TokenKind::Bang => UnaryOperator::Not,
        _ => return parse_call(tokens),
    };

    advance(tokens);
    let operand = ensure_sufficient_stack(|| parse_unary(tokens))?;
    Ok(Expr::Unary { op,
                     operand: Box::new(operand),
                     location: token.location.clone() })
}

/// Parses a function call or falls through to a primary expression.
///
/// A call is recognized only when an identifier is immediately followed by
/// `(`; the call is located at the callee's name.
///
/// Grammar:
/// ```text
///     call := IDENTIFIER "(" (expression ("," expression)*)? ")"
///           | primary
/// ```
pub(crate) fn parse_call<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    match parse_primary(tokens)? {
        Expr::Identifier { name, location } if peek_kind(tokens) == TokenKind::LParen => {
            advance(tokens);
            let arguments = parse_comma_separated(tokens,
                                                  parse_expression,
                                                  TokenKind::RParen,
                                                  "Expected ')' after arguments")?;
            Ok(Expr::Call { name,
                            arguments,
                            location })
        },
        expr => Ok(expr),
    }
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - integer, string and boolean literals
/// - string templates
/// - identifiers
/// - parenthesized expressions
/// - `if` expressions
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | IDENTIFIER
///              | "(" expression ")"
///              | if_expression
/// ```
///
/// # Errors
/// `ExpectedExpression` if the next token cannot start an expression; the
/// token is not consumed.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = current(tokens);
    let location = token.location.clone();

    match (token.kind, &token.value) {
        (TokenKind::IntLiteral, TokenValue::Int(n)) => {
            advance(tokens);
            Ok(Expr::Literal { value: Literal::Int(*n),
                               location })
        },
        (TokenKind::StringLiteral, TokenValue::Str(s)) => {
            advance(tokens);
            Ok(Expr::Literal { value: Literal::String(s.clone()),
                               location })
        },
        (TokenKind::True | TokenKind::False, TokenValue::Bool(b)) => {
            advance(tokens);
            Ok(Expr::Literal { value: Literal::Boolean(*b),
                               location })
        },
        (TokenKind::Identifier, TokenValue::Str(name)) => {
            advance(tokens);
            Ok(Expr::Identifier { name: name.clone(),
                                  location })
        },
        (TokenKind::StringTemplate, TokenValue::Template(segments)) => {
            advance(tokens);
            parse_template(segments, location)
        },
        (TokenKind::LParen, _) => {
            advance(tokens);
            let expr = parse_expression(tokens)?;
            expect(tokens, TokenKind::RParen, "Expected ')' after expression")?;
            Ok(expr)
        },
        (TokenKind::If, _) => {
            advance(tokens);
            parse_if_expression(tokens, location)
        },
        _ => Err(ParseError::ExpectedExpression { token: token.clone() }),
    }
}

/// Parses an `if` used as an expression.
///
/// Syntax:
/// ```text
///     if (condition) expression else expression
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `location`: Location of the `if` token.
///
/// # Errors
/// - `MissingElseBranch` if no `else` follows the `then` expression.
/// - `UnexpectedToken` if the parentheses around the condition are missing.
fn parse_if_expression<'a, I>(tokens: &mut Peekable<I>,
                              location: SourceLocation)
                              -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, TokenKind::LParen, "Expected '(' after 'if'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, TokenKind::RParen, "Expected ')' after condition")?;

    let then_branch = parse_expression(tokens)?;

    if match_kind(tokens, TokenKind::Else).is_none() {
        return Err(ParseError::MissingElseBranch { token: current(tokens).clone() });
    }
    let else_branch = parse_expression(tokens)?;

    Ok(Expr::If { condition: Box::new(condition),
                  then_branch: Box::new(then_branch),
                  else_branch: Box::new(else_branch),
                  location })
}

/// Builds a [`Expr::StringTemplate`] from lexed template segments.
///
/// `$name` segments become identifiers; the tokens of each `${...}` segment
/// must form exactly one expression.
fn parse_template(segments: &[TemplateSegment], location: SourceLocation) -> ParseResult<Expr> {
    let mut parts = Vec::with_capacity(segments.len());

    for segment in segments {
        let part = match segment {
            TemplateSegment::Text(text) => TemplatePart::Text(text.clone()),
            TemplateSegment::Name { name, location } => {
                TemplatePart::Expr(Expr::Identifier { name:     name.clone(),
                                                      location: location.clone(), })
            },
            TemplateSegment::Code { tokens, .. } => {
                let mut inner = tokens.iter().peekable();
                let expr = parse_expression(&mut inner)?;
                if peek_kind(&mut inner) != TokenKind::Eof {
                    return Err(ParseError::TrailingTemplateTokens { token: current(&mut inner).clone() });
                }
                TemplatePart::Expr(expr)
            },
        };
        parts.push(part);
    }

    Ok(Expr::StringTemplate { parts,
                              location })
}
