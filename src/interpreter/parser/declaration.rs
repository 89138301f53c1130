use std::iter::Peekable;

use crate::{
    ast::{Declaration, FunctionDeclaration, Parameter, TypeAnnotation, VariableDeclaration},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_block,
            core::{ParseResult, advance, current, expect, match_kind, parse_expression},
            utils::{parse_comma_separated, parse_identifier},
        },
    },
};

/// Parses one top-level declaration.
///
/// Only `fun`, `val` and `var` may appear at the top level of a program.
///
/// Grammar:
/// ```text
///     declaration := function | variable
/// ```
///
/// # Errors
/// `ExpectedDeclaration` if the next token starts neither form.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Declaration>
    where I: Iterator<Item = &'a Token> + Clone
{
    let token = current(tokens);
    match token.kind {
        TokenKind::Fun => {
            advance(tokens);
            parse_function(tokens, token).map(Declaration::Function)
        },
        TokenKind::Val | TokenKind::Var => {
            advance(tokens);
            parse_variable(tokens, token).map(Declaration::Variable)
        },
        _ => Err(ParseError::ExpectedDeclaration { token: token.clone() }),
    }
}

/// Parses a function declaration after its `fun` keyword.
///
/// Grammar:
/// ```text
///     function := "fun" IDENTIFIER "(" parameters? ")" (":" type)? block
///     parameters := parameter ("," parameter)*
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after `fun`.
/// - `keyword`: The `fun` token, which locates the declaration.
pub fn parse_function<'a, I>(tokens: &mut Peekable<I>,
                             keyword: &Token)
                             -> ParseResult<FunctionDeclaration>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (name, _) = parse_identifier(tokens, "Expected function name")?;

    expect(tokens, TokenKind::LParen, "Expected '(' after function name")?;
    let parameters = parse_comma_separated(tokens,
                                           parse_parameter,
                                           TokenKind::RParen,
                                           "Expected ')' after parameters")?;

    let return_type = match match_kind(tokens, TokenKind::Colon) {
        Some(_) => Some(parse_type_annotation(tokens)?),
        None => None,
    };

    let open = expect(tokens, TokenKind::LBrace, "Expected '{' before function body")?;
    let body = parse_block(tokens, open.location.clone())?;

    Ok(FunctionDeclaration { name,
                             parameters,
                             return_type,
                             body,
                             location: keyword.location.clone() })
}

/// Parses a parameter: `name: Type`.
fn parse_parameter<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Parameter>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (name, token) = parse_identifier(tokens, "Expected parameter name")?;
    expect(tokens, TokenKind::Colon, "Expected ':' after parameter name")?;
    let type_annotation = parse_type_annotation(tokens)?;

    Ok(Parameter { name,
                   type_annotation,
                   location: token.location.clone() })
}

/// Parses a variable declaration after its `val` or `var` keyword.
///
/// Grammar:
/// ```text
///     variable := ("val" | "var") IDENTIFIER (":" type)? ("=" expression)?
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after the keyword.
/// - `keyword`: The `val`/`var` token; decides mutability and location.
pub fn parse_variable<'a, I>(tokens: &mut Peekable<I>,
                             keyword: &Token)
                             -> ParseResult<VariableDeclaration>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (name, _) = parse_identifier(tokens, "Expected variable name")?;

    let type_annotation = match match_kind(tokens, TokenKind::Colon) {
        Some(_) => Some(parse_type_annotation(tokens)?),
        None => None,
    };

    let initializer = match match_kind(tokens, TokenKind::Assign) {
        Some(_) => Some(parse_expression(tokens)?),
        None => None,
    };

    Ok(VariableDeclaration { mutable: keyword.kind == TokenKind::Var,
                             name,
                             type_annotation,
                             initializer,
                             location: keyword.location.clone() })
}

/// Parses a type annotation; only the built-in type names are accepted.
///
/// # Errors
/// `ExpectedType` for any other token.
fn parse_type_annotation<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<TypeAnnotation>
    where I: Iterator<Item = &'a Token>
{
    let token = current(tokens);
    match token.kind {
        TokenKind::IntType | TokenKind::StringType | TokenKind::BooleanType | TokenKind::UnitType => {
            advance(tokens);
            Ok(TypeAnnotation { name:     token.kind.as_str().to_string(),
                                location: token.location.clone(), })
        },
        _ => Err(ParseError::ExpectedType { token: token.clone() }),
    }
}
