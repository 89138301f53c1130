use std::iter::Peekable;

use crate::{
    ast::Block,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, expect, peek_kind, skip_terminators},
            statement::parse_statement,
        },
    },
    location::SourceLocation,
};

/// Parses the statements of a block up to and including its closing brace.
///
/// Grammar:
/// ```text
///     block := "{" statement* "}"
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening `{`.
/// - `location`: Location of the opening `{`.
///
/// # Errors
/// `UnexpectedToken` if the input ends before the closing `}`; propagates
/// statement errors.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>, location: SourceLocation) -> ParseResult<Block>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();

    loop {
        skip_terminators(tokens);
        if matches!(peek_kind(tokens), TokenKind::RBrace | TokenKind::Eof) {
            break;
        }
        statements.push(parse_statement(tokens)?);
    }

    expect(tokens, TokenKind::RBrace, "Expected '}' after block")?;
    Ok(Block { statements,
               location })
}
