use std::iter::Peekable;

use crate::interpreter::{
    lexer::{Token, TokenKind},
    parser::core::{ParseResult, expect, match_kind},
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by parameter lists and call argument lists. It
/// repeatedly calls `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := (item ("," item)*)? closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token kind that terminates the list.
/// - `message`: Error message used when neither `,` nor `closing` follows an
///   item, e.g. `Expected ')' after arguments`.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse or the list is not
/// properly closed.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: TokenKind,
    message: &str)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    if match_kind(tokens, closing).is_some() {
        return Ok(items);
    }

    loop {
        items.push(parse_item(tokens)?);
        if match_kind(tokens, TokenKind::Comma).is_none() {
            expect(tokens, closing, message)?;
            return Ok(items);
        }
    }
}

/// Parses a plain identifier and returns its name.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at an identifier.
/// - `message`: Error message used when the next token is not an identifier.
///
/// # Returns
/// The identifier's name together with its token.
///
/// # Errors
/// Returns `UnexpectedToken` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              message: &str)
                                                              -> ParseResult<(String, &'a Token)>
    where I: Iterator<Item = &'a Token>
{
    let token = expect(tokens, TokenKind::Identifier, message)?;
    Ok((token.text().unwrap_or_default().to_string(), token))
}
