use std::iter::Peekable;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind, token::EOF_TOKEN},
        parser::binary::parse_logical_or,
    },
    util::stack::ensure_sufficient_stack,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, assignment, and recursively descends through the
/// precedence hierarchy.
///
/// Grammar:
/// ```text
///     expression := assignment
///     assignment := IDENTIFIER "=" assignment
///                 | logical_or
/// ```
/// Assignment is right-associative: `a = b = 1` assigns `1` to `b` and then
/// to `a`.
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// The parsed expression node.
///
/// # Errors
/// - `InvalidAssignmentTarget` if the left-hand side of `=` is not a bare
///   identifier.
/// - Propagates any errors from sub-expression parsing.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| parse_assignment(tokens))
}

fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let expr = parse_logical_or(tokens)?;

    if let Some(equals) = match_kind(tokens, TokenKind::Assign) {
        let value = parse_assignment(tokens)?;

        return match expr {
            Expr::Identifier { name, .. } => Ok(Expr::Assignment { target:   name,
                                                                   value:    Box::new(value),
                                                                   location: equals.location
                                                                                   .clone(), }),
            _ => Err(ParseError::InvalidAssignmentTarget { token: equals.clone() }),
        };
    }

    Ok(expr)
}

/// Returns the next token without consuming it, or a synthetic `Eof` token if
/// the stream is exhausted.
pub(crate) fn current<'a, I>(tokens: &mut Peekable<I>) -> &'a Token
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().copied().unwrap_or(&EOF_TOKEN)
}

/// Returns the kind of the next token.
pub(crate) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token>
{
    current(tokens).kind
}

/// Consumes and returns the next token. `Eof` is never consumed, so the
/// parser can keep looking at it.
pub(crate) fn advance<'a, I>(tokens: &mut Peekable<I>) -> &'a Token
    where I: Iterator<Item = &'a Token>
{
    let token = current(tokens);
    if token.kind != TokenKind::Eof {
        tokens.next();
    }
    token
}

/// Consumes the next token if it has the given kind.
pub(crate) fn match_kind<'a, I>(tokens: &mut Peekable<I>, kind: TokenKind) -> Option<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    (peek_kind(tokens) == kind).then(|| advance(tokens))
}

/// Consumes the next token, which must have the given kind.
///
/// # Errors
/// `UnexpectedToken` carrying `message` and the token found instead.
pub(crate) fn expect<'a, I>(tokens: &mut Peekable<I>,
                            kind: TokenKind,
                            message: &str)
                            -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    match_kind(tokens, kind).ok_or_else(|| {
                                ParseError::UnexpectedToken { expected: message.to_string(),
                                                              token:    current(tokens).clone(), }
                            })
}

/// Skips any number of optional `;` terminators.
pub(crate) fn skip_terminators<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    while match_kind(tokens, TokenKind::Semicolon).is_some() {}
}

/// Discards tokens after a syntax error until a likely statement boundary.
///
/// Always consumes at least one token. Stops right after a `;` or `}`, or
/// right before a token that starts a declaration or statement keyword
/// (`fun val var if while return`), or at end of input.
pub(crate) fn synchronize<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    let mut previous = advance(tokens).kind;

    while peek_kind(tokens) != TokenKind::Eof {
        if matches!(previous, TokenKind::Semicolon | TokenKind::RBrace)
           || peek_kind(tokens).starts_declaration()
        {
            return;
        }
        previous = advance(tokens).kind;
    }
}
