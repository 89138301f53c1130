//! Converts source text into a flat sequence of [`Token`]s.
//!
//! Scanning is done by a `logos`-generated raw lexer; [`Lexer::tokenize`]
//! then attaches source locations, resolves keywords into token kinds and
//! recursively tokenizes `${...}` string-template code.

use std::sync::Arc;

use logos::Logos;
use tracing::debug;

use crate::{error::LexError, location::SourceLocation};

mod string;
/// Token kinds, payloads and template segments.
pub mod token;

use string::{RawSegment, lex_string};
pub use token::{TemplateSegment, Token, TokenKind, TokenValue};

/// State carried by the raw lexer across tokens.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LexerExtras {
    /// Current line number, starting at 1.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Failure reported by the raw lexer; turned into a [`LexError`] once its
/// location is known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum RawError {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    InvalidEscape {
        escape: char,
        offset: usize,
    },
    UnterminatedTemplate {
        offset: usize,
    },
    IntegerTooLarge,
}

/// The scanner's view of a token, before locations and kinds are attached.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\r]+")]
enum RawToken {
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    Newline,
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().map_err(|_| RawError::IntegerTooLarge))]
    Integer(i64),
    #[token("\"", lex_string)]
    Str(Vec<RawSegment>),
    #[regex(r"[\p{Alphabetic}_][\p{Alphabetic}\p{N}_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("fun")]
    Fun,
    #[token("val")]
    Val,
    #[token("var")]
    Var,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("Int")]
    IntType,
    #[token("String")]
    StringType,
    #[token("Boolean")]
    BooleanType,
    #[token("Unit")]
    UnitType,

    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("->")]
    Arrow,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Assign,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("!")]
    Bang,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("$")]
    Dollar,
}

impl RawToken {
    const fn fixed_kind(&self) -> TokenKind {
        match self {
            Self::Newline | Self::Comment => TokenKind::Eof,
            Self::Integer(_) => TokenKind::IntLiteral,
            Self::Str(_) => TokenKind::StringLiteral,
            Self::Identifier(_) => TokenKind::Identifier,
            Self::True => TokenKind::True,
            Self::False => TokenKind::False,
            Self::Fun => TokenKind::Fun,
            Self::Val => TokenKind::Val,
            Self::Var => TokenKind::Var,
            Self::If => TokenKind::If,
            Self::Else => TokenKind::Else,
            Self::While => TokenKind::While,
            Self::Return => TokenKind::Return,
            Self::IntType => TokenKind::IntType,
            Self::StringType => TokenKind::StringType,
            Self::BooleanType => TokenKind::BooleanType,
            Self::UnitType => TokenKind::UnitType,
            Self::EqualEqual => TokenKind::EqualEqual,
            Self::BangEqual => TokenKind::BangEqual,
            Self::LessEqual => TokenKind::LessEqual,
            Self::GreaterEqual => TokenKind::GreaterEqual,
            Self::AndAnd => TokenKind::AndAnd,
            Self::OrOr => TokenKind::OrOr,
            Self::Arrow => TokenKind::Arrow,
            Self::Plus => TokenKind::Plus,
            Self::Minus => TokenKind::Minus,
            Self::Star => TokenKind::Star,
            Self::Slash => TokenKind::Slash,
            Self::Percent => TokenKind::Percent,
            Self::Assign => TokenKind::Assign,
            Self::Less => TokenKind::Less,
            Self::Greater => TokenKind::Greater,
            Self::Bang => TokenKind::Bang,
            Self::LParen => TokenKind::LParen,
            Self::RParen => TokenKind::RParen,
            Self::LBrace => TokenKind::LBrace,
            Self::RBrace => TokenKind::RBrace,
            Self::Comma => TokenKind::Comma,
            Self::Colon => TokenKind::Colon,
            Self::Semicolon => TokenKind::Semicolon,
            Self::Dollar => TokenKind::Dollar,
        }
    }
}

/// Tokenizer for one source text.
///
/// # Example
/// ```
/// use ktinterp::interpreter::lexer::{Lexer, TokenKind, TokenValue};
///
/// let tokens = Lexer::new("val x = 42").tokenize().unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Val,
///                 TokenKind::Identifier,
///                 TokenKind::Assign,
///                 TokenKind::IntLiteral,
///                 TokenKind::Eof]);
/// assert_eq!(tokens[3].value, TokenValue::Int(42));
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source:   &'src str,
    filename: Option<Arc<str>>,
    /// Position of the first character of `source`; not `1:1` when
    /// tokenizing code embedded in a string template.
    origin:   (usize, usize),
}

impl<'src> Lexer<'src> {
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self { source,
               filename: None,
               origin: (1, 1) }
    }

    /// Attributes every produced location to `filename`.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<Arc<str>>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Converts the whole source into tokens.
    ///
    /// Whitespace, newlines and `//` comments are skipped. The returned
    /// sequence always ends with a [`TokenKind::Eof`] token.
    ///
    /// # Errors
    /// Returns the first [`LexError`] encountered; tokenization does not
    /// continue past it.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let mut raw = RawToken::lexer_with_extras(self.source, LexerExtras::default());
        let mut tokens = Vec::new();

        while let Some(result) = raw.next() {
            let start = raw.span().start;
            let location = self.location(&raw.extras, start);

            match result {
                Ok(token) => tokens.push(self.convert(token, location, &raw.extras)?),
                Err(error) => return Err(self.error(error, location, start, &raw.extras)),
            }
        }

        let end = self.location(&raw.extras, self.source.len());
        tokens.push(Token::simple(TokenKind::Eof, end));

        debug!(tokens = tokens.len(), "tokenized source");
        Ok(tokens)
    }

    fn location(&self, extras: &LexerExtras, offset: usize) -> SourceLocation {
        let column = self.source[extras.line_start..offset].chars().count() + 1;
        let (line, column) = if extras.line == 1 {
            (self.origin.0, self.origin.1 + column - 1)
        } else {
            (self.origin.0 + extras.line - 1, column)
        };

        SourceLocation { line,
                         column,
                         filename: self.filename.clone() }
    }

    fn convert(&self,
               token: RawToken,
               location: SourceLocation,
               extras: &LexerExtras)
               -> Result<Token, LexError> {
        let kind = token.fixed_kind();
        let token = match token {
            RawToken::Integer(n) => Token { kind,
                                            value: TokenValue::Int(n),
                                            location },
            RawToken::Identifier(name) => Token { kind,
                                                  value: TokenValue::Str(name),
                                                  location },
            RawToken::True | RawToken::False => {
                Token { kind,
                        value: TokenValue::Bool(kind == TokenKind::True),
                        location }
            },
            RawToken::Str(segments) => self.convert_string(segments, location, extras)?,
            _ => Token::simple(kind, location),
        };
        Ok(token)
    }

    fn convert_string(&self,
                      segments: Vec<RawSegment>,
                      location: SourceLocation,
                      extras: &LexerExtras)
                      -> Result<Token, LexError> {
        if segments.iter().all(|s| matches!(s, RawSegment::Text(_))) {
            let text = segments.into_iter()
                               .map(|s| match s {
                                   RawSegment::Text(t) => t,
                                   _ => String::new(),
                               })
                               .collect();
            return Ok(Token { kind: TokenKind::StringLiteral,
                              value: TokenValue::Str(text),
                              location });
        }

        let mut parts = Vec::with_capacity(segments.len());
        for segment in segments {
            parts.push(match segment {
                           RawSegment::Text(text) => TemplateSegment::Text(text),
                           RawSegment::Name { name, offset } => {
                               TemplateSegment::Name { name,
                                                       location: self.location(extras, offset) }
                           },
                           RawSegment::Code { source,
                                              offset,
                                              code_offset, } => {
                               let origin = self.location(extras, code_offset);
                               let nested = Lexer { source:   &source,
                                                    filename: self.filename.clone(),
                                                    origin:   (origin.line, origin.column), };
                               let tokens = nested.tokenize()?;
                               TemplateSegment::Code { tokens,
                                                       location: self.location(extras, offset) }
                           },
                       });
        }

        Ok(Token { kind: TokenKind::StringTemplate,
                   value: TokenValue::Template(parts),
                   location })
    }

    fn error(&self,
             error: RawError,
             location: SourceLocation,
             start: usize,
             extras: &LexerExtras)
             -> LexError {
        match error {
            RawError::UnexpectedCharacter => {
                let character = self.source[start..].chars().next().unwrap_or('\0');
                LexError::UnexpectedCharacter { character,
                                                location }
            },
            RawError::UnterminatedString => LexError::UnterminatedString { location },
            RawError::InvalidEscape { escape, offset } => {
                LexError::InvalidEscape { escape,
                                          location: self.location(extras, offset) }
            },
            RawError::UnterminatedTemplate { offset } => {
                LexError::UnterminatedTemplate { location: self.location(extras, offset) }
            },
            RawError::IntegerTooLarge => {
                let literal = self.source[start..].chars()
                                                  .take_while(char::is_ascii_digit)
                                                  .collect();
                LexError::IntegerTooLarge { literal,
                                            location }
            },
        }
    }
}

/// Tokenizes `source` without a file name.
///
/// # Errors
/// See [`Lexer::tokenize`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_source_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  // just a comment\n\t\r\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn keywords_and_type_names() {
        use TokenKind::*;
        assert_eq!(kinds("fun val var if else while return Int String Boolean Unit"),
                   vec![Fun, Val, Var, If, Else, While, Return, IntType, StringType,
                        BooleanType, UnitType, Eof]);
    }

    #[test]
    fn keyword_prefixes_are_identifiers() {
        let tokens = tokenize("function values iffy").unwrap();
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Identifier));
        assert_eq!(tokens[0].text(), Some("function"));
    }

    #[test]
    fn identifiers_may_use_unicode_letters() {
        let tokens = tokenize("café _straße2 x١").unwrap();
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Identifier));
        assert_eq!(tokens[0].text(), Some("café"));
        assert_eq!(tokens[1].text(), Some("_straße2"));
        assert_eq!(tokens[2].text(), Some("x١"));
    }

    #[test]
    fn two_character_operators_are_not_split() {
        use TokenKind::*;
        assert_eq!(kinds("+ - * / % == != <= >= && || ->"),
                   vec![Plus, Minus, Star, Slash, Percent, EqualEqual, BangEqual, LessEqual,
                        GreaterEqual, AndAnd, OrOr, Arrow, Eof]);
        assert_eq!(kinds("a<=b"), vec![Identifier, LessEqual, Identifier, Eof]);
    }

    #[test]
    fn booleans_carry_their_value() {
        let tokens = tokenize("true false").unwrap();
        assert_eq!(tokens[0].value, TokenValue::Bool(true));
        assert_eq!(tokens[1].value, TokenValue::Bool(false));
    }

    #[test]
    fn string_escapes() {
        let tokens = tokenize(r#""a\nb" "q\"\\\t\$""#).unwrap();
        assert_eq!(tokens[0].value, TokenValue::Str("a\nb".to_string()));
        assert_eq!(tokens[1].value, TokenValue::Str("q\"\\\t$".to_string()));
    }

    #[test]
    fn locations_are_one_based_and_track_lines() {
        let tokens = tokenize("val x\n  = 1").unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[2].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[3].location, SourceLocation::new(2, 5));
    }

    #[test]
    fn columns_count_characters() {
        let tokens = tokenize("\"héllo\" x").unwrap();
        assert_eq!(tokens[1].location.column, 9);
    }

    #[test]
    fn filename_is_attached() {
        let tokens = Lexer::new("x").with_filename("main.kt").tokenize().unwrap();
        assert_eq!(tokens[0].location.to_string(), "main.kt:1:1");
    }

    #[test]
    fn unterminated_string() {
        let err = tokenize("val s = \"abc\nval t = 1").unwrap_err();
        assert_eq!(err,
                   LexError::UnterminatedString { location: SourceLocation::new(1, 9) });
        assert!(matches!(tokenize("\"abc").unwrap_err(), LexError::UnterminatedString { .. }));
    }

    #[test]
    fn invalid_escape_points_at_backslash() {
        let err = tokenize(r#"  "ab\qc""#).unwrap_err();
        assert_eq!(err,
                   LexError::InvalidEscape { escape:   'q',
                                             location: SourceLocation::new(1, 6), });
        assert_eq!(err.message(), "Invalid escape sequence: \\q");
    }

    #[test]
    fn unexpected_character() {
        let err = tokenize("val x = 1 # 2").unwrap_err();
        assert_eq!(err,
                   LexError::UnexpectedCharacter { character: '#',
                                                   location:  SourceLocation::new(1, 11), });
    }

    #[test]
    fn integer_overflow_is_rejected() {
        assert_eq!(tokenize("9223372036854775807").unwrap()[0].value,
                   TokenValue::Int(i64::MAX));
        let err = tokenize("9223372036854775808").unwrap_err();
        assert_eq!(err.message(), "Integer literal too large: 9223372036854775808");
    }

    #[test]
    fn templates_split_into_segments() {
        let tokens = tokenize(r#""x = $x, sum = ${a + 1}!""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringTemplate);

        let TokenValue::Template(parts) = &tokens[0].value else {
            panic!("expected a template");
        };
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], TemplateSegment::Text("x = ".to_string()));
        assert_eq!(parts[1],
                   TemplateSegment::Name { name:     "x".to_string(),
                                           location: SourceLocation::new(1, 6), });
        let TemplateSegment::Code { tokens: code, .. } = &parts[3] else {
            panic!("expected template code");
        };
        let code_kinds: Vec<_> = code.iter().map(|t| t.kind).collect();
        assert_eq!(code_kinds,
                   vec![TokenKind::Identifier, TokenKind::Plus, TokenKind::IntLiteral,
                        TokenKind::Eof]);
        assert_eq!(code[0].location, SourceLocation::new(1, 18));
    }

    #[test]
    fn escaped_or_lone_dollar_is_text() {
        let tokens = tokenize(r#""\$x costs 5$""#).unwrap();
        assert_eq!(tokens[0].value, TokenValue::Str("$x costs 5$".to_string()));
    }

    #[test]
    fn unterminated_template() {
        assert!(matches!(tokenize(r#""${a + 1""#).unwrap_err(),
                         LexError::UnterminatedTemplate { .. }));
    }
}
