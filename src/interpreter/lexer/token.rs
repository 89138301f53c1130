use std::fmt;

use crate::location::SourceLocation;

/// The category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    IntLiteral,
    StringLiteral,
    /// A string literal containing `$name` or `${expr}` segments.
    StringTemplate,
    True,
    False,
    Identifier,

    Fun,
    Val,
    Var,
    If,
    Else,
    While,
    Return,

    IntType,
    StringType,
    BooleanType,
    UnitType,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AndAnd,
    OrOr,
    Bang,
    Arrow,

    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dollar,

    Eof,
}

impl TokenKind {
    /// Returns the source spelling of fixed tokens, or a descriptive name for
    /// tokens that carry a value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IntLiteral => "integer literal",
            Self::StringLiteral => "string literal",
            Self::StringTemplate => "string template",
            Self::True => "true",
            Self::False => "false",
            Self::Identifier => "identifier",
            Self::Fun => "fun",
            Self::Val => "val",
            Self::Var => "var",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Return => "return",
            Self::IntType => "Int",
            Self::StringType => "String",
            Self::BooleanType => "Boolean",
            Self::UnitType => "Unit",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Assign => "=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Bang => "!",
            Self::Arrow => "->",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Dollar => "$",
            Self::Eof => "end of input",
        }
    }

    /// Whether this token begins a top-level declaration or a statement
    /// keyword. The parser resynchronizes on these.
    #[must_use]
    pub const fn starts_declaration(self) -> bool {
        matches!(self, Self::Fun | Self::Val | Self::Var | Self::If | Self::While | Self::Return)
    }

    /// Whether this token can begin an expression.
    #[must_use]
    pub const fn starts_expression(self) -> bool {
        matches!(self,
                 Self::Identifier
                 | Self::IntLiteral
                 | Self::StringLiteral
                 | Self::StringTemplate
                 | Self::True
                 | Self::False
                 | Self::LParen
                 | Self::Minus
                 | Self::Bang
                 | Self::If)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One piece of a string template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSegment {
    /// Literal text with escapes already resolved.
    Text(String),
    /// A `$name` reference.
    Name {
        name:     String,
        location: SourceLocation,
    },
    /// The tokens of a `${...}` expression, terminated by an `Eof` token.
    Code {
        tokens:   Vec<Token>,
        location: SourceLocation,
    },
}

/// The payload of a [`Token`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenValue {
    #[default]
    None,
    Int(i64),
    Str(String),
    Bool(bool),
    Template(Vec<TemplateSegment>),
}

/// A lexical token with its payload and position.
///
/// Identifiers carry their text in [`TokenValue::Str`], `true`/`false` carry
/// [`TokenValue::Bool`] rather than their spelling.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:     TokenKind,
    pub value:    TokenValue,
    pub location: SourceLocation,
}

/// Fallback returned by the parser when it looks past the end of the stream.
pub(crate) static EOF_TOKEN: Token = Token { kind:     TokenKind::Eof,
                                             value:    TokenValue::None,
                                             location: SourceLocation::start(), };

impl Token {
    /// Creates a token without a payload.
    #[must_use]
    pub const fn simple(kind: TokenKind, location: SourceLocation) -> Self {
        Self { kind,
               value: TokenValue::None,
               location }
    }

    /// Returns the text payload of identifier and string tokens.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.value) {
            (TokenKind::Identifier, TokenValue::Str(name)) => write!(f, "'{name}'"),
            (TokenKind::StringLiteral, TokenValue::Str(s)) => write!(f, "{s:?}"),
            (TokenKind::IntLiteral, TokenValue::Int(n)) => write!(f, "{n}"),
            (TokenKind::Eof, _) => f.write_str("end of input"),
            (kind, _) => write!(f, "'{}'", kind.as_str()),
        }
    }
}
