use thiserror::Error;

use crate::location::SourceLocation;

/// Represents all errors that can occur while tokenizing source text.
///
/// Lexical errors are fatal: tokenization stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A string literal reached a newline or the end of input before its
    /// closing quote.
    #[error("Error at {location}: Unterminated string literal")]
    UnterminatedString {
        /// Position of the opening quote.
        location: SourceLocation,
    },
    /// A backslash was followed by a character that is not a known escape.
    #[error("Error at {location}: Invalid escape sequence: \\{escape}")]
    InvalidEscape {
        /// The character after the backslash.
        escape:   char,
        /// Position of the backslash.
        location: SourceLocation,
    },
    /// A `${` inside a string was never closed.
    #[error("Error at {location}: Unterminated string template")]
    UnterminatedTemplate {
        /// Position of the `$`.
        location: SourceLocation,
    },
    /// A character that starts no token.
    #[error("Error at {location}: Unexpected character: '{character}'")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Where it was found.
        location:  SourceLocation,
    },
    /// An integer literal does not fit into a signed 64-bit integer.
    #[error("Error at {location}: Integer literal too large: {literal}")]
    IntegerTooLarge {
        /// The literal as written.
        literal:  String,
        /// Position of its first digit.
        location: SourceLocation,
    },
}

impl LexError {
    /// Returns the message without the location prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnterminatedString { .. } => "Unterminated string literal".to_string(),
            Self::InvalidEscape { escape, .. } => format!("Invalid escape sequence: \\{escape}"),
            Self::UnterminatedTemplate { .. } => "Unterminated string template".to_string(),
            Self::UnexpectedCharacter { character, .. } => {
                format!("Unexpected character: '{character}'")
            },
            Self::IntegerTooLarge { literal, .. } => format!("Integer literal too large: {literal}"),
        }
    }

    /// Returns where the error occurred.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        match self {
            Self::UnterminatedString { location }
            | Self::InvalidEscape { location, .. }
            | Self::UnterminatedTemplate { location }
            | Self::UnexpectedCharacter { location, .. }
            | Self::IntegerTooLarge { location, .. } => location,
        }
    }
}
