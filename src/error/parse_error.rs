use thiserror::Error;

use crate::{interpreter::lexer::Token, location::SourceLocation};

/// Represents all grammar violations reported by the parser.
///
/// Every variant carries the token at which the violation was detected, so a
/// caller can point at it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A specific token was required but another one was found.
    #[error("Error at {}: {expected}, found {token}", token.location)]
    UnexpectedToken {
        /// Description of what was required, e.g. `Expected ')' after
        /// arguments`.
        expected: String,
        /// The token found instead.
        token:    Token,
    },
    /// A token that cannot start an expression.
    #[error("Error at {}: Expected expression, found {token}", token.location)]
    ExpectedExpression {
        /// The token found instead.
        token: Token,
    },
    /// Something other than `fun`, `val` or `var` at the top level.
    #[error("Error at {}: Expected declaration (fun/val/var), found {token}", token.location)]
    ExpectedDeclaration {
        /// The token found instead.
        token: Token,
    },
    /// A type annotation that is not one of the built-in type names.
    #[error("Error at {}: Expected type annotation, found {token}", token.location)]
    ExpectedType {
        /// The token found instead.
        token: Token,
    },
    /// The left-hand side of `=` is not a bare identifier.
    #[error("Error at {}: Invalid assignment target", token.location)]
    InvalidAssignmentTarget {
        /// The `=` token.
        token: Token,
    },
    /// An `if` used as an expression has no `else` branch.
    #[error("Error at {}: If expression requires 'else' branch", token.location)]
    MissingElseBranch {
        /// The token found where `else` was required.
        token: Token,
    },
    /// Tokens left over after a `${...}` template expression.
    #[error("Error at {}: Unexpected token in string template: {token}", token.location)]
    TrailingTemplateTokens {
        /// The first extra token.
        token: Token,
    },
}

impl ParseError {
    /// Returns the message without the location prefix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::UnexpectedToken { expected, .. } => expected.clone(),
            Self::ExpectedExpression { .. } => "Expected expression".to_string(),
            Self::ExpectedDeclaration { .. } => "Expected declaration (fun/val/var)".to_string(),
            Self::ExpectedType { .. } => "Expected type annotation".to_string(),
            Self::InvalidAssignmentTarget { .. } => "Invalid assignment target".to_string(),
            Self::MissingElseBranch { .. } => "If expression requires 'else' branch".to_string(),
            Self::TrailingTemplateTokens { .. } => {
                "Unexpected token in string template".to_string()
            },
        }
    }

    /// Returns the token the error points at.
    #[must_use]
    pub const fn token(&self) -> &Token {
        match self {
            Self::UnexpectedToken { token, .. }
            | Self::ExpectedExpression { token }
            | Self::ExpectedDeclaration { token }
            | Self::ExpectedType { token }
            | Self::InvalidAssignmentTarget { token }
            | Self::MissingElseBranch { token }
            | Self::TrailingTemplateTokens { token } => token,
        }
    }

    /// Returns where the error occurred.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        &self.token().location
    }
}
