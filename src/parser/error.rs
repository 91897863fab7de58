//! Parse errors
//!
//! Every variant records the cursor position at which parsing stopped.

use thiserror::Error;

/// A hard failure while turning a string into a selector tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("prematurely reached the end of input at position {cursor}")]
    PrematureEnd { cursor: usize },

    #[error("parameters opened but none were specified at position {cursor}")]
    EmptyParameters { cursor: usize },

    #[error("unexpected character '{found}' at position {cursor}")]
    UnexpectedCharacter { found: char, cursor: usize },

    #[error("expected '{expected}' at position {cursor}")]
    Unterminated { expected: char, cursor: usize },

    #[error("unexpected trailing input '{rest}' at position {cursor}")]
    TrailingInput { rest: String, cursor: usize },

    #[error("invalid escape sequence '\\{found}' at position {cursor}")]
    InvalidEscape { found: char, cursor: usize },

    #[error("invalid structured tag at position {cursor}: {message}")]
    InvalidTag { message: String, cursor: usize },

    #[error("invalid resource location '{input}' at position {cursor}")]
    InvalidResourceLocation { input: String, cursor: usize },

    #[error("override for '{path}' produced a schema-only value at position {cursor}")]
    SchemaOnlyValue { path: String, cursor: usize },

    #[error("override for '{path}' failed at position {cursor}: {message}")]
    Override {
        path: String,
        message: String,
        cursor: usize,
    },
}

impl ParseError {
    /// Position at which the failure was detected
    pub fn cursor(&self) -> usize {
        match self {
            Self::PrematureEnd { cursor }
            | Self::EmptyParameters { cursor }
            | Self::UnexpectedCharacter { cursor, .. }
            | Self::Unterminated { cursor, .. }
            | Self::TrailingInput { cursor, .. }
            | Self::InvalidEscape { cursor, .. }
            | Self::InvalidTag { cursor, .. }
            | Self::InvalidResourceLocation { cursor, .. }
            | Self::SchemaOnlyValue { cursor, .. }
            | Self::Override { cursor, .. } => *cursor,
        }
    }

    /// Whether another reading of the same text may still succeed.
    ///
    /// Override failures are final: the caller asked for that reading.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Override { .. } | Self::SchemaOnlyValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_includes_position() {
        let err = ParseError::UnexpectedCharacter {
            found: ' ',
            cursor: 6,
        };
        assert_eq!(err.cursor(), 6);
        assert_eq!(err.to_string(), "unexpected character ' ' at position 6");
    }

    #[test]
    fn test_override_failures_are_final() {
        let err = ParseError::SchemaOnlyValue {
            path: "x".to_string(),
            cursor: 5,
        };
        assert!(!err.is_recoverable());
        assert!(ParseError::PrematureEnd { cursor: 0 }.is_recoverable());
    }
}
