//! Error types for the event stream and decode paths.
//!
//! Every composable path (reader, expander, cursor, filter, materializer)
//! returns `Result<_, DecodeError>`; nothing panics for control flow. The
//! decode entry points wrap the code with the reader position into a
//! `DecodeFailure`.

use crate::span::Location;

/// Machine-readable error code.
///
/// `Copy` so it can be stored and re-reported without allocation, the same
/// way readers keep their last error around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    // ---- Syntax errors (fatal to the reader) ----
    /// Input ended inside a value or container.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A character that cannot start or continue the current construct.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    /// String literal not terminated before end of input.
    #[error("unclosed string")]
    UnclosedString,
    /// Malformed escape sequence inside a string.
    #[error("invalid escape sequence")]
    InvalidEscape,
    /// Malformed numeric literal.
    #[error("invalid number")]
    InvalidNumber,
    /// Bytes left over after the top-level value.
    #[error("trailing content after value")]
    TrailingContent,

    // ---- Protocol violations at the consumer boundary ----
    /// Unbalanced end event, key outside an object, value without a key,
    /// or a stream that stops mid-container.
    #[error("conversion failed")]
    ConversionFailed,

    // ---- Narrowing / typed-decode errors ----
    /// Scalar does not fit the requested integer type.
    #[error("integer overflow")]
    IntegerOverflow,
    /// Event kind does not match the requested target type.
    #[error("type mismatch")]
    TypeMismatch,
    /// Array iteration or `Vec` decode over a non-array position.
    #[error("expected an array")]
    NotAnArray,
    /// Object iteration over a non-object position.
    #[error("expected an object")]
    NotAnObject,
}

impl DecodeError {
    /// True for errors produced by a format reader on malformed input.
    pub fn is_syntax(self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof
                | Self::UnexpectedCharacter(_)
                | Self::UnclosedString
                | Self::InvalidEscape
                | Self::InvalidNumber
                | Self::TrailingContent
        )
    }

    /// True for errors produced while converting events to values.
    pub fn is_conversion(self) -> bool {
        !self.is_syntax()
    }
}

/// A `DecodeError` with the reader position, produced by the top-level
/// decode entry points. Line and column are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code} at line {line} column {column}")]
pub struct DecodeFailure {
    pub code: DecodeError,
    pub line: usize,
    pub column: usize,
}

impl DecodeFailure {
    pub fn new(code: DecodeError, location: Location) -> Self {
        Self { code, line: location.line, column: location.column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(DecodeError::UnclosedString.is_syntax());
        assert!(DecodeError::UnexpectedCharacter('x').is_syntax());
        assert!(DecodeError::ConversionFailed.is_conversion());
        assert!(DecodeError::IntegerOverflow.is_conversion());
    }

    #[test]
    fn failure_display() {
        let failure = DecodeFailure::new(DecodeError::UnclosedString, Location::new(2, 7, 19));
        assert_eq!(failure.to_string(), "unclosed string at line 2 column 7");
    }
}
