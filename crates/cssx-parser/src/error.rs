//! Parse errors.

use cssparser::{BasicParseErrorKind, ParseErrorKind, ToCss};
use cssx_core::ast::Span;

/// Result type alias for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

/// A malformed line. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at {line}:{column}: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl ParseError {
    /// Create a parse error with the given message and location.
    pub fn new(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a parse error at a span.
    pub fn at(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span.line, span.column)
    }

    /// Location as a span.
    pub fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    /// Convert a tokenizer error raised while reading text that starts at
    /// `origin`. The tokenizer only ever sees a single line.
    pub(crate) fn from_css(error: cssparser::ParseError<'_, String>, origin: Span) -> Self {
        let message = match error.kind {
            ParseErrorKind::Custom(message) => message,
            ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
                format!("unexpected '{}'", token.to_css_string())
            }
            ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
                "unexpected end of line".to_string()
            }
            ParseErrorKind::Basic(other) => format!("{other:?}"),
        };
        Self::at(message, origin.offset(error.location.column.saturating_sub(1)))
    }
}
