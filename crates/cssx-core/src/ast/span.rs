//! Source positions.

use std::fmt;

/// A 1-based line and column in the source text.
///
/// A span of `0:0` marks a node that was built programmatically rather
/// than parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Create a span at the given line and column.
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Span for synthesized nodes.
    pub const fn synthetic() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Whether this span points into real source text.
    pub fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    /// The same line, shifted right by `offset` columns.
    pub fn offset(self, offset: u32) -> Self {
        Self {
            line: self.line,
            column: self.column + offset,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
