//! Source position types.
//!
//! A `Span` is a half-open byte range into the original input; a `Location`
//! is the human-facing line/column (1-based) plus the absolute byte offset.
//! Events carry spans, readers report locations.

/// Half-open byte range `[start, end)` into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a single offset.
    #[inline]
    pub fn at(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Line/column position for diagnostics.
///
/// `line` and `column` are 1-based; `offset` is the absolute byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    #[inline]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self { line: 1, column: 1, offset: 0 }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_len() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(Span::at(5).is_empty());
    }

    #[test]
    fn location_display() {
        let loc = Location::new(3, 14, 42);
        assert_eq!(loc.to_string(), "line 3 column 14");
        assert_eq!(Location::default(), Location::new(1, 1, 0));
    }
}
