//! Byte ranges into the diagram source.

use std::ops::Range;

/// A half-open byte range `start..end` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Get the start offset of the span
    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end offset of the span
    pub fn end(&self) -> usize {
        self.end
    }

    /// Get the length of the span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Create a union of two spans (encompassing both)
    pub fn union(&self, other: Span) -> Span {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_accessors() {
        let span = Span::new(3..8);

        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert_eq!(span.range(), 3..8);
    }

    #[test]
    fn test_span_union() {
        let span = Span::new(10..12).union(Span::new(2..4));

        assert_eq!(span, Span::new(2..12));
    }

    #[test]
    fn test_span_inverted_range_is_empty() {
        #[allow(clippy::reversed_empty_ranges)]
        let span = Span::new(5..2);

        assert!(span.is_empty());
        assert_eq!(span.start(), 5);
    }
}
