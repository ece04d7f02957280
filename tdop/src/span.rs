//! Source locations used in error reporting.
//!
//! Tokens and errors carry a [`Span`]: a half-open byte-offset range
//! `[start, end)` into the text being parsed. Offsets are cheap to carry
//! around during a parse; human-facing line/column coordinates are derived
//! from them only when a diagnostic is rendered, via [`Position::locate`].
//!
//! # Examples
//!
//! ```rust
//! # use tdop::{Position, Span, span};
//! let input = "1 +\n  )";
//! let sp = span!(6, 7);
//! assert_eq!(&input[sp.range()], ")");
//! assert_eq!(Position::locate(input, sp.start), Position::new(1, 2));
//! ```

/// A 0-based line/column position in source text.
///
/// The column counts characters, not bytes.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// 0-based line number.
    pub line: usize,
    /// 0-based column number (character position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Computes the line/column of byte `offset` within `input`.
    ///
    /// Offsets past the end of `input` are clamped to the end. An offset that
    /// falls inside a multi-byte character is counted as the start of that
    /// character.
    pub fn locate(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let mut pos = Position::default();
        for (i, c) in input.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                pos.line += 1;
                pos.column = 0;
            } else {
                pos.column += 1;
            }
        }
        pos
    }
}

/// A half-open byte range: `[start, end)`.
#[derive(Debug, Clone, Default, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// Starting byte offset (inclusive).
    pub start: usize,
    /// Ending byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty span positioned at `offset`.
    #[inline]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Merge with another span by covering both.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Is this span empty (start == end)?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of bytes covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// The span as a range, for slicing the input it was taken from.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Pretty-print for diagnostics (human-readable).
    #[inline]
    pub fn display(&self) -> String {
        format!("offset {} to {}", self.start, self.end)
    }
}

/// Build a [`Span`] inline from byte offsets.
///
/// # Examples
///
/// ```rust
/// # use tdop::{Span, span};
/// assert_eq!(span!(2, 5), Span::new(2, 5));
/// ```
#[macro_export]
macro_rules! span {
    ($start:expr, $end:expr) => {
        $crate::Span {
            start: $start,
            end: $end,
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both() {
        let a = span!(3, 5);
        let b = span!(1, 4);
        assert_eq!(a.merge(&b), span!(1, 5));
        assert_eq!(b.merge(&a), span!(1, 5));
    }

    #[test]
    fn empty_spans() {
        assert!(Span::at(4).is_empty());
        assert_eq!(Span::at(4).len(), 0);
        assert!(!span!(0, 1).is_empty());
    }

    #[test]
    fn locate_counts_lines_and_chars() {
        let input = "ab\ncé d";
        assert_eq!(Position::locate(input, 0), Position::new(0, 0));
        assert_eq!(Position::locate(input, 2), Position::new(0, 2));
        assert_eq!(Position::locate(input, 3), Position::new(1, 0));
        // 'é' is two bytes wide
        assert_eq!(Position::locate(input, 7), Position::new(1, 3));
        assert_eq!(Position::locate(input, 100), Position::new(1, 4));
    }
}
