//! Byte ranges into the snapshot source.

use std::ops::Range;

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a span from a byte range. A reversed range is normalized.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start.min(range.end),
            end: range.end.max(range.start),
        }
    }

    /// Span of the sub-slice `part` of `source`.
    ///
    /// Returns `None` if `part` does not point into `source`.
    pub fn of_slice(source: &str, part: &str) -> Option<Self> {
        let base = source.as_ptr() as usize;
        let start = (part.as_ptr() as usize).checked_sub(base)?;
        let end = start.checked_add(part.len())?;
        (end <= source.len()).then(|| Self::new(start..end))
    }

    /// Span of the character at 1-based `line` and `column`, as reported by
    /// the JSON parser.
    ///
    /// Positions past the end of the source collapse to an empty span at the
    /// end.
    pub fn at_line_column(source: &str, line: usize, column: usize) -> Self {
        let line_start = source
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum::<usize>();
        let offset = (line_start + column.saturating_sub(1)).min(source.len());
        let end = source
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(offset, |ch| offset + ch.len_utf8());
        Self::new(offset..end)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}
