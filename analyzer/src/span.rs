use std::fmt;

/// A zero-based (line, column) position in source text.
///
/// Ordering is lexicographic: line first, then column. This is the order
/// every visibility comparison in name resolution relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub line: usize,
    pub col: usize,
}

impl Point {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A source region `[start, end]` with `start <= end` lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Returns true when `inner` lies within `self`, inclusive at both ends.
    pub fn contains(&self, inner: Range) -> bool {
        inner.start >= self.start && inner.end <= self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
