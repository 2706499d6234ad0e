//! Byte ranges into the program text

use chumsky::span::SimpleSpan;
use serde::{Deserialize, Serialize};

/// Half-open byte range `start..end`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// The covered text, clipped to `source`; empty when the range is not on a char
    /// boundary.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let end = self.end.min(source.len());
        source.get(self.start.min(end)..end).unwrap_or("")
    }
}

impl From<SimpleSpan> for Span {
    fn from(span: SimpleSpan) -> Self {
        Span::new(span.start, span.end)
    }
}
