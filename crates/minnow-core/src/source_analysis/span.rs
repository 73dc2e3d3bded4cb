// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source positions.
//!
//! A [`Span`] names a contiguous byte region of the source text; every token
//! and AST node carries one. Hosts never see raw offsets: diagnostics
//! convert a span into a [`Location`] (1-based line, 0-based column, length)
//! at the moment they are assembled, so line/column bookkeeping stays out of
//! the hot lexing path.

use std::ops::Range;

/// A contiguous byte region of the source text, stored as offset plus width.
///
/// Zero-width spans are legal and mark points rather than regions; the
/// synthetic layout tokens (`Indent`, `Dedent`, `Newline`, `Eof`) carry
/// them.
///
/// # Examples
///
/// ```
/// use minnow_core::source_analysis::Span;
///
/// let source = "x = 10";
/// let span = Span::new(4, 6);
/// assert_eq!(&source[span.as_range()], "10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: u32,
    len: u32,
}

impl Span {
    /// A span covering `start` up to (but not including) `end`.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    /// A zero-width span anchored at `at`.
    #[must_use]
    pub const fn empty(at: u32) -> Self {
        Self { start: at, len: 0 }
    }

    /// First byte offset covered.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start
    }

    /// One past the last byte offset covered.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.start + self.len
    }

    /// Width in bytes.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.len
    }

    /// True for zero-width spans.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The smallest span covering both `self` and `other`, in either order.
    ///
    /// The parser uses this to grow a node's span as it absorbs operands:
    /// `left.span().through(right.span())`.
    #[must_use]
    pub fn through(self, other: Self) -> Self {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Self::new(start, end)
    }

    /// The region as a `Range<usize>`, ready for slicing source text.
    #[must_use]
    pub const fn as_range(self) -> Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start as usize, span.len as usize).into()
    }
}

/// A human-oriented source position: 1-based line, 0-based column, length.
///
/// This is the position shape surfaced to embedding hosts in compile
/// diagnostics. The column counts bytes from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column (byte offset within the line).
    pub col: u32,
    /// Length of the spanned region in bytes.
    pub len: u32,
}

impl Location {
    /// Computes the location of `span` within `source`.
    ///
    /// Offsets past the end of `source` clamp to the final line.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "byte offsets in a compiled script stay far below u32::MAX"
    )]
    pub fn of(source: &str, span: Span) -> Self {
        let offset = (span.start() as usize).min(source.len());
        let before = &source[..offset];
        let line = before.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = (offset - line_start) as u32;
        Self {
            line,
            col,
            len: span.len(),
        }
    }
}
