//! Diagnostics for the OPL toolchain.
//!
//! Provides the positional error model shared by the parser and its
//! consumers: [`ErrorKind`] (the closed set of failure messages the OPL
//! format defines), [`OplError`] (a failure annotated with line and
//! column), and the source-mapping helpers [`Span`] and [`LineIndex`].

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error kinds ─────────────────────────────────────────────────────────

/// The reason an OPL line failed to parse.
///
/// The `Display` strings are part of the format's wire contract — other
/// OPL implementations emit the same messages — so variants render exactly
/// these words and nothing else. Positional information lives on
/// [`OplError`], not here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An attribute separator was required.
    #[error("expected space or tab character")]
    ExpectedSpace,
    /// A specific literal byte was required.
    #[error("expected '{0}'")]
    ExpectedChar(char),
    /// The line's leading byte names no known entity kind.
    #[error("unknown type")]
    UnknownType,
    /// An attribute letter the entity does not define.
    #[error("unknown attribute")]
    UnknownAttribute,
    /// A relation member kind byte outside `n`/`w`/`r`.
    #[error("unknown object type")]
    UnknownObjectType,
    /// A decimal integer was required but absent.
    #[error("expected integer")]
    ExpectedInteger,
    /// An integer with 16+ digits, or one outside the target type's range.
    #[error("integer too long")]
    IntegerTooLong,
    /// A visibility flag byte other than `V` or `D`.
    #[error("invalid visible flag")]
    InvalidVisibleFlag,
    /// A timestamp field that is not the 20-byte ISO-8601 `Z` form.
    #[error("can not parse timestamp")]
    Timestamp,
    /// A byte inside a `%…%` escape that is not a hexadecimal digit.
    #[error("not a hex char")]
    NotHexChar,
    /// A `%…%` escape with more than eight hexadecimal digits.
    #[error("hex escape too long")]
    HexEscapeTooLong,
    /// The line ended inside a `%…%` escape.
    #[error("eol")]
    Eol,
    /// A malformed longitude or latitude literal.
    #[error("invalid coordinate")]
    Coordinate,
    /// A `%…%` escape naming a value that is not a Unicode scalar value.
    #[error("invalid unicode code point")]
    Codepoint,
    /// The same attribute letter appeared twice on one entity line.
    #[error("Duplicate attribute: {name} ({letter})")]
    DuplicateAttribute {
        /// Long attribute name, e.g. `version`.
        name: &'static str,
        /// The attribute letter, e.g. `v`.
        letter: char,
    },
}

// ── Positional error ────────────────────────────────────────────────────

/// An OPL parse failure annotated with its position.
///
/// `line` is 1-based (callers number physical lines); `column` is the
/// 0-based byte offset of the offending byte within the line. The
/// rendering matches what other OPL tooling prints for the same input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("OPL error: {kind} on line {line} column {column}")]
pub struct OplError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// 1-based line number.
    pub line: u64,
    /// 0-based byte column within the line.
    pub column: u64,
}

impl OplError {
    /// Annotate an error kind with its position.
    pub fn at(kind: ErrorKind, line: u64, column: u64) -> Self {
        Self { kind, line, column }
    }

    /// The bare message without the `OPL error: ` prefix or position,
    /// for structured (JSON) output.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

// ── Span ────────────────────────────────────────────────────────────────

/// Byte span in a source buffer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first byte (0-based).
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }
}

// ── LineIndex ───────────────────────────────────────────────────────────

/// Maps between byte offsets and line/column positions in a multi-line
/// source buffer.
///
/// The parser reports positions per line; report renderers need offsets
/// into the whole file. Lines and columns are **0-indexed** here — add 1
/// when displaying to users. Built in O(n), lookups are O(log n).
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line. `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build a `LineIndex` from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Byte offset of the start of the given 0-indexed line.
    ///
    /// Returns `None` if `line` is out of bounds.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Convert a byte offset to a 0-indexed `(line, column)` pair.
    ///
    /// Offsets past the end clamp to the last line.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next.saturating_sub(1),
        };
        let col = offset.saturating_sub(self.line_starts[line]);
        (line, col)
    }

    /// Total number of lines (at least 1, even for empty input).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
