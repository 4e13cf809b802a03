// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Source Geometry
//!
//! Positions and spans in template source text.
//!
//! A [`Point`] is a zero-based (row, column) pair. A [`Span`] couples byte
//! offsets with points so both byte-oriented code (containment tests,
//! substring extraction) and editor-oriented code (LSP positions) can use
//! the same value. Spans are end-exclusive.

use serde::{Deserialize, Serialize};

/// A zero-based (row, column) position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Zero-based line number
    pub row: usize,
    /// Zero-based column (byte offset within the line)
    pub column: usize,
}

impl Point {
    /// Create a new point
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// A half-open region of source text.
///
/// Carries both byte offsets and (row, column) points. The end is exclusive:
/// `start_byte..end_byte` is the exact substring the region covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first covered byte
    pub start_byte: usize,
    /// Byte offset one past the last covered byte
    pub end_byte: usize,
    /// Start position
    pub start: Point,
    /// End position (exclusive)
    pub end: Point,
}

impl Span {
    /// Create a new span
    pub fn new(start_byte: usize, end_byte: usize, start: Point, end: Point) -> Self {
        Self {
            start_byte,
            end_byte,
            start,
            end,
        }
    }

    /// An empty span at a single position
    pub fn empty_at(byte: usize, point: Point) -> Self {
        Self::new(byte, byte, point, point)
    }

    /// Check whether a byte offset lies strictly inside the span
    /// (end-exclusive)
    pub fn contains(&self, byte: usize) -> bool {
        self.start_byte <= byte && byte < self.end_byte
    }

    /// Check whether a byte offset lies inside the span, counting the end
    /// boundary as inside.
    ///
    /// Used when locating the nearest enclosing structure for a position
    /// that sits right at the end of everything typed so far.
    pub fn brackets(&self, byte: usize) -> bool {
        self.start_byte <= byte && byte <= self.end_byte
    }

    /// Check whether another span is fully contained in this one
    pub fn encloses(&self, other: &Span) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end_byte - self.start_byte
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start_byte == self.end_byte
    }
}
