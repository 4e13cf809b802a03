// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Conversions between LSP wire types and the engine's geometry.
//!
//! Both sides count rows and columns from zero, so the mapping is direct.
//! LSP positions are u32, engine points are usize; clamping on the way out
//! only matters for documents past 4 GiB, which the rope cannot hold anyway.

use tower_lsp::lsp_types::{Position, Range};

use cfn_lsp_model::{Point, Span};

/// LSP position → engine point
pub fn point_from_position(position: Position) -> Point {
    Point::new(position.line as usize, position.character as usize)
}

/// Engine point → LSP position
pub fn position_from_point(point: Point) -> Position {
    Position::new(point.row as u32, point.column as u32)
}

/// Engine span → LSP range
pub fn range_from_span(span: Span) -> Range {
    Range::new(position_from_point(span.start), position_from_point(span.end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let position = Position::new(3, 14);
        let point = point_from_position(position);
        assert_eq!(point, Point::new(3, 14));
        assert_eq!(position_from_point(point), position);
    }

    #[test]
    fn test_range_from_span() {
        let span = Span {
            start_byte: 0,
            end_byte: 5,
            start: Point::new(1, 2),
            end: Point::new(1, 7),
        };
        let range = range_from_span(span);
        assert_eq!(range.start, Position::new(1, 2));
        assert_eq!(range.end, Position::new(1, 7));
    }
}
