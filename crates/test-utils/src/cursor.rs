// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cursor-marker helpers for position-oriented tests.
//!
//! Tests embed a `¦` marker in template text where the cursor sits; the
//! helpers strip the marker and return the (row, column) it occupied.
//! The marker is a character neither grammar uses, so the stripped text
//! parses exactly as the test intends.

use cfn_lsp_model::Point;

/// The cursor marker used in test templates
pub const CURSOR_MARKER: char = '¦';

/// Split marked template text into clean text and the cursor position.
///
/// Returns `None` when the text carries no marker.
pub fn extract_cursor(input: &str) -> Option<(String, Point)> {
    let byte = input.find(CURSOR_MARKER)?;
    let before = &input[..byte];
    let row = before.matches('\n').count();
    let column = before.len() - before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let mut clean = String::with_capacity(input.len());
    clean.push_str(before);
    clean.push_str(&input[byte + CURSOR_MARKER.len_utf8()..]);
    Some((clean, Point::new(row, column)))
}

/// Remove the cursor marker from template text
pub fn remove_cursor_marker(input: &str) -> String {
    input.replace(CURSOR_MARKER, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cursor_first_line() {
        let (text, point) = extract_cursor("Resour¦ces:\n").unwrap();
        assert_eq!(text, "Resources:\n");
        assert_eq!(point, Point::new(0, 6));
    }

    #[test]
    fn test_extract_cursor_later_line() {
        let (text, point) = extract_cursor("Resources:\n  B:\n    Type: ¦T\n").unwrap();
        assert_eq!(text, "Resources:\n  B:\n    Type: T\n");
        assert_eq!(point, Point::new(2, 10));
    }

    #[test]
    fn test_no_marker() {
        assert!(extract_cursor("Resources:\n").is_none());
    }

    #[test]
    fn test_remove_cursor_marker() {
        assert_eq!(remove_cursor_marker("a¦b"), "ab");
        assert_eq!(remove_cursor_marker("ab"), "ab");
    }
}
