// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for cfn-lsp
//!
//! This crate provides common testing components including:
//! - Template fixtures with the same document authored in both grammars
//! - Cursor-marker helpers for position-oriented tests

pub mod cursor;
pub mod fixtures;

// Re-exports for convenience
pub use cursor::{extract_cursor, remove_cursor_marker};
pub use fixtures::TemplateFixtures;
