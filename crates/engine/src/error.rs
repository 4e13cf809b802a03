// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Engine error types.
//!
//! The engine distinguishes two failure families:
//!
//! - [`ParseFailure`]: the grammar adapter could not produce any tree. The
//!   tree cache stores this as "unavailable"; callers see `None` from
//!   lookups, never an exception path.
//! - [`EngineError`]: the caller violated a precondition (asked about a
//!   document the engine was never told about). This fails fast, because a
//!   soft failure would paper over a caller bug.
//!
//! "No context at this position" is not an error at all; it is the `None`
//! arm of `get_context`.

use cfn_template_grammar::TemplateFormat;

/// Failure to produce any syntax tree for a document
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseFailure {
    /// The parser could not be initialized for the format
    #[error("failed to initialize {format} parser: {message}")]
    Parser {
        format: TemplateFormat,
        message: String,
    },

    /// The parser returned no tree at all
    #[error("{format} grammar produced no tree")]
    NoTree { format: TemplateFormat },
}

/// Caller precondition violations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// An operation that requires a tracked document was given an unknown uri
    #[error("document not tracked: {0}")]
    UnknownDocument(String),
}
