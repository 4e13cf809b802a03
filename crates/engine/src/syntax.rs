// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Syntax Tree Adapter
//!
//! This module wraps the two grammar-specific tree-sitter parsers behind a
//! single owned node shape, so no downstream component ever branches on
//! which grammar a document was authored in.
//!
//! ## Overview
//!
//! `parse_template` runs the tree-sitter grammar for the document's format
//! and normalizes the concrete syntax tree into [`SyntaxNode`]s:
//!
//! - wrapper nodes (`stream`/`document`/`block_node`/`flow_node` in YAML,
//!   `document` in JSON) are collapsed away,
//! - YAML short-form intrinsic tags (`!Ref`, …) are attached to the node
//!   they tag instead of appearing as sibling tokens,
//! - scalar literals are unquoted and coerced (number/bool/null),
//! - `ERROR` regions are kept as [`SyntaxKind::Error`] nodes with their
//!   recognizable children normalized, so classification can still descend
//!   into a document that is mid-keystroke invalid.
//!
//! Parsing never panics for any input; a grammar that produces nothing
//! yields a [`ParseFailure`] the tree cache stores as "unavailable".

use cfn_lsp_model::{Point, ScalarValue, Span};
use cfn_template_grammar::TemplateFormat;
use tracing::debug;

use crate::error::ParseFailure;
use crate::{json, yaml};

/// Normalized node kind, shared by both grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// Root of a parsed document
    Document,
    /// Key/value collection (`block_mapping`, `flow_mapping`, `object`)
    Mapping,
    /// One key/value entry of a mapping
    Pair,
    /// Ordered collection (`block_sequence`, `flow_sequence`, `array`)
    Sequence,
    /// Leaf literal
    Scalar,
    /// Unrecognizable region kept for degraded classification
    Error,
}

/// One node of the normalized syntax tree.
///
/// Invariants: a node's span contains every child's span; sibling spans do
/// not overlap; a `Pair` has its key at child index 0 and, when authored,
/// its value at child index 1.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Normalized kind
    pub kind: SyntaxKind,
    /// The raw grammar tag this node was normalized from
    pub grammar_kind: &'static str,
    /// Covered region, including any short-form tag
    pub span: Span,
    /// Region of the tagged content only, when a tag is present
    pub content_span: Option<Span>,
    /// Raw token text (unquoted), for scalars
    pub text: Option<String>,
    /// Coerced literal value, for scalars
    pub value: Option<ScalarValue>,
    /// YAML short-form tag (`!Ref`, …), if any
    pub tag: Option<String>,
    /// Whether the node uses flow/brace style rather than block indentation
    pub flow: bool,
    /// Child nodes in document order
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a childless node
    pub(crate) fn leaf(kind: SyntaxKind, grammar_kind: &'static str, span: Span) -> Self {
        Self {
            kind,
            grammar_kind,
            span,
            content_span: None,
            text: None,
            value: None,
            tag: None,
            flow: false,
            children: Vec::new(),
        }
    }

    /// Create a scalar node from raw token text and its coerced value
    pub(crate) fn scalar(
        grammar_kind: &'static str,
        span: Span,
        text: String,
        value: ScalarValue,
    ) -> Self {
        let mut node = Self::leaf(SyntaxKind::Scalar, grammar_kind, span);
        node.text = Some(text);
        node.value = Some(value);
        node
    }

    /// The raw token text of a scalar, empty for non-scalars
    pub fn token_text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Field-keyed child lookup.
    ///
    /// Pairs expose `"key"` and `"value"`; other kinds have no fields.
    pub fn field(&self, name: &str) -> Option<&SyntaxNode> {
        if self.kind != SyntaxKind::Pair {
            return None;
        }
        match name {
            "key" => self.children.first(),
            "value" => self.children.get(1),
            _ => None,
        }
    }

    /// The key node of a pair
    pub fn pair_key(&self) -> Option<&SyntaxNode> {
        self.field("key")
    }

    /// The value node of a pair, absent while the value is not yet authored
    pub fn pair_value(&self) -> Option<&SyntaxNode> {
        self.field("value")
    }

    /// The span of the tagged content, falling back to the full span
    pub fn inner_span(&self) -> Span {
        self.content_span.unwrap_or(self.span)
    }

    /// Whether this node is a container the classifier can descend into
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            SyntaxKind::Mapping | SyntaxKind::Sequence | SyntaxKind::Pair
        )
    }
}

/// A parsed, normalized document.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    format: TemplateFormat,
    source: String,
    line_starts: Vec<usize>,
    root: SyntaxNode,
}

impl SyntaxTree {
    pub(crate) fn new(format: TemplateFormat, source: String, root: SyntaxNode) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            format,
            source,
            line_starts,
            root,
        }
    }

    /// The surface grammar the document was parsed with
    pub fn format(&self) -> TemplateFormat {
        self.format
    }

    /// The exact text the tree was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root node
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// The substring a span covers
    pub fn text_of(&self, span: Span) -> &str {
        let start = span.start_byte.min(self.source.len());
        let end = span.end_byte.min(self.source.len());
        &self.source[start..end]
    }

    /// Convert a (row, column) position to a byte offset.
    ///
    /// Columns past the end of the line clamp to the line end (cursors sit
    /// in virtual space beyond trailing whitespace during editing); rows
    /// past the end of the document return `None`.
    pub fn offset_at(&self, position: Point) -> Option<usize> {
        let line_start = *self.line_starts.get(position.row)?;
        let line_end = self
            .line_starts
            .get(position.row + 1)
            .map(|next| next.saturating_sub(1))
            .unwrap_or(self.source.len());
        Some((line_start + position.column).min(line_end))
    }

    /// Convert a byte offset to a (row, column) position
    pub fn point_at(&self, byte: usize) -> Point {
        let byte = byte.min(self.source.len());
        let row = match self.line_starts.binary_search(&byte) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        Point::new(row, byte - self.line_starts[row])
    }

    /// Locate the recognized top-level sections of this document
    pub fn find_top_level_sections(&self) -> crate::sections::SectionMap<'_> {
        crate::sections::find_top_level_sections(self)
    }
}

fn compute_line_starts(source: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, b) in source.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// Convert a tree-sitter node's extent to a [`Span`]
pub(crate) fn span_of(node: &tree_sitter::Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(
        node.start_byte(),
        node.end_byte(),
        Point::new(start.row, start.column),
        Point::new(end.row, end.column),
    )
}

/// Parse template text in the given format and normalize the result.
///
/// Returns a failure marker rather than throwing for unparseable input;
/// callers treat that identically to "no tree". An input with syntax errors
/// still yields a tree — the error regions appear as [`SyntaxKind::Error`]
/// nodes.
pub fn parse_template(text: &str, format: TemplateFormat) -> Result<SyntaxTree, ParseFailure> {
    debug!("parsing {} bytes as {}", text.len(), format);

    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(format.language())
        .map_err(|e| ParseFailure::Parser {
            format,
            message: e.to_string(),
        })?;

    let tree = parser
        .parse(text, None)
        .ok_or(ParseFailure::NoTree { format })?;

    let root = match format {
        TemplateFormat::Yaml => yaml::normalize(tree.root_node(), text),
        TemplateFormat::Json => json::normalize(tree.root_node(), text),
    };

    Ok(SyntaxTree::new(format, text.to_string(), root))
}
