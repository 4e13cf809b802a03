// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! YAML adapter: normalizes the tree-sitter YAML CST into [`SyntaxNode`]s.
//!
//! The YAML grammar nests every value inside `block_node`/`flow_node`
//! wrappers that may also carry a tag or anchor. Normalization collapses
//! the wrappers, attaches short-form intrinsic tags (`!Ref`, …) to the node
//! they tag, unwraps `block_sequence_item` markers, and coerces scalar
//! literals. Anchors and comments are dropped; aliases survive as string
//! scalars so positions on them still classify.

use cfn_lsp_model::{ScalarValue, Span};

use crate::syntax::{span_of, SyntaxKind, SyntaxNode};

/// Normalize a parsed YAML document (root kind `stream`).
pub(crate) fn normalize(root: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut doc = SyntaxNode::leaf(SyntaxKind::Document, root.kind(), span_of(&root));
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() == "document" {
            let mut inner_cursor = child.walk();
            for inner in child.named_children(&mut inner_cursor) {
                if let Some(node) = normalize_node(inner, source) {
                    doc.children.push(node);
                }
            }
        } else if let Some(node) = normalize_node(child, source) {
            doc.children.push(node);
        }
    }
    doc
}

fn normalize_node(node: tree_sitter::Node, source: &str) -> Option<SyntaxNode> {
    match node.kind() {
        "block_node" | "flow_node" => normalize_wrapper(node, source),

        "block_mapping" | "flow_mapping" => Some(normalize_mapping(node, source)),
        "block_mapping_pair" | "flow_pair" => Some(normalize_pair(node, source)),

        "block_sequence" => Some(normalize_block_sequence(node, source)),
        "flow_sequence" => Some(normalize_flow_sequence(node, source)),
        "block_sequence_item" => normalize_sequence_item(node, source),

        "plain_scalar" => Some(normalize_plain_scalar(node, source)),
        "string_scalar" | "integer_scalar" | "float_scalar" | "boolean_scalar"
        | "null_scalar" => Some(coerce_typed_scalar(node, source)),
        "single_quote_scalar" => Some(normalize_quoted(node, source, '\'')),
        "double_quote_scalar" => Some(normalize_quoted(node, source, '"')),
        "block_scalar" => Some(SyntaxNode::scalar(
            node.kind(),
            span_of(&node),
            raw_text(node, source).to_string(),
            ScalarValue::String(raw_text(node, source).to_string()),
        )),
        "alias" => Some(SyntaxNode::scalar(
            node.kind(),
            span_of(&node),
            raw_text(node, source).to_string(),
            ScalarValue::String(raw_text(node, source).to_string()),
        )),

        "tag" | "anchor" | "comment" | "directive" | "yaml_directive" | "tag_directive"
        | "reserved_directive" => None,

        "ERROR" => Some(normalize_error(node, source)),

        // Unknown containers: pass a single normalized child through, keep
        // several reachable under an error node, drop empty ones.
        _ => collapse_unknown(node, source),
    }
}

/// Collapse a `block_node`/`flow_node` wrapper, lifting its tag (if any)
/// onto the content node.
fn normalize_wrapper(node: tree_sitter::Node, source: &str) -> Option<SyntaxNode> {
    let mut tag: Option<String> = None;
    let mut content: Option<SyntaxNode> = None;

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "tag" => tag = Some(raw_text(child, source).to_string()),
            "anchor" | "comment" => {}
            _ => {
                if content.is_none() {
                    content = normalize_node(child, source);
                }
            }
        }
    }

    match (content, tag) {
        (Some(mut inner), Some(tag)) => {
            // The tag belongs to the value it precedes: widen the span so a
            // cursor on the tag itself classifies into the tagged value.
            inner.content_span = Some(inner.span);
            inner.span = span_of(&node);
            inner.tag = Some(tag);
            Some(inner)
        }
        (Some(inner), None) => Some(inner),
        (None, Some(tag)) => {
            // `Key: !Ref` with no argument typed yet: an empty tagged scalar
            // keeps the intrinsic visible to the classifier.
            let span = span_of(&node);
            let mut empty = SyntaxNode::scalar(
                node.kind(),
                span,
                String::new(),
                ScalarValue::String(String::new()),
            );
            empty.content_span = Some(Span::empty_at(span.end_byte, span.end));
            empty.tag = Some(tag);
            Some(empty)
        }
        (None, None) => None,
    }
}

fn normalize_mapping(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut mapping = SyntaxNode::leaf(SyntaxKind::Mapping, node.kind(), span_of(&node));
    mapping.flow = node.kind() == "flow_mapping";
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "block_mapping_pair" | "flow_pair" => {
                mapping.children.push(normalize_pair(child, source));
            }
            "ERROR" => mapping.children.push(normalize_error(child, source)),
            _ => {}
        }
    }
    mapping
}

fn normalize_pair(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut pair = SyntaxNode::leaf(SyntaxKind::Pair, node.kind(), span_of(&node));

    let key = node
        .child_by_field_name("key")
        .and_then(|k| normalize_node(k, source));
    match key {
        Some(key) => pair.children.push(key),
        None => {
            // Preserve the key-at-index-0 invariant even for `: value`
            let span = Span::empty_at(pair.span.start_byte, pair.span.start);
            pair.children.push(SyntaxNode::scalar(
                node.kind(),
                span,
                String::new(),
                ScalarValue::String(String::new()),
            ));
        }
    }

    if let Some(value) = node
        .child_by_field_name("value")
        .and_then(|v| normalize_node(v, source))
    {
        pair.children.push(value);
    }
    pair
}

fn normalize_block_sequence(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut seq = SyntaxNode::leaf(SyntaxKind::Sequence, node.kind(), span_of(&node));
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "block_sequence_item" => {
                if let Some(item) = normalize_sequence_item(child, source) {
                    seq.children.push(item);
                }
            }
            "ERROR" => seq.children.push(normalize_error(child, source)),
            _ => {}
        }
    }
    seq
}

/// Unwrap a `- ` item to its content; a dash with nothing after it becomes
/// an empty slot the classifier can land in.
fn normalize_sequence_item(node: tree_sitter::Node, source: &str) -> Option<SyntaxNode> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(normalized) = normalize_node(child, source) {
            return Some(normalized);
        }
    }
    let span = span_of(&node);
    Some(SyntaxNode::scalar(
        node.kind(),
        Span::empty_at(span.end_byte, span.end),
        String::new(),
        ScalarValue::Null,
    ))
}

fn normalize_flow_sequence(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut seq = SyntaxNode::leaf(SyntaxKind::Sequence, node.kind(), span_of(&node));
    seq.flow = true;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "ERROR" => seq.children.push(normalize_error(child, source)),
            _ => {
                if let Some(item) = normalize_node(child, source) {
                    seq.children.push(item);
                }
            }
        }
    }
    seq
}

fn normalize_plain_scalar(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut cursor = node.walk();
    if let Some(typed) = node.named_children(&mut cursor).next() {
        let mut scalar = coerce_typed_scalar(typed, source);
        // Keep the plain scalar's full extent (multi-line continuations)
        scalar.span = span_of(&node);
        scalar.text = Some(raw_text(node, source).to_string());
        return scalar;
    }
    let text = raw_text(node, source).to_string();
    SyntaxNode::scalar(
        node.kind(),
        span_of(&node),
        text.clone(),
        ScalarValue::String(text),
    )
}

fn coerce_typed_scalar(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let text = raw_text(node, source).to_string();
    let value = match node.kind() {
        "integer_scalar" => parse_integer(&text)
            .map(ScalarValue::Number)
            .unwrap_or_else(|| ScalarValue::String(text.clone())),
        "float_scalar" => text
            .parse::<f64>()
            .map(ScalarValue::Number)
            .unwrap_or_else(|_| ScalarValue::String(text.clone())),
        "boolean_scalar" => match text.to_lowercase().as_str() {
            "true" => ScalarValue::Bool(true),
            "false" => ScalarValue::Bool(false),
            _ => ScalarValue::String(text.clone()),
        },
        "null_scalar" => ScalarValue::Null,
        _ => ScalarValue::String(text.clone()),
    };
    SyntaxNode::scalar(node.kind(), span_of(&node), text, value)
}

fn parse_integer(text: &str) -> Option<f64> {
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(oct) = text.strip_prefix("0o") {
        (oct, 8)
    } else {
        (text, 10)
    };
    i64::from_str_radix(digits, radix).ok().map(|n| n as f64)
}

fn normalize_quoted(node: tree_sitter::Node, source: &str, quote: char) -> SyntaxNode {
    let raw = raw_text(node, source);
    let stripped = raw
        .strip_prefix(quote)
        .unwrap_or(raw)
        .strip_suffix(quote)
        .unwrap_or_else(|| raw.strip_prefix(quote).unwrap_or(raw));
    let text = if quote == '\'' {
        stripped.replace("''", "'")
    } else {
        unescape_double_quoted(stripped)
    };
    SyntaxNode::scalar(
        node.kind(),
        span_of(&node),
        text.clone(),
        ScalarValue::String(text),
    )
}

fn unescape_double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn normalize_error(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut error = SyntaxNode::leaf(SyntaxKind::Error, "ERROR", span_of(&node));
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(normalized) = normalize_node(child, source) {
            error.children.push(normalized);
        }
    }
    error
}

fn collapse_unknown(node: tree_sitter::Node, source: &str) -> Option<SyntaxNode> {
    if node.is_error() || node.is_missing() {
        return Some(normalize_error(node, source));
    }
    let mut normalized = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(n) = normalize_node(child, source) {
            normalized.push(n);
        }
    }
    match normalized.len() {
        0 => None,
        1 => normalized.pop(),
        _ => {
            let mut wrapper = SyntaxNode::leaf(SyntaxKind::Error, node.kind(), span_of(&node));
            wrapper.children = normalized;
            Some(wrapper)
        }
    }
}

fn raw_text<'s>(node: tree_sitter::Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}
