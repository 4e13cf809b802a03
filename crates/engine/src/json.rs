// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! JSON adapter: normalizes the tree-sitter JSON CST into [`SyntaxNode`]s.
//!
//! Much flatter than the YAML side — objects, arrays and literals map
//! directly onto the normalized kinds; every container is flow-style.
//! Unterminated strings (the common mid-keystroke state) lose their
//! closing quote gracefully.

use cfn_lsp_model::ScalarValue;

use crate::syntax::{span_of, SyntaxKind, SyntaxNode};

/// Normalize a parsed JSON document (root kind `document`).
pub(crate) fn normalize(root: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut doc = SyntaxNode::leaf(SyntaxKind::Document, root.kind(), span_of(&root));
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if let Some(node) = normalize_node(child, source) {
            doc.children.push(node);
        }
    }
    doc
}

fn normalize_node(node: tree_sitter::Node, source: &str) -> Option<SyntaxNode> {
    match node.kind() {
        "object" => Some(normalize_object(node, source)),
        "pair" => Some(normalize_pair(node, source)),
        "array" => Some(normalize_array(node, source)),
        "string" => Some(normalize_string(node, source)),
        "number" => {
            let text = raw_text(node, source).to_string();
            let value = text
                .parse::<f64>()
                .map(ScalarValue::Number)
                .unwrap_or_else(|_| ScalarValue::String(text.clone()));
            Some(SyntaxNode::scalar(node.kind(), span_of(&node), text, value))
        }
        "true" => Some(SyntaxNode::scalar(
            node.kind(),
            span_of(&node),
            "true".to_string(),
            ScalarValue::Bool(true),
        )),
        "false" => Some(SyntaxNode::scalar(
            node.kind(),
            span_of(&node),
            "false".to_string(),
            ScalarValue::Bool(false),
        )),
        "null" => Some(SyntaxNode::scalar(
            node.kind(),
            span_of(&node),
            "null".to_string(),
            ScalarValue::Null,
        )),
        "comment" => None,
        "ERROR" => Some(normalize_error(node, source)),
        _ => collapse_unknown(node, source),
    }
}

fn normalize_object(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut mapping = SyntaxNode::leaf(SyntaxKind::Mapping, node.kind(), span_of(&node));
    mapping.flow = true;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "pair" => mapping.children.push(normalize_pair(child, source)),
            "ERROR" => mapping.children.push(normalize_error(child, source)),
            _ => {}
        }
    }
    mapping
}

fn normalize_pair(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let mut pair = SyntaxNode::leaf(SyntaxKind::Pair, node.kind(), span_of(&node));

    match node
        .child_by_field_name("key")
        .and_then(|k| normalize_node(k, source))
    {
        Some(key) => pair.children.push(key),
        None => {
            let span = cfn_lsp_model::Span::empty_at(pair.span.start_byte, pair.span.start);
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

fn normalize_array(node: tree_sitter::Node, source: &str) -> SyntaxNode {
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

fn normalize_string(node: tree_sitter::Node, source: &str) -> SyntaxNode {
    let raw = raw_text(node, source);
    let stripped = raw.strip_prefix('"').unwrap_or(raw);
    let stripped = stripped.strip_suffix('"').unwrap_or(stripped);
    let text = unescape(stripped);
    SyntaxNode::scalar(
        node.kind(),
        span_of(&node),
        text.clone(),
        ScalarValue::String(text),
    )
}

fn unescape(text: &str) -> String {
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
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('"') => out.push('"'),
            Some('/') => out.push('/'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
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
