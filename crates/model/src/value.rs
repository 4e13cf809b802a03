// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Generic Template Values
//!
//! The closed value shape entity declarations materialize into, independent
//! of which surface grammar the document was authored in.
//!
//! A materialized value is one of `Scalar`, `Sequence` or `Mapping`.
//! Mappings preserve insertion order and reject duplicate keys (first
//! occurrence wins). Every node keeps the [`Span`] of the syntax it was
//! materialized from, so the covered substring of the document text
//! round-trips exactly.
//!
//! Intrinsic-function recognition is deliberately *not* part of this type:
//! a `{"Ref": "X"}` object is an ordinary one-entry mapping here, and the
//! position classifier decides what it means.

use crate::geometry::Span;
use serde::{Deserialize, Serialize};

/// A scalar leaf value with grammar-level type coercion applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl ScalarValue {
    /// The string content, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "{s}"),
            ScalarValue::Number(n) => write!(f, "{n}"),
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Null => write!(f, "null"),
        }
    }
}

/// An insertion-ordered string-keyed mapping with unique keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingValue {
    entries: Vec<(String, TemplateValue)>,
}

impl MappingValue {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, preserving order.
    ///
    /// Returns `false` (and keeps the existing entry) if the key is already
    /// present: first occurrence wins.
    pub fn insert(&mut self, key: String, value: TemplateValue) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    /// Look up a value by key (exact, case-sensitive)
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A materialized template value: scalar, ordered sequence, or ordered
/// mapping. Each node retains the span it was materialized from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateValue {
    Scalar { value: ScalarValue, span: Span },
    Sequence { items: Vec<TemplateValue>, span: Span },
    Mapping { map: MappingValue, span: Span },
}

impl TemplateValue {
    /// The span of syntax this value was materialized from
    pub fn span(&self) -> Span {
        match self {
            TemplateValue::Scalar { span, .. }
            | TemplateValue::Sequence { span, .. }
            | TemplateValue::Mapping { span, .. } => *span,
        }
    }

    /// The scalar value, if this is a scalar
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            TemplateValue::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The string content, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(ScalarValue::as_str)
    }

    /// The mapping, if this is a mapping
    pub fn as_mapping(&self) -> Option<&MappingValue> {
        match self {
            TemplateValue::Mapping { map, .. } => Some(map),
            _ => None,
        }
    }

    /// The items, if this is a sequence
    pub fn as_sequence(&self) -> Option<&[TemplateValue]> {
        match self {
            TemplateValue::Sequence { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Navigate one mapping level down
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Structural equality ignoring spans.
    ///
    /// This is what "the same value authored in either grammar" means: the
    /// spans necessarily differ between surface grammars, the shape and
    /// content must not.
    pub fn equivalent(&self, other: &TemplateValue) -> bool {
        match (self, other) {
            (
                TemplateValue::Scalar { value: a, .. },
                TemplateValue::Scalar { value: b, .. },
            ) => a == b,
            (
                TemplateValue::Sequence { items: a, .. },
                TemplateValue::Sequence { items: b, .. },
            ) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y)),
            (TemplateValue::Mapping { map: a, .. }, TemplateValue::Mapping { map: b, .. }) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va.equivalent(vb))
            }
            _ => false,
        }
    }
}

/// One step of a property path: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl PathSegment {
    /// The key text, if this segment is a key
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(k) => Some(k),
            PathSegment::Index(_) => None,
        }
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{k}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}
