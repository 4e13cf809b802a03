// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Entity Builder & Record Materializer
//!
//! Enumerates a section's logical-id-keyed declarations and converts their
//! grammar-specific subtrees into the generic [`TemplateValue`] shape.
//!
//! Materialization is grammar-agnostic: mapping-shaped syntax becomes a
//! `Mapping`, sequence-shaped syntax a `Sequence`, everything else a
//! coerced `Scalar`. The one unification step is YAML short-form tags —
//! `!Ref Foo` materializes as the same single-entry `{Ref: Foo}` mapping
//! its long-form and JSON spellings produce, so a consumer never sees the
//! encoding difference. Recognizing that mapping *as* an intrinsic stays a
//! classification concern; here it is an ordinary mapping.

use cfn_lsp_model::{
    IntrinsicFunction, MappingValue, ScalarValue, Span, TemplateValue,
};

use crate::syntax::{SyntaxKind, SyntaxNode};

/// One declared entity: its materialized value and bounding range.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityContext {
    /// Materialized declaration body
    pub entity: TemplateValue,
    /// Span of the whole `LogicalId: …` declaration
    pub span: Span,
    /// Span of the logical-id key token
    pub key_span: Span,
}

/// Ordered map of logical id → entity, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMap {
    entries: Vec<(String, EntityContext)>,
}

impl EntityMap {
    /// Look up an entity by logical id (exact, case-sensitive)
    pub fn get(&self, logical_id: &str) -> Option<&EntityContext> {
        self.entries
            .iter()
            .find(|(id, _)| id == logical_id)
            .map(|(_, e)| e)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityContext)> {
        self.entries.iter().map(|(id, e)| (id.as_str(), e))
    }

    /// Logical ids in declaration order
    pub fn logical_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// The entity whose declaration contains a byte offset
    pub fn entity_at(&self, offset: usize) -> Option<(&str, &EntityContext)> {
        self.entries
            .iter()
            .find(|(_, e)| e.span.contains(offset))
            .map(|(id, e)| (id.as_str(), e))
    }

    /// Number of declared entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the section declares nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Enumerate a section node's immediate declarations.
///
/// Empty or scalar-valued sections produce an empty map, never a failure.
/// Duplicate logical ids keep the first occurrence.
pub fn get_entity_map(section_node: &SyntaxNode) -> EntityMap {
    let mut map = EntityMap::default();
    if section_node.kind != SyntaxKind::Mapping {
        return map;
    }
    for pair in &section_node.children {
        if pair.kind != SyntaxKind::Pair {
            continue;
        }
        let Some(key) = pair.pair_key() else { continue };
        let logical_id = key.token_text().to_string();
        if logical_id.is_empty() || map.get(&logical_id).is_some() {
            continue;
        }
        let entity = pair
            .pair_value()
            .map(materialize)
            .unwrap_or(TemplateValue::Scalar {
                value: ScalarValue::Null,
                span: Span::empty_at(pair.span.end_byte, pair.span.end),
            });
        map.entries.push((
            logical_id,
            EntityContext {
                entity,
                span: pair.span,
                key_span: key.span,
            },
        ));
    }
    map
}

/// Convert a normalized subtree into a generic value.
pub fn materialize(node: &SyntaxNode) -> TemplateValue {
    let inner = match node.kind {
        SyntaxKind::Scalar => TemplateValue::Scalar {
            value: node.value.clone().unwrap_or(ScalarValue::Null),
            span: node.inner_span(),
        },
        SyntaxKind::Sequence => TemplateValue::Sequence {
            items: node
                .children
                .iter()
                .filter(|c| c.kind != SyntaxKind::Error)
                .map(materialize)
                .collect(),
            span: node.inner_span(),
        },
        SyntaxKind::Mapping => {
            let mut map = MappingValue::new();
            for pair in &node.children {
                if pair.kind != SyntaxKind::Pair {
                    continue;
                }
                let Some(key) = pair.pair_key() else { continue };
                let key_text = key.token_text().to_string();
                if key_text.is_empty() {
                    continue;
                }
                let value = pair
                    .pair_value()
                    .map(materialize)
                    .unwrap_or(TemplateValue::Scalar {
                        value: ScalarValue::Null,
                        span: Span::empty_at(pair.span.end_byte, pair.span.end),
                    });
                // First occurrence wins on duplicate keys
                map.insert(key_text, value);
            }
            TemplateValue::Mapping {
                map,
                span: node.inner_span(),
            }
        }
        SyntaxKind::Document | SyntaxKind::Error => {
            // Best effort for degraded subtrees: a single recognizable
            // child stands in for the whole region.
            match node.children.as_slice() {
                [only] => materialize(only),
                _ => TemplateValue::Scalar {
                    value: ScalarValue::Null,
                    span: node.span,
                },
            }
        }
        SyntaxKind::Pair => {
            let mut map = MappingValue::new();
            if let (Some(key), Some(value)) = (node.pair_key(), node.pair_value()) {
                map.insert(key.token_text().to_string(), materialize(value));
            }
            TemplateValue::Mapping {
                map,
                span: node.span,
            }
        }
    };
    canonicalize_tag(node, inner)
}

/// Lift a YAML short-form intrinsic tag into the single-entry mapping both
/// grammars share. Unknown tags (`!!str`, custom application tags) leave
/// the value untouched.
fn canonicalize_tag(node: &SyntaxNode, inner: TemplateValue) -> TemplateValue {
    let Some(tag) = node.tag.as_deref() else {
        return inner;
    };
    let Some(function) = IntrinsicFunction::from_short_tag(tag) else {
        return inner;
    };
    let mut map = MappingValue::new();
    map.insert(function.full_name().to_string(), inner);
    TemplateValue::Mapping {
        map,
        span: node.span,
    }
}
