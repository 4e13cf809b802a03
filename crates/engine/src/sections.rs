// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Section Locator
//!
//! Classifies the document root's immediate key/value pairs against the ten
//! recognized top-level section names.
//!
//! Unrecognized root keys are ignored (a template with vendor extensions is
//! not an error). If the raw text declares the same section twice, the
//! first occurrence wins — deterministically, and documented as such.

use cfn_lsp_model::{Point, Span, TopLevelSection};

use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};

/// One recognized top-level section and where it sits.
#[derive(Debug)]
pub struct SectionEntry<'t> {
    /// Which section this is
    pub section: TopLevelSection,
    /// Span of the section key token
    pub key_span: Span,
    /// Span of the whole key/value pair
    pub pair_span: Span,
    /// The section's value node, absent while only `Key:` is typed
    pub value: Option<&'t SyntaxNode>,
}

/// Ordered map of recognized sections, in document order.
#[derive(Debug, Default)]
pub struct SectionMap<'t> {
    entries: Vec<SectionEntry<'t>>,
}

impl<'t> SectionMap<'t> {
    /// Look up a section
    pub fn get(&self, section: TopLevelSection) -> Option<&SectionEntry<'t>> {
        self.entries.iter().find(|e| e.section == section)
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = &SectionEntry<'t>> {
        self.entries.iter()
    }

    /// Number of recognized sections
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no section was recognized
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The section owning a byte offset.
    ///
    /// A column-0 cursor is a new top-level key position, never section
    /// content — even when the grammar swallowed a trailing blank line
    /// into the preceding section's span. Otherwise a position inside a
    /// section's pair belongs to it directly, and trailing positions
    /// after the last typed character of a section are attributed to the
    /// preceding section.
    pub fn section_at(&self, offset: usize, cursor: Point) -> Option<&SectionEntry<'t>> {
        if cursor.column == 0 {
            return None;
        }
        if let Some(entry) = self.entries.iter().find(|e| e.pair_span.contains(offset)) {
            return Some(entry);
        }
        self.entries
            .iter()
            .filter(|e| e.pair_span.end_byte <= offset)
            .next_back()
            .filter(|entry| {
                // Not past the start of a later section
                !self
                    .entries
                    .iter()
                    .any(|e| entry.pair_span.end_byte <= e.pair_span.start_byte
                        && e.pair_span.start_byte <= offset)
            })
    }

    /// The position right after a section's last content, used as the
    /// insertion point for "append a new declaration" edits.
    pub fn end_of(&self, section: TopLevelSection) -> Option<Point> {
        self.get(section).map(|entry| {
            entry
                .value
                .map(|v| v.span.end)
                .unwrap_or(entry.pair_span.end)
        })
    }
}

/// Scan the root mapping's immediate pairs for recognized section names.
///
/// When the parse collapsed so badly that no pair survived (an unterminated
/// string can reduce a whole JSON document to raw tokens), recognizable
/// section names among the error fragments stand in, so mid-edit documents
/// keep a partial answer.
pub fn find_top_level_sections<'t>(tree: &'t SyntaxTree) -> SectionMap<'t> {
    let mut map = SectionMap::default();
    if let Some(root_mapping) = find_root_mapping(tree.root()) {
        for pair in pairs_of(root_mapping) {
            let Some(key) = pair.pair_key() else { continue };
            let Some(section) = TopLevelSection::from_name(key.token_text()) else {
                continue;
            };
            // First occurrence wins
            if map.get(section).is_some() {
                continue;
            }
            map.entries.push(SectionEntry {
                section,
                key_span: key.span,
                pair_span: pair.span,
                value: pair.pair_value(),
            });
        }
    }
    if map.is_empty() {
        scan_fragments(tree.root(), &mut map);
    }
    map
}

/// Last resort for collapsed parses: a scalar fragment naming a section
/// owns the remainder of its region (up to the next recognized name), with
/// no value node to descend into.
fn scan_fragments<'t>(node: &'t SyntaxNode, map: &mut SectionMap<'t>) {
    if !matches!(node.kind, SyntaxKind::Document | SyntaxKind::Error) {
        return;
    }
    for (index, child) in node.children.iter().enumerate() {
        match child.kind {
            SyntaxKind::Document | SyntaxKind::Error => scan_fragments(child, map),
            SyntaxKind::Scalar => {
                let Some(section) = TopLevelSection::from_name(child.token_text()) else {
                    continue;
                };
                if map.get(section).is_some() {
                    continue;
                }
                let (end_byte, end) = node.children[index + 1..]
                    .iter()
                    .find(|c| {
                        c.kind == SyntaxKind::Scalar
                            && TopLevelSection::from_name(c.token_text()).is_some()
                    })
                    .map(|c| (c.span.start_byte, c.span.start))
                    .unwrap_or((node.span.end_byte, node.span.end));
                map.entries.push(SectionEntry {
                    section,
                    key_span: child.span,
                    pair_span: Span::new(child.span.start_byte, end_byte, child.span.start, end),
                    value: None,
                });
            }
            _ => {}
        }
    }
}

/// The first mapping reachable from the root without crossing another
/// mapping — the document's top-level structure, even when it is wrapped
/// in error regions mid-edit.
fn find_root_mapping(root: &SyntaxNode) -> Option<&SyntaxNode> {
    if root.kind == SyntaxKind::Mapping {
        return Some(root);
    }
    match root.kind {
        SyntaxKind::Document | SyntaxKind::Error => {
            root.children.iter().find_map(find_root_mapping)
        }
        _ => None,
    }
}

/// A mapping's pairs, looking through error regions for partially typed
/// entries.
fn pairs_of(mapping: &SyntaxNode) -> impl Iterator<Item = &SyntaxNode> {
    fn collect<'t>(node: &'t SyntaxNode, out: &mut Vec<&'t SyntaxNode>) {
        for child in &node.children {
            match child.kind {
                SyntaxKind::Pair => out.push(child),
                SyntaxKind::Error => collect(child, out),
                _ => {}
            }
        }
    }
    let mut pairs = Vec::new();
    collect(mapping, &mut pairs);
    pairs.into_iter()
}
