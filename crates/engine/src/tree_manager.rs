// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Tree Cache
//!
//! Holds the latest parsed tree per document identity.
//!
//! Every text mutation is a full replace: `add` reparses and swaps the
//! stored tree atomically. When a reparse fails outright, the entry is
//! stored as unavailable — `get_syntax_tree` never silently serves a stale
//! tree for newer text. Consumers treat "no tree" and "tree with no
//! recognizable structure" identically, so neither state needs special
//! handling downstream.

use std::collections::HashMap;

use cfn_template_grammar::TemplateFormat;
use tracing::{debug, warn};

use crate::syntax::{parse_template, SyntaxTree};

/// Keyed store of parsed trees, one entry per open document.
#[derive(Debug, Default)]
pub struct SyntaxTreeManager {
    trees: HashMap<String, Option<SyntaxTree>>,
}

impl SyntaxTreeManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)parse `text` and store the tree for `uri`, replacing any prior
    /// entry. Returns whether a tree is now available.
    ///
    /// A failed parse stores "unavailable" rather than leaving the previous
    /// tree visible against the new text.
    pub fn add(&mut self, uri: &str, text: &str, format: TemplateFormat) -> bool {
        match parse_template(text, format) {
            Ok(tree) => {
                debug!("stored {} tree for {uri}", format);
                self.trees.insert(uri.to_string(), Some(tree));
                true
            }
            Err(e) => {
                warn!("parse failed for {uri}: {e}");
                self.trees.insert(uri.to_string(), None);
                false
            }
        }
    }

    /// The current tree for `uri`, if one is available
    pub fn get_syntax_tree(&self, uri: &str) -> Option<&SyntaxTree> {
        self.trees.get(uri).and_then(|entry| entry.as_ref())
    }

    /// Whether `uri` is tracked at all (even with an unavailable tree)
    pub fn is_tracked(&self, uri: &str) -> bool {
        self.trees.contains_key(uri)
    }

    /// Drop the entry for a closed document
    pub fn remove(&mut self, uri: &str) {
        self.trees.remove(uri);
    }

    /// Number of tracked documents
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether no documents are tracked
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
