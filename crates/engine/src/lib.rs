// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # cfn-lsp-engine
//!
//! The semantic-context engine behind cfn-lsp: given a template document
//! and a cursor position, work out what that position *means* — which
//! top-level section it is in, which logical id owns it, the property path
//! down to it, whether it is a key or a value, and whether it sits inside
//! an intrinsic-function invocation.
//!
//! Templates are authored in two surface grammars (YAML block indentation
//! and JSON braces). The engine parses both with tree-sitter, normalizes
//! them into one node shape, and answers every question identically for
//! either grammar.
//!
//! ## Architecture
//!
//! ```text
//! syntax (+ yaml/json adapters)   parse + normalize both grammars
//!        │
//! tree_manager                    latest tree per open document
//!        │
//! sections                        root pairs → recognized sections
//!        │
//! entity                          logical ids → materialized records
//!        │
//! position                        offset → path, role, semantic flags
//!        │
//! context                         assembled per-position answer
//! ```
//!
//! Consumers go through [`ContextManager`]; the lower layers are public
//! for providers that need raw trees or entity maps.

pub mod context;
pub mod entity;
pub mod error;
mod json;
pub mod position;
pub mod sections;
pub mod syntax;
pub mod tree_manager;
mod yaml;

pub use context::{Context, ContextManager, EntityLocation};
pub use entity::{get_entity_map, materialize, EntityContext, EntityMap};
pub use error::{EngineError, ParseFailure};
pub use position::{
    classify, AttributeAccess, Classification, CursorRole, IntrinsicCall,
};
pub use sections::{find_top_level_sections, SectionEntry, SectionMap};
pub use syntax::{parse_template, SyntaxKind, SyntaxNode, SyntaxTree};
pub use tree_manager::SyntaxTreeManager;
