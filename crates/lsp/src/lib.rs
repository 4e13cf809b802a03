// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # cfn-lsp Server
//!
//! The language-server frontend over the template semantic engine.
//!
//! ## Architecture
//!
//! ```text
//! client ⇄ tower-lsp ⇄ Backend
//!                        ├── DocumentStore   (ropey text, sync)
//!                        ├── ContextManager  (engine: trees + contexts)
//!                        └── providers       (completion, hover, definition)
//! ```
//!
//! The backend owns all mutable state; the providers are pure functions
//! over the engine and are tested directly, without a client.

pub mod backend;
pub mod completion;
pub mod config;
pub mod convert;
pub mod definition;
pub mod document;
pub mod hover;

pub use backend::Backend;
pub use config::{resolve_format, ServerConfig};
pub use document::{Document, DocumentError, DocumentStore};
