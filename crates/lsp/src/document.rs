// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Document Management
//!
//! This module provides document management for the LSP server.
//!
//! ## Overview
//!
//! The document store handles:
//! - Multiple open documents identified by URI
//! - Document synchronization (open, change, close)
//! - Text content management using Ropey for efficient edits
//! - Document metadata (language ID, version, template format)
//!
//! Parsed trees are *not* stored here: the engine's `ContextManager` owns
//! those. The store's job is to reconstruct the full text after each
//! incremental change so the engine can reparse it.

use ropey::Rope;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url, VersionedTextDocumentIdentifier};

use cfn_template_grammar::TemplateFormat;

/// Document metadata
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Document URI
    pub uri: Url,

    /// Language identifier the client sent (e.g., "yaml", "json")
    pub language_id: String,

    /// Resolved template format the document is parsed as
    pub format: TemplateFormat,

    /// Document version, incremented on each change
    pub version: i32,

    /// Line count
    pub line_count: usize,
}

/// A document managed by the LSP server
///
/// Contains the document's content and metadata.
/// Uses Ropey for efficient text manipulation.
#[derive(Debug, Clone)]
pub struct Document {
    metadata: DocumentMetadata,

    /// Document content as a rope for efficient editing
    content: Rope,
}

impl Document {
    /// Create a new document
    pub fn new(uri: Url, content: String, version: i32, language_id: String, format: TemplateFormat) -> Self {
        let rope = Rope::from_str(&content);
        let line_count = rope.len_lines();

        Self {
            metadata: DocumentMetadata {
                uri,
                language_id,
                format,
                version,
                line_count,
            },
            content: rope,
        }
    }

    /// Get the document URI
    pub fn uri(&self) -> &Url {
        &self.metadata.uri
    }

    /// Get the document language ID
    pub fn language_id(&self) -> &str {
        &self.metadata.language_id
    }

    /// Get the template format the document is parsed as
    pub fn format(&self) -> TemplateFormat {
        self.metadata.format
    }

    /// Get the document version
    pub fn version(&self) -> i32 {
        self.metadata.version
    }

    /// Get the line count
    pub fn line_count(&self) -> usize {
        self.metadata.line_count
    }

    /// Get the full document content as a string
    pub fn get_content(&self) -> String {
        self.content.to_string()
    }

    /// Get document metadata
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Apply content changes to the document
    ///
    /// # Arguments
    ///
    /// - `changes`: List of content changes
    /// - `new_version`: New document version
    pub fn apply_changes(
        &mut self,
        changes: &[TextDocumentContentChangeEvent],
        new_version: i32,
    ) -> Result<(), DocumentError> {
        for change in changes {
            match &change.range {
                Some(range) => {
                    // Incremental change
                    let start_line = range.start.line as usize;
                    let start_col = range.start.character as usize;
                    let end_line = range.end.line as usize;
                    let end_col = range.end.character as usize;

                    if start_line >= self.content.len_lines()
                        || end_line >= self.content.len_lines()
                    {
                        return Err(DocumentError::InvalidRange {
                            start: (start_line, start_col),
                            end: (end_line, end_col),
                        });
                    }

                    let start_char = self.content.line_to_char(start_line) + start_col;
                    let end_char = self.content.line_to_char(end_line) + end_col;

                    if start_char > end_char || end_char > self.content.len_chars() {
                        return Err(DocumentError::InvalidRange {
                            start: (start_line, start_col),
                            end: (end_line, end_col),
                        });
                    }

                    self.content.remove(start_char..end_char);
                    self.content.insert(start_char, &change.text);
                }
                None => {
                    // Full document change
                    self.content = Rope::from_str(&change.text);
                }
            }
        }

        self.metadata.version = new_version;
        self.metadata.line_count = self.content.len_lines();

        Ok(())
    }
}

/// Document errors
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Document not found in the store
    #[error("Document not found: {0}")]
    DocumentNotFound(Url),

    /// Document already open
    #[error("Document already open: {0}")]
    AlreadyOpen(Url),

    /// Invalid change range
    #[error("Invalid range: {start:?}..{end:?}")]
    InvalidRange {
        start: (usize, usize),
        end: (usize, usize),
    },
}

/// Document store for managing multiple documents
///
/// Thread-safe store for all open documents.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<Url, Document>>>,
}

impl DocumentStore {
    /// Create a new document store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document
    pub async fn open_document(
        &self,
        uri: Url,
        content: String,
        version: i32,
        language_id: String,
        format: TemplateFormat,
    ) -> Result<(), DocumentError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&uri) {
            return Err(DocumentError::AlreadyOpen(uri));
        }
        documents.insert(
            uri.clone(),
            Document::new(uri, content, version, language_id, format),
        );
        Ok(())
    }

    /// Get a snapshot of a document
    pub async fn get_document(&self, uri: &Url) -> Option<Document> {
        self.documents.read().await.get(uri).cloned()
    }

    /// Apply changes to a document, returning its new full content
    pub async fn update_document(
        &self,
        identifier: &VersionedTextDocumentIdentifier,
        changes: &[TextDocumentContentChangeEvent],
    ) -> Result<Document, DocumentError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(&identifier.uri)
            .ok_or_else(|| DocumentError::DocumentNotFound(identifier.uri.clone()))?;
        document.apply_changes(changes, identifier.version)?;
        Ok(document.clone())
    }

    /// Close a document. Returns whether it was open.
    pub async fn close_document(&self, uri: &Url) -> bool {
        self.documents.write().await.remove(uri).is_some()
    }

    /// Number of open documents
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::{Position, Range};

    fn uri() -> Url {
        Url::parse("file:///template.yaml").unwrap()
    }

    fn full_change(text: &str) -> TextDocumentContentChangeEvent {
        TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_and_get_document() {
        let store = DocumentStore::new();
        store
            .open_document(
                uri(),
                "Resources: {}\n".to_string(),
                1,
                "yaml".to_string(),
                TemplateFormat::Yaml,
            )
            .await
            .unwrap();

        let doc = store.get_document(&uri()).await.unwrap();
        assert_eq!(doc.get_content(), "Resources: {}\n");
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.format(), TemplateFormat::Yaml);
    }

    #[tokio::test]
    async fn test_double_open_fails() {
        let store = DocumentStore::new();
        store
            .open_document(uri(), String::new(), 1, "yaml".to_string(), TemplateFormat::Yaml)
            .await
            .unwrap();
        let result = store
            .open_document(uri(), String::new(), 2, "yaml".to_string(), TemplateFormat::Yaml)
            .await;
        assert!(matches!(result, Err(DocumentError::AlreadyOpen(_))));
    }

    #[tokio::test]
    async fn test_full_document_change() {
        let store = DocumentStore::new();
        store
            .open_document(
                uri(),
                "Parameters: {}\n".to_string(),
                1,
                "yaml".to_string(),
                TemplateFormat::Yaml,
            )
            .await
            .unwrap();

        let identifier = VersionedTextDocumentIdentifier {
            uri: uri(),
            version: 2,
        };
        let updated = store
            .update_document(&identifier, &[full_change("Resources: {}\n")])
            .await
            .unwrap();
        assert_eq!(updated.get_content(), "Resources: {}\n");
        assert_eq!(updated.version(), 2);
    }

    #[tokio::test]
    async fn test_incremental_change() {
        let store = DocumentStore::new();
        store
            .open_document(
                uri(),
                "Resources:\n  B:\n    Type: T\n".to_string(),
                1,
                "yaml".to_string(),
                TemplateFormat::Yaml,
            )
            .await
            .unwrap();

        // Replace "T" with "AWS::S3::Bucket"
        let change = TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position::new(2, 10),
                end: Position::new(2, 11),
            }),
            range_length: None,
            text: "AWS::S3::Bucket".to_string(),
        };
        let identifier = VersionedTextDocumentIdentifier {
            uri: uri(),
            version: 2,
        };
        let updated = store.update_document(&identifier, &[change]).await.unwrap();
        assert_eq!(
            updated.get_content(),
            "Resources:\n  B:\n    Type: AWS::S3::Bucket\n"
        );
    }

    #[tokio::test]
    async fn test_change_unknown_document() {
        let store = DocumentStore::new();
        let identifier = VersionedTextDocumentIdentifier {
            uri: uri(),
            version: 1,
        };
        let result = store.update_document(&identifier, &[full_change("x")]).await;
        assert!(matches!(result, Err(DocumentError::DocumentNotFound(_))));
    }

    #[tokio::test]
    async fn test_close_document() {
        let store = DocumentStore::new();
        store
            .open_document(uri(), String::new(), 1, "yaml".to_string(), TemplateFormat::Yaml)
            .await
            .unwrap();
        assert!(store.close_document(&uri()).await);
        assert!(!store.close_document(&uri()).await);
        assert_eq!(store.document_count().await, 0);
    }
}
