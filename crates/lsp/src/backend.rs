// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # LSP Backend
//!
//! The tower-lsp `LanguageServer` implementation.
//!
//! ## Overview
//!
//! The backend wires the protocol to the engine:
//! - Document lifecycle notifications keep the [`DocumentStore`] and the
//!   engine's [`ContextManager`] in sync (full reparse per change)
//! - Completion, hover and definition requests delegate to the pure
//!   provider functions, which never touch the client
//!
//! All engine state sits behind an async `RwLock`; requests take read
//! locks, lifecycle notifications take write locks.

use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionOptions, CompletionParams, CompletionResponse, DidChangeConfigurationParams,
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverParams, HoverProviderCapability,
    InitializeParams, InitializeResult, InitializedParams, MessageType, OneOf,
    ServerCapabilities, ServerInfo, TextDocumentSyncCapability, TextDocumentSyncKind,
};
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use cfn_lsp_engine::ContextManager;

use crate::completion::completion_items;
use crate::config::{resolve_format, ServerConfig};
use crate::convert::point_from_position;
use crate::definition::definition_location;
use crate::document::DocumentStore;
use crate::hover::hover_content;

/// The cfn-lsp language server backend
pub struct Backend {
    client: Client,
    documents: DocumentStore,
    engine: RwLock<ContextManager>,
    config: RwLock<ServerConfig>,
}

impl Backend {
    /// Create a new backend
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            engine: RwLock::new(ContextManager::new()),
            config: RwLock::new(ServerConfig::default()),
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options {
            *self.config.write().await = ServerConfig::from_value(&options);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(
                        ["!", ":", ".", "\"", " "]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    ),
                    ..Default::default()
                }),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                definition_provider: Some(OneOf::Left(true)),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "cfn-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        info!("server initialized");
        self.client
            .log_message(MessageType::INFO, "cfn-lsp initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("server shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        let format = {
            let config = self.config.read().await;
            resolve_format(&config, &document.language_id, &document.uri)
        };
        debug!("opening {} as {format}", document.uri);

        if let Err(error) = self
            .documents
            .open_document(
                document.uri.clone(),
                document.text.clone(),
                document.version,
                document.language_id,
                format,
            )
            .await
        {
            warn!("did_open: {error}");
            return;
        }

        let parsed = self
            .engine
            .write()
            .await
            .add_document(document.uri.as_str(), &document.text, format);
        if !parsed {
            debug!("{} has no usable parse yet", document.uri);
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let document = match self
            .documents
            .update_document(&params.text_document, &params.content_changes)
            .await
        {
            Ok(document) => document,
            Err(error) => {
                warn!("did_change: {error}");
                return;
            }
        };

        self.engine.write().await.add_document(
            document.uri().as_str(),
            &document.get_content(),
            document.format(),
        );
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.close_document(&uri).await;
        self.engine.write().await.remove_document(uri.as_str());
        debug!("closed {uri}");
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        *self.config.write().await = ServerConfig::from_value(&params.settings);
        debug!("configuration updated");
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let point = point_from_position(params.text_document_position.position);
        let config = self.config.read().await.clone();
        let engine = self.engine.read().await;
        let items = completion_items(&engine, uri.as_str(), point, &config);
        Ok(items.map(CompletionResponse::Array))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let point = point_from_position(params.text_document_position_params.position);
        let engine = self.engine.read().await;
        Ok(hover_content(&engine, uri.as_str(), point))
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let point = point_from_position(params.text_document_position_params.position);
        let engine = self.engine.read().await;
        Ok(definition_location(&engine, &uri, point).map(GotoDefinitionResponse::Scalar))
    }
}
