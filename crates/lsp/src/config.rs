// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Server Configuration
//!
//! Runtime options clients may set through `initializationOptions` or
//! `workspace/didChangeConfiguration`. Unknown fields are ignored so older
//! clients can keep sending their full settings blob.

use serde::Deserialize;
use tower_lsp::lsp_types::Url;

use cfn_template_grammar::TemplateFormat;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    /// Force every document to parse as this format, regardless of its
    /// language id or file extension
    pub format_override: Option<String>,

    /// Cap on the number of completion items returned per request
    pub max_completion_items: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            format_override: None,
            max_completion_items: 100,
        }
    }
}

impl ServerConfig {
    /// Parse a configuration value the client sent; falls back to defaults
    /// for anything missing or malformed.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// The forced format, if `format_override` names a known one
    pub fn forced_format(&self) -> Option<TemplateFormat> {
        self.format_override
            .as_deref()
            .and_then(TemplateFormat::from_language_id)
    }
}

/// Decide which grammar a document is parsed with.
///
/// Priority: explicit override, then the client's language id, then the
/// file extension. YAML is the default because CloudFormation templates
/// overwhelmingly are.
pub fn resolve_format(config: &ServerConfig, language_id: &str, uri: &Url) -> TemplateFormat {
    if let Some(format) = config.forced_format() {
        return format;
    }
    if let Some(format) = TemplateFormat::from_language_id(language_id) {
        return format;
    }
    match uri.path().rsplit('.').next() {
        Some("json") => TemplateFormat::Json,
        _ => TemplateFormat::Yaml,
    }
}
