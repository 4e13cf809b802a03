// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! cfn Template Grammar
//!
//! This crate provides dual-grammar template support using tree-sitter.
//!
//! ## Supported Formats
//!
//! - **yaml**: block-indentation grammar, including short-form intrinsic
//!   tags (`!Ref`, `!GetAtt`, …)
//! - **json**: brace-delimited grammar
//!
//! ## Usage
//!
//! ```rust
//! use cfn_template_grammar::TemplateFormat;
//!
//! let yaml = TemplateFormat::Yaml.language();
//! let json = TemplateFormat::Json.language();
//! ```

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Surface grammar a template is authored in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateFormat {
    /// Block-indentation grammar
    Yaml,
    /// Brace-delimited grammar
    Json,
}

impl TemplateFormat {
    /// Get all supported formats
    pub fn all() -> &'static [TemplateFormat] {
        &[TemplateFormat::Yaml, TemplateFormat::Json]
    }

    /// Get format name as string
    pub fn name(&self) -> &'static str {
        match self {
            TemplateFormat::Yaml => "yaml",
            TemplateFormat::Json => "json",
        }
    }

    /// Resolve a format from an editor language id or file extension
    pub fn from_language_id(s: &str) -> Option<TemplateFormat> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" | "cloudformation-yaml" => Some(TemplateFormat::Yaml),
            "json" | "jsonc" | "cloudformation-json" => Some(TemplateFormat::Json),
            _ => None,
        }
    }

    /// Get the tree-sitter language for this format
    pub fn language(&self) -> &'static tree_sitter::Language {
        language_for_format(*self)
    }
}

impl std::fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Get the tree-sitter Language for a specific template format
pub fn language_for_format(format: TemplateFormat) -> &'static tree_sitter::Language {
    static YAML_LANG: OnceLock<tree_sitter::Language> = OnceLock::new();
    static JSON_LANG: OnceLock<tree_sitter::Language> = OnceLock::new();

    match format {
        TemplateFormat::Yaml => {
            YAML_LANG.get_or_init(|| tree_sitter::Language::new(tree_sitter_yaml::LANGUAGE))
        }
        TemplateFormat::Json => {
            JSON_LANG.get_or_init(|| tree_sitter::Language::new(tree_sitter_json::LANGUAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_language_id() {
        assert_eq!(
            TemplateFormat::from_language_id("yaml"),
            Some(TemplateFormat::Yaml)
        );
        assert_eq!(
            TemplateFormat::from_language_id("YAML"),
            Some(TemplateFormat::Yaml)
        );
        assert_eq!(
            TemplateFormat::from_language_id("yml"),
            Some(TemplateFormat::Yaml)
        );
        assert_eq!(
            TemplateFormat::from_language_id("json"),
            Some(TemplateFormat::Json)
        );
        assert_eq!(TemplateFormat::from_language_id("toml"), None);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(TemplateFormat::Yaml.to_string(), "yaml");
        assert_eq!(TemplateFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_languages_load() {
        // Both grammars are linked in; loading them must not panic and a
        // parser must accept them.
        for format in TemplateFormat::all() {
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(format.language())
                .expect("grammar should be ABI-compatible");
        }
    }
}
