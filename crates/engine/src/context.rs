// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Context Assembler
//!
//! The engine's front door. [`ContextManager`] owns the tree cache and
//! answers the one question everything else is built on: *what does this
//! cursor position mean?*
//!
//! ## Pipeline
//!
//! `get_context` resolves uri → tree → owning section → owning entity →
//! classified position, and assembles the pieces into one [`Context`].
//! Every stage degrades to `None` ("no context") instead of failing; the
//! call is side-effect-free and safe on every keystroke.
//!
//! The fail-fast exception is the pair of resolution helpers
//! ([`ContextManager::resolve_logical_id`],
//! [`ContextManager::section_insertion_point`]): passing a uri that was
//! never added is a caller bug and returns an error instead of a soft
//! `None`.

use cfn_lsp_model::{
    EntityKind, PathSegment, Point, Span, TemplateValue, TopLevelSection,
};
use cfn_template_grammar::TemplateFormat;
use tracing::trace;

use crate::entity::get_entity_map;
use crate::error::EngineError;
use crate::position::{
    classify, AttributeAccess, CursorRole, IntrinsicCall,
};
use crate::sections::SectionEntry;
use crate::syntax::SyntaxTree;
use crate::tree_manager::SyntaxTreeManager;

/// Everything known about one cursor position.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    /// Token text under the cursor, empty for synthetic slots
    pub text: String,
    /// Whether the position sits at document top level, outside (or
    /// naming) any section
    pub is_top_level: bool,
    /// The owning section, if any
    pub section: Option<TopLevelSection>,
    /// The owning entity's logical id, if the position sits inside a
    /// declaration
    pub logical_id: Option<String>,
    /// What kind of entity the owning section declares
    pub entity_kind: Option<EntityKind>,
    /// Full property path from the document root, beginning with the
    /// section name and logical id when those are known
    pub property_path: Vec<PathSegment>,
    /// What the position occupies
    pub role: CursorRole,
    /// Whether the position is the value of a resource's `Type` key
    pub is_type_position: bool,
    /// Nearest enclosing intrinsic invocation
    pub intrinsic: Option<IntrinsicCall>,
    /// Set when the token is a pseudo parameter in argument position
    pub pseudo_parameter: Option<&'static str>,
    /// Set inside a `Fn::GetAtt` argument
    pub attribute_access: Option<AttributeAccess>,
    /// The owning entity's materialized record
    pub entity: Option<TemplateValue>,
    /// The owning entity's bounding range
    pub entity_span: Option<Span>,
}

impl Context {
    fn empty(role: CursorRole) -> Self {
        Self {
            text: String::new(),
            is_top_level: false,
            section: None,
            logical_id: None,
            entity_kind: None,
            property_path: Vec::new(),
            role,
            is_type_position: false,
            intrinsic: None,
            pseudo_parameter: None,
            attribute_access: None,
            entity: None,
            entity_span: None,
        }
    }

    /// Whether completions should offer mapping keys here
    pub fn is_key(&self) -> bool {
        self.role == CursorRole::Key
    }

    /// Whether completions should offer values here
    pub fn is_value(&self) -> bool {
        matches!(self.role, CursorRole::Value | CursorRole::EmptyValue)
    }
}

/// Where a logical id is declared.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityLocation {
    pub section: TopLevelSection,
    pub logical_id: String,
    /// Span of the whole declaration
    pub span: Span,
    /// Span of the logical-id key token
    pub key_span: Span,
}

/// Owns the per-document trees and assembles contexts on demand.
#[derive(Debug, Default)]
pub struct ContextManager {
    trees: SyntaxTreeManager,
}

impl ContextManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)parse and track a document. Returns whether a tree is available.
    pub fn add_document(&mut self, uri: &str, text: &str, format: TemplateFormat) -> bool {
        self.trees.add(uri, text, format)
    }

    /// Stop tracking a closed document
    pub fn remove_document(&mut self, uri: &str) {
        self.trees.remove(uri);
    }

    /// Whether the uri was ever added (even if its last parse failed)
    pub fn is_tracked(&self, uri: &str) -> bool {
        self.trees.is_tracked(uri)
    }

    /// The current tree for a document, if available
    pub fn syntax_tree(&self, uri: &str) -> Option<&SyntaxTree> {
        self.trees.get_syntax_tree(uri)
    }

    /// Resolve what a cursor position means.
    ///
    /// Returns `None` when no tree is available or the position is not
    /// inside the document; never fails otherwise.
    pub fn get_context(&self, uri: &str, position: Point) -> Option<Context> {
        let tree = self.trees.get_syntax_tree(uri)?;
        let offset = tree.offset_at(position)?;
        let sections = tree.find_top_level_sections();

        let Some(entry) = sections.section_at(offset, position) else {
            return Some(self.top_level_context(tree, offset, position));
        };
        // A position on the section name itself is a top-level key edit
        if position.row == entry.key_span.start.row && offset <= entry.key_span.end_byte {
            return Some(self.top_level_context(tree, offset, position));
        }

        trace!("position {position} resolved to section {}", entry.section);
        Some(self.section_context(entry, offset, position))
    }

    /// Find where a logical id is declared, searching the entity-bearing
    /// sections in document order.
    ///
    /// A uri that was never added is a caller precondition violation and
    /// fails fast; a tracked document with no current tree resolves to
    /// `Ok(None)`.
    pub fn resolve_logical_id(
        &self,
        uri: &str,
        logical_id: &str,
    ) -> Result<Option<EntityLocation>, EngineError> {
        let tree = self.tracked_tree(uri)?;
        let Some(tree) = tree else { return Ok(None) };
        let sections = tree.find_top_level_sections();
        for entry in sections.iter() {
            if entry.section.entity_kind().is_none() {
                continue;
            }
            let Some(value) = entry.value else { continue };
            if let Some(entity) = get_entity_map(value).get(logical_id) {
                return Ok(Some(EntityLocation {
                    section: entry.section,
                    logical_id: logical_id.to_string(),
                    span: entity.span,
                    key_span: entity.key_span,
                }));
            }
        }
        Ok(None)
    }

    /// The position right after a section's last content, for providers
    /// that append new declarations.
    pub fn section_insertion_point(
        &self,
        uri: &str,
        section: TopLevelSection,
    ) -> Result<Option<Point>, EngineError> {
        let tree = self.tracked_tree(uri)?;
        let Some(tree) = tree else { return Ok(None) };
        Ok(tree.find_top_level_sections().end_of(section))
    }

    fn tracked_tree(&self, uri: &str) -> Result<Option<&SyntaxTree>, EngineError> {
        if !self.trees.is_tracked(uri) {
            return Err(EngineError::UnknownDocument(uri.to_string()));
        }
        Ok(self.trees.get_syntax_tree(uri))
    }

    fn top_level_context(&self, tree: &SyntaxTree, offset: usize, position: Point) -> Context {
        let classification = classify(tree.root(), offset, position);
        Context {
            text: classification.token,
            is_top_level: true,
            role: classification.role,
            ..Context::empty(CursorRole::EmptyValue)
        }
    }

    fn section_context(
        &self,
        entry: &SectionEntry<'_>,
        offset: usize,
        position: Point,
    ) -> Context {
        let section = entry.section;
        let section_segment = PathSegment::Key(section.name().to_string());

        let Some(value) = entry.value else {
            // `Resources:` with nothing under it yet
            let role = if position.row == entry.pair_span.end.row {
                CursorRole::AfterKeySeparator
            } else {
                CursorRole::EmptyValue
            };
            return Context {
                section: Some(section),
                property_path: vec![section_segment],
                ..Context::empty(role)
            };
        };

        let classification = classify(value, offset, position);
        let entities = get_entity_map(value);

        let logical_id = classification
            .path
            .first()
            .and_then(|segment| segment.as_key())
            .map(str::to_string);
        let record = logical_id
            .as_deref()
            .and_then(|id| entities.get(id));

        let inner_path = logical_id.is_some().then(|| &classification.path[1..]);
        let is_type_position = section == TopLevelSection::Resources
            && inner_path.is_some_and(|p| p == [PathSegment::Key("Type".to_string())])
            && matches!(
                classification.role,
                CursorRole::Value | CursorRole::EmptyValue
            );

        let mut property_path = vec![section_segment];
        property_path.extend(classification.path.iter().cloned());

        Context {
            text: classification.token,
            is_top_level: false,
            section: Some(section),
            logical_id: logical_id.clone(),
            entity_kind: logical_id.is_some().then(|| section.entity_kind()).flatten(),
            property_path,
            role: classification.role,
            is_type_position,
            intrinsic: classification.intrinsic,
            pseudo_parameter: classification.pseudo_parameter,
            attribute_access: classification.attribute_access,
            entity: record.map(|r| r.entity.clone()),
            entity_span: record.map(|r| r.span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfn_lsp_model::IntrinsicFunction;

    const URI: &str = "file:///template.yaml";

    const TEMPLATE: &str = "\
Parameters:
  Stage:
    Type: String
Resources:
  MyBucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: !Ref Stage
Outputs:
  BucketOut:
    Value: !GetAtt MyBucket.Arn
";

    fn manager() -> ContextManager {
        let mut m = ContextManager::new();
        m.add_document(URI, TEMPLATE, TemplateFormat::Yaml);
        m
    }

    fn path_keys(context: &Context) -> Vec<&str> {
        context
            .property_path
            .iter()
            .filter_map(|s| s.as_key())
            .collect()
    }

    #[test]
    fn test_top_level_at_document_start() {
        let m = manager();
        let c = m.get_context(URI, Point::new(0, 0)).unwrap();
        assert!(c.is_top_level);
        assert!(c.section.is_none());
        assert_eq!(c.text, "Parameters");
    }

    #[test]
    fn test_section_key_is_top_level() {
        let m = manager();
        let c = m.get_context(URI, Point::new(3, 4)).unwrap();
        assert!(c.is_top_level);
        assert!(c.section.is_none());
        assert_eq!(c.text, "Resources");
    }

    #[test]
    fn test_entity_context_carries_section_and_logical_id() {
        let m = manager();
        // Inside "AWS::S3::Bucket"
        let c = m.get_context(URI, Point::new(5, 12)).unwrap();
        assert!(!c.is_top_level);
        assert_eq!(c.section, Some(TopLevelSection::Resources));
        assert_eq!(c.logical_id.as_deref(), Some("MyBucket"));
        assert_eq!(c.entity_kind, Some(EntityKind::Resource));
        assert_eq!(path_keys(&c), vec!["Resources", "MyBucket", "Type"]);
    }

    #[test]
    fn test_type_position_flag() {
        let m = manager();
        let c = m.get_context(URI, Point::new(5, 12)).unwrap();
        assert!(c.is_type_position);
        assert_eq!(c.text, "AWS::S3::Bucket");

        // The Type key itself is not a type-name position
        let on_key = m.get_context(URI, Point::new(5, 5)).unwrap();
        assert!(!on_key.is_type_position);
        assert!(on_key.is_key());
    }

    #[test]
    fn test_property_path_reaches_nested_values() {
        let m = manager();
        // Inside "BucketName"
        let c = m.get_context(URI, Point::new(7, 8)).unwrap();
        assert_eq!(
            path_keys(&c),
            vec!["Resources", "MyBucket", "Properties", "BucketName"]
        );
        assert!(c.is_key());
    }

    #[test]
    fn test_intrinsic_flags_flow_through() {
        let m = manager();
        // Inside "Stage" of `!Ref Stage`
        let c = m.get_context(URI, Point::new(7, 25)).unwrap();
        let call = c.intrinsic.expect("intrinsic");
        assert_eq!(call.function, IntrinsicFunction::Ref);
        assert!(call.is_argument_position);
        assert_eq!(c.text, "Stage");
    }

    #[test]
    fn test_attribute_access_flows_through() {
        let m = manager();
        // Inside "MyBucket.Arn"
        let c = m.get_context(URI, Point::new(10, 22)).unwrap();
        let access = c.attribute_access.expect("attribute access");
        assert_eq!(access.logical_id, "MyBucket");
        assert_eq!(access.attribute_path, "Arn");
        assert_eq!(c.section, Some(TopLevelSection::Outputs));
    }

    #[test]
    fn test_entity_record_contains_position() {
        let m = manager();
        let position = Point::new(6, 8);
        let c = m.get_context(URI, position).unwrap();
        let tree = m.syntax_tree(URI).unwrap();
        let offset = tree.offset_at(position).unwrap();
        let span = c.entity_span.expect("entity span");
        assert!(span.contains(offset));
        let entity = c.entity.expect("entity record");
        assert!(entity.get("Type").is_some());
    }

    #[test]
    fn test_after_section_colon_with_no_body() {
        let mut m = ContextManager::new();
        m.add_document(URI, "Resources:", TemplateFormat::Yaml);
        let c = m.get_context(URI, Point::new(0, 10)).unwrap();
        assert_eq!(c.role, CursorRole::AfterKeySeparator);
        assert_eq!(c.section, Some(TopLevelSection::Resources));
        assert!(c.logical_id.is_none());
    }

    #[test]
    fn test_untracked_uri_has_no_context() {
        let m = ContextManager::new();
        assert!(m.get_context("file:///other.yaml", Point::new(0, 0)).is_none());
    }

    #[test]
    fn test_position_past_document_has_no_context() {
        let m = manager();
        assert!(m.get_context(URI, Point::new(99, 0)).is_none());
    }

    #[test]
    fn test_resolve_logical_id_across_sections() {
        let m = manager();
        let stage = m.resolve_logical_id(URI, "Stage").unwrap().unwrap();
        assert_eq!(stage.section, TopLevelSection::Parameters);

        let bucket = m.resolve_logical_id(URI, "MyBucket").unwrap().unwrap();
        assert_eq!(bucket.section, TopLevelSection::Resources);

        assert!(m.resolve_logical_id(URI, "Missing").unwrap().is_none());
    }

    #[test]
    fn test_resolve_on_unknown_uri_fails_fast() {
        let m = manager();
        let err = m.resolve_logical_id("file:///other.yaml", "Stage");
        assert!(matches!(err, Err(EngineError::UnknownDocument(_))));
    }

    #[test]
    fn test_section_insertion_point_after_last_entity() {
        let m = manager();
        let point = m
            .section_insertion_point(URI, TopLevelSection::Parameters)
            .unwrap()
            .expect("Parameters exists");
        // Right after "Type: String" on line 2
        assert_eq!(point.row, 2);
    }

    #[test]
    fn test_removed_document_stops_answering() {
        let mut m = manager();
        m.remove_document(URI);
        assert!(m.get_context(URI, Point::new(0, 0)).is_none());
        assert!(!m.is_tracked(URI));
    }

    #[test]
    fn test_json_document_classifies_the_same() {
        let mut m = ContextManager::new();
        let json = r#"{
  "Resources": {
    "MyBucket": {
      "Type": "AWS::S3::Bucket"
    }
  }
}"#;
        m.add_document(URI, json, TemplateFormat::Json);
        // Inside "AWS::S3::Bucket"
        let c = m.get_context(URI, Point::new(3, 18)).unwrap();
        assert_eq!(c.section, Some(TopLevelSection::Resources));
        assert_eq!(c.logical_id.as_deref(), Some("MyBucket"));
        assert!(c.is_type_position);
    }
}
