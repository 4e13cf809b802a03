// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Position Classifier
//!
//! Descends the normalized tree toward a byte offset and reports what the
//! cursor position means: the ancestor chain, the property path, the
//! key/value role, and the domain-semantic flags (intrinsic invocation,
//! pseudo parameter, cross-entity attribute access).
//!
//! ## Descent rules
//!
//! Containment is end-exclusive: the position right after a token belongs
//! to the enclosing container, never to a guessed neighbor. When no node
//! contains the offset (blank line, freshly typed indentation), the walk
//! falls back to the innermost structural ancestor that ends before the
//! offset and synthesizes an empty slot inside it, using the cursor column
//! against key columns to decide how deep the slot sits. Block-style
//! indentation drives that heuristic; flow/brace containers carry their
//! own delimiters and take the slot immediately.
//!
//! Two deliberate tie-breaks on the same line as a key with no value:
//! the position immediately after the separator classifies as
//! [`CursorRole::AfterKeySeparator`] (callers offer nothing there), while
//! the next line, indented past the key, is the empty value slot.
//!
//! Malformed regions degrade instead of failing: error nodes are
//! descended like containers, so a document that is mid-keystroke invalid
//! still yields the best partial classification.

use cfn_lsp_model::{
    is_pseudo_parameter, IntrinsicFunction, PathSegment, Point, Span,
};

use crate::syntax::{SyntaxKind, SyntaxNode};

/// What the cursor position occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorRole {
    /// On a mapping key token
    Key,
    /// On a value token (or inside one being typed)
    Value,
    /// A synthetic empty slot: a value not yet authored, or a fresh
    /// entry position inside a container
    EmptyValue,
    /// Immediately after a key separator with nothing typed; callers
    /// offer no suggestions here
    AfterKeySeparator,
}

/// An enclosing intrinsic-function invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrinsicCall {
    /// Which function encloses the position
    pub function: IntrinsicFunction,
    /// Span of the whole invocation (tag plus content, or the
    /// single-key mapping)
    pub span: Span,
    /// Whether the position is inside the argument rather than on the
    /// function name itself
    pub is_argument_position: bool,
}

/// A `Fn::GetAtt` argument split into its two halves.
///
/// The attribute path is kept verbatim; it may itself contain dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeAccess {
    pub logical_id: String,
    pub attribute_path: String,
}

/// The classifier's full answer for one position.
#[derive(Debug, Clone)]
pub struct Classification<'t> {
    /// Ancestor chain from the scope root to the target, in order
    pub node_path: Vec<&'t SyntaxNode>,
    /// Property path from the scope root to the target
    pub path: Vec<PathSegment>,
    /// What the position occupies
    pub role: CursorRole,
    /// Token text under the cursor, empty for synthetic slots
    pub token: String,
    /// Span of that token (an empty span at the cursor for slots)
    pub token_span: Span,
    /// Nearest enclosing intrinsic invocation, if any
    pub intrinsic: Option<IntrinsicCall>,
    /// Set when the token is a pseudo parameter in argument position
    pub pseudo_parameter: Option<&'static str>,
    /// Set inside a `Fn::GetAtt` argument
    pub attribute_access: Option<AttributeAccess>,
}

impl Classification<'_> {
    /// Whether completions should offer mapping keys here
    pub fn is_key_position(&self) -> bool {
        matches!(self.role, CursorRole::Key)
    }

    /// Whether completions should offer values here
    pub fn is_value_position(&self) -> bool {
        matches!(self.role, CursorRole::Value | CursorRole::EmptyValue)
    }
}

/// Classify a byte offset within a subtree.
///
/// `cursor` is the (row, column) the offset was derived from; the column
/// is consulted for indentation tie-breaks on positions no node contains.
/// Never fails: the worst case is an empty slot at the scope root.
pub fn classify<'t>(scope: &'t SyntaxNode, offset: usize, cursor: Point) -> Classification<'t> {
    let mut walker = Walker {
        offset,
        cursor,
        path: Vec::new(),
        node_path: Vec::new(),
    };
    let outcome = walker.descend(scope);
    let (intrinsic, pseudo_parameter, attribute_access) =
        semantic_flags(&walker.node_path, &outcome, offset);
    Classification {
        node_path: walker.node_path,
        path: walker.path,
        role: outcome.role,
        token: outcome.token,
        token_span: outcome.token_span,
        intrinsic,
        pseudo_parameter,
        attribute_access,
    }
}

struct Outcome {
    role: CursorRole,
    token: String,
    token_span: Span,
}

struct Walker<'t> {
    offset: usize,
    cursor: Point,
    path: Vec<PathSegment>,
    node_path: Vec<&'t SyntaxNode>,
}

impl<'t> Walker<'t> {
    fn descend(&mut self, node: &'t SyntaxNode) -> Outcome {
        self.node_path.push(node);
        // A short-form tag is the long form's single-key mapping spelled
        // inline; argument positions get the same path segment the long
        // form's function-name key would contribute.
        if let Some(function) = node.tag.as_deref().and_then(IntrinsicFunction::from_short_tag) {
            if self.offset >= node.inner_span().start_byte {
                self.path
                    .push(PathSegment::Key(function.full_name().to_string()));
            }
        }
        match node.kind {
            SyntaxKind::Scalar => Outcome {
                role: CursorRole::Value,
                token: node.token_text().to_string(),
                token_span: node.inner_span(),
            },
            SyntaxKind::Mapping => self.descend_mapping(node),
            SyntaxKind::Sequence => self.descend_sequence(node),
            SyntaxKind::Pair => self.descend_pair(node),
            SyntaxKind::Document | SyntaxKind::Error => self.descend_region(node),
        }
    }

    fn descend_mapping(&mut self, node: &'t SyntaxNode) -> Outcome {
        if let Some(child) = node
            .children
            .iter()
            .find(|c| c.span.contains(self.offset))
        {
            // Block entries swallow trailing blank lines into their span.
            // Past the entry's last real token, a cursor at or left of the
            // entry's key column is a new sibling slot, not entry content.
            if !node.flow && child.kind == SyntaxKind::Pair && self.offset >= content_end(child) {
                let key_column = child
                    .pair_key()
                    .map(|k| k.span.start.column)
                    .unwrap_or(child.span.start.column);
                if self.cursor.column <= key_column {
                    return self.empty_slot();
                }
            }
            return self.descend(child);
        }

        // Nothing contains the offset: synthesize a slot. Flow containers
        // delimit themselves, so the slot is a new entry right here.
        if node.flow {
            return self.empty_slot();
        }

        let Some(pair) = node
            .children
            .iter()
            .filter(|c| c.kind == SyntaxKind::Pair && c.span.end_byte <= self.offset)
            .next_back()
        else {
            return self.empty_slot();
        };

        let key_column = pair
            .pair_key()
            .map(|k| k.span.start.column)
            .unwrap_or(pair.span.start.column);

        // At or left of the key column the cursor starts a new sibling key
        if self.cursor.column <= key_column {
            return self.empty_slot();
        }
        // A completed scalar pair on an earlier line does not reopen; the
        // indented cursor is still a new-key slot of this mapping
        if let Some(value) = pair.pair_value() {
            if value.kind == SyntaxKind::Scalar && self.cursor.row > value.span.end.row {
                return self.empty_slot();
            }
        }
        self.descend(pair)
    }

    fn descend_pair(&mut self, pair: &'t SyntaxNode) -> Outcome {
        let key = pair.pair_key();
        let value = pair.pair_value();

        if let Some(key) = key {
            let before_value = value.is_none_or(|v| self.offset < v.span.start_byte);
            let editing_key = before_value
                && self.cursor.row == key.span.end.row
                && key.span.brackets(self.offset);
            if key.span.contains(self.offset) || editing_key {
                self.path
                    .push(PathSegment::Key(key.token_text().to_string()));
                self.node_path.push(key);
                return Outcome {
                    role: CursorRole::Key,
                    token: key.token_text().to_string(),
                    token_span: key.span,
                };
            }
        }

        if let Some(key) = key {
            self.path
                .push(PathSegment::Key(key.token_text().to_string()));
        }

        match value {
            Some(value) if value.span.contains(self.offset) => self.descend(value),
            // Typing at the end of a scalar value on the same line
            Some(value)
                if value.kind == SyntaxKind::Scalar
                    && self.cursor.row == value.span.end.row
                    && self.offset >= value.span.start_byte =>
            {
                self.descend(value)
            }
            // Trailing position handed down by the mapping: the slot sits
            // somewhere inside this pair's container value
            Some(value) if self.offset >= value.span.end_byte => self.descend(value),
            // Between the separator and a value: prefer the container
            Some(_) => self.empty_slot_in(pair),
            None if self.cursor.row == pair.span.end.row => {
                self.node_path.push(pair);
                Outcome {
                    role: CursorRole::AfterKeySeparator,
                    token: String::new(),
                    token_span: Span::empty_at(self.offset, self.cursor),
                }
            }
            None => self.empty_slot_in(pair),
        }
    }

    fn descend_sequence(&mut self, node: &'t SyntaxNode) -> Outcome {
        if let Some((index, child)) = node
            .children
            .iter()
            .enumerate()
            .find(|(_, c)| c.span.contains(self.offset))
        {
            self.path.push(PathSegment::Index(index));
            return self.descend(child);
        }

        if node.flow {
            self.path.push(PathSegment::Index(node.children.len()));
            return self.empty_slot();
        }

        let last = node
            .children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.span.end_byte <= self.offset)
            .next_back();
        match last {
            Some((index, child)) if self.cursor.column > child.span.start.column => {
                let completed_scalar =
                    child.kind == SyntaxKind::Scalar && self.cursor.row > child.span.end.row;
                if completed_scalar {
                    self.path.push(PathSegment::Index(node.children.len()));
                    self.empty_slot()
                } else {
                    self.path.push(PathSegment::Index(index));
                    self.descend(child)
                }
            }
            _ => {
                self.path.push(PathSegment::Index(node.children.len()));
                self.empty_slot()
            }
        }
    }

    /// Documents and error regions: descend whatever recognizable child
    /// covers or precedes the offset.
    ///
    /// A malformed fragment (a stray scalar, a nested error region) that
    /// sits after intact structure classifies against that structure when
    /// the cursor is indented past its start column — a half-typed line
    /// continues the mapping above it, it does not start a new document.
    fn descend_region(&mut self, node: &'t SyntaxNode) -> Outcome {
        if let Some((index, child)) = node
            .children
            .iter()
            .enumerate()
            .find(|(_, c)| c.span.contains(self.offset))
        {
            if !child.is_structural() {
                if let Some(prev) = self.structure_before(&node.children[..index]) {
                    return self.descend(prev);
                }
            }
            return self.descend(child);
        }

        if let Some(prev) = self.structure_before(&node.children) {
            return self.descend(prev);
        }
        if let Some(child) = node
            .children
            .iter()
            .filter(|c| c.span.end_byte <= self.offset)
            .next_back()
        {
            if child.kind == SyntaxKind::Scalar && self.cursor.row == child.span.end.row {
                return self.descend(child);
            }
        }
        self.empty_slot()
    }

    /// The last intact structural sibling the cursor still continues:
    /// it ends at or before the offset and the cursor is indented past
    /// its start column.
    fn structure_before(&self, siblings: &'t [SyntaxNode]) -> Option<&'t SyntaxNode> {
        siblings
            .iter()
            .rev()
            .find(|c| c.is_structural() && c.span.end_byte <= self.offset)
            .filter(|c| self.cursor.column > c.span.start.column)
    }

    fn empty_slot(&mut self) -> Outcome {
        Outcome {
            role: CursorRole::EmptyValue,
            token: String::new(),
            token_span: Span::empty_at(self.offset, self.cursor),
        }
    }

    fn empty_slot_in(&mut self, pair: &'t SyntaxNode) -> Outcome {
        self.node_path.push(pair);
        self.empty_slot()
    }
}

/// Byte offset right after a subtree's last real token. Container spans
/// can extend past their content (trailing newlines the grammar folded
/// in); the deepest last leaf marks where typed text actually ends.
fn content_end(node: &SyntaxNode) -> usize {
    match node.children.last() {
        Some(last) => content_end(last),
        None => node.inner_span().end_byte,
    }
}

/// Shape-match the ancestor chain for domain-semantic flags.
fn semantic_flags(
    node_path: &[&SyntaxNode],
    outcome: &Outcome,
    offset: usize,
) -> (
    Option<IntrinsicCall>,
    Option<&'static str>,
    Option<AttributeAccess>,
) {
    let Some((index, function)) = node_path
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, n)| intrinsic_of(n).map(|f| (i, f)))
    else {
        return (None, None, None);
    };
    let carrier = node_path[index];

    let is_argument_position = if carrier.tag.is_some() {
        // Short form: the argument starts where the tagged content starts
        offset >= carrier.inner_span().start_byte
    } else {
        // Single-key mapping form: node_path continues through the pair
        // unless the cursor sits on the function-name key itself
        let on_function_name = outcome.role == CursorRole::Key && node_path.len() == index + 3;
        node_path.len() > index + 1 && !on_function_name
    };

    let intrinsic = IntrinsicCall {
        function,
        span: carrier.span,
        is_argument_position,
    };

    let pseudo_parameter = if is_argument_position
        && outcome.role == CursorRole::Value
        && is_pseudo_parameter(&outcome.token)
    {
        cfn_lsp_model::PSEUDO_PARAMETERS
            .iter()
            .copied()
            .find(|p| *p == outcome.token)
    } else {
        None
    };

    let attribute_access = if function == IntrinsicFunction::GetAtt && is_argument_position {
        attribute_access_of(carrier)
    } else {
        None
    };

    (Some(intrinsic), pseudo_parameter, attribute_access)
}

/// Recognize an intrinsic invocation by shape: a short-form tag, or a
/// mapping with exactly one key drawn from the function registry.
fn intrinsic_of(node: &SyntaxNode) -> Option<IntrinsicFunction> {
    if let Some(tag) = node.tag.as_deref() {
        return IntrinsicFunction::from_short_tag(tag);
    }
    if node.kind == SyntaxKind::Mapping && node.children.len() == 1 {
        let key = node.children[0].pair_key()?;
        return IntrinsicFunction::from_full_name(key.token_text());
    }
    None
}

/// Split a `Fn::GetAtt` argument into logical id and attribute path.
///
/// Scalar form: text before the first dot names the entity, everything
/// after it (dots included) is the attribute path. Sequence form: the
/// first element names the entity, the remainder joins with dots.
fn attribute_access_of(carrier: &SyntaxNode) -> Option<AttributeAccess> {
    let argument = if carrier.tag.is_some() {
        carrier
    } else {
        carrier.children.first()?.pair_value()?
    };
    match argument.kind {
        SyntaxKind::Scalar => {
            let text = argument.token_text();
            if text.is_empty() {
                return None;
            }
            match text.split_once('.') {
                Some((id, rest)) => Some(AttributeAccess {
                    logical_id: id.to_string(),
                    attribute_path: rest.to_string(),
                }),
                None => Some(AttributeAccess {
                    logical_id: text.to_string(),
                    attribute_path: String::new(),
                }),
            }
        }
        SyntaxKind::Sequence => {
            let mut scalars = argument
                .children
                .iter()
                .filter(|c| c.kind == SyntaxKind::Scalar);
            let logical_id = scalars.next()?.token_text().to_string();
            let attribute_path = scalars
                .map(|s| s.token_text())
                .collect::<Vec<_>>()
                .join(".");
            Some(AttributeAccess {
                logical_id,
                attribute_path,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse_template, SyntaxTree};
    use cfn_template_grammar::TemplateFormat;

    fn tree(text: &str, format: TemplateFormat) -> SyntaxTree {
        parse_template(text, format).unwrap()
    }

    fn classify_at(tree: &SyntaxTree, row: usize, column: usize) -> Classification<'_> {
        let cursor = Point::new(row, column);
        let offset = tree.offset_at(cursor).expect("position inside document");
        classify(tree.root(), offset, cursor)
    }

    fn keys(path: &[PathSegment]) -> Vec<&str> {
        path.iter().filter_map(|s| s.as_key()).collect()
    }

    const ENTITY: &str =
        "Resources:\n  B:\n    Type: AWS::S3::Bucket\n    Properties:\n      BucketName: logs\n";

    #[test]
    fn test_key_role_on_key_token() {
        let t = tree(ENTITY, TemplateFormat::Yaml);
        // Cursor on "Type"
        let c = classify_at(&t, 2, 5);
        assert_eq!(c.role, CursorRole::Key);
        assert_eq!(c.token, "Type");
        assert_eq!(keys(&c.path), vec!["Resources", "B", "Type"]);
    }

    #[test]
    fn test_value_role_on_value_token() {
        let t = tree(ENTITY, TemplateFormat::Yaml);
        // Cursor inside "AWS::S3::Bucket"
        let c = classify_at(&t, 2, 12);
        assert_eq!(c.role, CursorRole::Value);
        assert_eq!(c.token, "AWS::S3::Bucket");
        assert_eq!(keys(&c.path), vec!["Resources", "B", "Type"]);
    }

    #[test]
    fn test_typing_at_end_of_value_stays_value() {
        let t = tree("Resources:\n  B:\n    Type: AWS::S\n", TemplateFormat::Yaml);
        let c = classify_at(&t, 2, 16);
        assert_eq!(c.role, CursorRole::Value);
        assert_eq!(c.token, "AWS::S");
    }

    #[test]
    fn test_after_key_separator_same_line() {
        let t = tree(
            "Resources:\n  B:\n    Type: T\n    Properties:\n",
            TemplateFormat::Yaml,
        );
        // Immediately after the colon of "Properties:"
        let c = classify_at(&t, 3, 15);
        assert_eq!(c.role, CursorRole::AfterKeySeparator);
        assert_eq!(keys(&c.path), vec!["Resources", "B", "Properties"]);
    }

    #[test]
    fn test_empty_value_slot_on_next_line() {
        let t = tree(
            "Resources:\n  B:\n    Type: T\n    Properties:\n\n",
            TemplateFormat::Yaml,
        );
        // One line down, indented past the key column
        let c = classify_at(&t, 4, 6);
        assert_eq!(c.role, CursorRole::EmptyValue);
        assert_eq!(keys(&c.path), vec!["Resources", "B", "Properties"]);
    }

    #[test]
    fn test_new_key_slot_at_entity_level() {
        let t = tree("Resources:\n  B:\n    Type: T\n\n", TemplateFormat::Yaml);
        // Indented to the entity body's key column: a fresh sibling of Type
        let c = classify_at(&t, 3, 4);
        assert_eq!(c.role, CursorRole::EmptyValue);
        assert_eq!(keys(&c.path), vec!["Resources", "B"]);
    }

    #[test]
    fn test_column_zero_is_root_slot() {
        let t = tree("Resources:\n  B:\n    Type: T\n\n", TemplateFormat::Yaml);
        let c = classify_at(&t, 3, 0);
        assert_eq!(c.role, CursorRole::EmptyValue);
        assert!(c.path.is_empty());
    }

    #[test]
    fn test_empty_flow_mapping_is_entry_slot() {
        let t = tree(
            r#"{"Resources": {"B": {}}}"#,
            TemplateFormat::Json,
        );
        // Between the innermost braces
        let c = classify_at(&t, 0, 21);
        assert_eq!(c.role, CursorRole::EmptyValue);
        assert_eq!(keys(&c.path), vec!["Resources", "B"]);
    }

    #[test]
    fn test_sequence_items_get_indices() {
        let t = tree(
            "Resources:\n  B:\n    Properties:\n      Tags:\n        - alpha\n        - beta\n",
            TemplateFormat::Yaml,
        );
        let c = classify_at(&t, 5, 11);
        assert_eq!(c.role, CursorRole::Value);
        assert_eq!(c.token, "beta");
        assert_eq!(
            c.path.last(),
            Some(&PathSegment::Index(1)),
            "path: {:?}",
            c.path
        );
    }

    #[test]
    fn test_short_tag_intrinsic_argument() {
        let t = tree(
            "Resources:\n  B:\n    Properties:\n      Name: !Ref Param\n",
            TemplateFormat::Yaml,
        );
        // Cursor inside "Param"
        let c = classify_at(&t, 3, 19);
        assert_eq!(c.token, "Param");
        let call = c.intrinsic.expect("intrinsic detected");
        assert_eq!(call.function, IntrinsicFunction::Ref);
        assert!(call.is_argument_position);
    }

    #[test]
    fn test_long_form_intrinsic_argument() {
        let t = tree(
            r#"{"Resources": {"B": {"Properties": {"Name": {"Ref": "Param"}}}}}"#,
            TemplateFormat::Json,
        );
        let offset = t.source().find("Param").unwrap() + 2;
        let c = classify(t.root(), offset, t.point_at(offset));
        assert_eq!(c.token, "Param");
        let call = c.intrinsic.expect("intrinsic detected");
        assert_eq!(call.function, IntrinsicFunction::Ref);
        assert!(call.is_argument_position);
    }

    #[test]
    fn test_tag_argument_path_matches_long_form() {
        // Both encodings of the same invocation contribute the same
        // function-name segment to the property path
        let yaml = tree(
            "Resources:\n  B:\n    Properties:\n      Name: !Ref Param\n",
            TemplateFormat::Yaml,
        );
        let yaml_c = classify_at(&yaml, 3, 19);

        let json = tree(
            r#"{"Resources": {"B": {"Properties": {"Name": {"Ref": "Param"}}}}}"#,
            TemplateFormat::Json,
        );
        let offset = json.source().find("Param").unwrap() + 2;
        let json_c = classify(json.root(), offset, json.point_at(offset));

        assert_eq!(yaml_c.path, json_c.path);
        assert_eq!(
            keys(&yaml_c.path),
            vec!["Resources", "B", "Properties", "Name", "Ref"]
        );
    }

    #[test]
    fn test_cursor_on_function_name_is_not_argument() {
        let t = tree(
            r#"{"Resources": {"B": {"Properties": {"Name": {"Ref": "Param"}}}}}"#,
            TemplateFormat::Json,
        );
        let offset = t.source().find("\"Ref\"").unwrap() + 2;
        let c = classify(t.root(), offset, t.point_at(offset));
        assert_eq!(c.role, CursorRole::Key);
        let call = c.intrinsic.expect("intrinsic detected");
        assert_eq!(call.function, IntrinsicFunction::Ref);
        assert!(!call.is_argument_position);
    }

    #[test]
    fn test_unregistered_single_key_mapping_is_not_intrinsic() {
        let t = tree(
            r#"{"Resources": {"B": {"Properties": {"Name": {"Fn::Frobnicate": "x"}}}}}"#,
            TemplateFormat::Json,
        );
        let offset = t.source().rfind("\"x\"").unwrap() + 1;
        let c = classify(t.root(), offset, t.point_at(offset));
        assert!(c.intrinsic.is_none());
    }

    #[test]
    fn test_pseudo_parameter_in_argument_position() {
        let t = tree(
            "Resources:\n  B:\n    Properties:\n      Name: !Ref AWS::Region\n",
            TemplateFormat::Yaml,
        );
        let c = classify_at(&t, 3, 20);
        assert_eq!(c.pseudo_parameter, Some("AWS::Region"));
    }

    #[test]
    fn test_pseudo_token_outside_reference_is_plain_value() {
        let t = tree(
            "Resources:\n  B:\n    Properties:\n      Name: AWS::Region\n",
            TemplateFormat::Yaml,
        );
        let c = classify_at(&t, 3, 15);
        assert_eq!(c.token, "AWS::Region");
        assert!(c.pseudo_parameter.is_none());
        assert!(c.intrinsic.is_none());
    }

    #[test]
    fn test_get_att_scalar_argument_splits_on_first_dot() {
        let t = tree(
            "Resources:\n  B:\n    Properties:\n      Endpoint: !GetAtt Db.Endpoint.Port\n",
            TemplateFormat::Yaml,
        );
        let c = classify_at(&t, 3, 26);
        let access = c.attribute_access.expect("attribute access detected");
        assert_eq!(access.logical_id, "Db");
        assert_eq!(access.attribute_path, "Endpoint.Port");
    }

    #[test]
    fn test_get_att_sequence_argument() {
        let t = tree(
            r#"{"Resources": {"B": {"Properties": {"Arn": {"Fn::GetAtt": ["Db", "Arn"]}}}}}"#,
            TemplateFormat::Json,
        );
        let offset = t.source().find("\"Db\"").unwrap() + 2;
        let c = classify(t.root(), offset, t.point_at(offset));
        let access = c.attribute_access.expect("attribute access detected");
        assert_eq!(access.logical_id, "Db");
        assert_eq!(access.attribute_path, "Arn");
    }

    #[test]
    fn test_bare_tag_without_argument_still_classifies() {
        let t = tree(
            "Resources:\n  B:\n    Properties:\n      Name: !Ref\n",
            TemplateFormat::Yaml,
        );
        let c = classify_at(&t, 3, 16);
        let call = c.intrinsic.expect("intrinsic detected");
        assert_eq!(call.function, IntrinsicFunction::Ref);
        assert!(c.token.is_empty());
    }

    #[test]
    fn test_malformed_document_degrades_to_partial_path() {
        // Mid-keystroke: a bare token with no separator yet
        let t = tree("Resources:\n  B:\n    Type: T\n    Pro\n", TemplateFormat::Yaml);
        let c = classify_at(&t, 3, 7);
        assert_eq!(keys(&c.path).first(), Some(&"Resources"));
    }

    #[test]
    fn test_deterministic() {
        let t = tree(ENTITY, TemplateFormat::Yaml);
        let a = classify_at(&t, 4, 10);
        let b = classify_at(&t, 4, 10);
        assert_eq!(a.path, b.path);
        assert_eq!(a.role, b.role);
        assert_eq!(a.token, b.token);
        assert_eq!(a.token_span, b.token_span);
    }
}
