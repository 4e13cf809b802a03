// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Completion Provider
//!
//! Turns an engine [`Context`] into completion items.
//!
//! ## Overview
//!
//! What gets offered depends on what the position occupies:
//! - Top level: the recognized section names not yet declared
//! - Logical-id argument (`Ref`, `Fn::GetAtt`, `Condition`): ids declared
//!   in the sections that function may name, plus pseudo parameters for `Ref`
//! - Entity body key slots: the well-known keys of that entity kind
//! - Other value slots: the intrinsic functions, spelled for the grammar
//!   the document is written in
//!
//! Immediately after a key separator nothing is offered at all; the cursor
//! has to move into a real slot first.

use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind};

use cfn_lsp_engine::{get_entity_map, Context, ContextManager, CursorRole};
use cfn_lsp_model::{
    IntrinsicFunction, Point, TopLevelSection, PSEUDO_PARAMETERS,
};
use cfn_template_grammar::TemplateFormat;

use crate::config::ServerConfig;

/// Well-known keys of a resource declaration body
const RESOURCE_KEYS: &[&str] = &[
    "Type",
    "Properties",
    "Condition",
    "DependsOn",
    "Metadata",
    "DeletionPolicy",
    "UpdateReplacePolicy",
    "CreationPolicy",
    "UpdatePolicy",
];

/// Well-known keys of a parameter declaration body
const PARAMETER_KEYS: &[&str] = &[
    "Type",
    "Default",
    "AllowedValues",
    "AllowedPattern",
    "Description",
    "MinLength",
    "MaxLength",
    "MinValue",
    "MaxValue",
    "NoEcho",
    "ConstraintDescription",
];

/// Well-known keys of an output declaration body
const OUTPUT_KEYS: &[&str] = &["Value", "Description", "Export", "Condition"];

/// Compute completion items for a position.
///
/// `None` means "offer nothing", either because the document has no context
/// there or because the position explicitly takes no suggestions.
pub fn completion_items(
    manager: &ContextManager,
    uri: &str,
    position: Point,
    config: &ServerConfig,
) -> Option<Vec<CompletionItem>> {
    let context = manager.get_context(uri, position)?;
    if context.role == CursorRole::AfterKeySeparator {
        return None;
    }

    let mut items = if context.is_top_level {
        top_level_sections(manager, uri)
    } else if let Some(call) = context
        .intrinsic
        .filter(|c| c.is_argument_position && names_logical_ids(c.function))
    {
        logical_id_arguments(manager, uri, call.function, &context)
    } else if at_depends_on_value(&context) {
        declared_ids(manager, uri, TopLevelSection::Resources)
    } else if context.is_type_position {
        // No resource-type catalog is bundled; the client's own snippets
        // cover this better than a stale list would.
        Vec::new()
    } else if at_entity_key_slot(&context) {
        entity_body_keys(&context)
    } else if context.is_value() {
        let format = manager.syntax_tree(uri)?.format();
        intrinsic_suggestions(format)
    } else {
        Vec::new()
    };

    items.retain(|item| item.label.starts_with(&context.text));
    items.truncate(config.max_completion_items);
    Some(items)
}

/// Whether a function's argument names another entity's logical id.
/// `Fn::If` names a condition in its first argument.
fn names_logical_ids(function: IntrinsicFunction) -> bool {
    function.takes_logical_id() || function == IntrinsicFunction::If
}

/// Whether the position is a value under a resource's `DependsOn` key,
/// either the scalar form or an entry of the list form.
fn at_depends_on_value(context: &Context) -> bool {
    context.section == Some(TopLevelSection::Resources)
        && context.is_value()
        && context.property_path.get(2).and_then(|s| s.as_key()) == Some("DependsOn")
}

/// Whether the position is a key (or key slot) directly inside an entity
/// declaration body, e.g. the `Type:` level of a resource.
fn at_entity_key_slot(context: &Context) -> bool {
    if context.logical_id.is_none() {
        return false;
    }
    // property_path is [section, logical id, ...inner]; a key being typed
    // contributes its own trailing segment.
    let depth = context.property_path.len();
    match context.role {
        CursorRole::Key => depth == 3,
        CursorRole::EmptyValue => depth == 2,
        _ => false,
    }
}

fn top_level_sections(manager: &ContextManager, uri: &str) -> Vec<CompletionItem> {
    let declared: Vec<TopLevelSection> = manager
        .syntax_tree(uri)
        .map(|tree| {
            tree.find_top_level_sections()
                .iter()
                .map(|entry| entry.section)
                .collect()
        })
        .unwrap_or_default();

    TopLevelSection::all()
        .iter()
        .filter(|section| !declared.contains(section))
        .map(|section| CompletionItem {
            label: section.name().to_string(),
            kind: Some(CompletionItemKind::MODULE),
            ..Default::default()
        })
        .collect()
}

fn logical_id_arguments(
    manager: &ContextManager,
    uri: &str,
    function: IntrinsicFunction,
    context: &Context,
) -> Vec<CompletionItem> {
    // Inside `Fn::GetAtt` past the first dot the argument names an
    // attribute, and no attribute catalog is bundled.
    if function == IntrinsicFunction::GetAtt
        && context
            .attribute_access
            .as_ref()
            .is_some_and(|access| !access.attribute_path.is_empty())
    {
        return Vec::new();
    }

    let Some(tree) = manager.syntax_tree(uri) else {
        return Vec::new();
    };
    let sections = tree.find_top_level_sections();

    let mut items = Vec::new();
    for entry in sections.iter() {
        let eligible = match function {
            IntrinsicFunction::Ref => entry.section.is_referenceable(),
            IntrinsicFunction::GetAtt => entry.section == TopLevelSection::Resources,
            IntrinsicFunction::Condition | IntrinsicFunction::If => {
                entry.section == TopLevelSection::Conditions
            }
            _ => false,
        };
        if !eligible {
            continue;
        }
        let Some(value) = entry.value else { continue };
        for (id, _) in get_entity_map(value).iter() {
            items.push(CompletionItem {
                label: id.to_string(),
                kind: Some(CompletionItemKind::VARIABLE),
                detail: entry
                    .section
                    .entity_kind()
                    .map(|kind| kind.label().to_string()),
                ..Default::default()
            });
        }
    }

    if function == IntrinsicFunction::Ref {
        for pseudo in PSEUDO_PARAMETERS {
            items.push(CompletionItem {
                label: (*pseudo).to_string(),
                kind: Some(CompletionItemKind::CONSTANT),
                detail: Some("pseudo parameter".to_string()),
                ..Default::default()
            });
        }
    }
    items
}

/// The logical ids declared in one section, as completion items.
fn declared_ids(
    manager: &ContextManager,
    uri: &str,
    section: TopLevelSection,
) -> Vec<CompletionItem> {
    let Some(tree) = manager.syntax_tree(uri) else {
        return Vec::new();
    };
    let sections = tree.find_top_level_sections();
    let Some(value) = sections.get(section).and_then(|entry| entry.value) else {
        return Vec::new();
    };
    get_entity_map(value)
        .iter()
        .map(|(id, _)| CompletionItem {
            label: id.to_string(),
            kind: Some(CompletionItemKind::VARIABLE),
            detail: section.entity_kind().map(|kind| kind.label().to_string()),
            ..Default::default()
        })
        .collect()
}

fn entity_body_keys(context: &Context) -> Vec<CompletionItem> {
    let keys: &[&str] = match context.section {
        Some(TopLevelSection::Resources) => RESOURCE_KEYS,
        Some(TopLevelSection::Parameters) => PARAMETER_KEYS,
        Some(TopLevelSection::Outputs) => OUTPUT_KEYS,
        _ => return Vec::new(),
    };

    keys.iter()
        .filter(|key| {
            // Already-declared keys are not offered again
            context
                .entity
                .as_ref()
                .is_none_or(|entity| entity.get(key).is_none())
        })
        .map(|key| CompletionItem {
            label: (*key).to_string(),
            kind: Some(CompletionItemKind::FIELD),
            ..Default::default()
        })
        .collect()
}

fn intrinsic_suggestions(format: TemplateFormat) -> Vec<CompletionItem> {
    IntrinsicFunction::all()
        .iter()
        .map(|function| {
            let label = match format {
                TemplateFormat::Yaml => function.short_tag(),
                TemplateFormat::Json => function.full_name(),
            };
            CompletionItem {
                label: label.to_string(),
                kind: Some(CompletionItemKind::FUNCTION),
                detail: Some(function.doc().to_string()),
                ..Default::default()
            }
        })
        .collect()
}
