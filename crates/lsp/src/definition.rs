// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Go-to-Definition Provider
//!
//! Jumps from a logical-id reference (`Ref`, `Fn::GetAtt`, `Condition`
//! arguments) to the declaration that id names.

use tower_lsp::lsp_types::{Location, Url};

use cfn_lsp_engine::{Context, ContextManager, CursorRole};
use cfn_lsp_model::{IntrinsicFunction, Point, TopLevelSection};

use crate::convert::range_from_span;

/// Resolve the declaration a reference at this position points to.
pub fn definition_location(
    manager: &ContextManager,
    uri: &Url,
    position: Point,
) -> Option<Location> {
    let context = manager.get_context(uri.as_str(), position)?;
    let id = referenced_id(&context)?;

    let location = manager.resolve_logical_id(uri.as_str(), &id).ok()??;
    Some(Location {
        uri: uri.clone(),
        range: range_from_span(location.key_span),
    })
}

/// The logical id a position references, if it references one at all:
/// a `Ref`/`Fn::GetAtt`/`Condition`/`Fn::If` argument, or a value under
/// a resource's `DependsOn` key.
fn referenced_id(context: &Context) -> Option<String> {
    if let Some(call) = context.intrinsic {
        if !call.is_argument_position {
            return None;
        }
        if !call.function.takes_logical_id() && call.function != IntrinsicFunction::If {
            return None;
        }
        let id = context
            .attribute_access
            .as_ref()
            .map(|access| access.logical_id.clone())
            .unwrap_or_else(|| context.text.clone());
        return (!id.is_empty()).then_some(id);
    }

    let depends_on = context.section == Some(TopLevelSection::Resources)
        && context.role == CursorRole::Value
        && context.property_path.get(2).and_then(|s| s.as_key()) == Some("DependsOn");
    (depends_on && !context.text.is_empty()).then(|| context.text.clone())
}
