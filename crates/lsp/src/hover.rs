// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Hover Provider
//!
//! Short markdown summaries for the tokens the engine understands:
//! intrinsic function names, pseudo parameters, resource type names,
//! section keys, and logical-id references (resolved to their
//! declaration).

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

use cfn_lsp_engine::{Context, ContextManager};
use cfn_lsp_model::{Point, TopLevelSection};

/// Compute hover content for a position. `None` when there is nothing
/// worth saying about the token.
pub fn hover_content(manager: &ContextManager, uri: &str, position: Point) -> Option<Hover> {
    let context = manager.get_context(uri, position)?;
    let value = summarize(manager, uri, &context)?;
    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: None,
    })
}

fn summarize(manager: &ContextManager, uri: &str, context: &Context) -> Option<String> {
    if let Some(pseudo) = context.pseudo_parameter {
        return Some(format!(
            "**{pseudo}**\n\nPseudo parameter, resolved by the deployment engine at stack \
             creation time."
        ));
    }

    if let Some(call) = context.intrinsic {
        if !call.is_argument_position {
            let function = call.function;
            return Some(format!("**{function}**\n\n{}", function.doc()));
        }
        // An argument naming another entity hovers as that entity's
        // declaration
        if call.function.takes_logical_id() {
            let id = context
                .attribute_access
                .as_ref()
                .map(|access| access.logical_id.as_str())
                .unwrap_or(context.text.as_str());
            if let Ok(Some(location)) = manager.resolve_logical_id(uri, id) {
                let kind = location
                    .section
                    .entity_kind()
                    .map(|k| k.label())
                    .unwrap_or("entity");
                return Some(format!(
                    "**{id}**\n\n{kind} declared in `{}` at line {}",
                    location.section,
                    location.key_span.start.row + 1,
                ));
            }
            return None;
        }
    }

    if context.is_type_position && !context.text.is_empty() {
        return Some(format!("Resource type `{}`", context.text));
    }

    // The logical-id key of a declaration hovers as a summary of it
    if context.is_key() && context.property_path.len() == 2 {
        if let (Some(id), Some(kind)) = (&context.logical_id, context.entity_kind) {
            let mut value = format!("**{id}**\n\n{}", kind.label());
            if let Some(type_name) = context
                .entity
                .as_ref()
                .and_then(|entity| entity.get("Type"))
                .and_then(|t| t.as_str())
            {
                value.push_str(&format!(" of type `{type_name}`"));
            }
            return Some(value);
        }
    }

    if context.is_top_level {
        let section = TopLevelSection::from_name(&context.text)?;
        return Some(format!("**{section}**\n\n{}", describe_section(section)));
    }

    None
}

fn describe_section(section: TopLevelSection) -> &'static str {
    match section {
        TopLevelSection::FormatVersion => "The template format version the document conforms to.",
        TopLevelSection::Transform => "Macros applied to the template before processing.",
        TopLevelSection::Description => "A free-text description of the template.",
        TopLevelSection::Metadata => "Arbitrary metadata attached to the template.",
        TopLevelSection::Parameters => "Input values supplied when the stack is created.",
        TopLevelSection::Mappings => "Static lookup tables keyed by two levels of names.",
        TopLevelSection::Conditions => "Boolean expressions that gate resource creation.",
        TopLevelSection::Rules => "Validation rules applied to parameter values.",
        TopLevelSection::Resources => "The resources the stack declares. The only required section.",
        TopLevelSection::Outputs => "Values exported from the stack after creation.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfn_lsp_test_utils::extract_cursor;
    use cfn_template_grammar::TemplateFormat;

    const URI: &str = "file:///template.yaml";

    fn hover_at_marker(marked: &str, format: TemplateFormat) -> Option<String> {
        let (text, point) = extract_cursor(marked).expect("marker present");
        let mut manager = ContextManager::new();
        manager.add_document(URI, &text, format);
        hover_content(&manager, URI, point).map(|hover| match hover.contents {
            HoverContents::Markup(markup) => markup.value,
            other => panic!("unexpected hover contents: {other:?}"),
        })
    }

    #[test]
    fn test_hover_on_intrinsic_tag() {
        let value = hover_at_marker(
            "Resources:\n  B:\n    Properties:\n      Name: !R¦ef X\n",
            TemplateFormat::Yaml,
        )
        .unwrap();
        assert!(value.contains("**Ref**"));
        assert!(value.contains("parameter or resource"));
    }

    #[test]
    fn test_hover_on_long_form_function_key() {
        let marked = r#"{
  "Resources": {
    "B": {
      "Properties": {
        "Name": {"Fn::Get¦Att": ["Db", "Arn"]}
      }
    }
  }
}"#;
        let value = hover_at_marker(marked, TemplateFormat::Json).unwrap();
        assert!(value.contains("**Fn::GetAtt**"));
    }

    #[test]
    fn test_hover_on_ref_argument_resolves_declaration() {
        let marked = "\
Parameters:
  Stage:
    Type: String
Resources:
  B:
    Properties:
      Name: !Ref St¦age
";
        let value = hover_at_marker(marked, TemplateFormat::Yaml).unwrap();
        assert!(value.contains("**Stage**"));
        assert!(value.contains("parameter declared in `Parameters`"));
    }

    #[test]
    fn test_hover_on_unresolvable_argument_is_silent() {
        let marked = "Resources:\n  B:\n    Properties:\n      Name: !Ref Mis¦sing\n";
        assert!(hover_at_marker(marked, TemplateFormat::Yaml).is_none());
    }

    #[test]
    fn test_hover_on_pseudo_parameter() {
        let marked = "Resources:\n  B:\n    Properties:\n      Name: !Ref AWS::Reg¦ion\n";
        let value = hover_at_marker(marked, TemplateFormat::Yaml).unwrap();
        assert!(value.contains("**AWS::Region**"));
        assert!(value.contains("Pseudo parameter"));
    }

    #[test]
    fn test_hover_on_type_value() {
        let marked = "Resources:\n  B:\n    Type: AWS::S3::Buck¦et\n";
        let value = hover_at_marker(marked, TemplateFormat::Yaml).unwrap();
        assert_eq!(value, "Resource type `AWS::S3::Bucket`");
    }

    #[test]
    fn test_hover_on_logical_id_key_summarizes_entity() {
        let marked = "Resources:\n  MyBuc¦ket:\n    Type: AWS::S3::Bucket\n";
        let value = hover_at_marker(marked, TemplateFormat::Yaml).unwrap();
        assert!(value.contains("**MyBucket**"));
        assert!(value.contains("resource of type `AWS::S3::Bucket`"));
    }

    #[test]
    fn test_hover_on_section_key() {
        let marked = "Resourc¦es:\n  B:\n    Type: T\n";
        let value = hover_at_marker(marked, TemplateFormat::Yaml).unwrap();
        assert!(value.contains("**Resources**"));
        assert!(value.contains("only required section"));
    }

    #[test]
    fn test_hover_on_plain_value_is_silent() {
        let marked = "Description: just some te¦xt\n";
        assert!(hover_at_marker(marked, TemplateFormat::Yaml).is_none());
    }
}
