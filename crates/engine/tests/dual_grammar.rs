// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Dual-grammar equivalence: the same semantic document authored in YAML
//! and JSON must classify identically modulo source ranges.

use cfn_lsp_engine::{get_entity_map, Context, ContextManager};
use cfn_lsp_model::{IntrinsicFunction, TopLevelSection};
use cfn_lsp_test_utils::TemplateFixtures;
use cfn_template_grammar::TemplateFormat;

const URI: &str = "file:///template";

/// Context at the byte where the last occurrence of `token` starts,
/// one character in.
fn context_at_token(text: &str, format: TemplateFormat, token: &str) -> Context {
    let mut manager = ContextManager::new();
    assert!(manager.add_document(URI, text, format));
    let tree = manager.syntax_tree(URI).expect("tree available");
    let offset = text.rfind(token).expect("token present") + 1;
    let point = tree.point_at(offset);
    manager
        .get_context(URI, point)
        .expect("context at token position")
}

/// Equality modulo source ranges.
fn assert_equivalent(yaml: &Context, json: &Context) {
    assert_eq!(yaml.text, json.text);
    assert_eq!(yaml.is_top_level, json.is_top_level);
    assert_eq!(yaml.section, json.section);
    assert_eq!(yaml.logical_id, json.logical_id);
    assert_eq!(yaml.entity_kind, json.entity_kind);
    assert_eq!(yaml.property_path, json.property_path);
    assert_eq!(yaml.role, json.role);
    assert_eq!(yaml.is_type_position, json.is_type_position);
    assert_eq!(
        yaml.intrinsic.map(|c| (c.function, c.is_argument_position)),
        json.intrinsic.map(|c| (c.function, c.is_argument_position)),
    );
    assert_eq!(yaml.pseudo_parameter, json.pseudo_parameter);
    assert_eq!(yaml.attribute_access, json.attribute_access);
    match (&yaml.entity, &json.entity) {
        (Some(a), Some(b)) => assert!(a.equivalent(b), "{a:?} != {b:?}"),
        (None, None) => {}
        (a, b) => panic!("entity mismatch: {a:?} vs {b:?}"),
    }
}

#[test]
fn test_type_value_classifies_identically() {
    let yaml = context_at_token(
        TemplateFixtures::bucket_yaml(),
        TemplateFormat::Yaml,
        "AWS::S3::Bucket",
    );
    let json = context_at_token(
        TemplateFixtures::bucket_json(),
        TemplateFormat::Json,
        "AWS::S3::Bucket",
    );
    assert!(yaml.is_type_position);
    assert_eq!(yaml.logical_id.as_deref(), Some("MyBucket"));
    assert_equivalent(&yaml, &json);
}

#[test]
fn test_short_and_long_form_ref_classify_identically() {
    let yaml = context_at_token(TemplateFixtures::ref_yaml(), TemplateFormat::Yaml, "Stage");
    let json = context_at_token(TemplateFixtures::ref_json(), TemplateFormat::Json, "Stage");

    let call = yaml.intrinsic.expect("intrinsic in yaml");
    assert_eq!(call.function, IntrinsicFunction::Ref);
    assert!(call.is_argument_position);
    assert_eq!(yaml.text, "Stage");
    assert_equivalent(&yaml, &json);
}

#[test]
fn test_get_att_argument_forms_classify_identically() {
    // Scalar dotted form in YAML, sequence form in JSON
    let yaml = context_at_token(TemplateFixtures::get_att_yaml(), TemplateFormat::Yaml, "Db.");
    let json = context_at_token(TemplateFixtures::get_att_json(), TemplateFormat::Json, "\"Db\"");

    let access = yaml.attribute_access.clone().expect("attribute access");
    assert_eq!(access.logical_id, "Db");
    assert_eq!(access.attribute_path, "Endpoint.Port");
    assert_eq!(yaml.attribute_access, json.attribute_access);
    assert_eq!(yaml.section, Some(TopLevelSection::Outputs));
    assert_eq!(yaml.section, json.section);
}

#[test]
fn test_full_templates_have_equal_sections() {
    let mut manager = ContextManager::new();
    manager.add_document(
        "file:///a.yaml",
        TemplateFixtures::full_template_yaml(),
        TemplateFormat::Yaml,
    );
    manager.add_document(
        "file:///a.json",
        TemplateFixtures::full_template_json(),
        TemplateFormat::Json,
    );
    let yaml_tree = manager.syntax_tree("file:///a.yaml").unwrap();
    let json_tree = manager.syntax_tree("file:///a.json").unwrap();

    let yaml_sections: Vec<TopLevelSection> = yaml_tree
        .find_top_level_sections()
        .iter()
        .map(|e| e.section)
        .collect();
    let json_sections: Vec<TopLevelSection> = json_tree
        .find_top_level_sections()
        .iter()
        .map(|e| e.section)
        .collect();
    assert_eq!(yaml_sections, json_sections);
    assert!(yaml_sections.contains(&TopLevelSection::Conditions));
}

#[test]
fn test_full_templates_materialize_equivalent_entities() {
    let mut manager = ContextManager::new();
    manager.add_document(
        "file:///a.yaml",
        TemplateFixtures::full_template_yaml(),
        TemplateFormat::Yaml,
    );
    manager.add_document(
        "file:///a.json",
        TemplateFixtures::full_template_json(),
        TemplateFormat::Json,
    );
    let yaml_tree = manager.syntax_tree("file:///a.yaml").unwrap();
    let json_tree = manager.syntax_tree("file:///a.json").unwrap();
    let yaml_sections = yaml_tree.find_top_level_sections();
    let json_sections = json_tree.find_top_level_sections();

    for entry in yaml_sections.iter() {
        if entry.section.entity_kind().is_none() {
            continue;
        }
        let json_entry = json_sections
            .get(entry.section)
            .unwrap_or_else(|| panic!("{} missing from json", entry.section));
        let yaml_entities = get_entity_map(entry.value.expect("section body"));
        let json_entities = get_entity_map(json_entry.value.expect("section body"));

        let yaml_ids: Vec<&str> = yaml_entities.logical_ids().collect();
        let json_ids: Vec<&str> = json_entities.logical_ids().collect();
        assert_eq!(yaml_ids, json_ids, "ids differ in {}", entry.section);

        for (id, yaml_entity) in yaml_entities.iter() {
            let json_entity = json_entities.get(id).unwrap();
            assert!(
                yaml_entity.entity.equivalent(&json_entity.entity),
                "{}/{id} materializes differently:\n{:?}\nvs\n{:?}",
                entry.section,
                yaml_entity.entity,
                json_entity.entity,
            );
        }
    }
}

#[test]
fn test_resolution_agrees_across_grammars() {
    let mut manager = ContextManager::new();
    manager.add_document(
        "file:///a.yaml",
        TemplateFixtures::full_template_yaml(),
        TemplateFormat::Yaml,
    );
    manager.add_document(
        "file:///a.json",
        TemplateFixtures::full_template_json(),
        TemplateFormat::Json,
    );

    for id in ["Stage", "RegionMap", "IsProd", "MyBucket", "BucketName"] {
        let yaml = manager.resolve_logical_id("file:///a.yaml", id).unwrap();
        let json = manager.resolve_logical_id("file:///a.json", id).unwrap();
        assert_eq!(
            yaml.map(|l| l.section),
            json.map(|l| l.section),
            "resolution differs for {id}",
        );
    }
}

#[test]
fn test_degraded_documents_still_answer() {
    let mut manager = ContextManager::new();
    manager.add_document(
        URI,
        TemplateFixtures::dangling_quote_json(),
        TemplateFormat::Json,
    );
    let text = TemplateFixtures::dangling_quote_json();
    let offset = text.rfind("AWS::S3").unwrap() + 1;
    let tree = manager.syntax_tree(URI).expect("degraded tree kept");
    let point = tree.point_at(offset);
    let context = manager.get_context(URI, point).expect("partial context");
    assert_eq!(context.section, Some(TopLevelSection::Resources));
}
