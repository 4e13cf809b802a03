// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Top-Level Sections
//!
//! The ten document-root keys a template may declare, and the entity kind
//! each entity-bearing section contains.
//!
//! Section names are matched exactly and case-sensitively against the keys
//! of the document root mapping; unrecognized root keys are ignored rather
//! than rejected.

use serde::{Deserialize, Serialize};

/// The closed set of recognized top-level template sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopLevelSection {
    /// `AWSTemplateFormatVersion`
    FormatVersion,
    /// `Transform`
    Transform,
    /// `Description`
    Description,
    /// `Metadata`
    Metadata,
    /// `Parameters`
    Parameters,
    /// `Mappings`
    Mappings,
    /// `Conditions`
    Conditions,
    /// `Rules`
    Rules,
    /// `Resources`
    Resources,
    /// `Outputs`
    Outputs,
}

impl TopLevelSection {
    /// All recognized sections, in canonical template order
    pub fn all() -> &'static [TopLevelSection] {
        &[
            TopLevelSection::FormatVersion,
            TopLevelSection::Transform,
            TopLevelSection::Description,
            TopLevelSection::Metadata,
            TopLevelSection::Parameters,
            TopLevelSection::Mappings,
            TopLevelSection::Conditions,
            TopLevelSection::Rules,
            TopLevelSection::Resources,
            TopLevelSection::Outputs,
        ]
    }

    /// The key text this section is declared under
    pub fn name(&self) -> &'static str {
        match self {
            TopLevelSection::FormatVersion => "AWSTemplateFormatVersion",
            TopLevelSection::Transform => "Transform",
            TopLevelSection::Description => "Description",
            TopLevelSection::Metadata => "Metadata",
            TopLevelSection::Parameters => "Parameters",
            TopLevelSection::Mappings => "Mappings",
            TopLevelSection::Conditions => "Conditions",
            TopLevelSection::Rules => "Rules",
            TopLevelSection::Resources => "Resources",
            TopLevelSection::Outputs => "Outputs",
        }
    }

    /// Resolve a root key to a section (exact, case-sensitive)
    pub fn from_name(name: &str) -> Option<TopLevelSection> {
        TopLevelSection::all()
            .iter()
            .copied()
            .find(|s| s.name() == name)
    }

    /// The kind of entity declared directly under this section, if the
    /// section holds logical-id-keyed entities at all.
    ///
    /// `Description`, `AWSTemplateFormatVersion`, `Transform` and `Metadata`
    /// hold plain values, not entity declarations.
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            TopLevelSection::Parameters => Some(EntityKind::Parameter),
            TopLevelSection::Mappings => Some(EntityKind::Mapping),
            TopLevelSection::Conditions => Some(EntityKind::Condition),
            TopLevelSection::Rules => Some(EntityKind::Rule),
            TopLevelSection::Resources => Some(EntityKind::Resource),
            TopLevelSection::Outputs => Some(EntityKind::Output),
            _ => None,
        }
    }

    /// Whether `Ref` arguments may name entities declared in this section
    pub fn is_referenceable(&self) -> bool {
        matches!(
            self,
            TopLevelSection::Parameters | TopLevelSection::Resources
        )
    }
}

impl std::fmt::Display for TopLevelSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The kind of declared entity, derived from the section containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Parameter,
    Mapping,
    Condition,
    Rule,
    Resource,
    Output,
}

impl EntityKind {
    /// Human-readable kind name, used by hover and log output
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Parameter => "parameter",
            EntityKind::Mapping => "mapping",
            EntityKind::Condition => "condition",
            EntityKind::Rule => "rule",
            EntityKind::Resource => "resource",
            EntityKind::Output => "output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_recognizes_all_ten() {
        for section in TopLevelSection::all() {
            assert_eq!(TopLevelSection::from_name(section.name()), Some(*section));
        }
        assert_eq!(TopLevelSection::all().len(), 10);
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(TopLevelSection::from_name("resources"), None);
        assert_eq!(TopLevelSection::from_name("RESOURCES"), None);
        assert_eq!(
            TopLevelSection::from_name("Resources"),
            Some(TopLevelSection::Resources)
        );
    }

    #[test]
    fn test_from_name_rejects_unknown_keys() {
        assert_eq!(TopLevelSection::from_name("Globals"), None);
        assert_eq!(TopLevelSection::from_name(""), None);
    }

    #[test]
    fn test_entity_kind_per_section() {
        assert_eq!(
            TopLevelSection::Resources.entity_kind(),
            Some(EntityKind::Resource)
        );
        assert_eq!(
            TopLevelSection::Parameters.entity_kind(),
            Some(EntityKind::Parameter)
        );
        assert_eq!(TopLevelSection::Description.entity_kind(), None);
        assert_eq!(TopLevelSection::FormatVersion.entity_kind(), None);
    }

    #[test]
    fn test_referenceable_sections() {
        assert!(TopLevelSection::Resources.is_referenceable());
        assert!(TopLevelSection::Parameters.is_referenceable());
        assert!(!TopLevelSection::Outputs.is_referenceable());
        assert!(!TopLevelSection::Conditions.is_referenceable());
    }
}
