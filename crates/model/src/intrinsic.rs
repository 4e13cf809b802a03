// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Intrinsic Functions and Pseudo Parameters
//!
//! The closed registries the position classifier matches against.
//!
//! Every intrinsic function has a full name (`Ref`, `Fn::GetAtt`, …) used as
//! the single key of a one-entry mapping, and most have a YAML short-form
//! tag (`!Ref`, `!GetAtt`, …). Both encodings denote the same invocation and
//! must classify identically; the registry owns the mapping between the two
//! spellings.
//!
//! Pseudo parameters are the reserved, always-available tokens under the
//! `AWS::` namespace that may appear wherever a reference argument is
//! expected.

use serde::{Deserialize, Serialize};

/// The closed set of intrinsic reference functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntrinsicFunction {
    Ref,
    GetAtt,
    Sub,
    Join,
    Select,
    Split,
    FindInMap,
    Base64,
    Cidr,
    GetAZs,
    ImportValue,
    If,
    And,
    Or,
    Not,
    Equals,
    Condition,
    Transform,
    Length,
    ToJsonString,
}

impl IntrinsicFunction {
    /// All intrinsic functions
    pub fn all() -> &'static [IntrinsicFunction] {
        &[
            IntrinsicFunction::Ref,
            IntrinsicFunction::GetAtt,
            IntrinsicFunction::Sub,
            IntrinsicFunction::Join,
            IntrinsicFunction::Select,
            IntrinsicFunction::Split,
            IntrinsicFunction::FindInMap,
            IntrinsicFunction::Base64,
            IntrinsicFunction::Cidr,
            IntrinsicFunction::GetAZs,
            IntrinsicFunction::ImportValue,
            IntrinsicFunction::If,
            IntrinsicFunction::And,
            IntrinsicFunction::Or,
            IntrinsicFunction::Not,
            IntrinsicFunction::Equals,
            IntrinsicFunction::Condition,
            IntrinsicFunction::Transform,
            IntrinsicFunction::Length,
            IntrinsicFunction::ToJsonString,
        ]
    }

    /// The full function name, as used for the single key of the
    /// mapping-shaped encoding (`{"Fn::GetAtt": …}`).
    pub fn full_name(&self) -> &'static str {
        match self {
            IntrinsicFunction::Ref => "Ref",
            IntrinsicFunction::GetAtt => "Fn::GetAtt",
            IntrinsicFunction::Sub => "Fn::Sub",
            IntrinsicFunction::Join => "Fn::Join",
            IntrinsicFunction::Select => "Fn::Select",
            IntrinsicFunction::Split => "Fn::Split",
            IntrinsicFunction::FindInMap => "Fn::FindInMap",
            IntrinsicFunction::Base64 => "Fn::Base64",
            IntrinsicFunction::Cidr => "Fn::Cidr",
            IntrinsicFunction::GetAZs => "Fn::GetAZs",
            IntrinsicFunction::ImportValue => "Fn::ImportValue",
            IntrinsicFunction::If => "Fn::If",
            IntrinsicFunction::And => "Fn::And",
            IntrinsicFunction::Or => "Fn::Or",
            IntrinsicFunction::Not => "Fn::Not",
            IntrinsicFunction::Equals => "Fn::Equals",
            IntrinsicFunction::Condition => "Condition",
            IntrinsicFunction::Transform => "Fn::Transform",
            IntrinsicFunction::Length => "Fn::Length",
            IntrinsicFunction::ToJsonString => "Fn::ToJsonString",
        }
    }

    /// The YAML short-form tag, if the function has one.
    ///
    /// Every short tag is the full name with `Fn::` dropped and `!`
    /// prepended; `Ref` and `Condition` have no `Fn::` prefix to drop.
    pub fn short_tag(&self) -> &'static str {
        match self {
            IntrinsicFunction::Ref => "!Ref",
            IntrinsicFunction::GetAtt => "!GetAtt",
            IntrinsicFunction::Sub => "!Sub",
            IntrinsicFunction::Join => "!Join",
            IntrinsicFunction::Select => "!Select",
            IntrinsicFunction::Split => "!Split",
            IntrinsicFunction::FindInMap => "!FindInMap",
            IntrinsicFunction::Base64 => "!Base64",
            IntrinsicFunction::Cidr => "!Cidr",
            IntrinsicFunction::GetAZs => "!GetAZs",
            IntrinsicFunction::ImportValue => "!ImportValue",
            IntrinsicFunction::If => "!If",
            IntrinsicFunction::And => "!And",
            IntrinsicFunction::Or => "!Or",
            IntrinsicFunction::Not => "!Not",
            IntrinsicFunction::Equals => "!Equals",
            IntrinsicFunction::Condition => "!Condition",
            IntrinsicFunction::Transform => "!Transform",
            IntrinsicFunction::Length => "!Length",
            IntrinsicFunction::ToJsonString => "!ToJsonString",
        }
    }

    /// Resolve a full function name (exact match)
    pub fn from_full_name(name: &str) -> Option<IntrinsicFunction> {
        IntrinsicFunction::all()
            .iter()
            .copied()
            .find(|f| f.full_name() == name)
    }

    /// Resolve a YAML short-form tag (exact match, leading `!` included)
    pub fn from_short_tag(tag: &str) -> Option<IntrinsicFunction> {
        IntrinsicFunction::all()
            .iter()
            .copied()
            .find(|f| f.short_tag() == tag)
    }

    /// Whether this function's argument names another entity's logical id
    pub fn takes_logical_id(&self) -> bool {
        matches!(
            self,
            IntrinsicFunction::Ref | IntrinsicFunction::GetAtt | IntrinsicFunction::Condition
        )
    }

    /// One-line description, used by hover
    pub fn doc(&self) -> &'static str {
        match self {
            IntrinsicFunction::Ref => {
                "Returns the value of the named parameter or resource."
            }
            IntrinsicFunction::GetAtt => {
                "Returns the value of an attribute from a resource in the template."
            }
            IntrinsicFunction::Sub => {
                "Substitutes variables in an input string with their values."
            }
            IntrinsicFunction::Join => "Appends a set of values into a single value.",
            IntrinsicFunction::Select => "Returns a single object from a list of objects.",
            IntrinsicFunction::Split => "Splits a string into a list of string values.",
            IntrinsicFunction::FindInMap => {
                "Returns a value from a mapping declared in the Mappings section."
            }
            IntrinsicFunction::Base64 => "Returns the Base64 representation of the input.",
            IntrinsicFunction::Cidr => "Returns an array of CIDR address blocks.",
            IntrinsicFunction::GetAZs => {
                "Returns the Availability Zones for the specified region."
            }
            IntrinsicFunction::ImportValue => {
                "Returns the value of an output exported by another stack."
            }
            IntrinsicFunction::If => "Returns one value if a condition is true, another if false.",
            IntrinsicFunction::And => "Returns true if all specified conditions are true.",
            IntrinsicFunction::Or => "Returns true if any specified condition is true.",
            IntrinsicFunction::Not => "Returns true for a condition that evaluates to false.",
            IntrinsicFunction::Equals => "Compares two values for equality.",
            IntrinsicFunction::Condition => "References a condition from the Conditions section.",
            IntrinsicFunction::Transform => "Invokes a macro to perform custom processing.",
            IntrinsicFunction::Length => "Returns the number of elements in an array.",
            IntrinsicFunction::ToJsonString => "Converts an object or array to its JSON string.",
        }
    }
}

impl std::fmt::Display for IntrinsicFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// The reserved namespace marker pseudo parameters live under.
pub const PSEUDO_PARAMETER_NAMESPACE: &str = "AWS::";

/// The closed list of built-in pseudo parameters.
pub const PSEUDO_PARAMETERS: &[&str] = &[
    "AWS::AccountId",
    "AWS::NotificationARNs",
    "AWS::NoValue",
    "AWS::Partition",
    "AWS::Region",
    "AWS::StackId",
    "AWS::StackName",
    "AWS::URLSuffix",
];

/// Check whether a token is a built-in pseudo parameter
pub fn is_pseudo_parameter(token: &str) -> bool {
    PSEUDO_PARAMETERS.contains(&token)
}
