// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # cfn-lsp Domain Model
//!
//! This crate defines the template domain model shared by every other
//! cfn-lsp crate: source geometry, the closed set of top-level template
//! sections, the intrinsic-function and pseudo-parameter registries, and
//! the generic value shape that entity declarations materialize into.
//!
//! Nothing in this crate depends on a parser or on the LSP protocol; it is
//! the vocabulary the context engine and its consumers communicate with.

pub mod geometry;
pub mod intrinsic;
pub mod section;
pub mod value;

pub use geometry::{Point, Span};
pub use intrinsic::{
    is_pseudo_parameter, IntrinsicFunction, PSEUDO_PARAMETER_NAMESPACE, PSEUDO_PARAMETERS,
};
pub use section::{EntityKind, TopLevelSection};
pub use value::{MappingValue, PathSegment, ScalarValue, TemplateValue};
