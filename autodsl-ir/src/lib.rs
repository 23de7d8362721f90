//! Intermediate representation types for the autodsl generator.
//!
//! This crate provides the value types that flow through the generation
//! pipeline. They are the only contract between the host side (source
//! discovery) and the core (validation, extraction, generation).
//!
//! # Architecture
//!
//! ```text
//! Rust source → autodsl-source (ClassHandle) → autodsl-codegen (ClassModel) → GeneratedUnit
//! ```
//!
//! The types are designed to be:
//! - Host-agnostic (no `syn` or compiler types leak into the core)
//! - Immutable once built (a `ClassModel` lives for a single pass)
//! - Cheap to build by hand in tests

mod handle;
mod model;
mod types;
mod unit;

pub use handle::{
    Anchor, AttributeArg, Binding, ClassHandle, ConstructorParam, ElementKind, FieldShape, Modifiers, Span,
};
pub use model::{ClassModel, CollectionRef, DefaultValue, NestedRef, ParameterDescriptor};
pub use types::{CollectionKind, TypeRef};
pub use unit::GeneratedUnit;
