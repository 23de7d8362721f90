//! Core utilities shared across the autodsl crates.
//!
//! This crate provides file emission and identifier helpers used by both
//! the generator and the harness.

mod file;
mod naming;

pub use file::{OutputFile, WriteResult};
pub use naming::{
    is_rust_keyword, raw_ident, singularize, to_pascal_case, to_snake_case, validate_identifier,
};

/// Header written at the top of every generated source unit.
pub const GENERATED_HEADER: &str = "// @generated by autodsl. Do not edit.";
