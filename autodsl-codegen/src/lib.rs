//! Builder generation for structs marked with `#[auto_dsl]`.
//!
//! This crate holds the host-independent part of autodsl: it consumes
//! [`ClassHandle`](autodsl_ir::ClassHandle)s and produces
//! [`GeneratedUnit`](autodsl_ir::GeneratedUnit)s plus diagnostics. Finding
//! the handles and writing the units are left to the caller.
//!
//! # Modules
//!
//! - [`pipeline`] - round processor, phases, diagnostics and errors
//! - [`generator`] - builder rendering from a class model
//! - [`builder`], [`ast`] - text emission primitives

pub mod ast;
pub mod builder;
pub mod generator;
pub mod pipeline;
mod rust_file;

pub use builder::{CodeBuilder, CodeFragment, Renderable};
pub use generator::{BuilderGenerator, generate};
pub use pipeline::{
    CollectingReporter, Diagnostic, EligibilityError, EligibilityIndex, ProcessingError,
    Processor, Reporter, RoundOutput, Severity,
};
pub use rust_file::RustFile;
