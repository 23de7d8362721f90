//! Rust AST builders for the items a builder unit contains.
//!
//! These provide a small API for constructing Rust syntax, rendered via
//! [`CodeBuilder`](crate::builder::CodeBuilder).

mod fns;
mod impls;
mod structs;

pub use fns::{Fn, Param};
pub use impls::Impl;
pub use structs::{Field, Struct};
