//! Source discovery for autodsl.
//!
//! Parses Rust files with `syn` and turns every item carrying the
//! `#[auto_dsl]` marker into an [`autodsl_ir::ClassHandle`]. Nothing here
//! decides whether an item is eligible; that is left to the codegen
//! pipeline.
//!
//! # Example
//!
//! ```ignore
//! let root = Path::new("src");
//! for file in source_files(root)? {
//!     let handles = discover_file(&file, root)?;
//! }
//! ```

mod discover;
mod error;
mod module_path;
mod text;
mod types;

pub use discover::{FIELD_ATTRIBUTE, MARKER, discover_file, parse_source, source_files};
pub use error::{Error, Result};
pub use module_path::module_path_for;
