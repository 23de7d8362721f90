//! Generated source unit.

use std::path::PathBuf;

use serde::Serialize;

/// Output of the generator for one class, handed to the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    /// `crate::shapes::PointBuilder`
    pub builder_qualified_name: String,
    /// Path relative to the generated-sources directory, `shapes/point_builder.rs`.
    pub relative_path: PathBuf,
    pub source_text: String,
}
