//! A generated Rust source file.

use crate::builder::{CodeBuilder, CodeFragment, Renderable};

/// Top-level items of a generated unit, rendered in insertion order with one
/// blank line between them.
///
/// ```ignore
/// let source = RustFile::new()
///     .item(builder_struct)
///     .item(builder_impl)
///     .render(GENERATED_HEADER);
/// ```
#[derive(Default)]
pub struct RustFile {
    items: Vec<Vec<CodeFragment>>,
}

impl RustFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, node: impl Renderable) -> Self {
        self.items.push(node.to_fragments());
        self
    }

    /// Render the items below a `header` line.
    pub fn render(&self, header: &str) -> String {
        let mut out = CodeBuilder::new();
        out.line(header);
        for item in &self.items {
            out.blank();
            for fragment in item {
                out.fragment(fragment);
            }
        }
        out.finish()
    }
}
