//! Line-oriented text emission.
//!
//! AST nodes describe themselves as [`CodeFragment`]s; [`CodeBuilder`]
//! lays the fragments out with rustfmt's four-space indentation.

const INDENT: &str = "    ";

/// A piece of generated code, independent of its final indentation.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeFragment {
    /// One line of code.
    Line(String),
    /// An empty line.
    Blank,
    /// A `///` doc comment line.
    Doc(String),
    /// `header` followed by the indented body and a closing `}`.
    Block {
        header: String,
        body: Vec<CodeFragment>,
    },
}

impl CodeFragment {
    pub fn line(text: impl Into<String>) -> Self {
        Self::Line(text.into())
    }

    pub fn doc(text: impl Into<String>) -> Self {
        Self::Doc(text.into())
    }

    pub fn braced(header: impl Into<String>, body: Vec<CodeFragment>) -> Self {
        Self::Block {
            header: header.into(),
            body,
        }
    }
}

/// Types that can be rendered to code fragments.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        (*self).to_fragments()
    }
}

/// Text buffer that writes fragments at the current depth.
///
/// # Example
///
/// ```
/// use autodsl_codegen::{CodeBuilder, CodeFragment};
///
/// let mut out = CodeBuilder::new();
/// out.fragment(&CodeFragment::braced(
///     "fn main() {",
///     vec![CodeFragment::line("run();")],
/// ));
/// assert_eq!(out.finish(), "fn main() {\n    run();\n}\n");
/// ```
#[derive(Debug, Default)]
pub struct CodeBuilder {
    depth: usize,
    out: String,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line. Empty lines carry no indentation.
    pub fn line(&mut self, text: &str) -> &mut Self {
        if !text.is_empty() {
            self.out.push_str(&INDENT.repeat(self.depth));
            self.out.push_str(text);
        }
        self.out.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// Write every fragment of `node`.
    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        for fragment in node.to_fragments() {
            self.fragment(&fragment);
        }
        self
    }

    pub fn fragment(&mut self, fragment: &CodeFragment) -> &mut Self {
        match fragment {
            CodeFragment::Line(text) => self.line(text),
            CodeFragment::Blank => self.blank(),
            CodeFragment::Doc(text) => self.line(&format!("/// {}", text)),
            CodeFragment::Block { header, body } => {
                self.line(header);
                self.depth += 1;
                for inner in body {
                    self.fragment(inner);
                }
                self.depth -= 1;
                self.line("}")
            }
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks() {
        let mut out = CodeBuilder::new();
        out.fragment(&CodeFragment::braced(
            "impl PointBuilder {",
            vec![
                CodeFragment::doc("Create an empty builder."),
                CodeFragment::braced(
                    "pub fn new() -> Self {",
                    vec![CodeFragment::line("::std::default::Default::default()")],
                ),
            ],
        ));
        assert_eq!(
            out.finish(),
            "impl PointBuilder {\n    /// Create an empty builder.\n    pub fn new() -> Self {\n        ::std::default::Default::default()\n    }\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_inside_blocks_are_empty() {
        let mut out = CodeBuilder::new();
        out.fragment(&CodeFragment::braced(
            "mod a {",
            vec![
                CodeFragment::line("fn x() {}"),
                CodeFragment::Blank,
                CodeFragment::line(""),
                CodeFragment::line("fn y() {}"),
            ],
        ));
        assert_eq!(out.finish(), "mod a {\n    fn x() {}\n\n\n    fn y() {}\n}\n");
    }
}
