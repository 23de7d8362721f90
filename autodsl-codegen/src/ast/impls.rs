//! Rust impl block builder.

use super::Fn;
use crate::builder::{CodeFragment, Renderable};

/// Builder for inherent impl blocks.
#[derive(Debug, Clone)]
pub struct Impl {
    type_name: String,
    methods: Vec<Fn>,
}

impl Impl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: Fn) -> Self {
        self.methods.push(method);
        self
    }

    pub fn methods(&self) -> &[Fn] {
        &self.methods
    }

    fn methods_to_fragments(&self) -> Vec<CodeFragment> {
        self.methods
            .iter()
            .enumerate()
            .flat_map(|(i, method)| {
                let mut fragments = Vec::new();
                if i > 0 {
                    fragments.push(CodeFragment::Blank);
                }
                fragments.extend(method.to_fragments());
                fragments
            })
            .collect()
    }
}

impl Renderable for Impl {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![CodeFragment::braced(
            format!("impl {} {{", self.type_name),
            self.methods_to_fragments(),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CodeBuilder;

    #[test]
    fn test_impl_separates_methods() {
        let block = Impl::new("PointBuilder")
            .method(Fn::new("a"))
            .method(Fn::new("b"));
        let mut out = CodeBuilder::new();
        out.emit(&block);
        assert_eq!(
            out.finish(),
            "impl PointBuilder {\n    pub fn a() {\n    }\n\n    pub fn b() {\n    }\n}\n"
        );
        assert_eq!(block.methods().len(), 2);
    }
}
