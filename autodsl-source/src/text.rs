//! Verbatim source text of syntax nodes.

use quote::ToTokens;
use syn::spanned::Spanned;

/// The text a syntax tree was parsed from.
///
/// Nodes are rendered by slicing the original text at their span, so a
/// field typed `Vec<String>` keeps that spelling instead of the token
/// printer's `Vec < String >`.
#[derive(Clone, Copy)]
pub(crate) struct SourceText<'a> {
    text: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Source text of `node`, or its token rendering when the span does not
    /// map back onto this text.
    pub fn slice<T: ToTokens + Spanned>(&self, node: &T) -> String {
        let printed = node.to_token_stream().to_string();
        let range = node.span().byte_range();
        match self.text.get(range) {
            Some(slice) if without_whitespace(slice) == without_whitespace(&printed) => {
                slice.to_string()
            }
            _ => printed,
        }
    }

    /// Byte span of `node` in this text.
    pub fn span_of<T: Spanned>(&self, node: &T) -> Option<autodsl_ir::Span> {
        let range = node.span().byte_range();
        (range.end <= self.text.len() && range.start < range.end)
            .then(|| autodsl_ir::Span::new(range.start, range.end - range.start))
    }
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
