//! The `#[auto_dsl]` marker attribute.
//!
//! The attribute itself generates nothing: builders come from the `autodsl`
//! generator, which reads the marker from source. Expanding it only removes
//! the `#[dsl(...)]` field options so the marked struct compiles.
//!
//! ```ignore
//! use autodsl_macros::auto_dsl;
//!
//! #[auto_dsl]
//! pub struct Person {
//!     name: String,
//!     #[dsl(default = 18)]
//!     age: u32,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::{Fields, Item, parse_macro_input};

const FIELD_ATTRIBUTE: &str = "dsl";

#[proc_macro_attribute]
pub fn auto_dsl(_args: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as Item);
    expand(item).into()
}

fn expand(mut item: Item) -> TokenStream2 {
    match &mut item {
        Item::Struct(item) => strip_fields(&mut item.fields),
        Item::Union(item) => item
            .fields
            .named
            .iter_mut()
            .for_each(|field| field.attrs.retain(|a| !a.path().is_ident(FIELD_ATTRIBUTE))),
        _ => {}
    }
    item.into_token_stream()
}

fn strip_fields(fields: &mut Fields) {
    for field in fields.iter_mut() {
        field.attrs.retain(|attr| !attr.path().is_ident(FIELD_ATTRIBUTE));
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn expand_str(item: TokenStream2) -> String {
        expand(syn::parse2(item).unwrap()).to_string()
    }

    #[test]
    fn test_field_options_are_removed() {
        let expanded = expand_str(quote! {
            pub struct Person {
                #[serde(rename = "n")]
                name: String,
                #[dsl(default = 18)]
                age: u32,
            }
        });
        let expected = quote! {
            pub struct Person {
                #[serde(rename = "n")]
                name: String,
                age: u32,
            }
        };
        assert_eq!(expanded, expected.to_string());
    }

    #[test]
    fn test_other_items_pass_through() {
        let item = quote! {
            pub enum Shape { Circle }
        };
        assert_eq!(expand_str(item.clone()), item.to_string());
    }
}
