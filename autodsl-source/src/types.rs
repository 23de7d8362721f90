//! Conversion of `syn` types into [`TypeRef`].

use autodsl_ir::TypeRef;
use syn::{GenericArgument, PathArguments, Type};

use crate::text::SourceText;

/// Describe `ty` as written in `src`.
///
/// Plain paths (`Vec<crate::a::B>`) keep their segments and the type
/// arguments of the last segment; qualified paths, references, tuples and
/// the like stay opaque.
pub(crate) fn type_ref(ty: &Type, src: &SourceText<'_>) -> TypeRef {
    match ty {
        Type::Group(group) => type_ref(&group.elem, src),
        Type::Paren(paren) => type_ref(&paren.elem, src),
        Type::Path(path) if path.qself.is_none() => {
            let segments = path.path.segments.iter().map(|s| s.ident.to_string());
            let args = match path.path.segments.last().map(|s| &s.arguments) {
                Some(PathArguments::AngleBracketed(generic)) => generic
                    .args
                    .iter()
                    .filter_map(|arg| match arg {
                        GenericArgument::Type(ty) => Some(type_ref(ty, src)),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            TypeRef::path(src.slice(ty), segments, args)
        }
        _ => TypeRef::opaque(src.slice(ty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TypeRef {
        let ty: Type = syn::parse_str(text).unwrap();
        type_ref(&ty, &SourceText::new(text))
    }

    #[test]
    fn test_path_type() {
        let ty = parse("crate::geo::Address");
        assert_eq!(ty.segments, ["crate", "geo", "Address"]);
        assert!(ty.args.is_empty());
        assert_eq!(ty.text, "crate::geo::Address");
    }

    #[test]
    fn test_generic_arguments_are_nested() {
        let ty = parse("HashMap<String, Vec<u8>>");
        assert_eq!(ty.text, "HashMap<String, Vec<u8>>");
        assert_eq!(ty.args.len(), 2);
        assert!(ty.args[0].is_string());
        assert!(ty.args[1].is_named("Vec"));
        assert!(ty.args[1].single_arg().unwrap().is_named("u8"));
    }

    #[test]
    fn test_lifetimes_are_not_arguments() {
        let ty = parse("Cow<'static, str>");
        assert_eq!(ty.args.len(), 1);
        assert!(ty.args[0].is_named("str"));
    }

    #[test]
    fn test_non_path_types_are_opaque() {
        for text in ["&'static str", "(i32, i32)", "[u8; 4]", "<T as Trait>::Out"] {
            let ty = parse(text);
            assert!(ty.segments.is_empty(), "{text}");
            assert_eq!(ty.text, text);
        }
    }
}
