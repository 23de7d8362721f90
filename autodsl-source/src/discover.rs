//! Discovery of `#[auto_dsl]` items.

use std::{
    fs,
    path::{Path, PathBuf},
};

use autodsl_ir::{
    Anchor, AttributeArg, Binding, ClassHandle, ConstructorParam, ElementKind, FieldShape,
    Modifiers,
};
use syn::{
    Attribute, Fields, Generics, Ident, Item, Meta, Token, UseTree, Visibility, ext::IdentExt,
};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::{Error, Result, module_path_for, text::SourceText, types::type_ref};

/// Name of the marker attribute, with or without a path prefix.
pub const MARKER: &str = "auto_dsl";
/// Name of the per-field options attribute.
pub const FIELD_ATTRIBUTE: &str = "dsl";

/// Find every marked item in `text`, a file defining `module_path`.
///
/// `file` is only used to label anchors and parse errors. Items are
/// returned in source order, inline `mod` blocks included.
pub fn parse_source(text: &str, file: &str, module_path: &str) -> Result<Vec<ClassHandle>> {
    let syntax = syn::parse_file(text).map_err(|err| Error::parse(text, file, &err))?;

    let mut walker = Walker {
        src: SourceText::new(text),
        file,
        found: Vec::new(),
    };
    walker.items(&syntax.items, module_path);

    debug!(
        file,
        module = module_path,
        found = walker.found.len(),
        "scanned source"
    );
    Ok(walker.found)
}

/// Read `path` and find its marked items. The module path comes from the
/// file's location under `source_root`.
pub fn discover_file(path: &Path, source_root: &Path) -> Result<Vec<ClassHandle>> {
    let module_path = module_path_for(path, source_root)?;
    let text = fs::read_to_string(path).map_err(|source| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    parse_source(&text, &path.display().to_string(), &module_path)
}

/// Every `.rs` file under `root`, sorted by path.
pub fn source_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            Box::new(Error::Io {
                path,
                source: err.into(),
            })
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "rs")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

struct Walker<'a> {
    src: SourceText<'a>,
    file: &'a str,
    found: Vec<ClassHandle>,
}

impl Walker<'_> {
    fn items(&mut self, items: &[Item], module_path: &str) {
        let scope = module_scope(items);
        for item in items {
            if let Item::Mod(module) = item
                && let Some((_, content)) = &module.content
            {
                let inner = format!("{}::{}", module_path, module.ident);
                self.items(content, &inner);
            }

            if let Some(handle) = self.handle(item, module_path, &scope) {
                trace!(
                    item = %handle.qualified_name,
                    kind = %handle.kind,
                    fields = handle.parameters.len(),
                    "found marked item"
                );
                self.found.push(handle);
            }
        }
    }

    fn handle(&self, item: &Item, module_path: &str, scope: &[Binding]) -> Option<ClassHandle> {
        let parts = ItemParts::of(item, &self.src)?;
        let marker = parts.attrs.iter().find(|attr| is_marker(attr))?;

        let mut handle = ClassHandle::class(module_path, &parts.name)
            .with_kind(parts.kind)
            .with_modifiers(Modifiers {
                public: parts.vis.is_some_and(|vis| matches!(vis, Visibility::Public(_))),
                is_abstract: parts.attrs.iter().any(|a| a.path().is_ident("non_exhaustive")),
            });
        let mut anchor = Anchor::new(&handle.qualified_name).in_file(self.file);
        if let Some(span) = parts.name_span {
            anchor = anchor.at(span);
        }
        handle.anchor = anchor;
        handle.has_generics = parts
            .generics
            .is_some_and(|generics| !generics.params.is_empty());
        handle.marker_args = marker_args(marker, &self.src);
        handle.scope = scope.to_vec();

        if let Item::Struct(item) = item {
            handle = handle.with_shape(match &item.fields {
                Fields::Named(_) => FieldShape::Named,
                Fields::Unnamed(_) => FieldShape::Tuple,
                Fields::Unit => FieldShape::Unit,
            });
            for field in &item.fields {
                let Some(ident) = &field.ident else { continue };
                let mut param =
                    ConstructorParam::new(ident.unraw().to_string(), type_ref(&field.ty, &self.src));
                param.options = field
                    .attrs
                    .iter()
                    .filter(|attr| attr.path().is_ident(FIELD_ATTRIBUTE))
                    .flat_map(|attr| attribute_args(attr, &self.src))
                    .collect();
                if let Some(span) = self.src.span_of(ident) {
                    param.anchor = param.anchor.at(span);
                }
                handle = handle.param(param);
            }
        }

        Some(handle)
    }
}

/// The pieces of an item discovery cares about.
struct ItemParts<'a> {
    attrs: &'a [Attribute],
    kind: ElementKind,
    name: String,
    name_span: Option<autodsl_ir::Span>,
    vis: Option<&'a Visibility>,
    generics: Option<&'a Generics>,
}

impl<'a> ItemParts<'a> {
    fn of(item: &'a Item, src: &SourceText<'_>) -> Option<Self> {
        use ElementKind::*;

        let parts = match item {
            Item::Struct(i) => Self::named(&i.attrs, Class, &i.ident, &i.vis, src)
                .with_generics(&i.generics),
            Item::Enum(i) => {
                Self::named(&i.attrs, Enum, &i.ident, &i.vis, src).with_generics(&i.generics)
            }
            Item::Union(i) => {
                Self::named(&i.attrs, Union, &i.ident, &i.vis, src).with_generics(&i.generics)
            }
            Item::Trait(i) => Self::named(&i.attrs, Interface, &i.ident, &i.vis, src)
                .with_generics(&i.generics),
            Item::Type(i) => Self::named(&i.attrs, TypeAlias, &i.ident, &i.vis, src)
                .with_generics(&i.generics),
            Item::Fn(i) => Self::named(&i.attrs, Function, &i.sig.ident, &i.vis, src)
                .with_generics(&i.sig.generics),
            Item::Const(i) => Self::named(&i.attrs, Other, &i.ident, &i.vis, src),
            Item::Static(i) => Self::named(&i.attrs, Other, &i.ident, &i.vis, src),
            Item::Mod(i) => Self::named(&i.attrs, Other, &i.ident, &i.vis, src),
            Item::TraitAlias(i) => Self::named(&i.attrs, Other, &i.ident, &i.vis, src),
            Item::Impl(i) => ItemParts {
                attrs: &i.attrs,
                kind: Other,
                name: src.slice(&*i.self_ty),
                name_span: src.span_of(&*i.self_ty),
                vis: None,
                generics: Some(&i.generics),
            },
            _ => return None,
        };
        Some(parts)
    }

    fn named(
        attrs: &'a [Attribute],
        kind: ElementKind,
        ident: &Ident,
        vis: &'a Visibility,
        src: &SourceText<'_>,
    ) -> Self {
        Self {
            attrs,
            kind,
            name: ident.unraw().to_string(),
            name_span: src.span_of(ident),
            vis: Some(vis),
            generics: None,
        }
    }

    fn with_generics(mut self, generics: &'a Generics) -> Self {
        self.generics = Some(generics);
        self
    }
}

/// Names a module body binds: its `use` leaves and the types it declares.
fn module_scope(items: &[Item]) -> Vec<Binding> {
    let mut scope = Vec::new();
    for item in items {
        let declared = match item {
            Item::Use(item) => {
                use_bindings(&item.tree, &mut Vec::new(), &mut scope);
                continue;
            }
            Item::Struct(i) => &i.ident,
            Item::Enum(i) => &i.ident,
            Item::Union(i) => &i.ident,
            Item::Type(i) => &i.ident,
            Item::Trait(i) => &i.ident,
            _ => continue,
        };
        scope.push(Binding::local(declared.to_string()));
    }
    scope
}

fn use_bindings(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Vec<Binding>) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            use_bindings(&path.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(name) if name.ident == "self" => {
            if let Some(last) = prefix.last() {
                out.push(Binding::new(last.clone(), prefix.iter().cloned()));
            }
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            let path = prefix.iter().cloned().chain([ident.clone()]);
            out.push(Binding::new(ident, path));
        }
        UseTree::Rename(rename) if rename.rename == "_" => {}
        UseTree::Rename(rename) => {
            let mut path = prefix.clone();
            if rename.ident != "self" {
                path.push(rename.ident.to_string());
            }
            out.push(Binding::new(rename.rename.to_string(), path));
        }
        UseTree::Group(group) => {
            for tree in &group.items {
                use_bindings(tree, prefix, out);
            }
        }
        UseTree::Glob(_) => {}
    }
}

fn is_marker(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == MARKER)
}

fn marker_args(attr: &Attribute, src: &SourceText<'_>) -> Vec<AttributeArg> {
    match &attr.meta {
        Meta::Path(_) => Vec::new(),
        Meta::List(_) => attribute_args(attr, src),
        Meta::NameValue(_) => vec![AttributeArg::Malformed(format!(
            "expected `#[{}]` or `#[{}(...)]`",
            MARKER, MARKER
        ))],
    }
}

/// Arguments of `#[name(key, key = value, ...)]`, values as written.
///
/// Anything that does not read as a flat `key` / `key = expr` list ends
/// with a [`AttributeArg::Malformed`] entry carrying the parser's message.
fn attribute_args(attr: &Attribute, src: &SourceText<'_>) -> Vec<AttributeArg> {
    let mut args = Vec::new();
    let result = attr.parse_nested_meta(|meta| {
        let key = match meta.path.get_ident() {
            Some(ident) => ident.unraw().to_string(),
            None => src.slice(&meta.path),
        };
        if meta.input.peek(Token![=]) {
            let value: syn::Expr = meta.value()?.parse()?;
            args.push(AttributeArg::value(key, src.slice(&value)));
        } else if meta.input.peek(syn::token::Paren) {
            return Err(meta.error(format!("`{}` does not take a list", key)));
        } else {
            args.push(AttributeArg::flag(key));
        }
        Ok(())
    });

    if let Err(err) = result {
        args.push(AttributeArg::Malformed(err.to_string()));
    }
    args
}
