//! Host-side view of an annotated item.
//!
//! A [`ClassHandle`] is what the discovery layer hands to the core. The core
//! only reads it; it never goes back to the host for more information.

use std::fmt;

use serde::Serialize;

use crate::TypeRef;

/// Kind of the item carrying the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementKind {
    /// A `struct`.
    Class,
    /// A `trait`.
    Interface,
    /// An `enum`.
    Enum,
    /// A `union`.
    Union,
    /// A `type` alias.
    TypeAlias,
    /// A free function.
    Function,
    /// Anything else (const, static, impl, mod, ...).
    Other,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Class => "struct",
            ElementKind::Interface => "trait",
            ElementKind::Enum => "enum",
            ElementKind::Union => "union",
            ElementKind::TypeAlias => "type alias",
            ElementKind::Function => "function",
            ElementKind::Other => "item",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared modifiers relevant to eligibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    /// Declared with plain `pub`.
    pub public: bool,
    /// Cannot be constructed from a struct literal (`#[non_exhaustive]`).
    pub is_abstract: bool,
}

/// Shape of a struct's fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FieldShape {
    #[default]
    Named,
    Tuple,
    Unit,
}

/// One argument of a `#[dsl(...)]` or `#[auto_dsl(...)]` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeArg {
    /// A bare key, e.g. `default`.
    Flag(String),
    /// `key = value`, value kept verbatim as source text (`"x"` stays quoted).
    Value { key: String, value: String },
    /// The attribute could not be read; carries the host's error message.
    Malformed(String),
}

impl AttributeArg {
    pub fn flag(key: impl Into<String>) -> Self {
        Self::Flag(key.into())
    }

    pub fn value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Value {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Byte range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }
}

/// Where an element lives, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Anchor {
    /// Qualified name of the element (`crate::shapes::Point`, `crate::shapes::Point.x`).
    pub element: String,
    /// Source file the element was discovered in.
    pub file: Option<String>,
    /// Byte span of the element's name in that file.
    pub span: Option<Span>,
}

impl Anchor {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            file: None,
            span: None,
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{} ({})", self.element, file),
            None => f.write_str(&self.element),
        }
    }
}

/// A constructor parameter, i.e. a named struct field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorParam {
    pub name: String,
    pub declared_type: TypeRef,
    /// Arguments of every `#[dsl(...)]` attribute on the field, in order.
    pub options: Vec<AttributeArg>,
    pub anchor: Anchor,
}

impl ConstructorParam {
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        let name = name.into();
        Self {
            anchor: Anchor::new(name.clone()),
            name,
            declared_type,
            options: Vec::new(),
        }
    }

    pub fn option(mut self, arg: AttributeArg) -> Self {
        self.options.push(arg);
        self
    }
}

/// A name the declaring module brings into scope, through a `use` item or
/// by declaring a type itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// The name as field types write it (the `as` rename, if any).
    pub name: String,
    /// What the name stands for, as written: `crate::geo::Address`,
    /// `self::Address` for a local declaration, `serde::Serialize`.
    pub path: Vec<String>,
}

impl Binding {
    pub fn new(
        name: impl Into<String>,
        path: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// `name` declared in the module itself.
    pub fn local(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), ["self".to_string(), name])
    }
}

/// A marked item as seen by the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassHandle {
    pub kind: ElementKind,
    /// `crate::shapes::Point`
    pub qualified_name: String,
    /// `Point`
    pub simple_name: String,
    /// `crate::shapes`
    pub module_path: String,
    pub modifiers: Modifiers,
    /// Declares generic or lifetime parameters.
    pub has_generics: bool,
    pub shape: FieldShape,
    /// Fields in declaration order.
    pub parameters: Vec<ConstructorParam>,
    /// Arguments of the marker attribute itself.
    pub marker_args: Vec<AttributeArg>,
    /// Names bound in the declaring module. Glob imports are not listed.
    pub scope: Vec<Binding>,
    pub anchor: Anchor,
}

impl ClassHandle {
    /// Create a handle for a public struct with named fields and no parameters.
    pub fn class(module_path: impl Into<String>, simple_name: impl Into<String>) -> Self {
        let module_path = module_path.into();
        let simple_name = simple_name.into();
        let qualified_name = format!("{}::{}", module_path, simple_name);
        Self {
            kind: ElementKind::Class,
            anchor: Anchor::new(qualified_name.clone()),
            qualified_name,
            simple_name,
            module_path,
            modifiers: Modifiers {
                public: true,
                is_abstract: false,
            },
            has_generics: false,
            shape: FieldShape::Named,
            parameters: Vec::new(),
            marker_args: Vec::new(),
            scope: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_shape(mut self, shape: FieldShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_generics(mut self) -> Self {
        self.has_generics = true;
        self
    }

    pub fn marker_arg(mut self, arg: AttributeArg) -> Self {
        self.marker_args.push(arg);
        self
    }

    pub fn bind(mut self, binding: Binding) -> Self {
        self.scope.push(binding);
        self
    }

    /// Append a field. Its anchor is qualified with this handle's name and file.
    pub fn param(mut self, mut param: ConstructorParam) -> Self {
        param.anchor.element = format!("{}.{}", self.qualified_name, param.name);
        if param.anchor.file.is_none() {
            param.anchor.file = self.anchor.file.clone();
        }
        self.parameters.push(param);
        self
    }
}
