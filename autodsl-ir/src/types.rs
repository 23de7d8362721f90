//! Type references.

use std::fmt;

use serde::Serialize;

/// A reference to a declared type, as written in source.
///
/// Only path types carry structure (`segments` and `args`); everything else
/// (references, tuples, arrays, trait objects) is kept as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeRef {
    /// The type exactly as written in source.
    pub text: String,
    /// Path segments, e.g. `["std", "vec", "Vec"]`. Empty for non-path types.
    pub segments: Vec<String>,
    /// Generic type arguments of the last path segment.
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// Create an opaque (non-path) type reference.
    pub fn opaque(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            segments: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Create a path type reference.
    pub fn path(
        text: impl Into<String>,
        segments: impl IntoIterator<Item = impl Into<String>>,
        args: Vec<TypeRef>,
    ) -> Self {
        Self {
            text: text.into(),
            segments: segments.into_iter().map(Into::into).collect(),
            args,
        }
    }

    /// Create a single-segment path without generic arguments (`i32`, `Point`).
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::path(name.clone(), [name], Vec::new())
    }

    /// Create a single-segment generic path, e.g. `Vec<String>`.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        let name = name.into();
        let rendered = args
            .iter()
            .map(|a| a.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self::path(format!("{}<{}>", name, rendered), [name], args)
    }

    /// The last path segment, if this is a path type.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns true if the last path segment equals `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    /// The only generic argument, if there is exactly one.
    pub fn single_arg(&self) -> Option<&TypeRef> {
        match self.args.as_slice() {
            [arg] => Some(arg),
            _ => None,
        }
    }

    /// Returns true for `String` (any path ending in `String` without arguments).
    pub fn is_string(&self) -> bool {
        self.is_named("String") && self.args.is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Sequence-of-T shapes the extractor recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CollectionKind {
    Vec,
    VecDeque,
    HashSet,
    BTreeSet,
}

impl CollectionKind {
    /// Recognise a collection by its type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Vec" => Some(Self::Vec),
            "VecDeque" => Some(Self::VecDeque),
            "HashSet" => Some(Self::HashSet),
            "BTreeSet" => Some(Self::BTreeSet),
            _ => None,
        }
    }

    /// The method that appends one element.
    pub fn insert_method(&self) -> &'static str {
        match self {
            Self::Vec => "push",
            Self::VecDeque => "push_back",
            Self::HashSet | Self::BTreeSet => "insert",
        }
    }
}
