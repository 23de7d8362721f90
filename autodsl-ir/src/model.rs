//! Class model produced by extraction and consumed by generation.

use serde::Serialize;

use crate::{CollectionKind, TypeRef};

/// Default applied by `build()` when a parameter was never set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DefaultValue {
    /// `#[dsl(default)]`: the type's `Default` value.
    TypeDefault,
    /// `#[dsl(default = <expr>)]`: an expression, as written.
    Expr(String),
}


/// Element information for a collection-typed parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionRef {
    pub kind: CollectionKind,
    pub element: TypeRef,
}

/// An eligible class referenced by a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestedRef {
    /// Qualified name of the referenced class.
    pub qualified_name: String,
    /// Path to its builder as seen from the referring module.
    pub builder_path: String,
}

/// Semantic description of one constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub declared_type: TypeRef,
    pub default: Option<DefaultValue>,
    /// Set when the declared type is a recognised collection of T.
    pub collection_of: Option<CollectionRef>,
    /// Set when the declared type is `Option<T>`.
    pub optional_of: Option<TypeRef>,
    /// Set when the value type (T, or the element type) is itself eligible.
    pub nested: Option<NestedRef>,
    /// Name used for the single-element adder of a collection.
    pub singular: Option<String>,
}

impl ParameterDescriptor {
    /// A plain parameter: no default, no collection, not nested.
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            default: None,
            collection_of: None,
            optional_of: None,
            nested: None,
            singular: None,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_collection(&self) -> bool {
        self.collection_of.is_some()
    }

    pub fn is_nested_generatable(&self) -> bool {
        self.nested.is_some()
    }

    /// The type a nested builder produces for this parameter: the element
    /// type for collections, `T` for `Option<T>`, the declared type otherwise.
    pub fn value_type(&self) -> &TypeRef {
        if let Some(collection) = &self.collection_of {
            &collection.element
        } else if let Some(inner) = &self.optional_of {
            inner
        } else {
            &self.declared_type
        }
    }
}

/// Everything the generator needs to know about one eligible class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassModel {
    /// `crate::shapes::Point`
    pub qualified_name: String,
    /// `crate::shapes`
    pub package_name: String,
    /// `Point`
    pub simple_name: String,
    /// `PointBuilder`
    pub builder_name: String,
    /// Name of the DSL entry function, `point`.
    pub dsl_name: String,
    /// Parameters in constructor (field declaration) order.
    pub parameters: Vec<ParameterDescriptor>,
}

impl ClassModel {
    /// `crate::shapes::PointBuilder`
    pub fn builder_qualified_name(&self) -> String {
        format!("{}::{}", self.package_name, self.builder_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type() {
        let mut param = ParameterDescriptor::new(
            "friends",
            TypeRef::generic("Vec", vec![TypeRef::named("Friend")]),
        );
        assert_eq!(param.value_type().text, "Vec<Friend>");

        param.collection_of = Some(CollectionRef {
            kind: CollectionKind::Vec,
            element: TypeRef::named("Friend"),
        });
        assert_eq!(param.value_type().text, "Friend");
        assert!(param.is_collection());
        assert!(!param.has_default());
    }

    #[test]
    fn test_builder_qualified_name() {
        let model = ClassModel {
            qualified_name: "crate::shapes::Point".into(),
            package_name: "crate::shapes".into(),
            simple_name: "Point".into(),
            builder_name: "PointBuilder".into(),
            dsl_name: "point".into(),
            parameters: Vec::new(),
        };
        assert_eq!(model.builder_qualified_name(), "crate::shapes::PointBuilder");
    }
}
