//! Structured failures of the validate, extract and generate phases.

use thiserror::Error;

/// A marked item that cannot get a builder at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    #[error("Only classes can be annotated with AutoDsl.")]
    NotAClass { element: String },

    #[error("The class {qualified_name} is not public or is abstract.")]
    NotPublicOrAbstract { qualified_name: String },
}

impl EligibilityError {
    /// Qualified name of the offending element.
    pub fn element(&self) -> &str {
        match self {
            Self::NotAClass { element } => element,
            Self::NotPublicOrAbstract { qualified_name } => qualified_name,
        }
    }
}

/// An eligible class whose builder cannot be extracted or generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error("{class} is a {shape} struct; builders need named fields")]
    UnnamedFields { class: String, shape: &'static str },

    #[error("{class} declares generic parameters, which builders do not support")]
    Generic { class: String },

    #[error("unknown option `{key}` on {element}")]
    UnknownOption { element: String, key: String },

    #[error("malformed option on {element}: {message}")]
    MalformedOption { element: String, message: String },

    #[error("{element} is a collection `{ty}` without an element type")]
    MissingElementType { element: String, ty: String },

    #[error("invalid name `{name}` on {element}: {reason}")]
    InvalidName {
        element: String,
        name: String,
        reason: &'static str,
    },

    #[error("type `{ty}` of {element} matches several annotated classes: {}", candidates.join(", "))]
    AmbiguousNestedType {
        element: String,
        ty: String,
        candidates: Vec<String>,
    },

    #[error("{class} contains itself by value: {}", path.join(" -> "))]
    Cycle { class: String, path: Vec<String> },

    #[error("{builder} would declare `{member}` more than once")]
    DuplicateMember {
        class: String,
        builder: String,
        member: String,
    },
}

impl ProcessingError {
    /// Qualified name of the element the error should be anchored to:
    /// a class (`crate::a::Point`) or one of its fields (`crate::a::Point.x`).
    pub fn element(&self) -> &str {
        match self {
            Self::UnnamedFields { class, .. }
            | Self::Generic { class }
            | Self::Cycle { class, .. }
            | Self::DuplicateMember { class, .. } => class,
            Self::UnknownOption { element, .. }
            | Self::MalformedOption { element, .. }
            | Self::MissingElementType { element, .. }
            | Self::InvalidName { element, .. }
            | Self::AmbiguousNestedType { element, .. } => element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility_messages() {
        let err = EligibilityError::NotAClass {
            element: "crate::Shape".into(),
        };
        assert_eq!(err.to_string(), "Only classes can be annotated with AutoDsl.");
        assert_eq!(err.element(), "crate::Shape");

        let err = EligibilityError::NotPublicOrAbstract {
            qualified_name: "crate::Point".into(),
        };
        assert_eq!(
            err.to_string(),
            "The class crate::Point is not public or is abstract."
        );
    }

    #[test]
    fn test_processing_messages() {
        let err = ProcessingError::Cycle {
            class: "crate::A".into(),
            path: vec!["crate::A".into(), "crate::B".into(), "crate::A".into()],
        };
        assert_eq!(
            err.to_string(),
            "crate::A contains itself by value: crate::A -> crate::B -> crate::A"
        );

        let err = ProcessingError::AmbiguousNestedType {
            element: "crate::Order.address".into(),
            ty: "Address".into(),
            candidates: vec!["crate::a::Address".into(), "crate::b::Address".into()],
        };
        assert_eq!(err.element(), "crate::Order.address");
        assert!(err.to_string().ends_with("crate::a::Address, crate::b::Address"));
    }
}
