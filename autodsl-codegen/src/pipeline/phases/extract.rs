//! Extract phase - builds the class model from a validated handle.

use autodsl_core::{raw_ident, singularize, to_snake_case, validate_identifier};
use autodsl_ir::{
    AttributeArg, ClassHandle, ClassModel, CollectionKind, CollectionRef, ConstructorParam,
    DefaultValue, FieldShape, ParameterDescriptor,
};
use eyre::Result;
use tracing::trace;

use crate::pipeline::{
    CandidateContext, CandidateState, EligibilityIndex, Phase, ProcessingError, Scope,
    builder_name,
};

/// Phase that turns the candidate's fields into a [`ClassModel`].
pub struct ExtractPhase;

impl Phase for ExtractPhase {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn description(&self) -> &'static str {
        "Describe each constructor parameter and resolve nested classes"
    }

    fn running_state(&self) -> CandidateState {
        CandidateState::Extracting
    }

    fn failed_state(&self) -> CandidateState {
        CandidateState::ExtractionFailed
    }

    fn run(&self, ctx: &mut CandidateContext<'_>) -> Result<()> {
        ctx.model = Some(extract(ctx.handle, ctx.index)?);
        Ok(())
    }
}

/// Build the class model for an eligible handle.
///
/// Parameters keep the field declaration order.
pub fn extract(
    handle: &ClassHandle,
    index: &EligibilityIndex,
) -> std::result::Result<ClassModel, ProcessingError> {
    match handle.shape {
        FieldShape::Named => {}
        FieldShape::Tuple => return Err(unnamed_fields(handle, "tuple")),
        FieldShape::Unit => return Err(unnamed_fields(handle, "unit")),
    }
    if handle.has_generics {
        return Err(ProcessingError::Generic {
            class: handle.qualified_name.clone(),
        });
    }

    let dsl_name = match marker_name(handle)? {
        Some(name) => name,
        None => raw_ident(&to_snake_case(&handle.simple_name)),
    };

    let scope = Scope::of(handle);
    let parameters = handle
        .parameters
        .iter()
        .map(|param| describe(param, &scope, index))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    index.check_acyclic(&handle.qualified_name)?;

    Ok(ClassModel {
        qualified_name: handle.qualified_name.clone(),
        package_name: handle.module_path.clone(),
        simple_name: handle.simple_name.clone(),
        builder_name: builder_name(&handle.simple_name),
        dsl_name,
        parameters,
    })
}

fn unnamed_fields(handle: &ClassHandle, shape: &'static str) -> ProcessingError {
    ProcessingError::UnnamedFields {
        class: handle.qualified_name.clone(),
        shape,
    }
}

/// The `name = "..."` argument of the marker, validated.
fn marker_name(handle: &ClassHandle) -> std::result::Result<Option<String>, ProcessingError> {
    let element = &handle.qualified_name;
    let mut name = None;
    for arg in &handle.marker_args {
        match arg {
            AttributeArg::Value { key, value } if key == "name" => {
                if name.is_some() {
                    return Err(duplicate_option(element, "name"));
                }
                name = Some(checked_name(element, value)?);
            }
            AttributeArg::Flag(key) if key == "name" => {
                return Err(missing_value(element, "name"));
            }
            AttributeArg::Flag(key) | AttributeArg::Value { key, .. } => {
                return Err(unknown_option(element, key));
            }
            AttributeArg::Malformed(message) => return Err(malformed(element, message)),
        }
    }
    Ok(name)
}

#[derive(Default)]
struct FieldOptions {
    default: Option<DefaultValue>,
    singular: Option<String>,
}

fn field_options(param: &ConstructorParam) -> std::result::Result<FieldOptions, ProcessingError> {
    let element = &param.anchor.element;
    let mut options = FieldOptions::default();
    for arg in &param.options {
        match arg {
            AttributeArg::Flag(key) if key == "default" => {
                if options.default.is_some() {
                    return Err(duplicate_option(element, "default"));
                }
                options.default = Some(DefaultValue::TypeDefault);
            }
            AttributeArg::Value { key, value } if key == "default" => {
                if options.default.is_some() {
                    return Err(duplicate_option(element, "default"));
                }
                if value.trim().is_empty() {
                    return Err(missing_value(element, "default"));
                }
                options.default = Some(DefaultValue::Expr(value.clone()));
            }
            AttributeArg::Value { key, value } if key == "singular" => {
                if options.singular.is_some() {
                    return Err(duplicate_option(element, "singular"));
                }
                options.singular = Some(checked_name(element, value)?);
            }
            AttributeArg::Flag(key) if key == "singular" => {
                return Err(missing_value(element, "singular"));
            }
            AttributeArg::Flag(key) | AttributeArg::Value { key, .. } => {
                return Err(unknown_option(element, key));
            }
            AttributeArg::Malformed(message) => return Err(malformed(element, message)),
        }
    }
    Ok(options)
}

fn describe(
    param: &ConstructorParam,
    scope: &Scope<'_>,
    index: &EligibilityIndex,
) -> std::result::Result<ParameterDescriptor, ProcessingError> {
    let element = &param.anchor.element;
    let options = field_options(param)?;
    let declared = &param.declared_type;

    let mut descriptor = ParameterDescriptor::new(&param.name, declared.clone());
    descriptor.default = options.default;

    if declared.is_named("Option")
        && let Some(inner) = declared.single_arg()
    {
        descriptor.optional_of = Some(inner.clone());
    } else if let Some(kind) = declared.name().and_then(CollectionKind::from_name) {
        let element_type =
            declared
                .args
                .first()
                .ok_or_else(|| ProcessingError::MissingElementType {
                    element: element.clone(),
                    ty: declared.text.clone(),
                })?;
        descriptor.collection_of = Some(CollectionRef {
            kind,
            element: element_type.clone(),
        });
        descriptor.singular = Some(
            options
                .singular
                .clone()
                .unwrap_or_else(|| singularize(&param.name)),
        );
    }

    if options.singular.is_some() && !descriptor.is_collection() {
        return Err(malformed(
            element,
            "`singular` only applies to collection fields",
        ));
    }

    descriptor.nested = index.resolve(descriptor.value_type(), scope, element)?;

    trace!(
        parameter = %element,
        ty = %declared,
        collection = descriptor.is_collection(),
        optional = descriptor.optional_of.is_some(),
        nested = descriptor.is_nested_generatable(),
        "described parameter"
    );
    Ok(descriptor)
}

/// Strip the quotes of a string literal value and check it is a usable identifier.
fn checked_name(element: &str, value: &str) -> std::result::Result<String, ProcessingError> {
    let name = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    match validate_identifier(name) {
        None => Ok(name.to_string()),
        Some(reason) => Err(ProcessingError::InvalidName {
            element: element.to_string(),
            name: name.to_string(),
            reason,
        }),
    }
}

fn unknown_option(element: &str, key: &str) -> ProcessingError {
    ProcessingError::UnknownOption {
        element: element.to_string(),
        key: key.to_string(),
    }
}

fn malformed(element: &str, message: &str) -> ProcessingError {
    ProcessingError::MalformedOption {
        element: element.to_string(),
        message: message.to_string(),
    }
}

fn duplicate_option(element: &str, key: &str) -> ProcessingError {
    malformed(element, &format!("`{}` given more than once", key))
}

fn missing_value(element: &str, key: &str) -> ProcessingError {
    malformed(element, &format!("`{}` needs a value", key))
}

#[cfg(test)]
mod tests {
    use autodsl_ir::{Binding, TypeRef};

    use super::*;

    fn vec_of(element: TypeRef) -> TypeRef {
        TypeRef::generic("Vec", vec![element])
    }

    fn option_of(inner: TypeRef) -> TypeRef {
        TypeRef::generic("Option", vec![inner])
    }

    fn extract_one(handle: ClassHandle) -> std::result::Result<ClassModel, ProcessingError> {
        let index = EligibilityIndex::from_candidates([&handle]);
        extract(&handle, &index)
    }

    #[test]
    fn test_parameters_keep_declaration_order() {
        let handle = ClassHandle::class("crate::shapes", "Point")
            .param(ConstructorParam::new("y", TypeRef::named("i32")))
            .param(ConstructorParam::new("x", TypeRef::named("i32")));
        let model = extract_one(handle).unwrap();

        assert_eq!(model.qualified_name, "crate::shapes::Point");
        assert_eq!(model.package_name, "crate::shapes");
        assert_eq!(model.builder_name, "PointBuilder");
        assert_eq!(model.dsl_name, "point");
        let names: Vec<_> = model.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["y", "x"]);
        assert!(model.parameters.iter().all(|p| !p.has_default()));
    }

    #[test]
    fn test_shapes_are_recognised() {
        let handle = ClassHandle::class("crate", "Person")
            .param(ConstructorParam::new("nickname", option_of(TypeRef::named("String"))))
            .param(ConstructorParam::new("aliases", vec_of(TypeRef::named("String"))))
            .param(
                ConstructorParam::new("children", vec_of(TypeRef::named("String")))
                    .option(AttributeArg::value("singular", "\"kid\"")),
            );
        let model = extract_one(handle).unwrap();

        let nickname = &model.parameters[0];
        assert_eq!(nickname.optional_of, Some(TypeRef::named("String")));
        assert!(!nickname.is_collection());

        let aliases = &model.parameters[1];
        let collection = aliases.collection_of.as_ref().unwrap();
        assert_eq!(collection.kind, CollectionKind::Vec);
        assert_eq!(collection.element, TypeRef::named("String"));
        assert_eq!(aliases.singular.as_deref(), Some("alias"));

        assert_eq!(model.parameters[2].singular.as_deref(), Some("kid"));
    }

    #[test]
    fn test_defaults() {
        let handle = ClassHandle::class("crate", "Config")
            .param(
                ConstructorParam::new("port", TypeRef::named("u16"))
                    .option(AttributeArg::value("default", "8080")),
            )
            .param(
                ConstructorParam::new("verbose", TypeRef::named("bool"))
                    .option(AttributeArg::flag("default")),
            );
        let model = extract_one(handle).unwrap();

        assert_eq!(
            model.parameters[0].default,
            Some(DefaultValue::Expr("8080".into()))
        );
        assert_eq!(model.parameters[1].default, Some(DefaultValue::TypeDefault));
    }

    #[test]
    fn test_nested_detection() {
        let address = ClassHandle::class("crate", "Address");
        let person = ClassHandle::class("crate", "Person")
            .param(ConstructorParam::new("home", TypeRef::named("Address")))
            .param(ConstructorParam::new("work", option_of(TypeRef::named("Address"))))
            .param(ConstructorParam::new("past", vec_of(TypeRef::named("Address"))))
            .param(ConstructorParam::new("name", TypeRef::named("String")));
        let index = EligibilityIndex::from_candidates([&address, &person]);
        let model = extract(&person, &index).unwrap();

        for param in &model.parameters[..3] {
            let nested = param.nested.as_ref().unwrap();
            assert_eq!(nested.qualified_name, "crate::Address");
            assert_eq!(nested.builder_path, "AddressBuilder");
        }
        assert!(model.parameters[2].is_collection());
        assert!(!model.parameters[3].is_nested_generatable());
    }

    #[test]
    fn test_imported_type_is_not_nested() {
        let address = ClassHandle::class("crate::geo", "Address");
        let order = ClassHandle::class("crate::orders", "Order")
            .bind(Binding::new("Address", ["postal", "Address"]))
            .param(ConstructorParam::new("ship_to", TypeRef::named("Address")));
        let index = EligibilityIndex::from_candidates([&address, &order]);
        let model = extract(&order, &index).unwrap();

        assert!(!model.parameters[0].is_nested_generatable());
    }

    #[test]
    fn test_marker_name() {
        let handle = ClassHandle::class("crate", "Point").marker_arg(AttributeArg::value("name", "\"pt\""));
        assert_eq!(extract_one(handle).unwrap().dsl_name, "pt");

        let handle = ClassHandle::class("crate", "Type");
        assert_eq!(extract_one(handle).unwrap().dsl_name, "r#type");
    }

    #[test]
    fn test_invalid_names() {
        let handle =
            ClassHandle::class("crate", "Point").marker_arg(AttributeArg::value("name", "\"make-point\""));
        assert!(matches!(
            extract_one(handle),
            Err(ProcessingError::InvalidName { ref name, .. }) if name == "make-point"
        ));

        let handle = ClassHandle::class("crate", "Bag").param(
            ConstructorParam::new("items", vec_of(TypeRef::named("u8")))
                .option(AttributeArg::value("singular", "\"fn\"")),
        );
        assert!(matches!(
            extract_one(handle),
            Err(ProcessingError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_unsupported_shapes() {
        let tuple = ClassHandle::class("crate", "Meters").with_shape(FieldShape::Tuple);
        assert_eq!(
            extract_one(tuple).unwrap_err().to_string(),
            "crate::Meters is a tuple struct; builders need named fields"
        );

        let generic = ClassHandle::class("crate", "Wrapper").with_generics();
        assert!(matches!(
            extract_one(generic),
            Err(ProcessingError::Generic { .. })
        ));
    }

    #[test]
    fn test_option_errors() {
        let unknown = ClassHandle::class("crate", "Point").param(
            ConstructorParam::new("x", TypeRef::named("i32")).option(AttributeArg::flag("sorted")),
        );
        assert_eq!(
            extract_one(unknown).unwrap_err().to_string(),
            "unknown option `sorted` on crate::Point.x"
        );

        let twice = ClassHandle::class("crate", "Point").param(
            ConstructorParam::new("x", TypeRef::named("i32"))
                .option(AttributeArg::flag("default"))
                .option(AttributeArg::value("default", "1")),
        );
        assert!(matches!(
            extract_one(twice),
            Err(ProcessingError::MalformedOption { .. })
        ));

        let misplaced = ClassHandle::class("crate", "Point").param(
            ConstructorParam::new("x", TypeRef::named("i32"))
                .option(AttributeArg::value("singular", "\"ex\"")),
        );
        assert!(matches!(
            extract_one(misplaced),
            Err(ProcessingError::MalformedOption { .. })
        ));

        let broken = ClassHandle::class("crate", "Point").param(
            ConstructorParam::new("x", TypeRef::named("i32"))
                .option(AttributeArg::Malformed("expected `,`".into())),
        );
        assert!(matches!(
            extract_one(broken),
            Err(ProcessingError::MalformedOption { ref message, .. }) if message == "expected `,`"
        ));
    }

    #[test]
    fn test_collection_without_element_type() {
        let handle = ClassHandle::class("crate", "Bag")
            .param(ConstructorParam::new("items", TypeRef::named("Vec")));
        assert!(matches!(
            extract_one(handle),
            Err(ProcessingError::MissingElementType { ref ty, .. }) if ty == "Vec"
        ));
    }

    #[test]
    fn test_value_cycle_is_rejected() {
        let a = ClassHandle::class("crate", "A")
            .param(ConstructorParam::new("b", TypeRef::named("B")));
        let b = ClassHandle::class("crate", "B")
            .param(ConstructorParam::new("a", TypeRef::named("A")));
        let index = EligibilityIndex::from_candidates([&a, &b]);
        assert!(matches!(
            extract(&a, &index),
            Err(ProcessingError::Cycle { .. })
        ));
    }
}
