//! Builder source generation from a [`ClassModel`].
//!
//! The generated unit only uses fully qualified `::std` paths and the type
//! text exactly as declared on the struct, so it compiles when `include!`d
//! into the struct's own module whatever that module imports.

use std::{collections::HashSet, path::PathBuf};

use autodsl_core::{GENERATED_HEADER, raw_ident, to_snake_case};
use autodsl_ir::{
    ClassModel, CollectionRef, DefaultValue, GeneratedUnit, NestedRef, ParameterDescriptor,
    TypeRef,
};

use crate::{
    ast::{Field, Fn, Impl, Param, Struct},
    pipeline::ProcessingError,
    rust_file::RustFile,
};

const OPTION: &str = "::std::option::Option";
const SOME: &str = "::std::option::Option::Some";
const RESULT: &str = "::std::result::Result";
const OK: &str = "::std::result::Result::Ok";
const ERR: &str = "::std::result::Result::Err";
const STRING: &str = "::std::string::String";
const INTO_STRING: &str = "::std::convert::Into<::std::string::String>";
const DEFAULT_FN: &str = "::std::default::Default::default";

/// Generate the builder unit for a model.
pub fn generate(model: &ClassModel) -> Result<GeneratedUnit, ProcessingError> {
    BuilderGenerator::new(model).generate()
}

/// Renders the builder struct, its methods, the `builder()` entry point on
/// the target type and the DSL function for one class.
pub struct BuilderGenerator<'a> {
    model: &'a ClassModel,
}

impl<'a> BuilderGenerator<'a> {
    pub fn new(model: &'a ClassModel) -> Self {
        Self { model }
    }

    pub fn generate(&self) -> Result<GeneratedUnit, ProcessingError> {
        let builder_impl = self.builder_impl();
        self.check_members(&builder_impl)?;

        let source_text = RustFile::new()
            .item(self.builder_struct())
            .item(&builder_impl)
            .item(self.entry_impl())
            .item(self.dsl_fn())
            .render(GENERATED_HEADER);

        Ok(GeneratedUnit {
            builder_qualified_name: self.model.builder_qualified_name(),
            relative_path: self.relative_path(),
            source_text,
        })
    }

    /// `<module dirs>/<snake builder name>.rs`, relative to the output directory.
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .model
            .package_name
            .split("::")
            .skip_while(|segment| *segment == "crate")
            .collect();
        path.push(format!("{}.rs", to_snake_case(&self.model.builder_name)));
        path
    }

    fn result_type(&self) -> String {
        format!("{}<{}, {}>", RESULT, self.model.simple_name, STRING)
    }

    fn builder_struct(&self) -> Struct {
        self.model.parameters.iter().fold(
            Struct::new(&self.model.builder_name)
                .doc(format!("Builder for [`{}`].", self.model.simple_name))
                .derive("Default"),
            |s, param| s.field(Field::new(raw_ident(&param.name), slot_type(param)).private()),
        )
    }

    fn builder_impl(&self) -> Impl {
        let new = Fn::new("new")
            .doc("Create an empty builder.")
            .returns("Self")
            .body_line(format!("{}()", DEFAULT_FN));

        let with_setters = self
            .model
            .parameters
            .iter()
            .flat_map(|param| self.param_methods(param))
            .fold(Impl::new(&self.model.builder_name).method(new), Impl::method);

        with_setters.method(self.build_fn())
    }

    fn param_methods(&self, param: &ParameterDescriptor) -> Vec<Fn> {
        match (&param.collection_of, &param.nested) {
            (None, None) => vec![self.setter(param, false)],
            (None, Some(nested)) => vec![
                self.setter(param, true),
                nested_block(param, &param.name, nested, false),
            ],
            (Some(collection), None) => vec![
                self.adder(param, collection, false),
                self.extender(param, collection, false),
            ],
            (Some(collection), Some(nested)) => {
                let singular = singular_of(param);
                vec![
                    self.adder(param, collection, true),
                    nested_block(param, singular, nested, true),
                    self.extender(param, collection, true),
                ]
            }
        }
    }

    fn setter(&self, param: &ParameterDescriptor, nested: bool) -> Fn {
        let (ty, value) = value_param(param.value_type());
        let stored = if nested {
            format!("{}({})", OK, value)
        } else {
            value
        };
        Fn::new(format!("set_{}", param.name))
            .doc(format!("Set `{}`.", param.name))
            .param(Param::mut_self())
            .param(Param::new("value", ty))
            .returns("&mut Self")
            .body_line(format!(
                "self.{} = {}({});",
                raw_ident(&param.name),
                SOME,
                stored
            ))
            .body_line("self")
    }

    fn adder(&self, param: &ParameterDescriptor, collection: &CollectionRef, nested: bool) -> Fn {
        let singular = singular_of(param);
        let (ty, value) = value_param(&collection.element);
        let (method, stored) = if nested {
            ("push", format!("{}({})", OK, value))
        } else {
            (collection.kind.insert_method(), value)
        };
        Fn::new(format!("add_{}", singular))
            .doc(format!("Add one element to `{}`.", param.name))
            .param(Param::mut_self())
            .param(Param::new("value", ty))
            .returns("&mut Self")
            .body_line(format!("{}.{}({});", slot_entry(param), method, stored))
            .body_line("self")
    }

    fn extender(
        &self,
        param: &ParameterDescriptor,
        collection: &CollectionRef,
        nested: bool,
    ) -> Fn {
        let (item, values) = if nested {
            (
                collection.element.text.clone(),
                format!("values.into_iter().map({})", OK),
            )
        } else if collection.element.is_string() {
            (
                format!("impl {}", INTO_STRING),
                format!(
                    "values.into_iter().map(::std::convert::Into::<{}>::into)",
                    STRING
                ),
            )
        } else {
            (collection.element.text.clone(), "values".to_string())
        };
        Fn::new(format!("extend_{}", param.name))
            .doc(format!("Add every element of `values` to `{}`.", param.name))
            .param(Param::mut_self())
            .param(Param::new(
                "values",
                format!("impl ::std::iter::IntoIterator<Item = {}>", item),
            ))
            .returns("&mut Self")
            .body_line(format!("{}.extend({});", slot_entry(param), values))
            .body_line("self")
    }

    /// `build()` checks every slot before taking any, so a failed build
    /// leaves the staged values in place.
    fn build_fn(&self) -> Fn {
        let name = &self.model.simple_name;
        let build = Fn::new("build")
            .doc(format!(
                "Build the [`{}`], failing if a required field was never set.",
                name
            ))
            .param(Param::mut_self())
            .returns(self.result_type());

        if self.model.parameters.is_empty() {
            return build.body_line(format!("{}({} {{}})", OK, name));
        }

        let checked = self
            .model
            .parameters
            .iter()
            .flat_map(|param| self.build_checks(param))
            .fold(build, |f, line| f.body_line(line));

        self.model
            .parameters
            .iter()
            .fold(
                checked.body_line(format!("{}({} {{", OK, name)),
                |f, param| {
                    f.body_line(format!(
                        "    {}: {},",
                        raw_ident(&param.name),
                        self.build_expr(param)
                    ))
                },
            )
            .body_line("})")
    }

    /// Early returns for a parameter that would fail `build()`: a nested
    /// build that failed, or a required value that was never set.
    fn build_checks(&self, param: &ParameterDescriptor) -> Vec<String> {
        let slot = format!("self.{}", raw_ident(&param.name));
        let mut lines = Vec::new();

        if param.nested.is_some() {
            lines.push(if param.is_collection() {
                format!(
                    "if let {}(err) = {}.iter().flatten().find_map(|item| item.as_ref().err()) {{",
                    SOME, slot
                )
            } else {
                format!("if let {}({}(err)) = &{} {{", SOME, ERR, slot)
            });
            lines.push(format!("    return {}(err.clone());", ERR));
            lines.push("}".to_string());
        }

        if is_required(param) {
            lines.push(format!("if {}.is_none() {{", slot));
            lines.push(format!("    return {}({});", ERR, self.missing(param)));
            lines.push("}".to_string());
        }
        lines
    }

    fn missing(&self, param: &ParameterDescriptor) -> String {
        format!(
            "{}::from(\"{}.{} is required\")",
            STRING, self.model.simple_name, param.name
        )
    }

    /// The expression producing a field's final value inside `build()`.
    fn build_expr(&self, param: &ParameterDescriptor) -> String {
        let slot = format!("self.{}.take()", raw_ident(&param.name));
        let fallback = |default: &DefaultValue| match default {
            DefaultValue::TypeDefault => ".unwrap_or_default()".to_string(),
            DefaultValue::Expr(expr) => {
                format!(".unwrap_or_else(|| {})", default_expr(param, expr))
            }
        };

        if param.is_collection() {
            let collected = if param.nested.is_some() {
                format!(
                    "{}.map(|items| items.into_iter().collect::<{}<{}, {}>>()).transpose()?",
                    slot, RESULT, param.declared_type.text, STRING
                )
            } else {
                slot
            };
            return match &param.default {
                Some(default) => format!("{}{}", collected, fallback(default)),
                None => format!("{}.unwrap_or_default()", collected),
            };
        }

        let value = if param.nested.is_some() {
            format!("{}.transpose()?", slot)
        } else {
            slot
        };

        if param.optional_of.is_some() {
            return match &param.default {
                Some(DefaultValue::Expr(expr)) => format!("{}.or_else(|| {})", value, expr),
                Some(DefaultValue::TypeDefault) | None => value,
            };
        }

        match &param.default {
            Some(default) => format!("{}{}", value, fallback(default)),
            None => format!("{}.ok_or_else(|| {})?", value, self.missing(param)),
        }
    }

    fn entry_impl(&self) -> Impl {
        Impl::new(&self.model.simple_name).method(
            Fn::new("builder")
                .doc(format!("Start building a [`{}`].", self.model.simple_name))
                .returns(&self.model.builder_name)
                .body_line(format!("{}::new()", self.model.builder_name)),
        )
    }

    fn dsl_fn(&self) -> Fn {
        let builder = &self.model.builder_name;
        Fn::new(&self.model.dsl_name)
            .doc(format!(
                "Build a [`{}`] by configuring a [`{}`] in `block`.",
                self.model.simple_name, builder
            ))
            .param(Param::new("block", format!("impl FnOnce(&mut {})", builder)))
            .returns(self.result_type())
            .body_line(format!("let mut builder = {}::new();", builder))
            .body_line("block(&mut builder);")
            .body_line("builder.build()")
    }

    fn check_members(&self, builder_impl: &Impl) -> Result<(), ProcessingError> {
        let mut seen = HashSet::new();
        for method in builder_impl.methods() {
            if !seen.insert(method.name()) {
                return Err(ProcessingError::DuplicateMember {
                    class: self.model.qualified_name.clone(),
                    builder: self.model.builder_name.clone(),
                    member: method.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Type of the builder slot that stores a parameter until `build()`.
fn slot_type(param: &ParameterDescriptor) -> String {
    let value = &param.value_type().text;
    match (&param.collection_of, &param.nested) {
        (Some(_), Some(_)) => format!(
            "{}<::std::vec::Vec<{}<{}, {}>>>",
            OPTION, RESULT, value, STRING
        ),
        (Some(_), None) => format!("{}<{}>", OPTION, param.declared_type.text),
        (None, Some(_)) => format!("{}<{}<{}, {}>>", OPTION, RESULT, value, STRING),
        (None, None) => format!("{}<{}>", OPTION, value),
    }
}

/// `self.<slot>`, created empty on first use.
fn slot_entry(param: &ParameterDescriptor) -> String {
    format!(
        "self.{}.get_or_insert_with({})",
        raw_ident(&param.name),
        DEFAULT_FN
    )
}

/// Parameter type and stored expression for a value of `ty`.
/// `String` values accept anything convertible into a `String`.
fn value_param(ty: &TypeRef) -> (String, String) {
    if ty.is_string() {
        (format!("impl {}", INTO_STRING), "value.into()".to_string())
    } else {
        (ty.text.clone(), "value".to_string())
    }
}

fn default_expr(param: &ParameterDescriptor, expr: &str) -> String {
    if param.declared_type.is_string() {
        format!("{}::from({})", STRING, expr)
    } else {
        expr.to_string()
    }
}

/// Set by the caller or `build()` fails.
fn is_required(param: &ParameterDescriptor) -> bool {
    !param.is_collection() && param.optional_of.is_none() && param.default.is_none()
}

fn singular_of(param: &ParameterDescriptor) -> &str {
    param.singular.as_deref().unwrap_or(&param.name)
}

/// `<method>(|b| ...)`: run `block` on a fresh nested builder and store the
/// result, success or failure, for `build()` to propagate.
fn nested_block(
    param: &ParameterDescriptor,
    method: &str,
    nested: &NestedRef,
    in_collection: bool,
) -> Fn {
    let store = if in_collection {
        format!("{}.push(builder.build());", slot_entry(param))
    } else {
        format!(
            "self.{} = {}(builder.build());",
            raw_ident(&param.name),
            SOME
        )
    };
    Fn::new(raw_ident(method))
        .doc(format!(
            "Build a nested value for `{}` with a [`{}`].",
            param.name,
            nested
                .builder_path
                .rsplit("::")
                .next()
                .unwrap_or(&nested.builder_path)
        ))
        .param(Param::mut_self())
        .param(Param::new(
            "block",
            format!("impl FnOnce(&mut {})", nested.builder_path),
        ))
        .returns("&mut Self")
        .body_line(format!("let mut builder = {}::new();", nested.builder_path))
        .body_line("block(&mut builder);")
        .body_line(store)
        .body_line("self")
}
