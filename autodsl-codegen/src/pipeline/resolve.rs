//! Nested-type resolution against the classes eligible in a round.

use std::collections::HashSet;

use autodsl_ir::{Binding, ClassHandle, CollectionKind, NestedRef, TypeRef};
use indexmap::IndexMap;

use super::{ProcessingError, phases::check_eligibility};

/// Name of the builder generated for a class.
pub fn builder_name(simple_name: &str) -> String {
    format!("{}Builder", simple_name)
}

/// Where a type is written: the module and the names that module binds.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    module: &'a str,
    bindings: &'a [Binding],
}

impl<'a> Scope<'a> {
    pub fn new(module: &'a str, bindings: &'a [Binding]) -> Self {
        Self { module, bindings }
    }

    /// The declaring module of `handle`.
    pub fn of(handle: &'a ClassHandle) -> Self {
        Self::new(&handle.module_path, &handle.scope)
    }

    /// `segments` with a bound first segment replaced by what it stands for.
    fn expand(&self, segments: &[String]) -> Option<Vec<String>> {
        let (first, rest) = segments.split_first()?;
        let binding = self.bindings.iter().find(|b| b.name == *first)?;
        Some(binding.path.iter().chain(rest).cloned().collect())
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    module_path: String,
    simple_name: String,
    scope: Vec<Binding>,
    /// Types the class holds by value: plain fields and the inner type of
    /// `Option` fields. Collections are excluded.
    value_edges: Vec<TypeRef>,
}

/// Every eligible class seen so far, keyed by qualified name.
///
/// Lookups are pure: the same type from the same module always resolves to
/// the same answer, so the index is built once and shared by every candidate.
#[derive(Debug, Clone, Default)]
pub struct EligibilityIndex {
    entries: IndexMap<String, IndexEntry>,
}

impl EligibilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a round's candidates.
    pub fn from_candidates<'a>(candidates: impl IntoIterator<Item = &'a ClassHandle>) -> Self {
        let mut index = Self::new();
        index.extend(candidates);
        index
    }

    /// Add every eligible candidate. Ineligible ones are skipped.
    pub fn extend<'a>(&mut self, candidates: impl IntoIterator<Item = &'a ClassHandle>) {
        for handle in candidates {
            if check_eligibility(handle).is_err() {
                continue;
            }
            let value_edges = handle
                .parameters
                .iter()
                .filter_map(|param| by_value_type(&param.declared_type))
                .cloned()
                .collect();
            self.entries.insert(
                handle.qualified_name.clone(),
                IndexEntry {
                    module_path: handle.module_path.clone(),
                    simple_name: handle.simple_name.clone(),
                    scope: handle.scope.clone(),
                    value_edges,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a type written in `scope` to an eligible class.
    ///
    /// A first segment bound by the module (a `use` item or a local type
    /// declaration) is expanded and the result matched exactly, so an
    /// imported foreign type never resolves to a class of the same name.
    /// `crate::`, `self::` and `super::` paths are matched exactly too. An
    /// unbound bare name prefers a class in the scope's module, then a class
    /// with that simple name anywhere. Types with generic arguments never
    /// resolve.
    pub fn resolve(
        &self,
        ty: &TypeRef,
        scope: &Scope<'_>,
        element: &str,
    ) -> Result<Option<NestedRef>, ProcessingError> {
        if ty.segments.is_empty() || !ty.args.is_empty() {
            return Ok(None);
        }
        let from_module = scope.module;

        let matches: Vec<&String> = if let Some(path) = scope.expand(&ty.segments) {
            self.first_key(absolute_candidates(&path, from_module))
        } else if let [name] = ty.segments.as_slice() {
            let local = format!("{}::{}", from_module, name);
            match self.entries.get_key_value(&local) {
                Some((key, _)) => vec![key],
                None => self
                    .entries
                    .iter()
                    .filter(|(_, entry)| entry.simple_name == *name)
                    .map(|(key, _)| key)
                    .collect(),
            }
        } else {
            self.first_key(absolute_candidates(&ty.segments, from_module))
        };

        match matches.as_slice() {
            [] => Ok(None),
            [qualified_name] => {
                let entry = &self.entries[*qualified_name];
                let builder = builder_name(&entry.simple_name);
                let builder_path = if entry.module_path == from_module {
                    builder
                } else {
                    format!("{}::{}", entry.module_path, builder)
                };
                Ok(Some(NestedRef {
                    qualified_name: (*qualified_name).clone(),
                    builder_path,
                }))
            }
            _ => Err(ProcessingError::AmbiguousNestedType {
                element: element.to_string(),
                ty: ty.text.clone(),
                candidates: matches.into_iter().cloned().collect(),
            }),
        }
    }

    fn first_key(&self, paths: Vec<String>) -> Vec<&String> {
        paths
            .into_iter()
            .find_map(|path| self.entries.get_key_value(&path).map(|(key, _)| key))
            .into_iter()
            .collect()
    }

    /// Fail if `class` reaches itself through by-value nested fields.
    pub fn check_acyclic(&self, class: &str) -> Result<(), ProcessingError> {
        let mut path = vec![class.to_string()];
        let mut visited = HashSet::new();
        if self.reaches(class, class, &mut path, &mut visited) {
            Err(ProcessingError::Cycle {
                class: class.to_string(),
                path,
            })
        } else {
            Ok(())
        }
    }

    fn reaches(
        &self,
        target: &str,
        current: &str,
        path: &mut Vec<String>,
        visited: &mut HashSet<String>,
    ) -> bool {
        let Some(entry) = self.entries.get(current) else {
            return false;
        };
        for edge in &entry.value_edges {
            // Ambiguous edges are reported by extraction; the walk skips them.
            let scope = Scope::new(&entry.module_path, &entry.scope);
            let Ok(Some(next)) = self.resolve(edge, &scope, current) else {
                continue;
            };
            if next.qualified_name == target {
                path.push(next.qualified_name);
                return true;
            }
            if !visited.insert(next.qualified_name.clone()) {
                continue;
            }
            path.push(next.qualified_name.clone());
            if self.reaches(target, &next.qualified_name, path, visited) {
                return true;
            }
            path.pop();
        }
        false
    }
}

fn by_value_type(ty: &TypeRef) -> Option<&TypeRef> {
    if ty.is_named("Option") {
        return ty.single_arg();
    }
    match ty.name() {
        Some(name) if CollectionKind::from_name(name).is_some() => None,
        _ => Some(ty),
    }
}

/// Absolute paths a multi-segment type path may refer to, in lookup order.
fn absolute_candidates(segments: &[String], from_module: &str) -> Vec<String> {
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };
    match first.as_str() {
        "crate" => vec![segments.join("::")],
        "self" => vec![format!("{}::{}", from_module, rest.join("::"))],
        "super" => {
            let mut module = from_module.to_string();
            let mut rest = segments;
            while let Some((head, tail)) = rest.split_first() {
                if head != "super" {
                    break;
                }
                match module.rfind("::") {
                    Some(idx) => module.truncate(idx),
                    None => return Vec::new(),
                }
                rest = tail;
            }
            vec![format!("{}::{}", module, rest.join("::"))]
        }
        _ => vec![
            format!("{}::{}", from_module, segments.join("::")),
            format!("crate::{}", segments.join("::")),
        ],
    }
}
