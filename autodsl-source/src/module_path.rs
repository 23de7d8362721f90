//! Module paths of source files.

use std::path::{Component, Path};

use crate::{Error, Result};

/// The module a file defines, relative to the crate's source root.
///
/// `lib.rs` and `main.rs` at the root are the crate itself, `a/mod.rs` is
/// `crate::a` and `a/b.rs` is `crate::a::b`.
pub fn module_path_for(path: &Path, source_root: &Path) -> Result<String> {
    let relative = path.strip_prefix(source_root).map_err(|_| {
        Box::new(Error::OutsideRoot {
            path: path.to_path_buf(),
            root: source_root.to_path_buf(),
        })
    })?;

    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if matches!(segments.as_slice(), [only] if only == "lib" || only == "main") {
        segments.clear();
    } else if segments.last().is_some_and(|last| last == "mod") {
        segments.pop();
    }

    Ok(std::iter::once("crate".to_string())
        .chain(segments)
        .collect::<Vec<_>>()
        .join("::"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(path: &str) -> String {
        module_path_for(Path::new(path), Path::new("src")).unwrap()
    }

    #[test]
    fn test_crate_roots() {
        assert_eq!(module("src/lib.rs"), "crate");
        assert_eq!(module("src/main.rs"), "crate");
    }

    #[test]
    fn test_nested_modules() {
        assert_eq!(module("src/shapes.rs"), "crate::shapes");
        assert_eq!(module("src/geo/mod.rs"), "crate::geo");
        assert_eq!(module("src/geo/lib.rs"), "crate::geo::lib");
        assert_eq!(module("src/geo/point.rs"), "crate::geo::point");
    }

    #[test]
    fn test_outside_root() {
        let err = module_path_for(Path::new("other/lib.rs"), Path::new("src")).unwrap_err();
        assert!(matches!(*err, Error::OutsideRoot { .. }));
    }
}
