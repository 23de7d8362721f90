//! Harness configuration.
//!
//! Settings come from an optional `autodsl.toml`:
//!
//! ```toml
//! generated_dir = "target/autodsl"
//! source_root = "src"
//! sources = ["src/shapes.rs", "src/library"]
//! ```
//!
//! Relative paths are resolved against the directory holding the file. The
//! CLI lets flags and `AUTODSL_GENERATED_DIR` override what the file says.

use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the generated-sources directory.
pub const GENERATED_DIR_ENV: &str = "AUTODSL_GENERATED_DIR";

/// Default name of the configuration file.
pub const CONFIG_FILE: &str = "autodsl.toml";

/// Result type for configuration loading (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<ConfigError>>;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(autodsl::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}")]
    #[diagnostic(code(autodsl::config::parse))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        file: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    generated_dir: Option<PathBuf>,
    source_root: Option<PathBuf>,
    #[serde(default)]
    sources: Vec<PathBuf>,
}

/// Where to look for marked items and where to put the builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory generated units are written under. Only needed when emitting.
    pub generated_dir: Option<PathBuf>,
    /// Directory module paths are computed from (`src/lib.rs` is `crate`).
    pub source_root: PathBuf,
    /// Files or directories to scan. Empty means the whole source root.
    pub sources: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generated_dir: None,
            source_root: PathBuf::from("src"),
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Load `path`, or fall back to the defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            Box::new(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let base = path.parent().unwrap_or(Path::new(""));
        Self::from_toml(&text, &path.display().to_string(), base)
    }

    /// Parse configuration text, resolving relative paths against `base`.
    pub fn from_toml(text: &str, file: &str, base: &Path) -> Result<Self> {
        let parsed: ConfigFile = toml::from_str(text).map_err(|source| {
            Box::new(ConfigError::Parse {
                src: NamedSource::new(file, text.to_string()),
                span: source.span().map(SourceSpan::from),
                file: file.to_string(),
                source,
            })
        })?;

        let defaults = Self::default();
        Ok(Self {
            generated_dir: parsed.generated_dir.map(|dir| base.join(dir)),
            source_root: base.join(parsed.source_root.unwrap_or(defaults.source_root)),
            sources: parsed.sources.into_iter().map(|s| base.join(s)).collect(),
        })
    }

    pub fn with_generated_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.generated_dir = Some(dir.into());
        self
    }

    pub fn with_source_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_root = dir.into();
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Every `.rs` file to scan, in a stable order.
    pub fn source_files(&self) -> autodsl_source::Result<Vec<PathBuf>> {
        if self.sources.is_empty() {
            return autodsl_source::source_files(&self.source_root);
        }

        let mut files = Vec::new();
        for source in &self.sources {
            if source.is_dir() {
                files.extend(autodsl_source::source_files(source)?);
            } else {
                files.push(source.clone());
            }
        }
        Ok(files)
    }
}
