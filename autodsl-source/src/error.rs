use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for source discovery (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(autodsl::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {message}")]
    #[diagnostic(code(autodsl::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        file: String,
        message: String,
    },

    #[error("'{path}' is not inside the source root '{root}'")]
    #[diagnostic(
        code(autodsl::outside_root),
        help("set `source_root` in autodsl.toml or pass --source-root")
    )]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl Error {
    pub(crate) fn parse(src: &str, file: &str, err: &syn::Error) -> Box<Self> {
        let range = err.span().byte_range();
        // Lexer errors point between tokens with an empty range.
        let span = (range.start <= range.end && range.end <= src.len())
            .then(|| SourceSpan::from(range));
        Box::new(Error::Parse {
            src: NamedSource::new(file, src.to_string()),
            span,
            file: file.to_string(),
            message: err.to_string(),
        })
    }
}
