use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};

/// What [`OutputFile::write`] did on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Written,
    /// The file already held this exact text.
    Unchanged,
}

/// Generated text bound to the path it belongs at.
///
/// Writing compares against what is on disk first, so rerunning generation
/// from a build script keeps mtimes of untouched units stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf,
    text: String,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn is_current(&self) -> bool {
        fs::read_to_string(&self.path).is_ok_and(|on_disk| on_disk == self.text)
    }

    /// Write the text, creating missing parent directories.
    pub fn write(&self) -> Result<WriteResult> {
        if self.is_current() {
            return Ok(WriteResult::Unchanged);
        }
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("cannot create {}", dir.display()))?;
        }
        fs::write(&self.path, &self.text)
            .wrap_err_with(|| format!("cannot write {}", self.path.display()))?;
        Ok(WriteResult::Written)
    }
}
