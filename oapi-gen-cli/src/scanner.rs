//! Source file discovery.
//!
//! Input files are selected with a glob pattern such as `./models/*.go`.
//! Discovery only lists paths; each file is read later, one at a time, by the
//! generator.

use crate::error::{CliResult, ParseError, ScanError};
use std::path::{Component, Path, PathBuf};

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "./models/*.go";

/// A source file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path as discovered.
    pub path: PathBuf,

    /// File content.
    pub content: String,
}

impl SourceFile {
    /// Read a file from disk.
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, ParseError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|source| ParseError::Io {
            file: path.clone(),
            source,
        })?;
        Ok(Self { path, content })
    }

    /// Create a file from in-memory content.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Glob-based file discovery.
#[derive(Debug, Clone)]
pub struct SourceScanner {
    pattern: String,
}

impl SourceScanner {
    /// Create a scanner for the given glob pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// List the files matching the pattern, in sorted order.
    ///
    /// Matching directories are skipped. No match at all is not an error.
    pub fn scan(&self) -> CliResult<Vec<PathBuf>> {
        let entries = glob::glob(&self.pattern)
            .map_err(|e| ScanError::invalid_pattern(&self.pattern, e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(ScanError::from)?;
            if path.is_dir() {
                tracing::trace!(path = %path.display(), "Skipping directory");
                continue;
            }
            files.push(path);
        }

        tracing::debug!(pattern = %self.pattern, count = files.len(), "Discovered source files");
        Ok(files)
    }

    /// The longest leading directory of the pattern without glob syntax.
    ///
    /// This is the directory watch mode observes.
    pub fn base_dir(&self) -> PathBuf {
        let mut base = PathBuf::new();
        let components: Vec<_> = Path::new(&self.pattern).components().collect();
        let last = components.len().saturating_sub(1);

        for (i, component) in components.into_iter().enumerate() {
            let literal = match component {
                Component::Normal(part) => !has_glob_syntax(&part.to_string_lossy()),
                _ => true,
            };
            if !literal || i == last {
                break;
            }
            base.push(component);
        }

        if base.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            base
        }
    }
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

fn has_glob_syntax(part: &str) -> bool {
    part.contains(|c: char| matches!(c, '*' | '?' | '[' | '{'))
}
