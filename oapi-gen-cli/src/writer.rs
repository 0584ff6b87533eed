//! Document rendering and file output.
//!
//! The assembled document is rendered to YAML or JSON text and written to a
//! file, with support for dry-run mode.

use crate::config::OutputFormat;
use crate::error::{CliResult, RenderError, WriteError};
use oapi_gen::OpenApiDocument;
use std::path::{Path, PathBuf};

/// Render a document in the given format.
pub fn render(document: &OpenApiDocument, format: OutputFormat) -> Result<String, RenderError> {
    let content = match format {
        OutputFormat::Yaml => serde_yaml::to_string(document)?,
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            json
        }
    };
    Ok(content)
}

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote document");
        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 for dry-run).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::DryRun { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oapi_gen::{DocumentInfo, SchemaKind, SchemaNode, SchemaRegistry};
    use tempfile::TempDir;

    const CONTENT: &str = "openapi: 3.1.0\n";

    fn document() -> OpenApiDocument {
        let mut registry = SchemaRegistry::new();
        registry.insert("UserId", SchemaNode::primitive(SchemaKind::Integer, "int64"));
        OpenApiDocument::new(DocumentInfo::default(), registry)
    }

    #[test]
    fn test_render_yaml() {
        let yaml = render(&document(), OutputFormat::Yaml).unwrap();
        assert!(yaml.starts_with("openapi: 3.1.0\n"));
        assert!(yaml.contains("  schemas:\n    UserId:\n"));
    }

    #[test]
    fn test_render_json() {
        let json = render(&document(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["components"]["schemas"]["UserId"]["type"], "integer");
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("openapi.yaml");

        let writer = FileWriter::new(false);
        let result = writer.write(&path, CONTENT).unwrap();

        assert!(result.was_written());
        assert_eq!(result.bytes(), CONTENT.len());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs/api/openapi.yaml");

        FileWriter::new(false).write(&path, CONTENT).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("openapi.yaml");

        let writer = FileWriter::new(true);
        assert!(writer.is_dry_run());
        let result = writer.write(&path, CONTENT).unwrap();

        assert!(!path.exists());
        assert_eq!(result.bytes(), 0);
        assert_eq!(result.path(), path.as_path());
        match result {
            WriteResult::DryRun { content, .. } => assert_eq!(content, CONTENT),
            other => panic!("expected dry run, got {other:?}"),
        }
    }
}
