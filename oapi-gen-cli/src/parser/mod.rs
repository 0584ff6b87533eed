//! Source front-ends.
//!
//! Each supported language has a parser producing [`TypeDeclaration`]s.
//! [`SourceParser`] picks one by file extension.

pub mod go;
pub mod rust;

use std::path::Path;

use oapi_gen::TypeDeclaration;

use crate::error::ParseError;
use crate::scanner::SourceFile;

pub use self::go::GoParser;
pub use self::rust::RustParser;

/// A front-end turning one file's text into declarations.
pub trait DeclarationParser {
    /// Parse `content`, read from `file`.
    fn parse(&self, file: &Path, content: &str) -> Result<Vec<TypeDeclaration>, ParseError>;
}

/// Languages with a front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    Go,
    Rust,
}

impl SourceLanguage {
    /// Detect the language from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "go" => Some(SourceLanguage::Go),
            "rs" => Some(SourceLanguage::Rust),
            _ => None,
        }
    }
}

/// Dispatches files to the matching front-end.
#[derive(Debug, Clone, Default)]
pub struct SourceParser {
    go: GoParser,
    rust: RustParser,
}

impl SourceParser {
    /// Create a dispatcher whose Go front-end reads `tag_key` tags.
    pub fn new(tag_key: &str) -> Self {
        Self {
            go: GoParser::new().with_tag_key(tag_key),
            rust: RustParser::new(),
        }
    }

    /// Parse a file with the front-end for its extension.
    pub fn parse_file(&self, source: &SourceFile) -> Result<Vec<TypeDeclaration>, ParseError> {
        let parser: &dyn DeclarationParser = match SourceLanguage::from_path(&source.path) {
            Some(SourceLanguage::Go) => &self.go,
            Some(SourceLanguage::Rust) => &self.rust,
            None => {
                return Err(ParseError::UnsupportedLanguage {
                    file: source.path.clone(),
                })
            }
        };

        let declarations = parser.parse(&source.path, &source.content)?;
        tracing::debug!(
            file = %source.path.display(),
            count = declarations.len(),
            "Parsed type declarations"
        );
        Ok(declarations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_from_path() {
        assert_eq!(SourceLanguage::from_path(Path::new("models/user.go")), Some(SourceLanguage::Go));
        assert_eq!(SourceLanguage::from_path(Path::new("src/user.rs")), Some(SourceLanguage::Rust));
        assert_eq!(SourceLanguage::from_path(Path::new("README.md")), None);
        assert_eq!(SourceLanguage::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_dispatch_by_extension() {
        let parser = SourceParser::default();

        let go = SourceFile::new("user.go", "package models\n\ntype User struct {\n\tID int `json:\"id\"`\n}\n");
        let rust = SourceFile::new("user.rs", "pub struct User { pub id: i64 }");

        assert_eq!(parser.parse_file(&go).unwrap()[0].name, "User");
        assert_eq!(parser.parse_file(&rust).unwrap()[0].name, "User");
    }

    #[test]
    fn test_unsupported_extension() {
        let parser = SourceParser::default();
        let err = parser.parse_file(&SourceFile::new("notes.txt", "hello")).unwrap_err();

        match err {
            ParseError::UnsupportedLanguage { file } => assert_eq!(file, PathBuf::from("notes.txt")),
            other => panic!("expected unsupported language, got {other}"),
        }
    }

    #[test]
    fn test_tag_key_reaches_go_parser() {
        let parser = SourceParser::new("yaml");
        let source = SourceFile::new(
            "user.go",
            "package models\n\ntype User struct {\n\tID int `json:\"id\" yaml:\"identifier\"`\n}\n",
        );

        let declarations = parser.parse_file(&source).unwrap();
        match &declarations[0].ty {
            oapi_gen::TypeExpression::Record(fields) => assert_eq!(fields[0].output_name(), "identifier"),
            other => panic!("expected record, got {other}"),
        }
    }
}
