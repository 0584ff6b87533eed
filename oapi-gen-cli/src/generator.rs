//! Schema generation pipeline.
//!
//! Files are processed one at a time in discovery order: read, parse, scan.
//! Response wrappers found along the way are expanded once every file has
//! been scanned, and the finished registry is assembled into a document.

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::parser::SourceParser;
use crate::scanner::{SourceFile, SourceScanner};
use crate::writer::render;
use oapi_gen::{expand_responses, DeclarationScanner, OpenApiDocument, SchemaRegistry, TypeResolver};
use std::path::{Path, PathBuf};

/// Generated output.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Final schema registry.
    pub registry: SchemaRegistry,

    /// Assembled document.
    pub document: OpenApiDocument,

    /// Rendered document text.
    pub content: String,
}

/// Runs the pipeline for one configuration.
pub struct SchemaGenerator {
    config: Config,
    parser: SourceParser,
    resolver: TypeResolver,
}

impl SchemaGenerator {
    /// Create a generator. Fails on invalid `[types]` entries.
    pub fn new(config: Config) -> CliResult<Self> {
        let resolver = TypeResolver::with_primitives(config.primitive_table()?);
        let parser = SourceParser::new(&config.parser.tag);
        Ok(Self {
            config,
            parser,
            resolver,
        })
    }

    /// List the files selected by the configured pattern.
    pub fn discover(&self) -> CliResult<Vec<PathBuf>> {
        SourceScanner::new(&self.config.input.pattern).scan()
    }

    /// Build the registry from the given files.
    ///
    /// The first failing file aborts the run; nothing partial is returned.
    pub fn build_registry(&self, paths: &[PathBuf]) -> CliResult<SchemaRegistry> {
        let scanner = DeclarationScanner::new(&self.resolver);
        let mut registry = SchemaRegistry::new();
        let mut wrappers = Vec::new();

        for path in paths {
            let source = SourceFile::read(path)?;
            let declarations = self.parser.parse_file(&source)?;
            let origin = path.display().to_string();
            wrappers.extend(scanner.scan(&origin, &declarations, &mut registry));
        }

        let expanded = expand_responses(&mut registry, &wrappers, &self.resolver, self.config.expand_options())?;

        tracing::debug!(
            files = paths.len(),
            wrappers = wrappers.len(),
            expanded,
            schemas = registry.len(),
            "Built schema registry"
        );
        Ok(registry)
    }

    /// Discover files matching `pattern` and build their registry.
    pub fn generate_schemas(&self, pattern: &str) -> CliResult<SchemaRegistry> {
        let paths = SourceScanner::new(pattern).scan()?;
        self.build_registry(&paths)
    }

    /// Build the registry, assemble the document and render it.
    pub fn generate(&self, paths: &[PathBuf]) -> CliResult<GeneratedOutput> {
        let registry = self.build_registry(paths)?;
        let document = OpenApiDocument::new(self.config.document_info(), registry.clone());
        let content = render(&document, self.config.output.format)?;

        Ok(GeneratedOutput {
            registry,
            document,
            content,
        })
    }

    /// Compare a written document with a fresh run over the configured pattern.
    ///
    /// A missing document is an I/O error; a stale one is
    /// [`CliError::Validation`].
    pub fn check_document(&self, document: &Path) -> CliResult<()> {
        let existing = std::fs::read_to_string(document).map_err(|e| {
            std::io::Error::new(e.kind(), format!("Cannot read document {}: {}", document.display(), e))
        })?;

        let output = self.generate(&self.discover()?)?;
        if existing.trim() != output.content.trim() {
            return Err(CliError::Validation(format!(
                "{} is out of date",
                document.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::{CliError, ParseError};
    use std::fs;
    use tempfile::TempDir;

    const USER: &str = r#"package models

type User struct {
	ID      int64   `json:"id"`
	Name    string  `json:"name"`
	Company Company `json:"company"`
}

type Company struct {
	Name string `json:"name"`
}
"#;

    const RESPONSES: &str = r#"package models

// @oas: kind=response placeholder=T name=%sResponse
type Response[T any] struct {
	Data T `json:"data"`
}
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn generator() -> SchemaGenerator {
        SchemaGenerator::new(Config::default()).unwrap()
    }

    #[test]
    fn test_build_registry_expands_across_files() {
        let dir = TempDir::new().unwrap();
        // Wrapper first: expansion still sees models from later files.
        let paths = vec![write(&dir, "a_responses.go", RESPONSES), write(&dir, "b_user.go", USER)];

        let registry = generator().build_registry(&paths).unwrap();
        assert_eq!(
            registry.names(),
            vec!["User", "Company", "UserResponse", "CompanyResponse"]
        );
        assert_eq!(
            registry.get("UserResponse").unwrap().property("data").unwrap().reference_name(),
            Some("User")
        );
    }

    #[test]
    fn test_generate_schemas_from_pattern() {
        let dir = TempDir::new().unwrap();
        write(&dir, "user.go", USER);
        write(&dir, "notes.md", "# not a model");

        let pattern = format!("{}/*.go", dir.path().display());
        let registry = generator().generate_schemas(&pattern).unwrap();
        assert_eq!(registry.names(), vec!["User", "Company"]);
    }

    #[test]
    fn test_parse_error_aborts() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write(&dir, "a.go", USER),
            write(&dir, "b.go", "package models\n\ntype Broken struct {\n"),
        ];

        let err = generator().build_registry(&paths).unwrap_err();
        match err {
            CliError::Parse(parse) => assert_eq!(parse.file(), paths[1].as_path()),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_parse_stage_error() {
        let err = generator()
            .build_registry(&[PathBuf::from("/nonexistent/user.go")])
            .unwrap_err();
        assert!(matches!(err, CliError::Parse(ParseError::Io { .. })));
    }

    #[test]
    fn test_strict_templates() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write(&dir, "user.go", USER),
            write(
                &dir,
                "resp.go",
                "package models\n\n// @oas: kind=response placeholder=T name=Fixed\ntype R[T any] struct {\n\tData T\n}\n",
            ),
        ];

        let mut config = Config::default();
        config.expansion.strict_templates = true;
        let err = SchemaGenerator::new(config).unwrap().build_registry(&paths).unwrap_err();
        assert!(matches!(err, CliError::Expand(_)));

        // Lenient mode collapses onto one name.
        let registry = generator().build_registry(&paths).unwrap();
        assert_eq!(registry.names(), vec!["User", "Company", "Fixed"]);
    }

    #[test]
    fn test_configured_primitives() {
        let dir = TempDir::new().unwrap();
        let paths = vec![write(
            &dir,
            "price.go",
            "package models\n\ntype Price struct {\n\tAmount decimal.Decimal `json:\"amount\"`\n}\n",
        )];

        let registry = generator().build_registry(&paths).unwrap();
        assert!(registry.get("Price").unwrap().property("amount").unwrap().is_unknown());

        let mut config = Config::default();
        config.types.insert("decimal.Decimal".to_string(), "number".to_string());
        let registry = SchemaGenerator::new(config).unwrap().build_registry(&paths).unwrap();
        assert_eq!(
            registry.get("Price").unwrap().property("amount").unwrap().kind(),
            Some(oapi_gen::SchemaKind::Number)
        );
    }

    #[test]
    fn test_invalid_types_rejected() {
        let mut config = Config::default();
        config.types.insert("Money".to_string(), "currency".to_string());
        assert!(matches!(SchemaGenerator::new(config), Err(CliError::Config(_))));
    }

    #[test]
    fn test_generate_renders_document() {
        let dir = TempDir::new().unwrap();
        let paths = vec![write(&dir, "user.go", USER)];

        let mut config = Config::default();
        config.output.format = OutputFormat::Json;
        let output = SchemaGenerator::new(config).unwrap().generate(&paths).unwrap();

        assert_eq!(output.registry.len(), 2);
        assert_eq!(output.document.schemas(), &output.registry);
        let value: serde_json::Value = serde_json::from_str(&output.content).unwrap();
        assert_eq!(
            value["components"]["schemas"]["User"]["properties"]["company"]["$ref"],
            "#/components/schemas/Company"
        );
    }

    #[test]
    fn test_generate_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let paths = vec![write(&dir, "responses.go", RESPONSES), write(&dir, "user.go", USER)];

        let first = generator().generate(&paths).unwrap();
        let second = generator().generate(&paths).unwrap();
        assert_eq!(first.content, second.content);
    }

    #[test]
    fn test_check_document() {
        let dir = TempDir::new().unwrap();
        write(&dir, "user.go", USER);
        let mut config = Config::default();
        config.input.pattern = format!("{}/*.go", dir.path().display());
        let generator = SchemaGenerator::new(config).unwrap();

        let document = dir.path().join("openapi.yaml");
        let err = generator.check_document(&document).unwrap_err();
        assert!(matches!(&err, CliError::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
        assert_eq!(err.exit_code(), 1);

        fs::write(&document, "openapi: 3.1.0\n").unwrap();
        let err = generator.check_document(&document).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
        assert_eq!(err.exit_code(), 2);

        let files = generator.discover().unwrap();
        fs::write(&document, generator.generate(&files).unwrap().content).unwrap();
        generator.check_document(&document).unwrap();
    }

    #[test]
    fn test_no_files() {
        let output = generator().generate(&[]).unwrap();
        assert!(output.registry.is_empty());
        assert!(output.content.contains("schemas: {}"));
    }

    #[test]
    fn test_rust_sources() {
        let dir = TempDir::new().unwrap();
        let paths = vec![write(
            &dir,
            "models.rs",
            r#"
            #[serde(rename_all = "camelCase")]
            pub struct Order { pub order_id: u64, pub items: Vec<String> }

            /// @oas: kind=response placeholder=T name=%sEnvelope
            pub struct Envelope<T> { pub data: T }
            "#,
        )];

        let registry = generator().build_registry(&paths).unwrap();
        assert_eq!(registry.names(), vec!["Order", "OrderEnvelope"]);
        assert_eq!(
            registry.get("Order").unwrap().property_names(),
            vec!["orderId", "items"]
        );
    }
}
