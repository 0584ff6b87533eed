//! # oapi-gen-cli
//!
//! CLI library for generating OpenAPI component schemas from Go and Rust
//! model files.
//!
//! This crate provides the I/O side of the `oapi-gen` tool: source file
//! discovery, the language front-ends, the generation pipeline and file
//! output. Schema resolution itself lives in the `oapi-gen` crate.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Glob-based source file discovery
//! - [`parser`] - Go and Rust front-ends producing type declarations
//! - [`generator`] - The read, parse, scan and expand pipeline
//! - [`writer`] - Document rendering, file output and dry-run support
//! - [`watcher`] - File system watching for watch mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager, OutputFormat};
pub use error::{CliError, CliResult};
pub use generator::{GeneratedOutput, SchemaGenerator};
pub use parser::{DeclarationParser, GoParser, RustParser, SourceParser};
pub use scanner::{SourceFile, SourceScanner};
pub use watcher::FileWatcher;
pub use writer::{render, FileWriter};
