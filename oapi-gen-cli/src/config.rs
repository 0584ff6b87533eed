//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `oapi-gen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use crate::parser::go::DEFAULT_TAG_KEY;
use crate::scanner::DEFAULT_PATTERN;
use oapi_gen::document::{DEFAULT_API_VERSION, DEFAULT_OPENAPI_VERSION, DEFAULT_SERVER_URL, DEFAULT_TITLE};
use oapi_gen::{parse_primitive_kind, Contact, DocumentInfo, ExpandOptions, PrimitiveTable, Server};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "oapi-gen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source discovery.
    pub input: InputConfig,

    /// Front-end settings.
    pub parser: ParserConfig,

    /// Extra primitive spellings, `"decimal.Decimal" = "number"`.
    pub types: BTreeMap<String, String>,

    /// Response expansion.
    pub expansion: ExpansionConfig,

    /// Document metadata.
    pub document: DocumentConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Glob pattern selecting source files.
    pub pattern: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Struct tag key that supplies Go field names.
    pub tag: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Fail on name templates without `%s`.
    pub strict_templates: bool,
}

/// `[document]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub openapi: String,
    pub title: String,
    pub version: String,
    pub description: Option<String>,
    pub contact: Option<ContactConfig>,
    pub servers: Vec<ServerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub name: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file. Standard output when unset.
    pub path: Option<PathBuf>,

    /// Rendering format.
    pub format: OutputFormat,
}

/// Rendering format of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG_KEY.to_string(),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            openapi: DEFAULT_OPENAPI_VERSION.to_string(),
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            description: None,
            contact: None,
            servers: vec![ServerConfig {
                url: DEFAULT_SERVER_URL.to_string(),
                description: None,
            }],
        }
    }
}

impl Config {
    /// Build the primitive table: defaults plus the `[types]` section.
    pub fn primitive_table(&self) -> Result<PrimitiveTable, ConfigError> {
        let mut table = PrimitiveTable::new();
        for (spelling, kind) in &self.types {
            let kind = parse_primitive_kind(kind).ok_or_else(|| {
                ConfigError::invalid_value(
                    format!("types.\"{}\"", spelling),
                    format!("unknown kind '{}', expected string, integer, number or boolean", kind),
                )
            })?;
            table.insert(spelling.clone(), kind);
        }
        Ok(table)
    }

    /// Document metadata from the `[document]` section.
    pub fn document_info(&self) -> DocumentInfo {
        let document = &self.document;
        DocumentInfo {
            openapi: document.openapi.clone(),
            title: document.title.clone(),
            version: document.version.clone(),
            description: document.description.clone(),
            contact: document.contact.as_ref().map(|contact| Contact {
                name: contact.name.clone(),
                email: contact.email.clone(),
                url: contact.url.clone(),
            }),
            servers: document
                .servers
                .iter()
                .map(|server| Server {
                    url: server.url.clone(),
                    description: server.description.clone(),
                })
                .collect(),
        }
    }

    /// Options for response expansion.
    pub fn expand_options(&self) -> ExpandOptions {
        ExpandOptions {
            strict_templates: self.expansion.strict_templates,
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `oapi-gen.toml` in the current directory is used if it
    /// exists and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::not_found(path.to_path_buf()).into());
                }
                path.to_path_buf()
            }
            None => {
                let default = PathBuf::from(CONFIG_FILENAME);
                if !default.exists() {
                    tracing::debug!("No configuration file, using defaults");
                    return Ok(Config::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;

        // Surface bad `[types]` entries at load time.
        config.primitive_table()?;

        tracing::debug!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref pattern) = args.pattern {
            config.input.pattern = pattern.clone();
        }

        if let Some(ref output) = args.output {
            config.output.path = Some(output.clone());
        }

        if let Some(format) = args.format {
            config.output.format = format;
        }

        if let Some(ref tag) = args.tag {
            config.parser.tag = tag.clone();
        }

        if args.strict_templates {
            config.expansion.strict_templates = true;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# oapi-gen configuration file

[input]
# Glob pattern selecting the model files (.go or .rs)
pattern = "./models/*.go"

[parser]
# Struct tag key that supplies field names in Go sources
tag = "json"

[types]
# Extra primitive spellings: "spelling" = "string" | "integer" | "number" | "boolean"
# "decimal.Decimal" = "number"

[expansion]
# Fail when a response name template has no %s slot
strict_templates = false

[document]
openapi = "3.1.0"
title = "API"
version = "1.0.0"
# description = "Service API"

# [document.contact]
# name = "API Team"
# email = "api@example.com"

[[document.servers]]
url = "http://localhost:3000"

[output]
# Output file; the document is printed to stdout when unset
# path = "openapi.yaml"

# Output format: yaml or json
format = "yaml"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Source pattern override.
    pub pattern: Option<String>,

    /// Output path override.
    pub output: Option<PathBuf>,

    /// Output format override.
    pub format: Option<OutputFormat>,

    /// Tag key override.
    pub tag: Option<String>,

    /// Enables strict template checks when set.
    pub strict_templates: bool,
}
