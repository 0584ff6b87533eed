//! # oapi-gen
//!
//! Turns declared record types into OpenAPI `components/schemas` entries.
//!
//! This crate holds the source-independent core. Front-ends (see the
//! `oapi-gen-cli` crate) parse source files into [`TypeDeclaration`] values;
//! everything here works on the closed [`TypeExpression`] tree.
//!
//! ## Overview
//!
//! A generation run goes through three steps:
//!
//! 1. Every file's declarations are handed to a [`DeclarationScanner`]. Plain
//!    records are resolved and registered in the [`SchemaRegistry`]; records
//!    annotated as response wrappers are returned for later.
//! 2. After the last file, [`expand_responses`] instantiates each wrapper once
//!    per registered record.
//! 3. The registry is wrapped into an [`OpenApiDocument`].
//!
//! ## Quick Start
//!
//! ```rust
//! use oapi_gen::{
//!     expand_responses, DeclarationScanner, ExpandOptions, FieldDescriptor, SchemaRegistry,
//!     TypeDeclaration, TypeExpression, TypeResolver,
//! };
//!
//! let user = TypeDeclaration::new(
//!     "User",
//!     TypeExpression::record(vec![
//!         FieldDescriptor::new("ID", TypeExpression::named("int64")).with_tag_name("id"),
//!     ]),
//! );
//! let page = TypeDeclaration::new(
//!     "Page",
//!     TypeExpression::record(vec![
//!         FieldDescriptor::new("Items", TypeExpression::array(TypeExpression::named("T")))
//!             .with_tag_name("items"),
//!     ]),
//! )
//! .with_doc("@oas: kind=response placeholder=T name=%sPage");
//!
//! let resolver = TypeResolver::new();
//! let mut registry = SchemaRegistry::new();
//! let wrappers = DeclarationScanner::new(&resolver).scan("models.go", &[user, page], &mut registry);
//! expand_responses(&mut registry, &wrappers, &resolver, ExpandOptions::default()).unwrap();
//!
//! assert_eq!(registry.names(), vec!["User", "UserPage"]);
//! ```
//!
//! ## Type Mappings
//!
//! | Type expression | Schema |
//! |-----------------|--------|
//! | primitive spelling (`string`, `int64`, `time.Time`, ...) | inline primitive, description = spelling |
//! | `*T` | same as `T` |
//! | other bare name `M` | `$ref: #/components/schemas/M` |
//! | placeholder `T` during expansion | `$ref` to the substituted model |
//! | `pkg.Name` not in the table | `null`, description `unknown` |
//! | `Base[Arg]` not in the table | `null`, description `unknown` |
//! | `[]T` | `array` with `items` |
//! | `map[K]V` | `object` with `additionalProperties` |
//! | `struct { ... }` | `object` with ordered `properties` |
//!
//! ## Directives
//!
//! A doc comment line of the form
//!
//! ```text
//! @oas: kind=response placeholder=T name=%sCollection
//! ```
//!
//! marks a record as a response wrapper:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `kind` | `response` defers the record for expansion; other values are ignored |
//! | `placeholder` | generic parameter name replaced by each model |
//! | `name` | output name template; the first `%s` becomes the model name |
//!
//! Only the last directive line of a comment is honored.

pub mod annotation;
pub mod declarations;
pub mod document;
pub mod error;
pub mod expander;
pub mod primitives;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod types;

pub use annotation::{Directive, DirectiveKind};
pub use declarations::{DeclarationScanner, ResponseWrapper};
pub use document::{Contact, DocumentInfo, OpenApiDocument, Server};
pub use error::{ExpandError, ExpandResult};
pub use expander::{expand_responses, ExpandOptions};
pub use primitives::{parse_primitive_kind, PrimitiveTable};
pub use registry::SchemaRegistry;
pub use resolver::{Substitutions, TypeResolver};
pub use schema::{InlineSchema, SchemaKind, SchemaNode};
pub use types::{FieldDescriptor, TypeDeclaration, TypeExpression};
