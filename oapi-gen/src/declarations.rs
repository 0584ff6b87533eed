//! Routing of parsed declarations into the registry or the deferred wrapper set.

use crate::annotation::Directive;
use crate::registry::SchemaRegistry;
use crate::resolver::TypeResolver;
use crate::types::{FieldDescriptor, TypeDeclaration, TypeExpression};

/// A generic record held back until every file has been scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseWrapper {
    /// Declared name of the wrapper type.
    pub name: String,

    /// The wrapper's record fields.
    pub fields: Vec<FieldDescriptor>,

    /// Directive that marked the declaration as a wrapper.
    pub directive: Directive,
}

/// Scans one file's declarations at a time.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationScanner<'a> {
    resolver: &'a TypeResolver,
}

impl<'a> DeclarationScanner<'a> {
    pub fn new(resolver: &'a TypeResolver) -> Self {
        Self { resolver }
    }

    /// Scan the declarations of one source file.
    ///
    /// Plain records are resolved and registered right away. Records marked
    /// `kind=response` are returned for later expansion. Declarations whose
    /// underlying type is not a record are ignored.
    pub fn scan(
        &self,
        source: &str,
        declarations: &[TypeDeclaration],
        registry: &mut SchemaRegistry,
    ) -> Vec<ResponseWrapper> {
        let mut wrappers = Vec::new();

        for declaration in declarations {
            let TypeExpression::Record(fields) = &declaration.ty else {
                tracing::trace!(source, name = %declaration.name, "Skipping non-record declaration");
                continue;
            };

            let directive = Directive::parse(&declaration.doc);
            if directive.is_response() {
                tracing::debug!(source, name = %declaration.name, "Deferring response wrapper");
                wrappers.push(ResponseWrapper {
                    name: declaration.name.clone(),
                    fields: fields.clone(),
                    directive,
                });
                continue;
            }

            tracing::debug!(source, name = %declaration.name, "Registering schema");
            let schema = self.resolver.resolve_record(fields, None);
            registry.insert(declaration.name.clone(), schema);
        }

        wrappers
    }
}
