//! Rust front-end.
//!
//! Parses Rust source files with `syn` and turns struct items into
//! declarations. Field names follow serde's `rename` and `rename_all`
//! attributes, and skipped fields are marked as such.

use std::path::Path;

use oapi_gen::{FieldDescriptor, TypeDeclaration, TypeExpression};
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{Attribute, Fields, GenericArgument, Item, PathArguments, Type};

use super::DeclarationParser;
use crate::error::ParseError;

/// Parser for `.rs` files.
#[derive(Debug, Clone)]
pub struct RustParser {
    /// Whether to read serde attributes.
    serde_compat: bool,
}

impl Default for RustParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RustParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self { serde_compat: true }
    }

    /// Set whether to read serde attributes.
    pub fn with_serde_compat(mut self, enabled: bool) -> Self {
        self.serde_compat = enabled;
        self
    }

    /// Parse source code into declarations.
    pub fn parse_source(&self, content: &str, file_path: &Path) -> Result<Vec<TypeDeclaration>, ParseError> {
        let syntax = syn::parse_file(content).map_err(|e| {
            let start = e.span().start();
            ParseError::syntax(file_path.to_path_buf(), start.line, start.column + 1, e.to_string())
        })?;

        let mut declarations = Vec::new();
        self.collect_items(&syntax.items, &mut declarations);
        Ok(declarations)
    }

    fn collect_items(&self, items: &[Item], declarations: &mut Vec<TypeDeclaration>) {
        for item in items {
            match item {
                Item::Struct(item_struct) => {
                    let ty = match &item_struct.fields {
                        Fields::Named(_) | Fields::Unit => {
                            let container = SerdeContainerAttrs::from_attrs(&item_struct.attrs, self.serde_compat);
                            TypeExpression::record(self.record_fields(&item_struct.fields, &container))
                        }
                        Fields::Unnamed(_) => TypeExpression::opaque(item_struct.fields.to_token_stream().to_string()),
                    };
                    declarations.push(
                        TypeDeclaration::new(item_struct.ident.unraw().to_string(), ty)
                            .with_doc(doc_comment(&item_struct.attrs)),
                    );
                }
                Item::Enum(item_enum) => {
                    declarations.push(
                        TypeDeclaration::new(item_enum.ident.unraw().to_string(), TypeExpression::opaque("enum"))
                            .with_doc(doc_comment(&item_enum.attrs)),
                    );
                }
                Item::Type(item_type) => {
                    declarations.push(
                        TypeDeclaration::new(item_type.ident.unraw().to_string(), map_type(&item_type.ty))
                            .with_doc(doc_comment(&item_type.attrs)),
                    );
                }
                Item::Mod(item_mod) => {
                    if let Some((_, items)) = &item_mod.content {
                        self.collect_items(items, declarations);
                    }
                }
                _ => {}
            }
        }
    }

    fn record_fields(&self, fields: &Fields, container: &SerdeContainerAttrs) -> Vec<FieldDescriptor> {
        fields
            .iter()
            .filter_map(|field| {
                let name = field.ident.as_ref()?.unraw().to_string();
                let attrs = SerdeFieldAttrs::from_attrs(&field.attrs, self.serde_compat);

                let mut descriptor = FieldDescriptor::new(name.as_str(), map_type(&field.ty));
                if let Some(rename) = attrs.rename {
                    descriptor = descriptor.with_tag_name(rename);
                } else if let Some(rule) = container.rename_all {
                    descriptor = descriptor.with_tag_name(rule.apply(&name));
                }
                if attrs.skip {
                    descriptor = descriptor.skipped();
                }
                Some(descriptor)
            })
            .collect()
    }
}

impl DeclarationParser for RustParser {
    fn parse(&self, file: &Path, content: &str) -> Result<Vec<TypeDeclaration>, ParseError> {
        self.parse_source(content, file)
    }
}

/// Map a Rust type onto the declaration model.
pub fn map_type(ty: &Type) -> TypeExpression {
    match ty {
        Type::Reference(reference) => TypeExpression::pointer(map_type(&reference.elem)),
        Type::Paren(paren) => map_type(&paren.elem),
        Type::Group(group) => map_type(&group.elem),
        Type::Slice(slice) => TypeExpression::array(map_type(&slice.elem)),
        Type::Array(array) => TypeExpression::array(map_type(&array.elem)),
        Type::Path(type_path) if type_path.qself.is_none() => map_path(&type_path.path, ty),
        _ => TypeExpression::opaque(ty.to_token_stream().to_string()),
    }
}

fn map_path(path: &syn::Path, ty: &Type) -> TypeExpression {
    let segments: Vec<_> = path.segments.iter().collect();
    let Some(last) = segments.last() else {
        return TypeExpression::opaque(ty.to_token_stream().to_string());
    };

    let arguments: Vec<&Type> = match &last.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        PathArguments::None => Vec::new(),
        PathArguments::Parenthesized(_) => {
            return TypeExpression::opaque(ty.to_token_stream().to_string());
        }
    };

    let name = last.ident.unraw().to_string();
    match (name.as_str(), arguments.as_slice()) {
        ("Option" | "Box" | "Rc" | "Arc" | "Cow", [inner]) => TypeExpression::pointer(map_type(inner)),
        ("Vec" | "VecDeque" | "LinkedList" | "HashSet" | "BTreeSet" | "IndexSet", [element]) => {
            TypeExpression::array(map_type(element))
        }
        ("HashMap" | "BTreeMap" | "IndexMap", [key, value]) => {
            TypeExpression::map(map_type(key), map_type(value))
        }
        (_, arguments) => {
            let base = match segments.len() {
                1 => TypeExpression::named(name),
                n => TypeExpression::qualified(segments[n - 2].ident.unraw().to_string(), name),
            };
            match arguments {
                [] => base,
                [argument] => TypeExpression::parametrized(base, map_type(argument)),
                _ => TypeExpression::opaque(ty.to_token_stream().to_string()),
            }
        }
    }
}

/// Join `///` lines into one comment, one line each.
fn doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(text),
                        ..
                    }),
                ..
            }) => Some(text.value()),
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').map(str::to_string).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Serde attributes
// ============================================================================

/// Naming convention from `#[serde(rename_all = "...")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// camelCase
    CamelCase,
    /// snake_case
    SnakeCase,
    /// PascalCase
    PascalCase,
    /// SCREAMING_SNAKE_CASE
    ScreamingSnakeCase,
    /// kebab-case
    KebabCase,
}

impl RenameRule {
    /// Parse a serde rename rule string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "camelCase" => Some(RenameRule::CamelCase),
            "snake_case" => Some(RenameRule::SnakeCase),
            "PascalCase" => Some(RenameRule::PascalCase),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnakeCase),
            "kebab-case" => Some(RenameRule::KebabCase),
            _ => None,
        }
    }

    /// Apply the rename rule to a field name.
    pub fn apply(&self, name: &str) -> String {
        use convert_case::{Case, Casing};

        match self {
            RenameRule::CamelCase => name.to_case(Case::Camel),
            RenameRule::SnakeCase => name.to_case(Case::Snake),
            RenameRule::PascalCase => name.to_case(Case::Pascal),
            RenameRule::ScreamingSnakeCase => name.to_case(Case::UpperSnake),
            RenameRule::KebabCase => name.to_case(Case::Kebab),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct SerdeContainerAttrs {
    rename_all: Option<RenameRule>,
}

impl SerdeContainerAttrs {
    fn from_attrs(attrs: &[Attribute], enabled: bool) -> Self {
        let mut result = Self::default();
        if !enabled {
            return result;
        }

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    // `rename_all(serialize = "...")` is not a plain string; ignore it.
                    if let Ok(value) = parse_string_value(&meta) {
                        result.rename_all = RenameRule::parse(&value);
                    }
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    meta.parse_nested_meta(|_| Ok(()))?;
                }
                Ok(())
            });
        }

        result
    }
}

#[derive(Debug, Clone, Default)]
struct SerdeFieldAttrs {
    rename: Option<String>,
    skip: bool,
}

impl SerdeFieldAttrs {
    fn from_attrs(attrs: &[Attribute], enabled: bool) -> Self {
        let mut result = Self::default();
        if !enabled {
            return result;
        }

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Ok(value) = parse_string_value(&meta) {
                        result.rename = Some(value);
                    }
                } else if meta.path.is_ident("skip")
                    || meta.path.is_ident("skip_serializing")
                    || meta.path.is_ident("skip_deserializing")
                {
                    result.skip = true;
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                } else if meta.input.peek(syn::token::Paren) {
                    meta.parse_nested_meta(|_| Ok(()))?;
                }
                Ok(())
            });
        }

        result
    }
}

/// Parse a string value from a meta item like `rename = "value"`.
fn parse_string_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<String> {
    let value: syn::LitStr = meta.value()?.parse()?;
    Ok(value.value())
}
