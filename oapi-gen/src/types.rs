//! Declaration model consumed by the resolver.
//!
//! Front-ends turn source text into [`TypeDeclaration`] values. Everything
//! downstream works on the closed [`TypeExpression`] tree and never sees the
//! original syntax.

use std::fmt;

/// A declared type expression, independent of the source language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpression {
    /// A bare type name (`string`, `User`, `T`).
    Named(String),

    /// A pointer, reference or optional wrapper around another type.
    Pointer(Box<TypeExpression>),

    /// A type from another namespace (`time.Time`).
    Qualified {
        /// Package or module the name lives in.
        package: String,
        /// Type name inside the package.
        name: String,
    },

    /// A generic instantiation with a single argument (`null.Val[string]`).
    Parametrized {
        /// The generic type being instantiated.
        base: Box<TypeExpression>,
        /// The type argument.
        argument: Box<TypeExpression>,
    },

    /// A slice or fixed-size array.
    Array(Box<TypeExpression>),

    /// A map. Only the value type shapes the schema.
    Map {
        /// Key type, kept for spelling only.
        key: Box<TypeExpression>,
        /// Value type.
        value: Box<TypeExpression>,
    },

    /// An inline record (struct) type.
    Record(Vec<FieldDescriptor>),

    /// A shape the front-end recognized but the model has no variant for
    /// (interfaces, functions, channels, tuples, multi-argument generics).
    Opaque(String),
}

impl TypeExpression {
    /// Create a named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpression::Named(name.into())
    }

    /// Wrap a type in a pointer.
    pub fn pointer(inner: TypeExpression) -> Self {
        TypeExpression::Pointer(Box::new(inner))
    }

    /// Create a qualified type name.
    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpression::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Create a single-argument generic instantiation.
    pub fn parametrized(base: TypeExpression, argument: TypeExpression) -> Self {
        TypeExpression::Parametrized {
            base: Box::new(base),
            argument: Box::new(argument),
        }
    }

    /// Create an array of the given element type.
    pub fn array(element: TypeExpression) -> Self {
        TypeExpression::Array(Box::new(element))
    }

    /// Create a map type.
    pub fn map(key: TypeExpression, value: TypeExpression) -> Self {
        TypeExpression::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Create a record type from its fields.
    pub fn record(fields: Vec<FieldDescriptor>) -> Self {
        TypeExpression::Record(fields)
    }

    /// Create an opaque type carrying its source spelling.
    pub fn opaque(spelling: impl Into<String>) -> Self {
        TypeExpression::Opaque(spelling.into())
    }

    /// Check if this expression is a record.
    pub fn is_record(&self) -> bool {
        matches!(self, TypeExpression::Record(_))
    }
}

/// Canonical spelling, used for primitive lookups and descriptions.
impl fmt::Display for TypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpression::Named(name) => f.write_str(name),
            TypeExpression::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpression::Qualified { package, name } => write!(f, "{}.{}", package, name),
            TypeExpression::Parametrized { base, argument } => {
                write!(f, "{}[{}]", base, argument)
            }
            TypeExpression::Array(element) => write!(f, "[]{}", element),
            TypeExpression::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpression::Record(fields) => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                f.write_str("}")
            }
            TypeExpression::Opaque(spelling) => f.write_str(spelling),
        }
    }
}

/// One field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name.
    pub name: String,

    /// Field type.
    pub ty: TypeExpression,

    /// Output name taken from the serialization tag, if any.
    pub tag_name: Option<String>,

    /// Field is excluded from serialization (`#[serde(skip)]` and its variants).
    pub skip: bool,
}

impl FieldDescriptor {
    /// Create a field without a tag.
    pub fn new(name: impl Into<String>, ty: TypeExpression) -> Self {
        Self {
            name: name.into(),
            ty,
            tag_name: None,
            skip: false,
        }
    }

    /// Set the tag-derived output name.
    pub fn with_tag_name(mut self, tag_name: impl Into<String>) -> Self {
        self.tag_name = Some(tag_name.into());
        self
    }

    /// Mark the field as excluded.
    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// The property name this field gets in the output schema.
    ///
    /// The tag name wins when present and non-empty.
    pub fn output_name(&self) -> &str {
        match self.tag_name.as_deref() {
            Some(tag) if !tag.is_empty() => tag,
            _ => &self.name,
        }
    }
}

/// A top-level type declaration from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    /// Declared type name.
    pub name: String,

    /// Doc comment text with comment markers removed.
    pub doc: String,

    /// The declared underlying type.
    pub ty: TypeExpression,
}

impl TypeDeclaration {
    /// Create a declaration without a doc comment.
    pub fn new(name: impl Into<String>, ty: TypeExpression) -> Self {
        Self {
            name: name.into(),
            doc: String::new(),
            ty,
        }
    }

    /// Set the doc comment.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }
}
