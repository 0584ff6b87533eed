//! Primitive type table.
//!
//! Maps canonical type spellings (see the `Display` impl of
//! [`TypeExpression`](crate::TypeExpression)) to OpenAPI primitive kinds.

use std::collections::HashMap;

use crate::schema::SchemaKind;

/// Spellings known out of the box.
pub const DEFAULT_PRIMITIVES: &[(&str, SchemaKind)] = &[
    // Go basic types
    ("string", SchemaKind::String),
    ("int", SchemaKind::Integer),
    ("int8", SchemaKind::Integer),
    ("int16", SchemaKind::Integer),
    ("int32", SchemaKind::Integer),
    ("int64", SchemaKind::Integer),
    ("uint", SchemaKind::Integer),
    ("uint8", SchemaKind::Integer),
    ("uint16", SchemaKind::Integer),
    ("uint32", SchemaKind::Integer),
    ("uint64", SchemaKind::Integer),
    ("byte", SchemaKind::Integer),
    ("rune", SchemaKind::Integer),
    ("float32", SchemaKind::Number),
    ("float64", SchemaKind::Number),
    ("bool", SchemaKind::Boolean),
    ("time.Time", SchemaKind::String),
    ("[]byte", SchemaKind::String),
    // github.com/aarondl/opt/null
    ("null.Val[string]", SchemaKind::String),
    ("null.Val[int]", SchemaKind::Integer),
    ("null.Val[int64]", SchemaKind::Integer),
    ("null.Val[int32]", SchemaKind::Integer),
    ("null.Val[float]", SchemaKind::Number),
    ("null.Val[float64]", SchemaKind::Number),
    ("null.Val[float32]", SchemaKind::Number),
    ("null.Val[bool]", SchemaKind::Boolean),
    ("null.Val[time.Time]", SchemaKind::String),
    // Rust primitives
    ("String", SchemaKind::String),
    ("str", SchemaKind::String),
    ("char", SchemaKind::String),
    ("i8", SchemaKind::Integer),
    ("i16", SchemaKind::Integer),
    ("i32", SchemaKind::Integer),
    ("i64", SchemaKind::Integer),
    ("i128", SchemaKind::Integer),
    ("isize", SchemaKind::Integer),
    ("u8", SchemaKind::Integer),
    ("u16", SchemaKind::Integer),
    ("u32", SchemaKind::Integer),
    ("u64", SchemaKind::Integer),
    ("u128", SchemaKind::Integer),
    ("usize", SchemaKind::Integer),
    ("f32", SchemaKind::Number),
    ("f64", SchemaKind::Number),
    ("chrono.DateTime[Utc]", SchemaKind::String),
    ("chrono.NaiveDate", SchemaKind::String),
    ("chrono.NaiveDateTime", SchemaKind::String),
    ("uuid.Uuid", SchemaKind::String),
];

/// Lookup table from type spelling to primitive kind.
#[derive(Debug, Clone)]
pub struct PrimitiveTable {
    entries: HashMap<String, SchemaKind>,
}

impl Default for PrimitiveTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PRIMITIVES
                .iter()
                .map(|(spelling, kind)| (spelling.to_string(), *kind))
                .collect(),
        }
    }
}

impl PrimitiveTable {
    /// Create a table holding the default spellings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace a spelling.
    pub fn insert(&mut self, spelling: impl Into<String>, kind: SchemaKind) {
        self.entries.insert(spelling.into(), kind);
    }

    /// Add a spelling, builder style.
    pub fn with(mut self, spelling: impl Into<String>, kind: SchemaKind) -> Self {
        self.insert(spelling, kind);
        self
    }

    /// Look up a spelling.
    pub fn lookup(&self, spelling: &str) -> Option<SchemaKind> {
        self.entries.get(spelling).copied()
    }

    /// Number of spellings in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a primitive kind name as written in configuration files.
pub fn parse_primitive_kind(name: &str) -> Option<SchemaKind> {
    match name {
        "string" => Some(SchemaKind::String),
        "integer" => Some(SchemaKind::Integer),
        "number" => Some(SchemaKind::Number),
        "boolean" => Some(SchemaKind::Boolean),
        _ => None,
    }
}
