//! Schema registry for collecting generated schemas across files.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::schema::SchemaNode;

/// Insertion-ordered collection of named schemas.
///
/// One registry lives for one generation run. Re-registering a name replaces
/// the value and keeps the name's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, SchemaNode>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, schema: SchemaNode) -> Option<SchemaNode> {
        let name = name.into();
        let previous = self.schemas.insert(name.clone(), schema);
        if previous.is_some() {
            tracing::warn!(schema = %name, "Schema registered twice, keeping the later one");
        }
        previous
    }

    /// Get a schema by name.
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    /// Iterate over `(name, schema)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.schemas.iter().map(|(name, schema)| (name.as_str(), schema))
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl Serialize for SchemaRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.schemas.serialize(serializer)
    }
}
