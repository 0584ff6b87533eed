//! Schema nodes produced by the resolver.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Prefix of every `$ref` pointer into the component schemas.
pub const COMPONENTS_SCHEMAS_PREFIX: &str = "#/components/schemas/";

/// Description attached to nodes the resolver could not classify.
pub const UNKNOWN_DESCRIPTION: &str = "unknown";

/// Description attached to inline record nodes.
pub const RECORD_DESCRIPTION: &str = "struct";

/// OpenAPI schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl SchemaKind {
    /// The OpenAPI spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array => "array",
            SchemaKind::Object => "object",
            SchemaKind::Null => "null",
        }
    }
}

/// A resolved schema: either a pointer to a registered entry or an inline shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `$ref` to a named entry. Holds the bare name, not the pointer.
    Reference(String),

    /// Inline schema.
    Inline(InlineSchema),
}

/// An inline schema node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineSchema {
    #[serde(rename = "type")]
    pub kind: SchemaKind,

    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Create a reference to a named schema.
    pub fn reference(name: impl Into<String>) -> Self {
        SchemaNode::Reference(name.into())
    }

    /// Create a leaf node of the given kind.
    pub fn primitive(kind: SchemaKind, description: impl Into<String>) -> Self {
        SchemaNode::Inline(InlineSchema {
            kind,
            description: description.into(),
            properties: None,
            items: None,
            additional_properties: None,
        })
    }

    /// Create an array node.
    pub fn array(items: SchemaNode, description: impl Into<String>) -> Self {
        SchemaNode::Inline(InlineSchema {
            kind: SchemaKind::Array,
            description: description.into(),
            properties: None,
            items: Some(Box::new(items)),
            additional_properties: None,
        })
    }

    /// Create a map node (`object` with `additionalProperties`).
    pub fn map(values: SchemaNode, description: impl Into<String>) -> Self {
        SchemaNode::Inline(InlineSchema {
            kind: SchemaKind::Object,
            description: description.into(),
            properties: None,
            items: None,
            additional_properties: Some(Box::new(values)),
        })
    }

    /// Create a record node with ordered properties.
    pub fn object(properties: IndexMap<String, SchemaNode>) -> Self {
        SchemaNode::Inline(InlineSchema {
            kind: SchemaKind::Object,
            description: RECORD_DESCRIPTION.to_string(),
            properties: Some(properties),
            items: None,
            additional_properties: None,
        })
    }

    /// The degraded node for anything the resolver cannot classify.
    pub fn unknown() -> Self {
        Self::primitive(SchemaKind::Null, UNKNOWN_DESCRIPTION)
    }

    /// Referenced schema name, if this is a reference.
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            SchemaNode::Reference(name) => Some(name),
            SchemaNode::Inline(_) => None,
        }
    }

    /// Inline body, if this is not a reference.
    pub fn as_inline(&self) -> Option<&InlineSchema> {
        match self {
            SchemaNode::Inline(inline) => Some(inline),
            SchemaNode::Reference(_) => None,
        }
    }

    /// Kind of an inline node.
    pub fn kind(&self) -> Option<SchemaKind> {
        self.as_inline().map(|inline| inline.kind)
    }

    /// Description of an inline node.
    pub fn description(&self) -> Option<&str> {
        self.as_inline().map(|inline| inline.description.as_str())
    }

    /// Look up a property of a record node.
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.as_inline()?.properties.as_ref()?.get(name)
    }

    /// Property names of a record node, in order.
    pub fn property_names(&self) -> Vec<&str> {
        self.as_inline()
            .and_then(|inline| inline.properties.as_ref())
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Item schema of an array node.
    pub fn items(&self) -> Option<&SchemaNode> {
        self.as_inline()?.items.as_deref()
    }

    /// Value schema of a map node.
    pub fn additional_properties(&self) -> Option<&SchemaNode> {
        self.as_inline()?.additional_properties.as_deref()
    }

    /// Check if this is the degraded fallback node.
    pub fn is_unknown(&self) -> bool {
        matches!(
            self.as_inline(),
            Some(InlineSchema { kind: SchemaKind::Null, description, .. }) if description == UNKNOWN_DESCRIPTION
        )
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SchemaNode::Reference(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$ref", &format!("{}{}", COMPONENTS_SCHEMAS_PREFIX, name))?;
                map.end()
            }
            SchemaNode::Inline(inline) => inline.serialize(serializer),
        }
    }
}
