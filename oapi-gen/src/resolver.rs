//! Type-to-schema resolution.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::primitives::PrimitiveTable;
use crate::schema::SchemaNode;
use crate::types::{FieldDescriptor, TypeExpression};

/// Placeholder name -> concrete schema name, active during generic expansion.
pub type Substitutions = HashMap<String, String>;

/// Resolves type expressions into schema nodes.
///
/// Named types that are not primitives become references and are never
/// followed. Anything the resolver cannot classify degrades to
/// [`SchemaNode::unknown`].
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    primitives: PrimitiveTable,
}

impl TypeResolver {
    /// Create a resolver over the default primitive table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver over a custom primitive table.
    pub fn with_primitives(primitives: PrimitiveTable) -> Self {
        Self { primitives }
    }

    /// The primitive table in use.
    pub fn primitives(&self) -> &PrimitiveTable {
        &self.primitives
    }

    /// Resolve one type expression.
    pub fn resolve(&self, expr: &TypeExpression, subs: Option<&Substitutions>) -> SchemaNode {
        match expr {
            TypeExpression::Pointer(inner) => self.resolve(inner, subs),

            TypeExpression::Named(name) => {
                if let Some(node) = self.primitive(name) {
                    return node;
                }
                if let Some(target) = subs.and_then(|subs| subs.get(name)) {
                    return SchemaNode::reference(target.clone());
                }
                SchemaNode::reference(name.clone())
            }

            TypeExpression::Qualified { .. } | TypeExpression::Parametrized { .. } => self
                .primitive(&expr.to_string())
                .unwrap_or_else(|| {
                    tracing::trace!(spelling = %expr, "Unmapped type, using fallback");
                    SchemaNode::unknown()
                }),

            TypeExpression::Array(element) => {
                SchemaNode::array(self.resolve(element, subs), format!("[]{}", element))
            }

            TypeExpression::Map { value, .. } => SchemaNode::map(
                self.resolve(value, subs),
                format!("map[string]{}", value),
            ),

            TypeExpression::Record(fields) => self.resolve_record(fields, subs),

            TypeExpression::Opaque(spelling) => {
                tracing::trace!(spelling = %spelling, "Opaque type, using fallback");
                SchemaNode::unknown()
            }
        }
    }

    /// Resolve a record into an object node with properties in declaration order.
    pub fn resolve_record(&self, fields: &[FieldDescriptor], subs: Option<&Substitutions>) -> SchemaNode {
        let mut properties = IndexMap::with_capacity(fields.len());

        for field in fields.iter().filter(|field| !field.skip) {
            let node = self.resolve(&field.ty, subs);
            properties.insert(field.output_name().to_string(), node);
        }

        SchemaNode::object(properties)
    }

    fn primitive(&self, spelling: &str) -> Option<SchemaNode> {
        self.primitives
            .lookup(spelling)
            .map(|kind| SchemaNode::primitive(kind, spelling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaKind;

    fn named(name: &str) -> TypeExpression {
        TypeExpression::named(name)
    }

    #[test]
    fn test_primitive_named_type() {
        let resolver = TypeResolver::new();
        let node = resolver.resolve(&named("int64"), None);
        assert_eq!(node, SchemaNode::primitive(SchemaKind::Integer, "int64"));
    }

    #[test]
    fn test_custom_named_type_is_reference() {
        let resolver = TypeResolver::new();
        let node = resolver.resolve(&named("Product"), None);
        assert_eq!(node.reference_name(), Some("Product"));
    }

    #[test]
    fn test_placeholder_substitution() {
        let resolver = TypeResolver::new();
        let subs = Substitutions::from([("T".to_string(), "User".to_string())]);

        let node = resolver.resolve(&named("T"), Some(&subs));
        assert_eq!(node.reference_name(), Some("User"));

        // Primitives win over substitutions.
        let subs = Substitutions::from([("string".to_string(), "User".to_string())]);
        let node = resolver.resolve(&named("string"), Some(&subs));
        assert_eq!(node.kind(), Some(SchemaKind::String));
    }

    #[test]
    fn test_unsubstituted_placeholder_is_plain_reference() {
        let resolver = TypeResolver::new();
        let subs = Substitutions::from([("T".to_string(), "User".to_string())]);
        let node = resolver.resolve(&named("U"), Some(&subs));
        assert_eq!(node.reference_name(), Some("U"));
    }

    #[test]
    fn test_pointer_is_transparent() {
        let resolver = TypeResolver::new();
        let ty = TypeExpression::array(named("User"));
        assert_eq!(
            resolver.resolve(&TypeExpression::pointer(ty.clone()), None),
            resolver.resolve(&ty, None)
        );
    }

    #[test]
    fn test_qualified_primitive() {
        let resolver = TypeResolver::new();
        let node = resolver.resolve(&TypeExpression::qualified("time", "Time"), None);
        assert_eq!(node, SchemaNode::primitive(SchemaKind::String, "time.Time"));
    }

    #[test]
    fn test_qualified_unknown_is_never_a_reference() {
        let resolver = TypeResolver::new();
        let node = resolver.resolve(&TypeExpression::qualified("models", "User"), None);
        assert!(node.is_unknown());
    }

    #[test]
    fn test_parametrized_nullable_primitive() {
        let resolver = TypeResolver::new();
        let ty = TypeExpression::parametrized(TypeExpression::qualified("null", "Val"), named("string"));
        let node = resolver.resolve(&ty, None);
        assert_eq!(node, SchemaNode::primitive(SchemaKind::String, "null.Val[string]"));
    }

    #[test]
    fn test_parametrized_unknown() {
        let resolver = TypeResolver::new();
        let ty = TypeExpression::parametrized(named("Collection"), named("User"));
        assert!(resolver.resolve(&ty, None).is_unknown());
    }

    #[test]
    fn test_array_of_references() {
        let resolver = TypeResolver::new();
        let node = resolver.resolve(&TypeExpression::array(named("User")), None);

        assert_eq!(node.kind(), Some(SchemaKind::Array));
        assert_eq!(node.description(), Some("[]User"));
        assert_eq!(node.items().and_then(SchemaNode::reference_name), Some("User"));
    }

    #[test]
    fn test_byte_slice_is_array() {
        let resolver = TypeResolver::new();
        let node = resolver.resolve(&TypeExpression::array(named("byte")), None);
        assert_eq!(
            node,
            SchemaNode::array(SchemaNode::primitive(SchemaKind::Integer, "byte"), "[]byte")
        );
    }

    #[test]
    fn test_array_substitutes_element() {
        let resolver = TypeResolver::new();
        let subs = Substitutions::from([("T".to_string(), "Order".to_string())]);
        let node = resolver.resolve(&TypeExpression::array(named("T")), Some(&subs));

        assert_eq!(node.items().and_then(SchemaNode::reference_name), Some("Order"));
        assert_eq!(node.description(), Some("[]T"));
    }

    #[test]
    fn test_map_of_strings() {
        let resolver = TypeResolver::new();
        let node = resolver.resolve(&TypeExpression::map(named("string"), named("string")), None);

        assert_eq!(node.kind(), Some(SchemaKind::Object));
        assert_eq!(node.description(), Some("map[string]string"));
        assert_eq!(
            node.additional_properties().and_then(SchemaNode::kind),
            Some(SchemaKind::String)
        );
    }

    #[test]
    fn test_opaque_is_unknown() {
        let resolver = TypeResolver::new();
        assert!(resolver.resolve(&TypeExpression::opaque("interface{}"), None).is_unknown());
    }

    #[test]
    fn test_record_uses_tag_names_in_order() {
        let resolver = TypeResolver::new();
        let fields = vec![
            FieldDescriptor::new("ID", named("int")).with_tag_name("id"),
            FieldDescriptor::new("Note", named("string")).with_tag_name("note"),
            FieldDescriptor::new("Secret", named("string")).skipped(),
            FieldDescriptor::new("Raw", named("string")),
        ];

        let node = resolver.resolve_record(&fields, None);
        assert_eq!(node.kind(), Some(SchemaKind::Object));
        assert_eq!(node.description(), Some("struct"));
        assert_eq!(node.property_names(), vec!["id", "note", "Raw"]);
    }

    #[test]
    fn test_nested_record_resolves_inline() {
        let resolver = TypeResolver::new();
        let inner = TypeExpression::record(vec![FieldDescriptor::new("X", named("float64"))]);
        let outer = TypeExpression::record(vec![FieldDescriptor::new("Point", inner)]);

        let node = resolver.resolve(&outer, None);
        let point = node.property("Point").unwrap();
        assert_eq!(point.kind(), Some(SchemaKind::Object));
        assert_eq!(
            point.property("X").and_then(SchemaNode::kind),
            Some(SchemaKind::Number)
        );
    }

    #[test]
    fn test_custom_primitive_table() {
        let table = PrimitiveTable::new().with("decimal.Decimal", SchemaKind::Number);
        let resolver = TypeResolver::with_primitives(table);
        let node = resolver.resolve(&TypeExpression::qualified("decimal", "Decimal"), None);
        assert_eq!(node, SchemaNode::primitive(SchemaKind::Number, "decimal.Decimal"));
    }
}
