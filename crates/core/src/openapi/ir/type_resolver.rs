//! Schema descriptor to target type mapping.
//!
//! The resolved type is metadata: generated wrappers always accept the wire
//! type `String`, and the resolved type is documented next to each field.

use std::fmt;

use crate::openapi::spec::{Components, MAX_REF_DEPTH, Schema};

/// Target type derived from a schema descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    String,
    DateTime,
    Uuid,
    Binary,
    Int32,
    Int64,
    Float,
    Double,
    Decimal,
    Boolean,
    Array(Box<ResolvedType>),
    Object,
}

impl ResolvedType {
    /// Rust type name used in generated documentation.
    pub fn rust_type(&self) -> String {
        match self {
            ResolvedType::String => "String".to_string(),
            ResolvedType::DateTime => "chrono::DateTime<chrono::Utc>".to_string(),
            ResolvedType::Uuid => "uuid::Uuid".to_string(),
            ResolvedType::Binary => "Vec<u8>".to_string(),
            ResolvedType::Int32 => "i32".to_string(),
            ResolvedType::Int64 => "i64".to_string(),
            ResolvedType::Float => "f32".to_string(),
            ResolvedType::Double => "f64".to_string(),
            ResolvedType::Decimal => "rust_decimal::Decimal".to_string(),
            ResolvedType::Boolean => "bool".to_string(),
            ResolvedType::Array(item) => format!("Vec<{}>", item.rust_type()),
            ResolvedType::Object => "serde_json::Value".to_string(),
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rust_type())
    }
}

/// Map a (kind, format, item type) descriptor to a target type.
pub fn resolve_descriptor(
    kind: Option<&str>,
    format: Option<&str>,
    item: Option<ResolvedType>,
) -> ResolvedType {
    match (kind, format) {
        (Some("string"), Some("date" | "date-time")) => ResolvedType::DateTime,
        (Some("string"), Some("uuid")) => ResolvedType::Uuid,
        (Some("string"), Some("byte" | "binary")) => ResolvedType::Binary,
        (Some("string"), _) => ResolvedType::String,
        (Some("integer"), Some("int64")) => ResolvedType::Int64,
        (Some("integer"), _) => ResolvedType::Int32,
        (Some("number"), Some("float")) => ResolvedType::Float,
        (Some("number"), Some("decimal")) => ResolvedType::Decimal,
        (Some("number"), _) => ResolvedType::Double,
        (Some("boolean"), _) => ResolvedType::Boolean,
        (Some("array"), _) => ResolvedType::Array(Box::new(item.unwrap_or(ResolvedType::Object))),
        _ => ResolvedType::Object,
    }
}

/// Resolves schemas against the document's component schemas.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    components: Option<&'a Components>,
}

impl<'a> TypeResolver<'a> {
    /// Resolver that follows `#/components/schemas/` references.
    pub fn new(components: &'a Components) -> Self {
        Self {
            components: Some(components),
        }
    }

    /// Resolver without component lookup; every `$ref` becomes `Object`.
    pub fn standalone() -> Self {
        Self { components: None }
    }

    /// Resolve an optional schema. Absent schemas are opaque objects.
    pub fn resolve(&self, schema: Option<&Schema>) -> ResolvedType {
        self.resolve_at(schema, 0)
    }

    fn resolve_at(&self, schema: Option<&Schema>, depth: usize) -> ResolvedType {
        let Some(schema) = schema else {
            return ResolvedType::Object;
        };
        if depth > MAX_REF_DEPTH {
            return ResolvedType::Object;
        }

        if let Some(ref_path) = &schema.ref_path {
            let target = self.components.and_then(|c| c.schema(ref_path));
            return self.resolve_at(target, depth + 1);
        }

        let kind = schema.schema_type.as_ref().and_then(|t| t.primary());
        let item = if kind == Some("array") {
            schema
                .items
                .as_deref()
                .map(|items| self.resolve_at(Some(items), depth + 1))
        } else {
            None
        };

        resolve_descriptor(kind, schema.format.as_deref(), item)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::spec::SchemaType;

    fn schema(kind: &str, format: Option<&str>) -> Schema {
        Schema {
            schema_type: Some(SchemaType::Single(kind.to_string())),
            format: format.map(str::to_string),
            ..Schema::default()
        }
    }

    #[test]
    fn test_mapping_table() {
        let cases = [
            ("string", None, ResolvedType::String),
            ("string", Some("date"), ResolvedType::DateTime),
            ("string", Some("date-time"), ResolvedType::DateTime),
            ("string", Some("uuid"), ResolvedType::Uuid),
            ("string", Some("byte"), ResolvedType::Binary),
            ("string", Some("binary"), ResolvedType::Binary),
            ("string", Some("email"), ResolvedType::String),
            ("integer", Some("int32"), ResolvedType::Int32),
            ("integer", Some("int64"), ResolvedType::Int64),
            ("integer", None, ResolvedType::Int32),
            ("number", Some("float"), ResolvedType::Float),
            ("number", Some("double"), ResolvedType::Double),
            ("number", Some("decimal"), ResolvedType::Decimal),
            ("number", None, ResolvedType::Double),
            ("boolean", None, ResolvedType::Boolean),
            ("object", None, ResolvedType::Object),
            ("mystery", None, ResolvedType::Object),
        ];

        let resolver = TypeResolver::standalone();
        for (kind, format, expected) in cases {
            let s = schema(kind, format);
            let first = resolver.resolve(Some(&s));
            let second = resolver.resolve(Some(&s));
            assert_eq!(first, expected, "{kind} / {format:?}");
            assert_eq!(first, second, "resolution must be deterministic");
        }
    }

    #[test]
    fn test_absent_schema_is_object() {
        assert_eq!(TypeResolver::standalone().resolve(None), ResolvedType::Object);
    }

    #[test]
    fn test_array_items() {
        let mut s = schema("array", None);
        s.items = Some(Box::new(schema("integer", Some("int64"))));
        let ty = TypeResolver::standalone().resolve(Some(&s));
        assert_eq!(ty, ResolvedType::Array(Box::new(ResolvedType::Int64)));
        assert_eq!(ty.rust_type(), "Vec<i64>");

        let bare = schema("array", None);
        assert_eq!(
            TypeResolver::standalone().resolve(Some(&bare)).rust_type(),
            "Vec<serde_json::Value>"
        );
    }

    #[test]
    fn test_nullable_type_array() {
        let s = Schema {
            schema_type: Some(SchemaType::Multiple(vec!["null".into(), "boolean".into()])),
            ..Schema::default()
        };
        assert_eq!(
            TypeResolver::standalone().resolve(Some(&s)),
            ResolvedType::Boolean
        );
    }

    #[test]
    fn test_component_ref() {
        let mut components = Components::default();
        components
            .schemas
            .insert("Id".to_string(), schema("string", Some("uuid")));
        let s = Schema {
            ref_path: Some("#/components/schemas/Id".to_string()),
            ..Schema::default()
        };

        assert_eq!(
            TypeResolver::new(&components).resolve(Some(&s)),
            ResolvedType::Uuid
        );
        assert_eq!(
            TypeResolver::standalone().resolve(Some(&s)),
            ResolvedType::Object
        );
    }

    #[test]
    fn test_self_referencing_ref_terminates() {
        let mut components = Components::default();
        components.schemas.insert(
            "Loop".to_string(),
            Schema {
                ref_path: Some("#/components/schemas/Loop".to_string()),
                ..Schema::default()
            },
        );
        let s = Schema {
            ref_path: Some("#/components/schemas/Loop".to_string()),
            ..Schema::default()
        };
        assert_eq!(
            TypeResolver::new(&components).resolve(Some(&s)),
            ResolvedType::Object
        );
    }

    #[test]
    fn test_rust_type_names() {
        assert_eq!(ResolvedType::DateTime.to_string(), "chrono::DateTime<chrono::Utc>");
        assert_eq!(ResolvedType::Decimal.to_string(), "rust_decimal::Decimal");
        assert_eq!(ResolvedType::Binary.to_string(), "Vec<u8>");
    }
}
