//! OpenAPI specification structs for serde deserialization.
//!
//! Only the subset needed to enumerate operations, parameters, request bodies
//! and responses is modelled. Paths and operations keep their document order,
//! which drives the order of the generated tools.

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};

use super::error::{DocumentFormat, OpenApiError};

/// Maximum number of `$ref` hops followed before giving up.
pub const MAX_REF_DEPTH: usize = 16;

/// Root OpenAPI specification.
#[derive(Debug, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: Option<String>,
    pub paths: Option<Paths>,
    #[serde(default)]
    pub components: Components,
}

/// The `paths` object, in declaration order. Duplicate keys are kept so that
/// validation can report them.
#[derive(Debug, Default)]
pub struct Paths(pub Vec<(String, PathItem)>);

/// A path item: shared parameters plus its operations in declaration order.
///
/// Operation keys are stored as written in the document (`get`, `post`,
/// `purge`, ...). An operation that does not have the expected shape is kept
/// as the reason it was rejected, so the rest of the document still
/// generates.
#[derive(Debug, Default)]
pub struct PathItem {
    pub parameters: Vec<RefOr<Parameter>>,
    pub operations: Vec<(String, Result<Operation, String>)>,
}

/// Path item keys that are not operations.
const PATH_ITEM_FIELDS: [&str; 5] = ["parameters", "summary", "description", "servers", "$ref"];

/// Components section containing reusable objects.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: HashMap<String, Schema>,
    #[serde(default)]
    pub parameters: HashMap<String, RefOr<Parameter>>,
    #[serde(default)]
    pub request_bodies: HashMap<String, RefOr<RequestBody>>,
    #[serde(default)]
    pub responses: HashMap<String, RefOr<Response>>,
}

/// Either a local `$ref` or an inline object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Item(T),
}

/// An API operation (endpoint).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
    pub request_body: Option<RefOr<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
}

/// A parameter (path, query, header or cookie).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub description: Option<String>,
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// JSON Schema definition, reduced to what type resolution needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Format hint (e.g., date-time, uuid, int64).
    pub format: Option<String>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// The first non-null kind.
    pub fn primary(&self) -> Option<&str> {
        match self {
            SchemaType::Single(kind) => Some(kind.as_str()),
            SchemaType::Multiple(kinds) => kinds
                .iter()
                .map(String::as_str)
                .find(|kind| *kind != "null"),
        }
    }
}

impl OpenApiSpec {
    /// Parse a JSON or YAML document and validate its structure.
    ///
    /// JSON is assumed when the first non-whitespace character is `{`.
    pub fn parse(text: &str) -> Result<Self, OpenApiError> {
        let spec: Self = if text.trim_start().starts_with('{') {
            serde_json::from_str(text).map_err(|e| OpenApiError::Parse {
                format: DocumentFormat::Json,
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(text).map_err(|e| OpenApiError::Parse {
                format: DocumentFormat::Yaml,
                message: e.to_string(),
            })?
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the structural invariants serde cannot express: a `paths` object
    /// exists, no path is declared twice, and no path item declares a method
    /// twice.
    pub fn validate(&self) -> Result<(), OpenApiError> {
        let Some(paths) = &self.paths else {
            return Err(OpenApiError::MissingPaths);
        };

        let mut seen_paths = HashSet::new();
        for (path, item) in &paths.0 {
            if !seen_paths.insert(path.as_str()) {
                return Err(OpenApiError::DuplicatePath { path: path.clone() });
            }

            let mut seen_methods = HashSet::new();
            for (method, _) in &item.operations {
                if !seen_methods.insert(method.to_ascii_uppercase()) {
                    return Err(OpenApiError::DuplicateMethod {
                        path: path.clone(),
                        method: method.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Path items in declaration order.
    pub fn paths(&self) -> &[(String, PathItem)] {
        match &self.paths {
            Some(paths) => paths.0.as_slice(),
            None => &[],
        }
    }
}

/// HTTP methods are restricted to ASCII letters so they survive as
/// identifiers and as `reqwest::Method` tokens.
fn is_method_token(method: &str) -> bool {
    !method.is_empty() && method.chars().all(|c| c.is_ascii_alphabetic())
}

impl Components {
    /// Resolve a parameter, following local `#/components/parameters/` refs.
    pub fn parameter<'a>(&'a self, item: &'a RefOr<Parameter>) -> Option<&'a Parameter> {
        resolve_ref(&self.parameters, "#/components/parameters/", item)
    }

    /// Resolve a request body, following local `#/components/requestBodies/` refs.
    pub fn request_body<'a>(&'a self, item: &'a RefOr<RequestBody>) -> Option<&'a RequestBody> {
        resolve_ref(&self.request_bodies, "#/components/requestBodies/", item)
    }

    /// Resolve a response, following local `#/components/responses/` refs.
    pub fn response<'a>(&'a self, item: &'a RefOr<Response>) -> Option<&'a Response> {
        resolve_ref(&self.responses, "#/components/responses/", item)
    }

    /// Look up a schema by `$ref` path.
    pub fn schema(&self, ref_path: &str) -> Option<&Schema> {
        ref_path
            .strip_prefix("#/components/schemas/")
            .and_then(|name| self.schemas.get(name))
    }
}

fn resolve_ref<'a, T>(
    map: &'a HashMap<String, RefOr<T>>,
    prefix: &str,
    item: &'a RefOr<T>,
) -> Option<&'a T> {
    let mut current = item;
    for _ in 0..MAX_REF_DEPTH {
        match current {
            RefOr::Item(value) => return Some(value),
            RefOr::Ref { ref_path } => {
                let name = ref_path.strip_prefix(prefix)?;
                current = map.get(name)?;
            }
        }
    }
    None
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathsVisitor;

        impl<'de> Visitor<'de> for PathsVisitor {
            type Value = Paths;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of path templates to path items")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Paths, A::Error> {
                let mut entries = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key.starts_with("x-") {
                        map.next_value::<IgnoredAny>()?;
                        continue;
                    }
                    let item = map.next_value::<PathItem>()?;
                    entries.push((key, item));
                }
                Ok(Paths(entries))
            }
        }

        deserializer.deserialize_map(PathsVisitor)
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathItemVisitor;

        impl<'de> Visitor<'de> for PathItemVisitor {
            type Value = PathItem;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a path item object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PathItem, A::Error> {
                let mut item = PathItem::default();
                let mut shared_error = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "parameters" {
                        let value = map.next_value::<serde_json::Value>()?;
                        match serde_json::from_value(value) {
                            Ok(parameters) => item.parameters = parameters,
                            Err(e) => shared_error = Some(format!("path-level parameters: {e}")),
                        }
                    } else if key.starts_with("x-") || PATH_ITEM_FIELDS.contains(&key.as_str()) {
                        map.next_value::<IgnoredAny>()?;
                    } else if !is_method_token(&key) {
                        map.next_value::<IgnoredAny>()?;
                        let reason = format!("'{key}' is not a valid HTTP method");
                        item.operations.push((key, Err(reason)));
                    } else {
                        let value = map.next_value::<serde_json::Value>()?;
                        let operation = serde_json::from_value(value).map_err(|e| e.to_string());
                        item.operations.push((key, operation));
                    }
                }

                // Operations cannot be built without the parameters they inherit.
                if let Some(reason) = shared_error {
                    for (_, operation) in &mut item.operations {
                        if operation.is_ok() {
                            *operation = Err(reason.clone());
                        }
                    }
                }
                Ok(item)
            }
        }

        deserializer.deserialize_map(PathItemVisitor)
    }
}
