//! API-level IR for normalized endpoints.
//!
//! This module defines the intermediate representation produced by extraction:
//! - Endpoint: one (path, method) pair with its parameters, body and response
//! - Parameter / RequestBody / Response: the pieces a wrapper needs
//! - Diagnostic: non-fatal observations collected along the way

use std::fmt;

use super::type_resolver::ResolvedType;

/// HTTP method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Any other verb, stored upper-cased (`HEAD`, `OPTIONS`, `PURGE`, ...)
    Custom(String),
}

impl HttpMethod {
    /// Parse a path item key. Matching is case-insensitive.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            other => HttpMethod::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Custom(token) => token,
        }
    }

    /// Only POST, PUT and PATCH carry a request body.
    pub fn allows_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
}

impl ParamLocation {
    /// Parse an `in` value. Cookie and unknown locations are not supported.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "path" => Some(ParamLocation::Path),
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            _ => None,
        }
    }
}

/// Single parameter definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Name as written in the document
    pub name: String,
    /// Informational target type
    pub resolved_type: ResolvedType,
    /// Always true for path parameters
    pub required: bool,
    /// Empty when the document has none
    pub description: String,
    pub location: ParamLocation,
}

/// Request body IR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    pub content_type: String,
    pub required: bool,
    pub description: String,
    pub schema_type: ResolvedType,
}

/// Response IR for the first successful (or default) outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    pub content_type: String,
    pub schema_type: ResolvedType,
}

/// Normalized API endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub http_method: HttpMethod,
    /// Raw path template (e.g., "/users/{id}")
    pub path: String,
    /// Unique tool identifier (e.g., "GetUserById")
    pub tool_name: String,
    pub description: String,
    pub path_parameters: Vec<Parameter>,
    pub query_parameters: Vec<Parameter>,
    /// Extracted but not used by code emission
    pub header_parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub response: Option<Response>,
}

/// One entry of a generated tool signature.
#[derive(Debug, Clone, Copy)]
pub enum SignatureItem<'a> {
    Param(&'a Parameter),
    Body(&'a RequestBody),
}

impl Endpoint {
    /// Signature order: path parameters, request body, required query
    /// parameters, optional query parameters.
    pub fn signature(&self) -> Vec<SignatureItem<'_>> {
        let mut items: Vec<SignatureItem<'_>> =
            self.path_parameters.iter().map(SignatureItem::Param).collect();
        if let Some(body) = &self.request_body {
            items.push(SignatureItem::Body(body));
        }
        items.extend(
            self.query_parameters
                .iter()
                .filter(|p| p.required)
                .map(SignatureItem::Param),
        );
        items.extend(
            self.query_parameters
                .iter()
                .filter(|p| !p.required)
                .map(SignatureItem::Param),
        );
        items
    }

    pub fn has_arguments(&self) -> bool {
        !self.path_parameters.is_empty()
            || self.request_body.is_some()
            || !self.query_parameters.is_empty()
    }
}

/// Kind of a non-fatal extraction observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Neither summary nor description; a fallback was synthesized.
    MissingDescription,
    /// No 2xx or default response is declared.
    MissingResponse,
    /// Parameter in an unsupported location (cookie or unknown), or an
    /// unresolvable `$ref`.
    DroppedParameter { name: String, location: String },
    /// Declared path parameter that the template never uses.
    UnusedPathParameter { name: String },
    /// Template placeholder without a declared path parameter.
    UndeclaredPlaceholder { name: String },
    /// Request body on a verb that cannot carry one.
    IgnoredRequestBody,
    /// Request body `$ref` that does not resolve; the body was dropped.
    UnresolvedRequestBody { ref_path: String },
    /// Operation that does not have the expected shape and was skipped.
    MalformedOperation { reason: String },
    /// Tool name collided with an earlier endpoint and was suffixed.
    ToolRenamed { from: String, to: String },
}

/// A non-fatal observation tagged with its endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub method: HttpMethod,
    pub path: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: ", self.method, self.path)?;
        match &self.kind {
            DiagnosticKind::MissingDescription => {
                f.write_str("no summary or description, using a generated one")
            }
            DiagnosticKind::MissingResponse => f.write_str("no 2xx or default response declared"),
            DiagnosticKind::DroppedParameter { name, location } => {
                write!(f, "parameter '{name}' in '{location}' is not supported and was dropped")
            }
            DiagnosticKind::UnusedPathParameter { name } => {
                write!(f, "path parameter '{name}' does not appear in the path template")
            }
            DiagnosticKind::UndeclaredPlaceholder { name } => {
                write!(f, "placeholder '{{{name}}}' has no declared path parameter and is kept literally")
            }
            DiagnosticKind::IgnoredRequestBody => {
                f.write_str("request body is ignored for this method")
            }
            DiagnosticKind::UnresolvedRequestBody { ref_path } => {
                write!(f, "request body '{ref_path}' does not resolve and was dropped")
            }
            DiagnosticKind::MalformedOperation { reason } => {
                write!(f, "operation skipped: {reason}")
            }
            DiagnosticKind::ToolRenamed { from, to } => {
                write!(f, "tool name '{from}' is already taken, renamed to '{to}'")
            }
        }
    }
}

/// Result of endpoint extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub endpoints: Vec<Endpoint>,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn param(name: &str, location: ParamLocation, required: bool) -> Parameter {
        Parameter {
            name: name.into(),
            resolved_type: ResolvedType::String,
            required,
            description: String::new(),
            location,
        }
    }

    #[test]
    fn test_method_from_token() {
        assert_eq!(HttpMethod::from_token("get"), HttpMethod::Get);
        assert_eq!(HttpMethod::from_token("Patch"), HttpMethod::Patch);
        assert_eq!(
            HttpMethod::from_token("purge"),
            HttpMethod::Custom("PURGE".into())
        );
        assert_eq!(HttpMethod::from_token("head").as_str(), "HEAD");
    }

    #[test]
    fn test_allows_body() {
        assert!(HttpMethod::Post.allows_body());
        assert!(HttpMethod::Put.allows_body());
        assert!(HttpMethod::Patch.allows_body());
        assert!(!HttpMethod::Get.allows_body());
        assert!(!HttpMethod::Delete.allows_body());
        assert!(!HttpMethod::Custom("HEAD".into()).allows_body());
    }

    #[test]
    fn test_signature_order() {
        let endpoint = Endpoint {
            http_method: HttpMethod::Post,
            path: "/orgs/{org}/items".into(),
            tool_name: "CreateItem".into(),
            description: String::new(),
            path_parameters: vec![param("org", ParamLocation::Path, true)],
            query_parameters: vec![
                param("dry_run", ParamLocation::Query, false),
                param("version", ParamLocation::Query, true),
            ],
            header_parameters: vec![],
            request_body: Some(RequestBody {
                content_type: "application/json".into(),
                required: true,
                description: String::new(),
                schema_type: ResolvedType::Object,
            }),
            response: None,
        };

        let names: Vec<&str> = endpoint
            .signature()
            .iter()
            .map(|item| match item {
                SignatureItem::Param(p) => p.name.as_str(),
                SignatureItem::Body(_) => "body",
            })
            .collect();
        assert_eq!(names, ["org", "body", "version", "dry_run"]);
        assert!(endpoint.has_arguments());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            method: HttpMethod::Get,
            path: "/a/{b}".into(),
            kind: DiagnosticKind::UndeclaredPlaceholder { name: "b".into() },
        };
        assert_eq!(
            diagnostic.to_string(),
            "GET /a/{b}: placeholder '{b}' has no declared path parameter and is kept literally"
        );
    }
}
