//! Translation pipeline from OpenAPI documents to Rust MCP tool wrappers.

pub mod openapi;

pub use openapi::ir::{Diagnostic, DiagnosticKind, Endpoint, HttpMethod};
pub use openapi::{DocumentFormat, GenerateOptions, Generated, OpenApiError, OpenApiSpec, generate};
