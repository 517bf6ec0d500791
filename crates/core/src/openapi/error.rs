//! Structural errors raised by the generation pipeline.

use std::fmt;

use thiserror::Error;

/// Serialization format of an OpenAPI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => f.write_str("JSON"),
            DocumentFormat::Yaml => f.write_str("YAML"),
        }
    }
}

/// Fatal errors for a generation run. No partial output is produced when one
/// of these is returned.
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// The document is not valid JSON/YAML or does not have the OpenAPI shape.
    #[error("Failed to parse OpenAPI {format} document: {message}")]
    Parse {
        format: DocumentFormat,
        message: String,
    },

    /// The document has no `paths` object.
    #[error("OpenAPI document has no `paths` object")]
    MissingPaths,

    /// The same path template appears twice under `paths`.
    #[error("Path '{path}' is declared more than once")]
    DuplicatePath { path: String },

    /// The same HTTP method appears twice in one path item.
    #[error("Method '{method}' is declared more than once on path '{path}'")]
    DuplicateMethod { path: String, method: String },

    /// The namespace cannot produce a module identifier.
    #[error("Invalid namespace '{0}': it must contain at least one letter or digit")]
    InvalidNamespace(String),

    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
