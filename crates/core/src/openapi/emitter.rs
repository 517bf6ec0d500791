//! Rust tool wrapper emitter for OpenAPI specifications.
//!
//! This module is a thin wrapper around the IR-based code generation.
//! The pipeline is:
//! 1. Parse: OpenAPI JSON/YAML -> OpenApiSpec
//! 2. Normalize: OpenApiSpec -> Vec<Endpoint> (all OpenAPI logic resolved)
//! 3. Codegen: endpoints -> RsModule (Rust AST)
//! 4. Emit: RsModule -> String (via Emit trait)

use tracing::info;
use url::Url;

use crate::openapi::error::OpenApiError;
use crate::openapi::ir::{
    Diagnostic, Emit, EmitOptions, Endpoint, codegen_module, extract_endpoints,
};
use crate::openapi::spec::OpenApiSpec;

/// Validated generation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    namespace: String,
    base_url: Option<String>,
}

impl GenerateOptions {
    /// Validate a namespace and an optional base URL.
    ///
    /// The namespace needs at least one ASCII letter or digit. The base URL
    /// must be an absolute `http` or `https` URL; a trailing `/` is dropped.
    pub fn new(namespace: &str, base_url: Option<&str>) -> Result<Self, OpenApiError> {
        let namespace = namespace.trim();
        if !namespace.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(OpenApiError::InvalidNamespace(namespace.to_string()));
        }

        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(validate_base_url)
            .transpose()?;

        Ok(Self {
            namespace: namespace.to_string(),
            base_url,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

fn validate_base_url(raw: &str) -> Result<String, OpenApiError> {
    let invalid = |reason: String| OpenApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme '{}' is not supported, use http or https",
            parsed.scheme()
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// Output of one generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Rust source of the tool module
    pub code: String,
    /// Endpoints in document order, as they were emitted
    pub endpoints: Vec<Endpoint>,
    /// Non-fatal observations from extraction
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate Rust tool wrappers from an OpenAPI JSON or YAML document.
///
/// Identical input and options always produce byte-identical code.
pub fn generate(spec_text: &str, options: &GenerateOptions) -> Result<Generated, OpenApiError> {
    // Parse OpenAPI spec
    let spec = OpenApiSpec::parse(spec_text)?;

    // Normalize to endpoint IR (all OpenAPI logic resolved here)
    let extraction = extract_endpoints(&spec)?;

    // Generate Rust AST and emit to string
    let emit_options = EmitOptions {
        namespace: options.namespace.clone(),
        base_url: options.base_url.clone(),
    };
    let code = codegen_module(&extraction.endpoints, &emit_options).emit();

    info!(
        namespace = %options.namespace,
        tools = extraction.endpoints.len(),
        diagnostics = extraction.diagnostics.len(),
        "Generated tool module"
    );

    Ok(Generated {
        code,
        endpoints: extraction.endpoints,
        diagnostics: extraction.diagnostics,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_options_validation() {
        let options = GenerateOptions::new(" petstore ", Some("https://api.example.com/v1/")).unwrap();
        assert_eq!(options.namespace(), "petstore");
        assert_eq!(options.base_url(), Some("https://api.example.com/v1"));

        let no_url = GenerateOptions::new("petstore", None).unwrap();
        assert_eq!(no_url.base_url(), None);
        let blank_url = GenerateOptions::new("petstore", Some("  ")).unwrap();
        assert_eq!(blank_url.base_url(), None);
    }

    #[test]
    fn test_invalid_namespace() {
        let err = GenerateOptions::new("--", None).unwrap_err();
        assert!(matches!(err, OpenApiError::InvalidNamespace(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        for url in ["not a url", "ftp://example.com", "/relative/path"] {
            let err = GenerateOptions::new("api", Some(url)).unwrap_err();
            assert!(
                matches!(err, OpenApiError::InvalidBaseUrl { .. }),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_generate_reports_structural_errors() {
        let options = GenerateOptions::new("api", None).unwrap();
        let err = generate(r#"{ "openapi": "3.0.0" }"#, &options).unwrap_err();
        assert!(matches!(err, OpenApiError::MissingPaths));
    }

    #[test]
    fn test_generate_empty_paths() {
        let options = GenerateOptions::new("empty", None).unwrap();
        let generated = generate(r#"{ "paths": {} }"#, &options).unwrap();
        assert!(generated.endpoints.is_empty());
        assert!(generated.code.contains("pub mod empty {"));
        assert!(generated.code.contains("pub struct EmptyTools {"));
    }
}
