//! Normalization from OpenAPI spec to endpoint IR.
//!
//! This module handles all the OpenAPI-specific logic:
//! - Parameter merging (path-level, then operation-level overrides)
//! - Local `$ref` resolution for parameters, bodies and responses
//! - Tool naming and collision handling
//! - Diagnostics for everything that is dropped or synthesized

use tracing::{debug, warn};

use crate::openapi::error::OpenApiError;
use crate::openapi::spec::{self, Components, OpenApiSpec, Operation, RefOr};

use super::api::{
    Diagnostic, DiagnosticKind, Endpoint, Extraction, HttpMethod, ParamLocation, Parameter,
    RequestBody, Response,
};
use super::naming::{NameRegistry, resolve_tool_name};
use super::type_resolver::{ResolvedType, TypeResolver};

/// Content type used when a body or response declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Extract every endpoint of a validated document, in document order.
pub fn extract_endpoints(spec: &OpenApiSpec) -> Result<Extraction, OpenApiError> {
    spec.validate()?;

    let mut extractor = Extractor {
        components: &spec.components,
        types: TypeResolver::new(&spec.components),
        registry: NameRegistry::new(),
        diagnostics: Vec::new(),
    };

    let mut endpoints = Vec::new();
    for (path, item) in spec.paths() {
        for (method_key, operation) in &item.operations {
            let method = HttpMethod::from_token(method_key);
            match operation {
                Ok(operation) => endpoints.push(extractor.normalize_operation(
                    path,
                    method,
                    operation,
                    &item.parameters,
                )),
                Err(reason) => {
                    warn!(
                        method = %method,
                        path = %path,
                        reason = %reason,
                        "Skipping malformed operation"
                    );
                    let site = Site { method, path };
                    extractor.report(
                        &site,
                        DiagnosticKind::MalformedOperation {
                            reason: reason.clone(),
                        },
                    );
                }
            }
        }
    }

    debug!(
        endpoints = endpoints.len(),
        diagnostics = extractor.diagnostics.len(),
        "Extracted endpoints"
    );

    Ok(Extraction {
        endpoints,
        diagnostics: extractor.diagnostics,
    })
}

struct Extractor<'a> {
    components: &'a Components,
    types: TypeResolver<'a>,
    registry: NameRegistry,
    diagnostics: Vec<Diagnostic>,
}

/// Diagnostics are tagged with the endpoint they belong to.
struct Site<'p> {
    method: HttpMethod,
    path: &'p str,
}

impl Extractor<'_> {
    fn report(&mut self, site: &Site<'_>, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic {
            method: site.method.clone(),
            path: site.path.to_string(),
            kind,
        });
    }

    fn normalize_operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        operation: &Operation,
        shared_params: &[RefOr<spec::Parameter>],
    ) -> Endpoint {
        let site = Site {
            method: method.clone(),
            path,
        };

        let candidate = resolve_tool_name(&method, path, operation.operation_id.as_deref());
        let tool_name = self.registry.claim(&candidate);
        if tool_name != candidate {
            warn!(
                method = %method,
                path,
                from = %candidate,
                to = %tool_name,
                "Tool name collision, renamed"
            );
            self.report(
                &site,
                DiagnosticKind::ToolRenamed {
                    from: candidate,
                    to: tool_name.clone(),
                },
            );
        }

        let description = self.describe(&site, operation);
        let (path_parameters, query_parameters, header_parameters) =
            self.partition_parameters(&site, shared_params, &operation.parameters);
        let request_body = self.request_body(&site, operation);
        let response = self.response(&site, operation);

        debug!(
            method = %method,
            path,
            tool = %tool_name,
            path_params = path_parameters.len(),
            query_params = query_parameters.len(),
            has_body = request_body.is_some(),
            "Normalized endpoint"
        );

        Endpoint {
            http_method: method,
            path: path.to_string(),
            tool_name,
            description,
            path_parameters,
            query_parameters,
            header_parameters,
            request_body,
            response,
        }
    }

    fn describe(&mut self, site: &Site<'_>, operation: &Operation) -> String {
        let declared = [&operation.summary, &operation.description]
            .into_iter()
            .flatten()
            .map(|text| text.trim())
            .find(|text| !text.is_empty());

        match declared {
            Some(text) => text.to_string(),
            None => {
                self.report(site, DiagnosticKind::MissingDescription);
                format!("{} {}", site.method, site.path)
            }
        }
    }

    /// Merge path-level and operation-level parameters and split them by
    /// location. An operation-level parameter replaces a path-level one with
    /// the same name and location, keeping its position.
    fn partition_parameters(
        &mut self,
        site: &Site<'_>,
        shared: &[RefOr<spec::Parameter>],
        own: &[RefOr<spec::Parameter>],
    ) -> (Vec<Parameter>, Vec<Parameter>, Vec<Parameter>) {
        let components = self.components;
        let mut merged: Vec<&spec::Parameter> = Vec::new();
        for item in shared.iter().chain(own) {
            let Some(param) = components.parameter(item) else {
                if let RefOr::Ref { ref_path } = item {
                    self.report(
                        site,
                        DiagnosticKind::DroppedParameter {
                            name: ref_path.clone(),
                            location: "$ref".to_string(),
                        },
                    );
                }
                continue;
            };
            match merged
                .iter()
                .position(|p| p.name == param.name && p.location == param.location)
            {
                Some(index) => merged[index] = param,
                None => merged.push(param),
            }
        }

        let template_names = placeholders(site.path);
        let mut path_params = Vec::new();
        let mut query_params = Vec::new();
        let mut header_params = Vec::new();

        for param in merged {
            let Some(location) = ParamLocation::from_token(&param.location) else {
                debug!(name = %param.name, location = %param.location, "Dropping parameter");
                self.report(
                    site,
                    DiagnosticKind::DroppedParameter {
                        name: param.name.clone(),
                        location: param.location.clone(),
                    },
                );
                continue;
            };

            match location {
                ParamLocation::Path => {
                    if template_names.iter().any(|p| *p == param.name) {
                        path_params.push(self.parameter(param, location, true));
                    } else {
                        self.report(
                            site,
                            DiagnosticKind::UnusedPathParameter {
                                name: param.name.clone(),
                            },
                        );
                    }
                }
                ParamLocation::Query => {
                    query_params.push(self.parameter(param, location, param.required));
                }
                ParamLocation::Header => {
                    header_params.push(self.parameter(param, location, param.required));
                }
            }
        }

        for placeholder in template_names {
            if !path_params.iter().any(|p| p.name == placeholder) {
                self.report(
                    site,
                    DiagnosticKind::UndeclaredPlaceholder {
                        name: placeholder.to_string(),
                    },
                );
            }
        }

        (path_params, query_params, header_params)
    }

    fn parameter(
        &self,
        param: &spec::Parameter,
        location: ParamLocation,
        required: bool,
    ) -> Parameter {
        Parameter {
            name: param.name.clone(),
            resolved_type: self.types.resolve(param.schema.as_ref()),
            required,
            description: param
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            location,
        }
    }

    fn request_body(&mut self, site: &Site<'_>, operation: &Operation) -> Option<RequestBody> {
        let item = operation.request_body.as_ref()?;
        if !site.method.allows_body() {
            self.report(site, DiagnosticKind::IgnoredRequestBody);
            return None;
        }
        let components = self.components;
        let Some(body) = components.request_body(item) else {
            if let RefOr::Ref { ref_path } = item {
                self.report(
                    site,
                    DiagnosticKind::UnresolvedRequestBody {
                        ref_path: ref_path.clone(),
                    },
                );
            }
            return None;
        };

        let (content_type, schema_type) = match body.content.first() {
            Some((content_type, media)) => (
                content_type.clone(),
                self.types.resolve(media.schema.as_ref()),
            ),
            None => (DEFAULT_CONTENT_TYPE.to_string(), ResolvedType::Object),
        };
        let description = body
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map_or_else(|| format!("Request body ({content_type})"), str::to_string);

        Some(RequestBody {
            content_type,
            required: body.required,
            description,
            schema_type,
        })
    }

    /// The first 2xx response in document order, otherwise `default`.
    fn response(&mut self, site: &Site<'_>, operation: &Operation) -> Option<Response> {
        let declared = operation
            .responses
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .or_else(|| operation.responses.get_key_value("default"))
            .map(|(_, item)| item);

        let Some(item) = declared else {
            self.report(site, DiagnosticKind::MissingResponse);
            return None;
        };

        let media = self
            .components
            .response(item)
            .and_then(|response| response.content.first());
        let (content_type, schema_type) = match media {
            Some((content_type, media)) => (
                content_type.clone(),
                self.types.resolve(media.schema.as_ref()),
            ),
            None => (DEFAULT_CONTENT_TYPE.to_string(), ResolvedType::Object),
        };

        Some(Response {
            status_code: 200,
            content_type,
            schema_type,
        })
    }
}

/// Placeholder names of a path template, in order of appearance.
pub fn placeholders(path: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        let name = &after[..close];
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
        rest = &after[close + 1..];
    }
    names
}
