//! Code generation from endpoint IR to Rust AST.
//!
//! This module transforms normalized endpoints into Rust AST nodes: one
//! argument struct and one `#[tool]` method per endpoint, a tool container
//! with its router, and the private helpers every tool shares.
//!
//! The generated AST can then be emitted to strings via the `Emit` trait.

use std::collections::HashSet;

use super::api::{Endpoint, HttpMethod, ParamLocation, SignatureItem};
use super::types::{
    FormatPart, RsConst, RsExpr, RsField, RsFn, RsImpl, RsItem, RsModule, RsParam, RsStmt,
    RsStruct, RsType, RsUse,
};
use super::utils::{escape_rust_string, sanitize_rust_identifier, to_pascal_case};

/// Host used in URLs when no base URL is configured.
pub const PLACEHOLDER_BASE_URL: &str = "http://localhost:8080";

/// Methods the container already defines (`tool_router` comes from the macro).
const RESERVED_METHODS: [&str; 2] = ["new", "tool_router"];

/// Module-level emission settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Namespace the module and container are named after
    pub namespace: String,
    /// Absolute base URL without a trailing slash
    pub base_url: Option<String>,
}

impl EmitOptions {
    /// snake_case module name.
    pub fn module_name(&self) -> String {
        sanitize_rust_identifier(&self.namespace)
    }

    /// PascalCase container struct name, e.g. `PetstoreTools`.
    pub fn container_name(&self) -> String {
        let pascal = to_pascal_case(&self.namespace);
        if pascal.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{pascal}Tools")
        } else {
            format!("{pascal}Tools")
        }
    }
}

/// Generate a complete Rust module from normalized endpoints.
pub fn codegen_module(endpoints: &[Endpoint], options: &EmitOptions) -> RsModule {
    let container = options.container_name();
    let has_args = endpoints.iter().any(Endpoint::has_arguments);
    let has_custom = endpoints
        .iter()
        .any(|e| matches!(e.http_method, HttpMethod::Custom(_)));

    let mut items = Vec::new();
    if let Some(base_url) = &options.base_url {
        items.push(RsItem::Const(RsConst {
            name: "BASE_URL".into(),
            ty: RsType::reference(RsType::path("str")),
            value: RsExpr::str(base_url.clone()),
        }));
    }

    let mut method_names: HashSet<String> =
        RESERVED_METHODS.iter().map(ToString::to_string).collect();
    let mut tools = vec![codegen_constructor()];
    for endpoint in endpoints {
        let fields = arg_fields(endpoint);
        if endpoint.has_arguments() {
            items.push(RsItem::Struct(codegen_args_struct(endpoint, &fields)));
        }
        let fn_name = unique_ident(&method_ident(&endpoint.tool_name), &mut method_names, "_tool");
        tools.push(codegen_tool(endpoint, &fields, &fn_name, options));
    }

    items.push(RsItem::Struct(codegen_container(&container)));
    items.push(RsItem::Impl(RsImpl {
        attrs: vec!["tool_router".into()],
        trait_name: None,
        target: container.clone(),
        fns: tools,
    }));
    items.push(RsItem::Impl(codegen_default_impl(&container)));
    items.push(RsItem::Impl(codegen_server_handler(&container)));
    items.extend(codegen_helpers(has_custom).into_iter().map(RsItem::Fn));

    RsModule {
        header: vec![
            "Generated by toolforge from an OpenAPI document.".into(),
            "Do not edit by hand; regenerate from the document instead.".into(),
        ],
        name: options.module_name(),
        uses: codegen_uses(has_args),
        items,
    }
}

fn codegen_uses(has_args: bool) -> Vec<RsUse> {
    let mut uses = vec![RsUse {
        path: "rmcp::handler::server::router::tool".into(),
        items: vec!["ToolRouter".into()],
    }];
    if has_args {
        uses.push(RsUse {
            path: "rmcp::handler::server::wrapper".into(),
            items: vec!["Parameters".into()],
        });
    }
    uses.push(RsUse {
        path: "rmcp::model".into(),
        items: vec!["ServerCapabilities".into(), "ServerInfo".into()],
    });

    let mut rmcp_items = vec!["ServerHandler".to_string()];
    if has_args {
        rmcp_items.push("schemars".into());
    }
    rmcp_items.extend(["tool", "tool_handler", "tool_router"].map(String::from));
    uses.push(RsUse {
        path: "rmcp".into(),
        items: rmcp_items,
    });

    if has_args {
        uses.push(RsUse {
            path: "serde".into(),
            items: vec!["Deserialize".into()],
        });
    }
    uses.push(RsUse {
        path: "serde_json".into(),
        items: vec!["Value".into(), "json".into()],
    });
    uses
}

// =============================================================================
// Argument structs
// =============================================================================

/// A signature entry with its Rust field name and wire key.
struct ArgField<'a> {
    item: SignatureItem<'a>,
    ident: String,
    key: String,
}

impl ArgField<'_> {
    fn is_optional(&self) -> bool {
        matches!(self.item, SignatureItem::Param(p) if !p.required)
    }
}

/// Assign unique field names in signature order. The wire key stays the raw
/// parameter name unless an earlier field already uses it.
fn arg_fields(endpoint: &Endpoint) -> Vec<ArgField<'_>> {
    let mut idents = HashSet::new();
    let mut keys = HashSet::new();
    endpoint
        .signature()
        .into_iter()
        .map(|item| {
            let raw = match item {
                SignatureItem::Param(p) => p.name.as_str(),
                SignatureItem::Body(_) => "body",
            };
            let ident = unique_ident(&sanitize_rust_identifier(raw), &mut idents, "_2");
            let key = if keys.insert(raw.to_string()) {
                raw.to_string()
            } else {
                keys.insert(ident.clone());
                ident.clone()
            };
            ArgField { item, ident, key }
        })
        .collect()
}

/// Snake-case method name for a tool. The `#[tool]` macro derives
/// `<name>_tool_attr` from it, so the name must not end in `_`.
fn method_ident(tool_name: &str) -> String {
    let ident = sanitize_rust_identifier(tool_name);
    match ident.strip_suffix('_') {
        Some(stem) => format!("{stem}_tool"),
        None => ident,
    }
}

/// Return `base`, or `base` plus a suffix, that is not yet in `taken`.
///
/// A suffix ending in a digit is incremented (`_2`, `_3`, ...); any other
/// suffix is repeated.
fn unique_ident(base: &str, taken: &mut HashSet<String>, suffix: &str) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let numbered = suffix.strip_suffix(|c: char| c.is_ascii_digit());
    let mut n: usize = 2;
    let mut candidate = format!("{base}{suffix}");
    loop {
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        candidate = match numbered {
            Some(stem) => {
                n += 1;
                format!("{base}{stem}{n}")
            }
            None => format!("{candidate}{suffix}"),
        };
    }
}

fn codegen_args_struct(endpoint: &Endpoint, fields: &[ArgField<'_>]) -> RsStruct {
    RsStruct {
        name: args_struct_name(endpoint),
        docs: vec![format!("Arguments for the `{}` tool.", endpoint.tool_name)],
        derives: vec![
            "Debug".into(),
            "Deserialize".into(),
            "schemars::JsonSchema".into(),
        ],
        fields: fields.iter().map(codegen_field).collect(),
        is_pub: true,
    }
}

fn args_struct_name(endpoint: &Endpoint) -> String {
    format!("{}Args", endpoint.tool_name)
}

fn codegen_field(field: &ArgField<'_>) -> RsField {
    let (description, type_note) = match field.item {
        SignatureItem::Param(p) => (
            p.description.clone(),
            format!("Schema type: `{}`.", p.resolved_type),
        ),
        SignatureItem::Body(b) => (
            b.description.clone(),
            format!(
                "Content type: `{}`. Schema type: `{}`.",
                b.content_type, b.schema_type
            ),
        ),
    };

    let mut docs: Vec<String> = description.lines().map(|l| l.trim_end().to_string()).collect();
    if !docs.is_empty() {
        docs.push(String::new());
    }
    docs.push(type_note);

    let mut attrs = Vec::new();
    let ty = if field.is_optional() {
        attrs.push("serde(default)".to_string());
        RsType::generic("Option", vec![RsType::path("String")])
    } else {
        RsType::path("String")
    };
    if field.key != field.ident {
        attrs.push(format!(
            "serde(rename = \"{}\")",
            escape_rust_string(&field.key)
        ));
    }

    RsField {
        name: field.ident.clone(),
        ty,
        docs,
        attrs,
        is_pub: true,
    }
}

// =============================================================================
// Tool methods
// =============================================================================

fn args_field(ident: &str) -> RsExpr {
    RsExpr::ident("args").field(ident)
}

fn codegen_tool(
    endpoint: &Endpoint,
    fields: &[ArgField<'_>],
    fn_name: &str,
    options: &EmitOptions,
) -> RsFn {
    let method = endpoint.http_method.as_str();
    let mut body = Vec::new();

    if options.base_url.is_none() {
        body.push(RsStmt::Comment(format!(
            "FIXME: replace {PLACEHOLDER_BASE_URL} with the API base URL before use."
        )));
    }
    body.push(RsStmt::Let {
        name: "url".into(),
        mutable: false,
        ty: None,
        value: codegen_url(endpoint, fields, options),
    });
    body.extend(codegen_query(fields));
    body.push(RsStmt::Let {
        name: "request".into(),
        mutable: false,
        ty: None,
        value: codegen_request(endpoint, fields),
    });
    body.push(RsStmt::Tail(RsExpr::Match {
        scrutinee: Box::new(
            RsExpr::call("dispatch", vec![RsExpr::ident("request")]).awaited(),
        ),
        arms: vec![
            (
                "Ok(data)".into(),
                RsExpr::call(
                    "success",
                    vec![
                        RsExpr::str(method),
                        RsExpr::ident("url").referenced(),
                        RsExpr::ident("data"),
                    ],
                ),
            ),
            (
                "Err(error)".into(),
                RsExpr::call(
                    "failure",
                    vec![
                        RsExpr::str(method),
                        RsExpr::str(endpoint.path.clone()),
                        RsExpr::ident("error").referenced(),
                    ],
                ),
            ),
        ],
    }));

    let params = if endpoint.has_arguments() {
        vec![RsParam {
            pattern: "Parameters(args)".into(),
            ty: RsType::generic("Parameters", vec![RsType::path(args_struct_name(endpoint))]),
        }]
    } else {
        Vec::new()
    };

    RsFn {
        name: fn_name.to_string(),
        docs: Vec::new(),
        attrs: vec![format!(
            "tool(name = \"{}\", description = \"{}\")",
            escape_rust_string(&endpoint.tool_name),
            escape_rust_string(&endpoint.description)
        )],
        is_pub: true,
        is_async: true,
        receiver: Some("&self".into()),
        params,
        ret: Some(RsType::path("String")),
        body,
    }
}

/// Piece of a path template.
enum TemplatePiece<'a> {
    Static(&'a str),
    Placeholder(&'a str),
}

fn template_pieces(path: &str) -> Vec<TemplatePiece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        if open > 0 {
            pieces.push(TemplatePiece::Static(&rest[..open]));
        }
        pieces.push(TemplatePiece::Placeholder(&after[..close]));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        pieces.push(TemplatePiece::Static(rest));
    }
    pieces
}

/// URL expression: base plus the path template with declared placeholders
/// filled from the arguments. Undeclared placeholders stay literal.
fn codegen_url(endpoint: &Endpoint, fields: &[ArgField<'_>], options: &EmitOptions) -> RsExpr {
    let mut parts = Vec::new();
    match &options.base_url {
        Some(_) => parts.push(FormatPart::Arg(RsExpr::ident("BASE_URL"))),
        None => parts.push(FormatPart::Literal(PLACEHOLDER_BASE_URL.into())),
    }

    for piece in template_pieces(&endpoint.path) {
        match piece {
            TemplatePiece::Static(text) => parts.push(FormatPart::Literal(text.into())),
            TemplatePiece::Placeholder(name) => {
                let declared = fields.iter().find(|f| {
                    matches!(f.item, SignatureItem::Param(p)
                        if p.location == ParamLocation::Path && p.name == name)
                });
                match declared {
                    Some(field) => parts.push(FormatPart::Arg(args_field(&field.ident))),
                    None => parts.push(FormatPart::Literal(format!("{{{name}}}"))),
                }
            }
        }
    }

    if parts.iter().any(|p| matches!(p, FormatPart::Arg(_))) {
        return RsExpr::Format(parts);
    }

    let literal: String = parts
        .into_iter()
        .filter_map(|p| match p {
            FormatPart::Literal(text) => Some(text),
            FormatPart::Arg(_) => None,
        })
        .collect();
    RsExpr::call("String::from", vec![RsExpr::str(literal)])
}

/// Query string assembly. Required pairs are always sent; optional pairs
/// only when present and non-empty.
fn codegen_query(fields: &[ArgField<'_>]) -> Vec<RsStmt> {
    let query_fields: Vec<&ArgField<'_>> = fields
        .iter()
        .filter(|f| {
            matches!(f.item, SignatureItem::Param(p) if p.location == ParamLocation::Query)
        })
        .collect();
    if query_fields.is_empty() {
        return Vec::new();
    }

    let push = |name: &str, value: RsExpr| {
        RsStmt::Expr(RsExpr::ident("query").method(
            "push",
            vec![RsExpr::Format(vec![
                FormatPart::Literal(format!("{name}=")),
                FormatPart::Arg(value),
            ])],
        ))
    };

    let mut stmts = vec![RsStmt::Let {
        name: "query".into(),
        mutable: true,
        ty: Some(RsType::generic("Vec", vec![RsType::path("String")])),
        value: RsExpr::call("Vec::new", vec![]),
    }];

    for field in query_fields {
        let SignatureItem::Param(param) = field.item else {
            continue;
        };
        if field.is_optional() {
            stmts.push(RsStmt::IfLet {
                pattern: "Some(value)".into(),
                value: args_field(&field.ident).method("as_deref", vec![]).method(
                    "filter",
                    vec![RsExpr::Closure {
                        params: vec!["value".into()],
                        body: Box::new(
                            RsExpr::ident("value").method("is_empty", vec![]).negated(),
                        ),
                    }],
                ),
                body: vec![push(&param.name, RsExpr::ident("value"))],
            });
        } else {
            stmts.push(push(&param.name, args_field(&field.ident)));
        }
    }

    stmts.push(RsStmt::Let {
        name: "url".into(),
        mutable: false,
        ty: None,
        value: RsExpr::If {
            cond: Box::new(RsExpr::ident("query").method("is_empty", vec![])),
            then: Box::new(RsExpr::ident("url")),
            otherwise: Box::new(RsExpr::Format(vec![
                FormatPart::Arg(RsExpr::ident("url")),
                FormatPart::Literal("?".into()),
                FormatPart::Arg(RsExpr::ident("query").method("join", vec![RsExpr::str("&")])),
            ])),
        },
    });
    stmts
}

fn codegen_request(endpoint: &Endpoint, fields: &[ArgField<'_>]) -> RsExpr {
    let client = RsExpr::ident("self").field("client");
    let url = RsExpr::ident("url").referenced();

    match &endpoint.http_method {
        HttpMethod::Get => client.method("get", vec![url]),
        HttpMethod::Delete => client.method("delete", vec![url]),
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
            let verb = endpoint.http_method.as_str().to_ascii_lowercase();
            let builder = client.method(verb, vec![url]);
            let body_field = fields
                .iter()
                .find(|f| matches!(f.item, SignatureItem::Body(_)));
            match (&endpoint.request_body, body_field) {
                (Some(body), Some(field)) => builder
                    .method(
                        "header",
                        vec![RsExpr::str("Content-Type"), RsExpr::str(body.content_type.clone())],
                    )
                    .method("body", vec![args_field(&field.ident)]),
                _ => builder.method("body", vec![RsExpr::call("String::new", vec![])]),
            }
        }
        HttpMethod::Custom(token) => client.method(
            "request",
            vec![RsExpr::call("custom_method", vec![RsExpr::str(token.clone())]), url],
        ),
    }
}

// =============================================================================
// Container and helpers
// =============================================================================

fn codegen_container(name: &str) -> RsStruct {
    RsStruct {
        name: name.to_string(),
        docs: vec!["Tool provider exposing every API operation as an MCP tool.".into()],
        derives: vec!["Clone".into()],
        fields: vec![
            RsField {
                name: "client".into(),
                ty: RsType::path("reqwest::Client"),
                docs: Vec::new(),
                attrs: Vec::new(),
                is_pub: false,
            },
            RsField {
                name: "tool_router".into(),
                ty: RsType::generic("ToolRouter", vec![RsType::path("Self")]),
                docs: Vec::new(),
                attrs: Vec::new(),
                is_pub: false,
            },
        ],
        is_pub: true,
    }
}

fn codegen_constructor() -> RsFn {
    RsFn {
        name: "new".into(),
        docs: Vec::new(),
        attrs: Vec::new(),
        is_pub: true,
        is_async: false,
        receiver: None,
        params: Vec::new(),
        ret: Some(RsType::path("Self")),
        body: vec![RsStmt::Raw(
            "Self {\n    client: reqwest::Client::new(),\n    tool_router: Self::tool_router(),\n}"
                .into(),
        )],
    }
}

fn codegen_default_impl(container: &str) -> RsImpl {
    RsImpl {
        attrs: Vec::new(),
        trait_name: Some("Default".into()),
        target: container.to_string(),
        fns: vec![RsFn {
            name: "default".into(),
            docs: Vec::new(),
            attrs: Vec::new(),
            is_pub: false,
            is_async: false,
            receiver: None,
            params: Vec::new(),
            ret: Some(RsType::path("Self")),
            body: vec![RsStmt::Tail(RsExpr::call("Self::new", vec![]))],
        }],
    }
}

fn codegen_server_handler(container: &str) -> RsImpl {
    RsImpl {
        attrs: vec!["tool_handler".into()],
        trait_name: Some("ServerHandler".into()),
        target: container.to_string(),
        fns: vec![RsFn {
            name: "get_info".into(),
            docs: Vec::new(),
            attrs: Vec::new(),
            is_pub: false,
            is_async: false,
            receiver: Some("&self".into()),
            params: Vec::new(),
            ret: Some(RsType::path("ServerInfo")),
            body: vec![RsStmt::Raw(
                "ServerInfo {\n    capabilities: ServerCapabilities::builder().enable_tools().build(),\n    ..Default::default()\n}"
                    .into(),
            )],
        }],
    }
}

fn helper(name: &str, params: Vec<(&str, RsType)>, ret: RsType, is_async: bool, body: &str) -> RsFn {
    RsFn {
        name: name.to_string(),
        docs: Vec::new(),
        attrs: Vec::new(),
        is_pub: false,
        is_async,
        receiver: None,
        params: params
            .into_iter()
            .map(|(pattern, ty)| RsParam {
                pattern: pattern.to_string(),
                ty,
            })
            .collect(),
        ret: Some(ret),
        body: vec![RsStmt::Raw(body.to_string())],
    }
}

fn codegen_helpers(has_custom: bool) -> Vec<RsFn> {
    let str_ref = || RsType::reference(RsType::path("str"));
    let mut helpers = vec![
        helper(
            "dispatch",
            vec![("request", RsType::path("reqwest::RequestBuilder"))],
            RsType::generic("Result", vec![RsType::path("Value"), RsType::path("String")]),
            true,
            r#"let response = request.send().await.map_err(|error| error.to_string())?;
let status = response.status();
if !status.is_success() {
    return Err(format!("HTTP {status}"));
}
let text = response.text().await.map_err(|error| error.to_string())?;
if text.trim().is_empty() {
    return Ok(Value::Null);
}
serde_json::from_str(&text).map_err(|error| error.to_string())"#,
        ),
        helper(
            "success",
            vec![
                ("method", str_ref()),
                ("url", str_ref()),
                ("data", RsType::path("Value")),
            ],
            RsType::path("String"),
            false,
            r#"json!({ "success": true, "data": data, "method": method, "url": url }).to_string()"#,
        ),
        helper(
            "failure",
            vec![
                ("method", str_ref()),
                ("endpoint", str_ref()),
                ("error", str_ref()),
            ],
            RsType::path("String"),
            false,
            r#"json!({ "success": false, "error": error, "method": method, "endpoint": endpoint }).to_string()"#,
        ),
    ];
    if has_custom {
        helpers.push(helper(
            "custom_method",
            vec![("token", str_ref())],
            RsType::path("reqwest::Method"),
            false,
            "reqwest::Method::from_bytes(token.as_bytes()).unwrap_or(reqwest::Method::GET)",
        ));
    }
    helpers
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::ir::api::{Parameter, RequestBody};
    use crate::openapi::ir::emit::Emit;
    use crate::openapi::ir::type_resolver::ResolvedType;

    fn param(name: &str, location: ParamLocation, required: bool) -> Parameter {
        Parameter {
            name: name.into(),
            resolved_type: ResolvedType::String,
            required,
            description: String::new(),
            location,
        }
    }

    fn endpoint(method: HttpMethod, path: &str, tool_name: &str) -> Endpoint {
        Endpoint {
            http_method: method,
            path: path.into(),
            tool_name: tool_name.into(),
            description: format!("Calls {tool_name}"),
            path_parameters: Vec::new(),
            query_parameters: Vec::new(),
            header_parameters: Vec::new(),
            request_body: None,
            response: None,
        }
    }

    fn options(base_url: Option<&str>) -> EmitOptions {
        EmitOptions {
            namespace: "petstore".into(),
            base_url: base_url.map(str::to_string),
        }
    }

    fn generate(endpoints: &[Endpoint], base_url: Option<&str>) -> String {
        codegen_module(endpoints, &options(base_url)).emit()
    }

    #[test]
    fn test_names_from_namespace() {
        let opts = EmitOptions {
            namespace: "Pet Store".into(),
            base_url: None,
        };
        assert_eq!(opts.module_name(), "pet_store");
        assert_eq!(opts.container_name(), "PetStoreTools");

        let digits = EmitOptions {
            namespace: "3d-api".into(),
            base_url: None,
        };
        assert_eq!(digits.module_name(), "_3d_api");
        assert_eq!(digits.container_name(), "_3dApiTools");
    }

    #[test]
    fn test_url_with_base_url() {
        let mut ep = endpoint(HttpMethod::Get, "/users/{id}", "GetUserById");
        ep.path_parameters.push(param("id", ParamLocation::Path, true));
        let code = generate(&[ep], Some("https://api.example.com/v1"));

        assert!(code.contains("const BASE_URL: &str = \"https://api.example.com/v1\";"));
        assert!(code.contains("let url = format!(\"{}/users/{}\", BASE_URL, args.id);"));
        assert!(code.contains("let request = self.client.get(&url);"));
        assert!(code.contains("Ok(data) => success(\"GET\", &url, data),"));
        assert!(code.contains("Err(error) => failure(\"GET\", \"/users/{id}\", &error),"));
        assert!(!code.contains("FIXME"));
    }

    #[test]
    fn test_url_without_base_url() {
        let ep = endpoint(HttpMethod::Get, "/users", "GetUsers");
        let code = generate(&[ep], None);

        assert!(!code.contains("BASE_URL"));
        assert!(code.contains(
            "// FIXME: replace http://localhost:8080 with the API base URL before use."
        ));
        assert!(code.contains("let url = String::from(\"http://localhost:8080/users\");"));
        assert!(code.contains("pub async fn get_users(&self) -> String {"));
        assert!(!code.contains("use rmcp::handler::server::wrapper::Parameters;"));
        assert!(!code.contains("use serde::Deserialize;"));
    }

    #[test]
    fn test_undeclared_placeholder_stays_literal() {
        let mut ep = endpoint(HttpMethod::Get, "/a/{known}/{ghost}", "GetAById");
        ep.path_parameters.push(param("known", ParamLocation::Path, true));
        let code = generate(&[ep], Some("https://x.test"));
        assert!(code.contains("format!(\"{}/a/{}/{{ghost}}\", BASE_URL, args.known)"));
    }

    #[test]
    fn test_query_construction() {
        let mut ep = endpoint(HttpMethod::Get, "/pets", "GetPets");
        ep.query_parameters.push(param("cursor", ParamLocation::Query, false));
        ep.query_parameters.push(param("limit", ParamLocation::Query, true));
        let code = generate(&[ep], Some("https://x.test"));

        assert!(code.contains("let mut query: Vec<String> = Vec::new();"));
        let required = code.find("query.push(format!(\"limit={}\", args.limit));").unwrap();
        let optional = code
            .find("if let Some(value) = args.cursor.as_deref().filter(|value| !value.is_empty()) {")
            .unwrap();
        assert!(required < optional, "required query pairs come first");
        assert!(code.contains("query.push(format!(\"cursor={}\", value));"));
        assert!(code.contains(
            "let url = if query.is_empty() { url } else { format!(\"{}?{}\", url, query.join(\"&\")) };"
        ));
        assert!(code.contains("#[serde(default)]\n        pub cursor: Option<String>,"));
        assert!(code.contains("pub limit: String,"));
    }

    #[test]
    fn test_body_methods() {
        let mut post = endpoint(HttpMethod::Post, "/pets", "CreatePet");
        post.request_body = Some(RequestBody {
            content_type: "application/json".into(),
            required: true,
            description: "The pet".into(),
            schema_type: ResolvedType::Object,
        });
        let put = endpoint(HttpMethod::Put, "/pets", "UpdatePet");
        let code = generate(&[post, put], Some("https://x.test"));

        assert!(code.contains(
            "let request = self.client.post(&url).header(\"Content-Type\", \"application/json\").body(args.body);"
        ));
        assert!(code.contains("let request = self.client.put(&url).body(String::new());"));
        assert!(code.contains("/// The pet\n        ///\n        /// Content type: `application/json`. Schema type: `serde_json::Value`.\n        pub body: String,"));
    }

    #[test]
    fn test_custom_method_helper() {
        let plain = generate(&[endpoint(HttpMethod::Delete, "/a", "DeleteA")], None);
        assert!(plain.contains("self.client.delete(&url)"));
        assert!(!plain.contains("fn custom_method"));

        let custom = generate(
            &[endpoint(HttpMethod::Custom("PURGE".into()), "/cache", "PurgeCache")],
            None,
        );
        assert!(custom.contains("self.client.request(custom_method(\"PURGE\"), &url)"));
        assert!(custom.contains("fn custom_method(token: &str) -> reqwest::Method {"));
    }

    #[test]
    fn test_field_names_are_sanitized_and_unique() {
        let mut ep = endpoint(HttpMethod::Get, "/items/{id}", "GetItemById");
        ep.path_parameters.push(param("id", ParamLocation::Path, true));
        ep.query_parameters.push(param("id", ParamLocation::Query, true));
        ep.query_parameters.push(param("page[size]", ParamLocation::Query, true));
        ep.query_parameters.push(param("type", ParamLocation::Query, true));
        let code = generate(&[ep], Some("https://x.test"));

        assert!(code.contains("pub id: String,"));
        assert!(!code.contains("#[serde(rename = \"id_2\")]"));
        assert!(code.contains("pub id_2: String,"));
        assert!(code.contains("#[serde(rename = \"page[size]\")]\n        pub page_size: String,"));
        assert!(code.contains("#[serde(rename = \"type\")]\n        pub type_: String,"));
        assert!(code.contains("query.push(format!(\"id={}\", args.id_2));"));
        assert!(code.contains("query.push(format!(\"page[size]={}\", args.page_size));"));
    }

    #[test]
    fn test_reserved_method_names() {
        let code = generate(&[endpoint(HttpMethod::Get, "/x", "New")], None);
        assert!(code.contains("pub fn new() -> Self {"));
        assert!(code.contains("pub async fn new_tool(&self) -> String {"));
        assert!(!code.contains("fn new_("));
    }

    #[test]
    fn test_method_names_never_end_in_underscore() {
        let code = generate(
            &[
                endpoint(HttpMethod::Get, "/a", "Type"),
                endpoint(HttpMethod::Get, "/b", "ToolRouter"),
                endpoint(HttpMethod::Get, "/c", "Tool_Router"),
            ],
            None,
        );
        assert!(code.contains("pub async fn type_tool(&self) -> String {"));
        assert!(code.contains("pub async fn tool_router_tool(&self) -> String {"));
        assert!(code.contains("pub async fn tool_router_tool_tool(&self) -> String {"));
        assert!(!code.contains("_(&self)"));
    }

    #[test]
    fn test_description_is_escaped() {
        let mut ep = endpoint(HttpMethod::Get, "/x", "GetXes");
        ep.description = "Say \"hi\"\nnow".into();
        let code = generate(&[ep], None);
        assert!(code.contains(
            "#[tool(name = \"GetXes\", description = \"Say \\\"hi\\\"\\nnow\")]"
        ));
    }

    #[test]
    fn test_module_shape() {
        let mut ep = endpoint(HttpMethod::Get, "/users/{id}", "GetUserById");
        ep.path_parameters.push(param("id", ParamLocation::Path, true));
        let code = generate(&[ep], Some("https://x.test"));

        assert!(code.starts_with("// Generated by toolforge from an OpenAPI document.\n"));
        assert!(code.contains("pub mod petstore {\n"));
        assert!(code.contains("    use rmcp::{ServerHandler, schemars, tool, tool_handler, tool_router};\n"));
        assert!(code.contains("#[derive(Debug, Deserialize, schemars::JsonSchema)]\n    pub struct GetUserByIdArgs {"));
        assert!(code.contains("#[tool_router]\n    impl PetstoreTools {"));
        assert!(code.contains("#[tool_handler]\n    impl ServerHandler for PetstoreTools {"));
        assert!(code.contains("impl Default for PetstoreTools {"));
        assert!(code.contains(
            "pub async fn get_user_by_id(&self, Parameters(args): Parameters<GetUserByIdArgs>) -> String {"
        ));
        assert!(code.ends_with("}\n"));
    }
}
