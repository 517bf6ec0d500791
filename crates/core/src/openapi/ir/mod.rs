//! Intermediate Representation for OpenAPI to tool wrapper code generation.
//!
//! This module defines a three-layer architecture:
//! 1. Endpoint IR: normalized operations, parameters, bodies, diagnostics
//! 2. Rust AST IR: types, expressions, statements, items
//! 3. Emission: AST to Rust source strings via the `Emit` trait
//!
//! The separation allows:
//! - All OpenAPI corner cases resolved in normalization
//! - Code generation builds structured AST (testable)
//! - Emission is purely mechanical string building
//!
//! ## Module Structure
//!
//! - `api`: Endpoint IR (Endpoint, Parameter, Diagnostic)
//! - `naming`: tool names, inflection, collision registry
//! - `type_resolver`: schema descriptors to target types
//! - `normalize`: OpenAPI spec -> Endpoint IR
//! - `types`: Rust AST IR (RsType, RsExpr, RsStmt, RsFn, RsModule)
//! - `codegen`: Endpoint IR -> Rust AST
//! - `emit`: Rust AST -> code strings (via Emit trait)
//! - `utils`: identifier and literal helpers shared across modules

pub mod api;
mod codegen;
mod emit;
pub mod naming;
mod normalize;
pub mod type_resolver;
mod types;
pub mod utils;

pub use api::{
    Diagnostic, DiagnosticKind, Endpoint, Extraction, HttpMethod, ParamLocation, Parameter,
    RequestBody, Response,
};
pub use codegen::{EmitOptions, PLACEHOLDER_BASE_URL, codegen_module};
pub use emit::Emit;
pub use naming::{NameRegistry, pluralize, resolve_tool_name, singularize};
pub use normalize::{DEFAULT_CONTENT_TYPE, extract_endpoints};
pub use type_resolver::{ResolvedType, TypeResolver};
pub use types::RsModule;
