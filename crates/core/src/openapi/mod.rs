//! OpenAPI to MCP tool wrapper generation.

pub mod emitter;
pub mod error;
pub mod ir;
pub mod spec;

pub use emitter::{GenerateOptions, Generated, generate};
pub use error::{DocumentFormat, OpenApiError};
pub use spec::OpenApiSpec;
