//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::gpu::shader_composer::ShaderError;
use crate::render::schema::SchemaError;

/// Errors produced by the horizon crate.
#[derive(Debug)]
pub enum HorizonError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// WGSL composition or module registration failure.
    Shader(ShaderError),
    /// Attribute/binding schema contract violation.
    Schema(SchemaError),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for HorizonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(e) => write!(f, "shader error: {e}"),
            Self::Schema(e) => write!(f, "schema error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for HorizonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Shader(e) => Some(e),
            Self::Schema(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<RenderContextError> for HorizonError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<ShaderError> for HorizonError {
    fn from(e: ShaderError) -> Self {
        Self::Shader(e)
    }
}

impl From<SchemaError> for HorizonError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<std::io::Error> for HorizonError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
