use serde::{Deserialize, Serialize};

use crate::render::VertexSource;

/// Background configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyOptions {
    /// Gradient start color, the color currently emitted.
    pub start_color: [f32; 3],
    /// Gradient end color. Reserved: carried in the uniform but not
    /// blended yet.
    pub end_color: [f32; 3],
    /// Geometry strategy for the background pass.
    pub geometry: VertexSource,
}

impl Default for SkyOptions {
    fn default() -> Self {
        Self {
            start_color: [1.0, 1.0, 0.0],
            end_color: [0.0, 1.0, 0.0],
            geometry: VertexSource::FullscreenTriangle,
        }
    }
}
