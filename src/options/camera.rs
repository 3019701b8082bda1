use serde::{Deserialize, Serialize};

use crate::camera::{Camera, TransformSource};

/// Camera projection and uniform-layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// GPU layout of the camera uniform block.
    pub transform_source: TransformSource,
}

impl CameraOptions {
    /// Build a camera with this projection at the given aspect ratio,
    /// placed at the default eye/target.
    #[must_use]
    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            aspect,
            fovy: self.fovy,
            znear: self.znear,
            zfar: self.zfar,
            ..Camera::default()
        }
    }
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            transform_source: TransformSource::ViewProjection,
        }
    }
}
