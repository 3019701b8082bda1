use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Selects the GPU layout of the camera uniform block.
///
/// The provider uploading the block and every pipeline consuming it must
/// be built from the same value; there is no runtime layout negotiation.
/// Both layouts express the same contract and pipelines accept either as
/// configuration, not as separate pipeline types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TransformSource {
    /// Split layout: view and projection matrices uploaded separately
    /// ([`CameraUniform`]). Shaders combine them per vertex, which lets
    /// the sky shader strip translation from the view on its own.
    #[default]
    ViewProjection,
    /// Pre-combined layout: one pre-multiplied matrix
    /// ([`CombinedCameraUniform`]). The provider is responsible for
    /// stripping translation from the sky variant before upload.
    Precombined,
}

/// Perspective camera defined by eye position, target, and projection
/// parameters.
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::X,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Camera {
    /// Build the world-to-camera view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Build the camera-to-clip projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Build the background transform: projection times the detranslated
    /// view, so geometry tracks camera rotation but not position.
    pub fn sky_transform(&self) -> Mat4 {
        self.projection_matrix() * detranslate(self.view_matrix())
    }
}

/// Zero the translation column of a view matrix, leaving rotation and
/// scale untouched.
///
/// The returned matrix maps directions exactly as `view` does but ignores
/// camera position, which keeps a background at infinite distance.
#[must_use]
pub fn detranslate(view: Mat4) -> Mat4 {
    let mut m = view;
    m.w_axis = Vec4::W;
    m
}

/// GPU camera uniform block in the split layout: view and projection
/// matrices uploaded separately. Must match the WGSL `Camera` struct
/// compiled without the pre-combined shader def.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// World-to-camera view matrix.
    pub view: [[f32; 4]; 4],
    /// Camera-to-clip projection matrix.
    pub projection: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Identity view and projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    /// Update both matrices from the given camera's current state.
    pub fn update(&mut self, camera: &Camera) {
        self.view = camera.view_matrix().to_cols_array_2d();
        self.projection = camera.projection_matrix().to_cols_array_2d();
    }
}

/// GPU camera uniform block in the pre-combined layout: one pre-multiplied
/// matrix. Must match the WGSL `Camera` struct compiled with the
/// pre-combined shader def.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CombinedCameraUniform {
    /// Pre-multiplied transform (projection × view, with translation
    /// already stripped for the sky variant).
    pub transform: [[f32; 4]; 4],
}

impl Default for CombinedCameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CombinedCameraUniform {
    /// Identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    /// Update from the camera's full view-projection.
    pub fn update_scene(&mut self, camera: &Camera) {
        self.transform = camera.view_projection().to_cols_array_2d();
    }

    /// Update from the camera's translation-stripped view-projection.
    pub fn update_sky(&mut self, camera: &Camera) {
        self.transform = camera.sky_transform().to_cols_array_2d();
    }
}

#[cfg(test)]
mod tests {
    use super::{detranslate, Camera, CameraUniform, CombinedCameraUniform};
    use glam::{Mat4, Quat, Vec3, Vec4};

    #[test]
    fn detranslate_zeroes_only_the_translation_column() {
        let camera = Camera {
            eye: Vec3::new(3.0, -2.0, 7.5),
            target: Vec3::new(0.0, 1.0, 0.0),
            ..Camera::default()
        };
        let view = camera.view_matrix();
        let stripped = detranslate(view);

        assert_eq!(stripped.w_axis, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(stripped.x_axis, view.x_axis);
        assert_eq!(stripped.y_axis, view.y_axis);
        assert_eq!(stripped.z_axis, view.z_axis);
    }

    #[test]
    fn detranslate_is_identity_for_rotation_only_views() {
        let view = Mat4::from_quat(Quat::from_rotation_y(1.2));
        assert_eq!(detranslate(view), view);
    }

    #[test]
    fn sky_transform_ignores_camera_position() {
        let base = Camera {
            eye: Vec3::ZERO,
            target: Vec3::new(1.0, 0.5, -0.25),
            ..Camera::default()
        };
        let moved = Camera {
            eye: Vec3::new(40.0, -8.0, 12.0),
            target: Vec3::new(41.0, -7.5, 11.75),
            ..Camera::default()
        };

        // Same look direction from different positions must give the same
        // background transform.
        let a = base.sky_transform();
        let b = moved.sky_transform();
        for (col_a, col_b) in a.to_cols_array().iter().zip(b.to_cols_array())
        {
            assert!((col_a - col_b).abs() < 1e-5);
        }
    }

    #[test]
    fn uniform_blocks_have_shader_layout_sizes() {
        assert_eq!(size_of::<CameraUniform>(), 128);
        assert_eq!(size_of::<CombinedCameraUniform>(), 64);
    }

    #[test]
    fn default_uniforms_are_identity() {
        let split = CameraUniform::new();
        assert_eq!(split.view, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(split.projection, Mat4::IDENTITY.to_cols_array_2d());

        let combined = CombinedCameraUniform::new();
        assert_eq!(combined.transform, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn combined_sky_update_strips_translation() {
        let camera = Camera {
            eye: Vec3::new(5.0, 5.0, 5.0),
            target: Vec3::ZERO,
            ..Camera::default()
        };
        let mut uniform = CombinedCameraUniform::new();
        uniform.update_sky(&camera);

        let expected = camera.projection_matrix()
            * detranslate(camera.view_matrix());
        assert_eq!(uniform.transform, expected.to_cols_array_2d());
    }
}
