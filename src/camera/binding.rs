use wgpu::util::DeviceExt;

use crate::camera::core::{
    Camera, CameraUniform, CombinedCameraUniform, TransformSource,
};
use crate::gpu::pipeline_helpers::{uniform_bind_group, uniform_layout};
use crate::render::schema;

/// Owns the camera uniform buffers and bind groups for one
/// [`TransformSource`] layout.
///
/// In the split layout a single buffer serves both the entity and sky
/// pipelines (the sky shader strips translation itself). In the
/// pre-combined layout the two pipelines need different matrices, so a
/// second buffer carries the translation-stripped sky transform. Building
/// the pipelines from the same binding guarantees provider and consumer
/// agree on the layout.
pub struct CameraBinding {
    source: TransformSource,
    layout: wgpu::BindGroupLayout,
    scene_buffer: wgpu::Buffer,
    scene_group: wgpu::BindGroup,
    sky: Option<(wgpu::Buffer, wgpu::BindGroup)>,
}

impl CameraBinding {
    /// Create buffers and bind groups for the given layout, initialized to
    /// identity matrices.
    #[must_use]
    pub fn new(device: &wgpu::Device, source: TransformSource) -> Self {
        log::debug!("creating camera binding ({source:?})");

        let layout = uniform_layout(
            device,
            "Camera Bind Group Layout",
            schema::CAMERA_BINDING,
            wgpu::ShaderStages::VERTEX,
        );

        let contents = match source {
            TransformSource::ViewProjection => {
                bytemuck::bytes_of(&CameraUniform::new()).to_vec()
            }
            TransformSource::Precombined => {
                bytemuck::bytes_of(&CombinedCameraUniform::new()).to_vec()
            }
        };

        let scene_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: &contents,
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let scene_group = uniform_bind_group(
            device,
            "Camera Bind Group",
            &layout,
            schema::CAMERA_BINDING,
            &scene_buffer,
        );

        // Pre-combined matrices differ between scene and sky, so the sky
        // gets its own buffer.
        let sky = match source {
            TransformSource::ViewProjection => None,
            TransformSource::Precombined => {
                let buffer = device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Sky Camera Buffer"),
                        contents: &contents,
                        usage: wgpu::BufferUsages::UNIFORM
                            | wgpu::BufferUsages::COPY_DST,
                    },
                );
                let group = uniform_bind_group(
                    device,
                    "Sky Camera Bind Group",
                    &layout,
                    schema::CAMERA_BINDING,
                    &buffer,
                );
                Some((buffer, group))
            }
        };

        Self {
            source,
            layout,
            scene_buffer,
            scene_group,
            sky,
        }
    }

    /// The uniform layout this binding was built with.
    pub fn source(&self) -> TransformSource {
        self.source
    }

    /// Bind group layout shared by every pipeline consuming the camera.
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Bind group for entity rendering (full view-projection).
    pub fn scene_group(&self) -> &wgpu::BindGroup {
        &self.scene_group
    }

    /// Bind group for sky rendering.
    ///
    /// Split layout reuses the scene group; the shader detranslates.
    pub fn sky_group(&self) -> &wgpu::BindGroup {
        self.sky
            .as_ref()
            .map_or(&self.scene_group, |(_, group)| group)
    }

    /// Upload the camera's current state. Call once per frame, between
    /// draw calls; uniform contents are read-only while a draw is in
    /// flight.
    pub fn upload(&self, queue: &wgpu::Queue, camera: &Camera) {
        match self.source {
            TransformSource::ViewProjection => {
                let mut uniform = CameraUniform::new();
                uniform.update(camera);
                queue.write_buffer(
                    &self.scene_buffer,
                    0,
                    bytemuck::bytes_of(&uniform),
                );
            }
            TransformSource::Precombined => {
                let mut uniform = CombinedCameraUniform::new();
                uniform.update_scene(camera);
                queue.write_buffer(
                    &self.scene_buffer,
                    0,
                    bytemuck::bytes_of(&uniform),
                );
                if let Some((buffer, _)) = &self.sky {
                    uniform.update_sky(camera);
                    queue.write_buffer(
                        buffer,
                        0,
                        bytemuck::bytes_of(&uniform),
                    );
                }
            }
        }
    }
}
