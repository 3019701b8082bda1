//! Background sky rendering.
//!
//! The sky tracks camera rotation but never camera translation: the split
//! camera layout strips the view translation in the shader, the
//! pre-combined layout receives an already-stripped transform from the
//! provider. Geometry comes either from a bound mesh (skybox cube, screen
//! quad) or from a buffer-less full-screen triangle synthesized from the
//! vertex index. Both choices are configuration of one pass, not separate
//! pipelines.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

use crate::camera::{CameraBinding, TransformSource};
use crate::error::HorizonError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{
    create_raster_pipeline, uniform_bind_group, uniform_layout,
    RasterPipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::render::opaque;
use crate::render::pipeline_util;
use crate::render::schema;
use crate::render::vertex::Vertex;

const SHADER_SOURCE: &str =
    include_str!("../../assets/shaders/raster/sky.wgsl");

/// Selects where the sky pass gets its vertices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VertexSource {
    /// No buffers bound; the vertex stage synthesizes an oversized
    /// triangle from the vertex index. Three vertices, full viewport
    /// coverage.
    #[default]
    FullscreenTriangle,
    /// Positions come from a bound vertex buffer (a skybox cube by
    /// default; any mesh uploaded via [`SkyPass::write_mesh`]).
    Mesh,
}

/// GPU sky uniform block: the background gradient endpoints.
///
/// `end_color` rides in the block but is not yet blended anywhere; it is
/// reserved for the gradient feature and currently inert.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyGradient {
    /// Gradient start color, emitted verbatim today.
    pub start_color: [f32; 3],
    /// Padding for GPU vec3 alignment.
    pub _pad0: f32,
    /// Gradient end color, reserved.
    pub end_color: [f32; 3],
    /// Padding for GPU vec3 alignment.
    pub _pad1: f32,
}

impl SkyGradient {
    /// Gradient from start to end color.
    #[must_use]
    pub fn new(start_color: [f32; 3], end_color: [f32; 3]) -> Self {
        Self {
            start_color,
            _pad0: 0.0,
            end_color,
            _pad1: 0.0,
        }
    }
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self::new([1.0, 1.0, 0.0], [0.0, 1.0, 0.0])
    }
}

/// CPU mirror of the synthesized full-screen triangle: clip-space corner
/// for vertex index 0, 1, 2.
///
/// The triangle is deliberately oversized so every edge clears the
/// [-1,1] viewport on all sides; the rasterizer clips it back to a full
/// screen of fragments.
#[must_use]
pub fn fullscreen_triangle_corner(index: u32) -> [f32; 2] {
    let x = (1 - index as i32) as f32 * 4.0;
    let y = ((index & 1) as i32 * 2 - 1) as f32 * 4.0;
    [x, y]
}

/// The synthesized triangle as mesh vertices, usable when a mesh-driven
/// full-screen pass is preferred over the buffer-less form. Corners sit
/// on the far plane.
#[must_use]
pub fn fullscreen_triangle_vertices() -> [Vertex; 3] {
    let corner = |i: u32| {
        let [x, y] = fullscreen_triangle_corner(i);
        Vertex {
            position: [x, y, 1.0, 1.0],
            color: [1.0, 1.0, 1.0, 1.0],
            uv: [0.0; 4],
            tint: [0.0; 3],
        }
    };
    [corner(0), corner(1), corner(2)]
}

/// Unit skybox cube vertices, one quad per face, viewed from the inside.
#[must_use]
pub fn skybox_vertices() -> Vec<Vertex> {
    let white = [1.0, 1.0, 1.0, 1.0];
    let v = |x: f32, y: f32, z: f32, uv: [f32; 2]| {
        Vertex::new(Vec3::new(x, y, z), white).with_uv(uv)
    };
    vec![
        // Top face.
        v(-1.0, -1.0, 1.0, [0.0, 0.0]),
        v(1.0, -1.0, 1.0, [1.0, 0.0]),
        v(1.0, 1.0, 1.0, [1.0, 1.0]),
        v(-1.0, 1.0, 1.0, [0.0, 1.0]),
        // Bottom face.
        v(-1.0, 1.0, -1.0, [1.0, 0.0]),
        v(1.0, 1.0, -1.0, [0.0, 0.0]),
        v(1.0, -1.0, -1.0, [0.0, 1.0]),
        v(-1.0, -1.0, -1.0, [1.0, 1.0]),
        // Right face.
        v(1.0, -1.0, -1.0, [0.0, 0.0]),
        v(1.0, 1.0, -1.0, [1.0, 0.0]),
        v(1.0, 1.0, 1.0, [1.0, 1.0]),
        v(1.0, -1.0, 1.0, [0.0, 1.0]),
        // Left face.
        v(-1.0, -1.0, 1.0, [1.0, 0.0]),
        v(-1.0, 1.0, 1.0, [0.0, 0.0]),
        v(-1.0, 1.0, -1.0, [0.0, 1.0]),
        v(-1.0, -1.0, -1.0, [1.0, 1.0]),
        // Front face.
        v(1.0, 1.0, -1.0, [1.0, 0.0]),
        v(-1.0, 1.0, -1.0, [0.0, 0.0]),
        v(-1.0, 1.0, 1.0, [0.0, 1.0]),
        v(1.0, 1.0, 1.0, [1.0, 1.0]),
        // Back face.
        v(1.0, -1.0, 1.0, [0.0, 0.0]),
        v(-1.0, -1.0, 1.0, [1.0, 0.0]),
        v(-1.0, -1.0, -1.0, [1.0, 1.0]),
        v(1.0, -1.0, -1.0, [0.0, 1.0]),
    ]
}

/// Index list for [`skybox_vertices`], two triangles per face.
#[must_use]
pub fn skybox_indices() -> Vec<u32> {
    vec![
        0, 1, 2, 2, 3, 0, // top
        4, 5, 6, 6, 7, 4, // bottom
        8, 9, 10, 10, 11, 8, // right
        12, 13, 14, 14, 15, 12, // left
        16, 17, 18, 18, 19, 16, // front
        20, 21, 22, 22, 23, 20, // back
    ]
}

struct SkyMesh {
    vertices: TypedBuffer<Vertex>,
    indices: TypedBuffer<u32>,
}

/// Background draw pass: pipeline, gradient uniform, optional mesh.
pub struct SkyPass {
    pipeline: wgpu::RenderPipeline,
    vertex_source: VertexSource,
    gradient: SkyGradient,
    gradient_buffer: wgpu::Buffer,
    gradient_group: wgpu::BindGroup,
    mesh: Option<SkyMesh>,
}

impl SkyPass {
    /// Create the pass. `camera` selects the uniform layout variant,
    /// `vertex_source` the geometry strategy; together they specialize
    /// one shader source.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonError`] if the binding schema fails validation or
    /// the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera: &CameraBinding,
        vertex_source: VertexSource,
        gradient: SkyGradient,
    ) -> Result<Self, HorizonError> {
        schema::validate()?;
        log::info!(
            "creating sky pass ({:?}, {:?})",
            camera.source(),
            vertex_source
        );

        let mut defs = Vec::new();
        if camera.source() == TransformSource::Precombined {
            defs.push("CAMERA_PRECOMBINED");
        }
        if vertex_source == VertexSource::FullscreenTriangle {
            defs.push("SKY_FULLSCREEN");
        }

        let shader = composer.compose(
            &context.device,
            "Sky Shader",
            SHADER_SOURCE,
            "raster/sky.wgsl",
            &defs,
        )?;

        let gradient_layout = uniform_layout(
            &context.device,
            "Sky Gradient Layout",
            schema::SKY_BINDING,
            wgpu::ShaderStages::VERTEX,
        );
        let gradient_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Sky Gradient Buffer"),
                contents: bytemuck::bytes_of(&gradient),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let gradient_group = uniform_bind_group(
            &context.device,
            "Sky Gradient Bind Group",
            &gradient_layout,
            schema::SKY_BINDING,
            &gradient_buffer,
        );

        let buffers = match vertex_source {
            VertexSource::FullscreenTriangle => vec![],
            VertexSource::Mesh => vec![schema::vertex_layout()],
        };
        let pipeline = create_raster_pipeline(
            &context.device,
            &RasterPipelineDesc {
                label: "Sky",
                shader: &shader,
                bind_group_layouts: &[camera.layout(), &gradient_layout],
                buffers: &buffers,
                format: context.format(),
                primitive: pipeline_util::sky_primitive(),
                depth_stencil: Some(pipeline_util::sky_depth_stencil()),
            },
        );

        let mesh = match vertex_source {
            VertexSource::FullscreenTriangle => None,
            VertexSource::Mesh => Some(SkyMesh {
                vertices: TypedBuffer::new_with_data(
                    &context.device,
                    "Sky Vertex Buffer",
                    &skybox_vertices(),
                    wgpu::BufferUsages::VERTEX,
                ),
                indices: TypedBuffer::new_with_data(
                    &context.device,
                    "Sky Index Buffer",
                    &skybox_indices(),
                    wgpu::BufferUsages::INDEX,
                ),
            }),
        };

        Ok(Self {
            pipeline,
            vertex_source,
            gradient,
            gradient_buffer,
            gradient_group,
            mesh,
        })
    }

    /// The geometry strategy this pass was built with.
    pub fn vertex_source(&self) -> VertexSource {
        self.vertex_source
    }

    /// Current gradient endpoints.
    pub fn gradient(&self) -> SkyGradient {
        self.gradient
    }

    /// Replace the gradient and upload it.
    pub fn set_gradient(&mut self, queue: &wgpu::Queue, gradient: SkyGradient) {
        self.gradient = gradient;
        queue.write_buffer(
            &self.gradient_buffer,
            0,
            bytemuck::bytes_of(&self.gradient),
        );
    }

    /// Replace the sky mesh (mesh-driven passes only; ignored for the
    /// buffer-less form).
    pub fn write_mesh(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[Vertex],
        indices: &[u32],
    ) {
        if let Some(mesh) = &mut self.mesh {
            let _ = mesh.vertices.write(device, queue, vertices);
            let _ = mesh.indices.write(device, queue, indices);
        }
    }

    /// Clear color matching the gradient start, promoted to opaque.
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = opaque(self.gradient.start_color);
        wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        }
    }

    /// Encode the background draw. Must run before the entity pass in the
    /// same render pass so depth stays untouched for entities.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera: &'a CameraBinding,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(
            schema::CAMERA_GROUP,
            camera.sky_group(),
            &[],
        );
        render_pass.set_bind_group(
            schema::SKY_GROUP,
            &self.gradient_group,
            &[],
        );
        match &self.mesh {
            None => render_pass.draw(0..3, 0..1),
            Some(mesh) => {
                render_pass
                    .set_vertex_buffer(0, mesh.vertices.buffer().slice(..));
                render_pass.set_index_buffer(
                    mesh.indices.buffer().slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                render_pass.draw_indexed(
                    0..mesh.indices.count() as u32,
                    0,
                    0..1,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        fullscreen_triangle_corner, fullscreen_triangle_vertices,
        skybox_indices, skybox_vertices, SkyGradient,
    };
    use crate::render::vertex::{clip_position, EntityInstance};
    use glam::{Mat4, Vec4};

    #[test]
    fn fullscreen_triangle_bounding_box_encloses_viewport() {
        let corners: Vec<[f32; 2]> =
            (0..3).map(fullscreen_triangle_corner).collect();

        let min_x = corners.iter().map(|c| c[0]).fold(f32::MAX, f32::min);
        let max_x = corners.iter().map(|c| c[0]).fold(f32::MIN, f32::max);
        let min_y = corners.iter().map(|c| c[1]).fold(f32::MAX, f32::min);
        let max_y = corners.iter().map(|c| c[1]).fold(f32::MIN, f32::max);

        // Strictly larger than the canonical [-1,1] viewport on every side.
        assert!(min_x < -1.0 && max_x > 1.0);
        assert!(min_y < -1.0 && max_y > 1.0);
    }

    #[test]
    fn fullscreen_triangle_survives_identity_transform_unchanged() {
        // With identity view and projection the synthesized corners are
        // already clip-space positions.
        let instance = EntityInstance::IDENTITY;
        for vertex in fullscreen_triangle_vertices() {
            let clip = clip_position(
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                &instance,
                Vec4::from_array(vertex.position),
            );
            assert_eq!(clip.to_array(), vertex.position);
        }
    }

    #[test]
    fn fullscreen_triangle_winding_is_counter_clockwise() {
        let [a, b, c] =
            [0, 1, 2].map(fullscreen_triangle_corner);
        let cross = (b[0] - a[0]) * (c[1] - a[1])
            - (b[1] - a[1]) * (c[0] - a[0]);
        assert!(cross > 0.0);
    }

    #[test]
    fn skybox_mesh_is_watertight_quads() {
        let vertices = skybox_vertices();
        let indices = skybox_indices();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        // Every corner sits on the unit cube.
        for vertex in &vertices {
            let [x, y, z, w] = vertex.position;
            assert_eq!(w, 1.0);
            assert!(x.abs() == 1.0 && y.abs() == 1.0 && z.abs() == 1.0);
        }
    }

    #[test]
    fn gradient_block_has_shader_layout_size() {
        assert_eq!(size_of::<SkyGradient>(), 32);
        let gradient = SkyGradient::new([0.2, 0.4, 0.6], [0.1, 0.1, 0.1]);
        assert_eq!(gradient.start_color, [0.2, 0.4, 0.6]);
        assert_eq!(gradient.end_color, [0.1, 0.1, 0.1]);
    }
}
