//! Instanced entity rendering.
//!
//! One pipeline draws every entity instance: a shared indexed mesh in the
//! per-vertex stream, and a per-instance stream carrying each instance's
//! object-to-world transform as four row vectors. The vertex stage
//! reassembles the matrix, applies instance transform, view, then
//! projection, and passes the vertex color through unlit; the fragment
//! stage promotes it to opaque RGBA.

use crate::camera::{CameraBinding, TransformSource};
use crate::error::HorizonError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers::{
    create_raster_pipeline, RasterPipelineDesc,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::render::pipeline_util;
use crate::render::schema;
use crate::render::vertex::{EntityInstance, Vertex};

const SHADER_SOURCE: &str =
    include_str!("../../assets/shaders/raster/entity.wgsl");

/// Instanced entity draw pass: pipeline plus mesh and instance buffers.
pub struct EntityPass {
    pipeline: wgpu::RenderPipeline,
    vertices: TypedBuffer<Vertex>,
    indices: TypedBuffer<u32>,
    instances: TypedBuffer<EntityInstance>,
}

impl EntityPass {
    /// Create the pass against the given camera binding. The camera's
    /// uniform layout selects the shader variant, so provider and
    /// pipeline cannot disagree.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonError`] if the binding schema fails validation or
    /// the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        camera: &CameraBinding,
    ) -> Result<Self, HorizonError> {
        schema::validate()?;
        log::info!("creating entity pass ({:?})", camera.source());

        let mut defs = Vec::new();
        if camera.source() == TransformSource::Precombined {
            defs.push("CAMERA_PRECOMBINED");
        }

        let shader = composer.compose(
            &context.device,
            "Entity Shader",
            SHADER_SOURCE,
            "raster/entity.wgsl",
            &defs,
        )?;

        let pipeline = create_raster_pipeline(
            &context.device,
            &RasterPipelineDesc {
                label: "Entity",
                shader: &shader,
                bind_group_layouts: &[camera.layout()],
                buffers: &[
                    schema::vertex_layout(),
                    schema::instance_layout(),
                ],
                format: context.format(),
                primitive: pipeline_util::entity_primitive(),
                depth_stencil: Some(pipeline_util::entity_depth_stencil()),
            },
        );

        Ok(Self {
            pipeline,
            vertices: TypedBuffer::new(
                &context.device,
                "Entity Vertex Buffer",
                256,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: TypedBuffer::new(
                &context.device,
                "Entity Index Buffer",
                1024,
                wgpu::BufferUsages::INDEX,
            ),
            instances: TypedBuffer::new(
                &context.device,
                "Entity Instance Buffer",
                256,
                wgpu::BufferUsages::VERTEX,
            ),
        })
    }

    /// Upload the shared mesh drawn by every instance.
    pub fn write_mesh(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        vertices: &[Vertex],
        indices: &[u32],
    ) {
        let _ = self.vertices.write(device, queue, vertices);
        let _ = self.indices.write(device, queue, indices);
    }

    /// Upload the per-instance transforms for this frame. Row order
    /// within each [`EntityInstance`] is the packing contract; nothing
    /// here can detect a transposed matrix.
    pub fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[EntityInstance],
    ) {
        let _ = self.instances.write(device, queue, instances);
    }

    /// Number of instances currently staged.
    pub fn instance_count(&self) -> usize {
        self.instances.count()
    }

    /// Encode the instanced draw. The camera bind group comes from the
    /// same binding the pass was built with.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera: &'a CameraBinding,
    ) {
        if self.indices.is_empty() || self.instances.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(
            schema::CAMERA_GROUP,
            camera.scene_group(),
            &[],
        );
        render_pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        render_pass.set_vertex_buffer(1, self.instances.buffer().slice(..));
        render_pass.set_index_buffer(
            self.indices.buffer().slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(
            0..self.indices.count() as u32,
            0,
            0..self.instances.count() as u32,
        );
    }
}
