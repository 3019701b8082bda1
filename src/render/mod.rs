//! Rendering passes and the data model they share.
//!
//! Two passes cover the whole frame: [`SkyPass`] paints the background
//! first (depth test-only), then [`EntityPass`] draws instanced geometry
//! over it. [`Renderer`] owns both plus the depth target and encodes them
//! into a single render pass. The attribute and binding contract lives in
//! [`schema`].

pub mod entity;
pub(crate) mod pipeline_util;
pub mod schema;
pub mod sky;
pub mod vertex;

pub use entity::EntityPass;
pub use sky::{SkyGradient, SkyPass, VertexSource};
pub use vertex::{EntityInstance, Vertex};

use crate::camera::{Camera, CameraBinding};
use crate::error::HorizonError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DepthTarget;
use crate::options::Options;

/// Fragment-stage output contract shared by both passes: promote an
/// interpolated RGB color to RGBA with alpha forced to 1. There is no
/// blending or discard path.
#[must_use]
pub fn opaque(rgb: [f32; 3]) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], 1.0]
}

/// Owns the camera binding, depth target, and both passes; encodes one
/// frame into a caller-provided target view.
pub struct Renderer {
    camera_binding: CameraBinding,
    depth: DepthTarget,
    sky: SkyPass,
    entities: EntityPass,
}

impl Renderer {
    /// Build the camera binding and both passes from the given options.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonError`] if shader registration/composition or
    /// schema validation fails.
    pub fn new(
        context: &RenderContext,
        options: &Options,
    ) -> Result<Self, HorizonError> {
        let mut composer = ShaderComposer::new()?;

        let camera_binding = CameraBinding::new(
            &context.device,
            options.camera.transform_source,
        );
        let sky = SkyPass::new(
            context,
            &mut composer,
            &camera_binding,
            options.sky.geometry,
            SkyGradient::new(options.sky.start_color, options.sky.end_color),
        )?;
        let entities = EntityPass::new(context, &mut composer, &camera_binding)?;
        let depth = DepthTarget::new(
            &context.device,
            context.config.width,
            context.config.height,
        );

        Ok(Self {
            camera_binding,
            depth,
            sky,
            entities,
        })
    }

    /// Upload the camera state for the next frame.
    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &Camera) {
        self.camera_binding.upload(queue, camera);
    }

    /// The camera binding shared by both passes.
    pub fn camera_binding(&self) -> &CameraBinding {
        &self.camera_binding
    }

    /// The background pass.
    pub fn sky(&self) -> &SkyPass {
        &self.sky
    }

    /// Mutable background pass (gradient updates, mesh replacement).
    pub fn sky_mut(&mut self) -> &mut SkyPass {
        &mut self.sky
    }

    /// The entity pass.
    pub fn entities(&self) -> &EntityPass {
        &self.entities
    }

    /// Mutable entity pass (mesh and instance uploads).
    pub fn entities_mut(&mut self) -> &mut EntityPass {
        &mut self.entities
    }

    /// Recreate size-dependent resources after a surface resize.
    pub fn resize(&mut self, context: &RenderContext) {
        self.depth = DepthTarget::new(
            &context.device,
            context.config.width,
            context.config.height,
        );
    }

    /// Encode the frame: one render pass, sky first so the background
    /// never overdraws entities, entities after with full depth testing.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let mut render_pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.sky.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });

        self.sky.draw(&mut render_pass, &self.camera_binding);
        self.entities.draw(&mut render_pass, &self.camera_binding);
    }
}

#[cfg(test)]
mod tests {
    use super::{opaque, EntityInstance};
    use crate::render::vertex::clip_position;
    use glam::{Mat4, Vec4};

    #[test]
    fn opaque_forces_alpha_to_one() {
        assert_eq!(opaque([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(opaque([1.0, 1.0, 1.0]), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(opaque([0.25, 0.5, 0.75]), [0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn identity_pipeline_round_trips_vertex_color() {
        // Vertex color passes through the vertex stage unlit; the
        // fragment stage drops the incoming alpha and emits opaque.
        let vertex_color = [0.3_f32, 0.6, 0.9, 0.4];
        let interpolated =
            [vertex_color[0], vertex_color[1], vertex_color[2]];
        assert_eq!(opaque(interpolated), [0.3, 0.6, 0.9, 1.0]);

        let clip = clip_position(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            &EntityInstance::IDENTITY,
            Vec4::new(0.5, 0.5, 0.0, 1.0),
        );
        assert_eq!(clip, Vec4::new(0.5, 0.5, 0.0, 1.0));
    }
}
