//! Depth and primitive state shared by the render pipelines.

use crate::gpu::texture::DEPTH_FORMAT;

/// Depth state for entity rendering: standard less-than test with writes.
pub(crate) fn entity_depth_stencil() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Depth state for the sky: test-only at less-equal so background
/// geometry sitting on the far plane still passes against the cleared
/// depth value, and never writes so entities always draw over it.
pub(crate) fn sky_depth_stencil() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Back-face culled triangle list for closed entity meshes.
pub(crate) fn entity_primitive() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        cull_mode: Some(wgpu::Face::Back),
        ..Default::default()
    }
}

/// Unculled triangle list for the sky: its geometry is viewed from the
/// inside (skybox) or is a single synthesized triangle.
pub(crate) fn sky_primitive() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        cull_mode: None,
        ..Default::default()
    }
}
