//! Shared wgpu boilerplate helpers for raster pipelines.

/// Uniform buffer binding visible to the given shader stages.
pub fn uniform_buffer(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Single-entry uniform bind group layout.
pub fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[uniform_buffer(binding, visibility)],
    })
}

/// Single-entry uniform bind group over an entire buffer.
pub fn uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    binding: u32,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding,
            resource: buffer.as_entire_binding(),
        }],
    })
}

/// Everything needed to build a raster pipeline besides the device.
pub struct RasterPipelineDesc<'a> {
    /// Base label for the pipeline and its layout.
    pub label: &'a str,
    /// Composed shader module holding `vs_main` and `fs_main`.
    pub shader: &'a wgpu::ShaderModule,
    /// Bind group layouts in group order.
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Vertex buffer layouts in slot order (empty for buffer-less passes).
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// Color target format.
    pub format: wgpu::TextureFormat,
    /// Topology and culling.
    pub primitive: wgpu::PrimitiveState,
    /// Depth state, if the pass tests or writes depth.
    pub depth_stencil: Option<wgpu::DepthStencilState>,
}

/// Create a raster render pipeline with `vs_main` / `fs_main` entry points
/// and a single opaque color target.
pub fn create_raster_pipeline(
    device: &wgpu::Device,
    desc: &RasterPipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let label = desc.label;
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{label} Pipeline Layout")),
            bind_group_layouts: desc.bind_group_layouts,
            push_constant_ranges: &[],
        });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} Pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: desc.primitive,
        depth_stencil: desc.depth_stencil.clone(),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
