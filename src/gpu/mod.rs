//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, dynamic buffer management,
//! depth-target textures, pipeline boilerplate, and shader composition.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Shared wgpu boilerplate helpers for raster pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` and shader-def support via
/// naga-oil.
pub mod shader_composer;
/// Depth-target texture abstraction.
pub mod texture;
