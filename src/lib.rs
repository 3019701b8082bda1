// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Minimal real-time rendering core built on wgpu.
//!
//! Horizon renders two kinds of geometry that share one camera contract:
//! instanced entities, whose per-instance 4×4 transform arrives packed as
//! four row-vector attributes, and a sky background that tracks camera
//! rotation but never camera translation.
//!
//! # Key entry points
//!
//! - [`render::Renderer`] - owns both passes and encodes a frame
//! - [`render::EntityPass`] - instanced object rendering
//! - [`render::SkyPass`] - configurable background pass (mesh-driven or
//!   buffer-less full-screen triangle)
//! - [`camera::Camera`] / [`camera::CameraBinding`] - per-frame camera
//!   uniform provider
//! - [`options::Options`] - TOML-backed runtime configuration
//!
//! # Architecture
//!
//! All binding slots and attribute locations live in [`render::schema`],
//! the single contract between CPU-side buffer packing and the WGSL
//! shaders. Shader variants (split vs. pre-combined camera layout,
//! mesh-driven vs. synthesized sky geometry) are specialized from one
//! WGSL source per pass through `naga_oil` shader defs rather than
//! maintained as parallel copies.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod options;
pub mod render;
