//! Camera state and per-frame GPU uniform upload.
//!
//! The camera uniform block is the one contract shared by every pipeline:
//! group 0, binding 0, laid out either as split view + projection matrices
//! or as a single pre-combined transform (see
//! [`TransformSource`]). [`CameraBinding`] owns the buffers and bind
//! groups for whichever layout is selected and keeps them current from a
//! [`Camera`] once per frame.

mod binding;
mod core;

pub use self::binding::CameraBinding;
pub use self::core::{
    detranslate, Camera, CameraUniform, CombinedCameraUniform,
    TransformSource,
};
