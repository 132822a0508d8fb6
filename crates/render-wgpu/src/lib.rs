//! wgpu render backend for the surfaces demo.
//!
//! Draws one cube mesh instanced once per surface cell, with a single
//! indexed draw call per frame.
//!
//! # Invariants
//! - The renderer never mutates camera or surface state.
//! - GPU buffers are allocated up front; per-frame work is one instance upload.

mod gpu;
mod mesh;
mod shaders;

pub use gpu::{FrameUniforms, SAMPLE_COUNT, WgpuRenderer};
pub use mesh::{CUBE_INDICES, CUBE_VERTICES, Vertex};
