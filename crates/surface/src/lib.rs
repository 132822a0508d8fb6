//! Surface sampling: grid index + time to instance transforms.
//!
//! # Invariants
//! - Sampling is pure: the same `(i, j, t)` yields bit-identical output.
//! - Transforms carry no state between frames; every frame is recomputed in full.

mod sampler;
mod transform;

pub use sampler::{GridRange, SurfaceSampler};
pub use surfaces_common::SurfaceKind;
pub use transform::InstanceTransform;
