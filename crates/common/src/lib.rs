//! Shared types and configuration for the surfaces workspace.
//!
//! # Invariants
//! - A `DemoConfig` that passed `validate` never yields NaN or a zero-sized grid.
//! - Every field is optional in the config file; missing fields take the defaults.

pub mod config;
pub mod types;

pub use config::{
    CameraConfig, ConfigError, DemoConfig, MAX_RESOLUTION, ProjectionConfig, SurfaceConfig,
    WindowConfig,
};
pub use types::{CameraMode, SurfaceKind, UnknownVariant};
