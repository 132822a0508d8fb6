//! Demo configuration, loadable from YAML.
//!
//! ```yaml
//! camera: { position: [0, 0, 3], mode: ground_locked }
//! surface: { kind: wave, resolution: 200 }
//! ```

use crate::types::{CameraMode, SurfaceKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted grid side. The instance buffer holds `resolution²`
/// 64-byte model matrices and must fit in 256 MiB.
pub const MAX_RESOLUTION: u32 = 2048;

/// Errors from loading or validating a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            title: "Mathematical Surfaces".into(),
        }
    }
}

/// Initial camera state. Angles and field of view are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub fov: f32,
    pub mode: CameraMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            speed: 4.0,
            sensitivity: 0.1,
            fov: 45.0,
            mode: CameraMode::FreeFly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Instanced grid layout. `resolution` cubes per side, indices in
/// `[-resolution/2, resolution/2)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub kind: SurfaceKind,
    pub resolution: u32,
    /// World-space size of the unit surface.
    pub radius: f32,
    /// Uniform cube scale; `None` leaves cubes at unit size.
    pub cube_size: Option<f32>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            kind: SurfaceKind::Torus,
            resolution: 400,
            radius: 100.0,
            cube_size: Some(0.5),
        }
    }
}

/// Top-level demo configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub surface: SurfaceConfig,
}

impl DemoConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        };

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be non-zero"));
        }
        let s = &self.surface;
        if s.resolution == 0 || s.resolution % 2 != 0 {
            return Err(invalid("surface.resolution", "must be even and greater than zero"));
        }
        if s.resolution > MAX_RESOLUTION {
            return Err(ConfigError::Invalid {
                field: "surface.resolution",
                reason: format!("must be at most {MAX_RESOLUTION}"),
            });
        }
        if !(s.radius.is_finite() && s.radius > 0.0) {
            return Err(invalid("surface.radius", "must be a positive number"));
        }
        if let Some(size) = s.cube_size {
            if !(size.is_finite() && size > 0.0) {
                return Err(invalid("surface.cube_size", "must be a positive number"));
            }
        }
        let p = &self.projection;
        if !(p.near > 0.0 && p.near < p.far && p.far.is_finite()) {
            return Err(invalid("projection", "require 0 < near < far"));
        }
        let c = &self.camera;
        if !c.position.is_finite() || !c.world_up.is_finite() {
            return Err(invalid("camera.position", "must be finite"));
        }
        if c.world_up.length_squared() == 0.0 {
            return Err(invalid("camera.world_up", "must be non-zero"));
        }
        if !c.yaw.is_finite() {
            return Err(invalid("camera.yaw", "must be finite"));
        }
        if !c.pitch.is_finite() {
            return Err(invalid("camera.pitch", "must be finite"));
        }
        if !c.fov.is_finite() {
            return Err(invalid("camera.fov", "must be finite"));
        }
        if !(c.speed.is_finite() && c.speed >= 0.0) {
            return Err(invalid("camera.speed", "must be a non-negative number"));
        }
        if !c.sensitivity.is_finite() {
            return Err(invalid("camera.sensitivity", "must be finite"));
        }
        Ok(())
    }
}
