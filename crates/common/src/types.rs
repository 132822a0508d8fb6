use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a mode or surface name does not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// How the camera responds to movement input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Moves freely along its own front/right/up axes.
    #[default]
    FreeFly,
    /// First-person walk: position.y is forced to zero after every move.
    GroundLocked,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::FreeFly => CameraMode::GroundLocked,
            CameraMode::GroundLocked => CameraMode::FreeFly,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CameraMode::FreeFly => "free_fly",
            CameraMode::GroundLocked => "ground_locked",
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CameraMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "free_fly" | "free-fly" | "fly" => Ok(CameraMode::FreeFly),
            "ground_locked" | "ground-locked" | "fps" => Ok(CameraMode::GroundLocked),
            _ => Err(UnknownVariant {
                kind: "camera mode",
                value: s.to_string(),
            }),
        }
    }
}

/// The parametric surface the instanced cubes are laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Flat grid on the XZ plane.
    Plane,
    /// Travelling sine wave over the grid.
    Wave,
    /// Animated torus.
    #[default]
    Torus,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 3] = [SurfaceKind::Plane, SurfaceKind::Wave, SurfaceKind::Torus];

    pub fn as_str(self) -> &'static str {
        match self {
            SurfaceKind::Plane => "plane",
            SurfaceKind::Wave => "wave",
            SurfaceKind::Torus => "torus",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurfaceKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SurfaceKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "surface",
                value: s.to_string(),
            })
    }
}
