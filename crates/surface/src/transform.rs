use glam::{Mat4, Quat, Vec3};

/// Model transform for one grid cell: translation plus uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTransform {
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl InstanceTransform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            scale: 1.0,
        }
    }

    pub fn new(translation: Vec3, scale: f32) -> Self {
        Self { translation, scale }
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::IDENTITY,
            self.translation,
        )
    }

    /// Column-major layout, ready for upload as four `vec4` attributes.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.to_mat4().to_cols_array_2d()
    }
}
