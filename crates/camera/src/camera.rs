use glam::{Mat4, Vec3};
use surfaces_common::{CameraConfig, CameraMode};

/// Maximum absolute pitch in degrees. Looking straight up or down would
/// make `front` parallel to world-up and collapse the basis.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view in degrees.
pub const FOV_MIN: f32 = 1.0;
/// Widest field of view in degrees.
pub const FOV_MAX: f32 = 90.0;

/// Discrete movement directions, independent of any windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Movement {
    pub const ALL: [Movement; 6] = [
        Movement::Forward,
        Movement::Backward,
        Movement::Left,
        Movement::Right,
        Movement::Up,
        Movement::Down,
    ];
}

/// Euler-angle camera. Yaw, pitch and fov are stored in degrees.
///
/// The basis vectors are cached and recomputed whenever yaw or pitch change,
/// so reads are free and always consistent with the angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    speed: f32,
    sensitivity: f32,
    fov: f32,
    mode: CameraMode,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Camera at `position` with default angles, speed and sensitivity.
    pub fn new(position: Vec3) -> Self {
        Self::from_config(&CameraConfig {
            position,
            ..CameraConfig::default()
        })
    }

    pub fn with_angles(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        Self::from_config(&CameraConfig {
            position,
            world_up,
            yaw,
            pitch,
            ..CameraConfig::default()
        })
    }

    /// Build from config. Non-finite angles, fov, speed or sensitivity fall
    /// back to the defaults so the basis is always well defined.
    pub fn from_config(config: &CameraConfig) -> Self {
        let defaults = CameraConfig::default();
        let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        let mut camera = Self {
            position: config.position,
            world_up: config.world_up.try_normalize().unwrap_or(Vec3::Y),
            yaw: finite_or(config.yaw, defaults.yaw),
            pitch: finite_or(config.pitch, defaults.pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            speed: finite_or(config.speed, defaults.speed),
            sensitivity: finite_or(config.sensitivity, defaults.sensitivity),
            fov: finite_or(config.fov, defaults.fov).clamp(FOV_MIN, FOV_MAX),
            mode: config.mode,
        };
        camera.update_vectors();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "camera mode changed");
            self.mode = mode;
        }
    }

    /// Translate along the camera basis by `speed * dt`.
    ///
    /// Ground-locked cameras ignore `Up`/`Down` and have their height reset
    /// to zero afterwards. The move itself still follows the pitched `front`.
    pub fn move_by(&mut self, direction: Movement, dt: f32) {
        let velocity = self.speed * dt;
        let delta = match (self.mode, direction) {
            (_, Movement::Forward) => self.front * velocity,
            (_, Movement::Backward) => -self.front * velocity,
            (_, Movement::Left) => -self.right * velocity,
            (_, Movement::Right) => self.right * velocity,
            (CameraMode::FreeFly, Movement::Up) => self.up * velocity,
            (CameraMode::FreeFly, Movement::Down) => -self.up * velocity,
            (CameraMode::GroundLocked, Movement::Up | Movement::Down) => Vec3::ZERO,
        };
        self.position += delta;

        if self.mode == CameraMode::GroundLocked {
            self.position.y = 0.0;
        }
    }

    /// Apply a cursor offset in pixels. Positive `dy` looks up.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.rotate(dx, dy, true);
    }

    /// Like [`Camera::look`] but lets pitch pass the ±89° limit.
    pub fn look_unconstrained(&mut self, dx: f32, dy: f32) {
        self.rotate(dx, dy, false);
    }

    fn rotate(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
        self.update_vectors();
    }

    /// Narrow the field of view by `scroll_delta` degrees, saturating at
    /// [`FOV_MIN`] and [`FOV_MAX`].
    pub fn zoom(&mut self, scroll_delta: f32) {
        if scroll_delta.is_nan() {
            return;
        }
        self.fov = (self.fov - scroll_delta).clamp(FOV_MIN, FOV_MAX);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection using the current field of view.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, near, far)
    }

    fn update_vectors(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        self.front = Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPS
    }

    fn assert_orthonormal(cam: &Camera) {
        let (f, r, u) = (cam.front(), cam.right(), cam.up());
        for v in [f, r, u] {
            assert!((v.length() - 1.0).abs() < EPS, "not unit: {v:?}");
        }
        assert!(f.dot(r).abs() < EPS);
        assert!(f.dot(u).abs() < EPS);
        assert!(r.dot(u).abs() < EPS);
        // Right-handed: right x up points back out of the screen.
        assert!(approx(r.cross(u), -f));
    }

    #[test]
    fn non_finite_config_falls_back_to_defaults() {
        let config = CameraConfig {
            yaw: f32::INFINITY,
            pitch: f32::NAN,
            fov: f32::NAN,
            sensitivity: f32::NAN,
            speed: f32::NEG_INFINITY,
            ..CameraConfig::default()
        };
        let mut camera = Camera::from_config(&config);
        assert_eq!(camera, Camera::default());
        assert!(camera.front().is_finite());
        assert!(camera.projection_matrix(16.0 / 9.0, 0.1, 100.0).is_finite());
        camera.look(10.0, 0.0);
        assert!(camera.yaw().is_finite() && camera.pitch().is_finite());
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_eq!(cam.fov(), 45.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 3.0));
        assert!(approx(cam.front(), Vec3::NEG_Z));
        assert!(approx(cam.right(), Vec3::X));
        assert!(approx(cam.up(), Vec3::Y));
    }

    #[test]
    fn basis_is_orthonormal_for_all_angles() {
        let mut yaw = -720.0;
        while yaw <= 720.0 {
            let mut pitch = -89.0;
            while pitch <= 89.0 {
                let cam = Camera::with_angles(Vec3::ZERO, Vec3::Y, yaw, pitch);
                assert_orthonormal(&cam);
                pitch += 8.9;
            }
            yaw += 15.0;
        }
    }

    #[test]
    fn forward_move_at_default_speed() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.move_by(Movement::Forward, 1.0);
        assert!(approx(cam.position(), Vec3::new(0.0, 0.0, -4.0)));
    }

    #[test]
    fn opposite_moves_cancel() {
        let mut cam = Camera::with_angles(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, 30.0, 20.0);
        let start = cam.position();
        for (a, b) in [
            (Movement::Forward, Movement::Backward),
            (Movement::Left, Movement::Right),
            (Movement::Up, Movement::Down),
        ] {
            cam.move_by(a, 0.25);
            assert!(!approx(cam.position(), start));
            cam.move_by(b, 0.25);
            assert!(approx(cam.position(), start));
        }
    }

    #[test]
    fn zero_dt_does_not_move() {
        let mut cam = Camera::default();
        let start = cam.position();
        for dir in Movement::ALL {
            cam.move_by(dir, 0.0);
        }
        assert_eq!(cam.position(), start);
    }

    #[test]
    fn horizontal_look_changes_only_yaw() {
        let mut cam = Camera::default();
        let (yaw, pitch) = (cam.yaw(), cam.pitch());
        cam.look(10.0, 0.0);
        assert_eq!(cam.yaw(), yaw + 10.0 * cam.sensitivity());
        assert_eq!(cam.pitch(), pitch);
        assert_orthonormal(&cam);
    }

    #[test]
    fn pitch_saturates_and_stays_saturated() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.look(0.0, 100.0);
        }
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        let front = cam.front();
        cam.look(0.0, 100.0);
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        assert_eq!(cam.front(), front);

        for _ in 0..100 {
            cam.look(0.0, -100.0);
        }
        assert_eq!(cam.pitch(), -PITCH_LIMIT);
        assert_orthonormal(&cam);
    }

    #[test]
    fn unconstrained_look_passes_the_limit() {
        let mut cam = Camera::default();
        cam.look_unconstrained(0.0, 1000.0);
        assert!(cam.pitch() > PITCH_LIMIT);
    }

    #[test]
    fn non_finite_look_is_ignored() {
        let mut cam = Camera::default();
        let before = cam.clone();
        cam.look(f32::NAN, 1.0);
        cam.look(0.0, f32::INFINITY);
        assert_eq!(cam, before);
    }

    #[test]
    fn zoom_saturates_at_bounds() {
        let mut cam = Camera::default();
        cam.zoom(f32::INFINITY);
        assert_eq!(cam.fov(), FOV_MIN);
        cam.zoom(f32::INFINITY);
        assert_eq!(cam.fov(), FOV_MIN);
        cam.zoom(f32::NEG_INFINITY);
        assert_eq!(cam.fov(), FOV_MAX);
        cam.zoom(-5.0);
        assert_eq!(cam.fov(), FOV_MAX);
        cam.zoom(10.0);
        assert_eq!(cam.fov(), 80.0);
    }

    #[test]
    fn ground_locked_stays_on_the_ground() {
        let mut cam = Camera::new(Vec3::new(0.0, 5.0, 0.0));
        cam.set_mode(CameraMode::GroundLocked);
        cam.look(0.0, 300.0); // pitch up 30 degrees
        cam.move_by(Movement::Forward, 1.0);
        let p = cam.position();
        assert_eq!(p.y, 0.0);
        // Pitch still shortens the planar step.
        let expected = 4.0 * 30.0_f32.to_radians().cos();
        assert!((p.z + expected).abs() < 1e-4);
    }

    #[test]
    fn ground_locked_ignores_vertical_moves() {
        let mut cam = Camera::new(Vec3::new(1.0, 0.0, 1.0));
        cam.set_mode(CameraMode::GroundLocked);
        cam.look(50.0, -200.0);
        cam.move_by(Movement::Up, 1.0);
        cam.move_by(Movement::Down, 1.0);
        assert_eq!(cam.position(), Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let cam = Camera::with_angles(Vec3::new(2.0, 1.0, -3.0), Vec3::Y, 45.0, 10.0);
        let view = cam.view_matrix();
        let eye = view.transform_point3(cam.position());
        assert!(approx(eye, Vec3::ZERO));
        let ahead = view.transform_point3(cam.position() + cam.front());
        assert!(approx(ahead, Vec3::NEG_Z));
    }

    #[test]
    fn projection_has_no_nan() {
        let cam = Camera::default();
        let proj = cam.projection_matrix(16.0 / 9.0, 0.1, 1000.0);
        assert!(!proj.is_nan());
        let vp = proj * cam.view_matrix();
        assert!(vp.is_finite());
    }

    #[test]
    fn constructor_clamps_pitch_and_fov() {
        let cam = Camera::from_config(&CameraConfig {
            pitch: 120.0,
            fov: 170.0,
            ..CameraConfig::default()
        });
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        assert_eq!(cam.fov(), FOV_MAX);
        assert_orthonormal(&cam);
    }
}
