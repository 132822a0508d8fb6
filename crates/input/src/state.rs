use crate::clock::FrameClock;
use crate::control::Control;
use glam::Vec2;
use std::collections::HashSet;
use surfaces_camera::{Camera, Movement};

/// Distance multiplier while [`Control::Boost`] is held.
pub const BOOST_MULTIPLIER: f32 = 2.0;

/// Turns absolute cursor positions into per-event offsets.
#[derive(Debug, Clone, Default)]
pub struct CursorTracker {
    last: Option<Vec2>,
}

impl CursorTracker {
    /// Offset from the previous sample, with y flipped so that moving the
    /// cursor up is positive. The first sample only primes the tracker.
    pub fn moved(&mut self, x: f32, y: f32) -> Vec2 {
        let current = Vec2::new(x, y);
        let offset = match self.last {
            Some(last) => Vec2::new(current.x - last.x, last.y - current.y),
            None => Vec2::ZERO,
        };
        self.last = Some(current);
        offset
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<Vec2> {
        self.last
    }
}

/// Everything the main loop learns from the window between two frames.
#[derive(Debug, Clone)]
pub struct InputState {
    pub clock: FrameClock,
    cursor: CursorTracker,
    held: HashSet<Control>,
    pending_look: Vec<Vec2>,
    pending_scroll: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            clock: FrameClock::default(),
            cursor: CursorTracker::default(),
            held: HashSet::new(),
            pending_look: Vec::new(),
            pending_scroll: 0.0,
        }
    }

    pub fn set_control(&mut self, control: Control, pressed: bool) {
        if pressed {
            self.held.insert(control);
        } else {
            self.held.remove(&control);
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Release every control, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Absolute cursor position in window pixels.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let offset = self.cursor.moved(x, y);
        self.queue_look(offset);
    }

    /// Raw relative mouse motion in pixels (screen y down).
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.queue_look(Vec2::new(dx, -dy));
    }

    // Offsets stay separate so the pitch clamp runs once per event.
    fn queue_look(&mut self, offset: Vec2) {
        if offset != Vec2::ZERO {
            self.pending_look.push(offset);
        }
    }

    pub fn scroll(&mut self, delta: f32) {
        self.pending_scroll += delta;
    }

    /// Forget the previous cursor position so the next sample does not jump.
    pub fn reset_cursor(&mut self) {
        self.cursor.reset();
        self.pending_look.clear();
    }

    /// Look offsets queued since the last `apply`, oldest first.
    pub fn pending_look(&self) -> &[Vec2] {
        &self.pending_look
    }

    /// Drive `camera` with the controls held this frame and the look/scroll
    /// input gathered since the last call.
    pub fn apply(&mut self, camera: &mut Camera, dt: f32) {
        let dt = if self.is_held(Control::Boost) {
            dt * BOOST_MULTIPLIER
        } else {
            dt
        };
        for movement in Movement::ALL {
            if self.is_held(Control::from(movement)) {
                camera.move_by(movement, dt);
            }
        }

        for look in self.pending_look.drain(..) {
            camera.look(look.x, look.y);
        }
        let scroll = std::mem::take(&mut self.pending_scroll);
        if scroll != 0.0 {
            camera.zoom(scroll);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn first_cursor_sample_does_not_look() {
        let mut tracker = CursorTracker::default();
        assert_eq!(tracker.moved(800.0, 450.0), Vec2::ZERO);
        assert_eq!(tracker.moved(810.0, 440.0), Vec2::new(10.0, 10.0));
        tracker.reset();
        assert_eq!(tracker.moved(0.0, 0.0), Vec2::ZERO);
    }

    #[test]
    fn held_forward_moves_camera() {
        let mut input = InputState::new();
        let mut camera = Camera::new(Vec3::ZERO);
        input.set_control(Control::Forward, true);
        input.apply(&mut camera, 0.5);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, -2.0)));

        input.set_control(Control::Forward, false);
        input.apply(&mut camera, 0.5);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn boost_doubles_distance() {
        let mut input = InputState::new();
        let mut camera = Camera::new(Vec3::ZERO);
        input.set_control(Control::Right, true);
        input.set_control(Control::Boost, true);
        input.apply(&mut camera, 1.0);
        assert!(approx(camera.position(), Vec3::new(8.0, 0.0, 0.0)));
    }

    #[test]
    fn look_is_consumed_once() {
        let mut input = InputState::new();
        let mut camera = Camera::default();
        let yaw = camera.yaw();
        input.cursor_moved(100.0, 100.0);
        input.cursor_moved(110.0, 100.0);
        input.apply(&mut camera, 0.0);
        assert_eq!(camera.yaw(), yaw + 10.0 * camera.sensitivity());

        let after = camera.yaw();
        input.apply(&mut camera, 0.0);
        assert_eq!(camera.yaw(), after);
    }

    #[test]
    fn mouse_motion_down_looks_down() {
        let mut input = InputState::new();
        let mut camera = Camera::default();
        input.mouse_motion(0.0, 50.0);
        input.apply(&mut camera, 0.0);
        assert!(camera.pitch() < 0.0);
    }

    #[test]
    fn look_events_clamp_one_at_a_time() {
        let mut input = InputState::new();
        let mut camera = Camera::with_angles(Vec3::ZERO, Vec3::Y, -90.0, 89.0);
        input.mouse_motion(0.0, -100.0);
        input.mouse_motion(0.0, 100.0);
        assert_eq!(input.pending_look().len(), 2);
        input.apply(&mut camera, 0.0);
        assert!((camera.pitch() - 79.0).abs() < 1e-4, "pitch {}", camera.pitch());
        assert!(input.pending_look().is_empty());

        let mut cursor_input = InputState::new();
        let mut cursor_camera = Camera::with_angles(Vec3::ZERO, Vec3::Y, -90.0, 89.0);
        cursor_input.cursor_moved(0.0, 500.0);
        cursor_input.cursor_moved(0.0, 400.0);
        cursor_input.cursor_moved(0.0, 500.0);
        cursor_input.apply(&mut cursor_camera, 0.0);
        assert!((cursor_camera.pitch() - 79.0).abs() < 1e-4);
    }

    #[test]
    fn scroll_zooms_in() {
        let mut input = InputState::new();
        let mut camera = Camera::default();
        input.scroll(2.0);
        input.scroll(3.0);
        input.apply(&mut camera, 0.0);
        assert_eq!(camera.fov(), 40.0);
    }

    #[test]
    fn release_all_stops_movement() {
        let mut input = InputState::new();
        let mut camera = Camera::default();
        let start = camera.position();
        input.set_control(Control::Up, true);
        input.set_control(Control::Left, true);
        input.release_all();
        input.apply(&mut camera, 1.0);
        assert_eq!(camera.position(), start);
    }

    #[test]
    fn reset_cursor_drops_pending_look() {
        let mut input = InputState::new();
        input.cursor_moved(0.0, 0.0);
        input.cursor_moved(30.0, 0.0);
        input.reset_cursor();
        assert!(input.pending_look().is_empty());
        input.cursor_moved(500.0, 500.0);
        assert!(input.pending_look().is_empty());
    }
}
