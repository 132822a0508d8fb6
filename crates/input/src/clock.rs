/// Frame timer fed with absolute timestamps in seconds.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    delta: f32,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl FrameClock {
    /// `max_delta` caps a single step so a stalled frame cannot fling the camera.
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            delta: 0.0,
            max_delta,
        }
    }

    /// Record a frame at `now` and return the seconds elapsed since the
    /// previous one. The first call returns zero.
    pub fn tick(&mut self, now: f64) -> f32 {
        let delta = match self.last {
            Some(last) => {
                let raw = (now - last).max(0.0) as f32;
                if raw > self.max_delta {
                    tracing::debug!(raw, max = self.max_delta, "frame delta clamped");
                }
                raw.min(self.max_delta)
            }
            None => 0.0,
        };
        self.last = Some(now);
        self.delta = delta;
        delta
    }

    /// Delta computed by the most recent `tick`.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Timestamp of the most recent `tick`.
    pub fn last_frame(&self) -> Option<f64> {
        self.last
    }
}
