//! Input: window-system-agnostic controls and the per-frame input state.
//!
//! # Invariants
//! - The main loop owns the single `InputState`; nothing here is global.
//! - Look and scroll deltas are consumed exactly once, by the next `apply`.

pub mod clock;
pub mod control;
pub mod state;

pub use clock::FrameClock;
pub use control::Control;
pub use state::{CursorTracker, InputState};
