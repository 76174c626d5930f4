//! Platform abstraction layer
//!
//! Host-facing state fed by browser (or native) events:
//! - Frame timing with a clamped delta
//! - Keyboard/pointer/focus input, reduced to per-tick commands

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{InputState, Key};
