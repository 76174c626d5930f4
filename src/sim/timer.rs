//! Countdown timers for buffers, grace windows, toasts and delays

use serde::{Deserialize, Serialize};

/// Seconds remaining until expiry; 0 means idle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    /// An armed countdown
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    pub fn arm(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Remaining fraction of `total`, in `[0, 1]`
    pub fn ratio(&self, total: f32) -> f32 {
        if total <= 0.0 {
            0.0
        } else {
            (self.remaining / total).clamp(0.0, 1.0)
        }
    }

    /// Decay by `dt`; returns true only on the tick the countdown reaches 0
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        self.remaining == 0.0
    }
}
