//! Frame clock: turns host timestamps into clamped deltas

/// Derives per-frame dt (seconds) from millisecond timestamps
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Advance to `timestamp_ms` and return the clamped delta.
    ///
    /// The first frame after construction or `reset` yields 0, as do
    /// timestamps that go backward or are not finite.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        if !timestamp_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        if dt.is_finite() && dt > 0.0 {
            dt.min(self.max_dt)
        } else {
            0.0
        }
    }

    /// Forget the last timestamp (resume after a stall)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
