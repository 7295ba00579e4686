//! Frame clock
//!
//! Converts host frame timestamps (ms, e.g. from `requestAnimationFrame`)
//! into clamped real-time deltas. Primed explicitly with `start` before the
//! first `advance`.

use crate::consts::MAX_FRAME_MS;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prime the clock so the next `advance` measures from `timestamp`
    pub fn start(&mut self, timestamp: f64) {
        self.last = Some(timestamp);
    }

    pub fn is_started(&self) -> bool {
        self.last.is_some()
    }

    /// Elapsed real time since the previous call, clamped to `[0, MAX_FRAME_MS]`.
    ///
    /// An unprimed clock primes itself and reports zero elapsed time.
    pub fn advance(&mut self, timestamp: f64) -> f32 {
        let Some(last) = self.last.replace(timestamp) else {
            return 0.0;
        };
        let elapsed = timestamp - last;
        if !elapsed.is_finite() {
            return 0.0;
        }
        (elapsed as f32).clamp(0.0, MAX_FRAME_MS)
    }
}
