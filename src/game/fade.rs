//! Per-point fade-out countdown.
//!
//! Starts at the fade duration once a point is resolved and loses one tick
//! per clock step. Opacity falls in equal steps alongside it, reaching 0
//! exactly when the countdown does.

use crate::time::SecondsTenths;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FadeCountdown {
    duration_ms: u32,
    remaining_ms: u32,
    step_ms: u32,
}

impl FadeCountdown {
    pub fn new(duration_ms: u32, step_ms: u32) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            step_ms: step_ms.max(1),
        }
    }

    /// Advance by one step. Returns true once the countdown has hit zero.
    pub fn tick(&mut self) -> bool {
        self.remaining_ms = self.remaining_ms.saturating_sub(self.step_ms);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_ms == 0
    }

    #[cfg(test)]
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    /// 1.0 when fresh, 0.0 when done.
    pub fn opacity(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.remaining_ms as f64 / self.duration_ms as f64
    }

    pub fn remaining(&self) -> SecondsTenths {
        SecondsTenths::from_ms(self.remaining_ms as u64)
    }
}
