//! Fixed-step game clock and the shared `s.d` time formatter.
//!
//! `draw_web()` runs at the browser's frame rate with a variable delta.
//! GameTime turns that into a whole number of fixed ticks so every timer in
//! the game advances in the same discrete steps and tests can drive it
//! directly.

/// Longest wall-clock gap fed into the accumulator in one frame. A
/// backgrounded tab resumes at most this far ahead instead of replaying
/// minutes of ticks.
const MAX_FRAME_DELTA_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    accumulator: f64,
    /// None until the first frame.
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(tick_ms: u32) -> Self {
        Self {
            ms_per_tick: tick_ms.max(1) as f64,
            accumulator: 0.0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (`performance.now()`), get back the number
    /// of ticks to run this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        ticks
    }
}

/// Whole seconds plus the tenths digit of a millisecond count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecondsTenths {
    pub seconds: u64,
    pub tenths: u8,
}

impl SecondsTenths {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            seconds: ms / 1000,
            tenths: ((ms % 1000) / 100) as u8,
        }
    }
}

impl std::fmt::Display for SecondsTenths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}s", self.seconds, self.tenths)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_formatter_brackets_input(ms in 0u64..10_000_000) {
            let st = SecondsTenths::from_ms(ms);
            let low = st.seconds * 1000 + st.tenths as u64 * 100;
            prop_assert!(st.tenths < 10);
            prop_assert!(low <= ms);
            prop_assert!(ms < low + 100);
        }

        #[test]
        fn prop_ticks_never_exceed_elapsed(deltas in proptest::collection::vec(0.0f64..400.0, 1..50)) {
            let mut gt = GameTime::new(100);
            let mut now = 0.0;
            let mut ticks = gt.update(now) as u64;
            for d in &deltas {
                now += d;
                ticks += gt.update(now) as u64;
            }
            prop_assert!(ticks as f64 * 100.0 <= now + 1e-6);
        }
    }
}
