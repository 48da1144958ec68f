//! Tick-driven timers tagged with the session generation that created them.
//!
//! Nothing here decides what a firing means: `advance()` only reports which
//! timers came due, and the caller routes each one back through
//! `logic::apply`, which drops firings from an older generation.

use super::state::PointId;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Adds one tick to the elapsed time while playing.
    SessionClock,
    /// Advances one point's fade countdown.
    Fade(PointId),
    /// Clicks the next point while auto-play is on.
    AutoPlay,
    /// One-shot: finishes the game once the last point has faded.
    Completion,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Firing {
    pub timer: TimerKind,
    pub generation: u64,
}

struct Scheduled {
    timer: TimerKind,
    generation: u64,
    period_ticks: u32,
    remaining_ticks: u32,
    repeat: bool,
}

pub struct Scheduler {
    entries: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Start a timer firing every `period_ticks` (or once). Re-scheduling a
    /// kind that is already pending replaces it.
    pub fn schedule(&mut self, timer: TimerKind, generation: u64, period_ticks: u32, repeat: bool) {
        self.cancel(&timer);
        let period_ticks = period_ticks.max(1);
        self.entries.push(Scheduled {
            timer,
            generation,
            period_ticks,
            remaining_ticks: period_ticks,
            repeat,
        });
    }

    pub fn cancel(&mut self, timer: &TimerKind) {
        self.entries.retain(|e| &e.timer != timer);
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove every timer scheduled in a generation other than `current`.
    pub fn retain_generation(&mut self, current: u64) {
        self.entries.retain(|e| e.generation == current);
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, timer: &TimerKind) -> bool {
        self.entries.iter().any(|e| &e.timer == timer)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Advance one tick. Due timers are returned in the order they were
    /// scheduled; one-shots are removed, repeating timers re-armed.
    pub fn advance(&mut self) -> Vec<Firing> {
        let mut fired = Vec::new();
        for entry in &mut self.entries {
            entry.remaining_ticks = entry.remaining_ticks.saturating_sub(1);
            if entry.remaining_ticks == 0 {
                fired.push(Firing {
                    timer: entry.timer.clone(),
                    generation: entry.generation,
                });
                if entry.repeat {
                    entry.remaining_ticks = entry.period_ticks;
                }
            }
        }
        self.entries.retain(|e| e.remaining_ticks > 0);
        fired
    }
}
