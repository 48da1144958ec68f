//! Auto-play: clicks the next expected point on a fixed cadence.
//!
//! The clicks go through the same `ClickPoint` path as the player's, so
//! auto-play can only ever pick the correct point.

use super::logic::Command;
use super::scheduler::TimerKind;
use super::state::{GameSession, PointId, Status};

/// Command that starts the cadence for the current generation.
pub fn start(session: &GameSession) -> Command {
    Command::Schedule {
        timer: TimerKind::AutoPlay,
        generation: session.generation,
        every_ms: session.config.autoplay_interval_ms,
        repeat: true,
    }
}

pub fn stop() -> Command {
    Command::Cancel(TimerKind::AutoPlay)
}

/// The point auto-play would click now, if any.
pub fn next_click(session: &GameSession) -> Option<PointId> {
    if session.status != Status::Playing || !session.auto_play_enabled {
        return None;
    }
    session.first_active().map(|p| p.id.clone())
}
