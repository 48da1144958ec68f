//! Point Chase game logic: a pure reducer, fully testable.
//!
//! `apply` is the only function that changes a [`GameSession`]. It never
//! touches timers or the UI itself; instead it returns [`Command`]s
//! for the runtime to carry out (schedule/cancel a timer, show a
//! notification).

use crate::console;

use super::autoplay;
use super::fade::FadeCountdown;
use super::notify::Notification;
use super::points;
use super::scheduler::TimerKind;
use super::state::{GameSession, InputEdit, PointId, Status};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    EditInput(InputEdit),
    Play { count: u32 },
    Restart,
    ClickPoint(PointId),
    ToggleAutoPlay,
    TimerFired { timer: TimerKind, generation: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Schedule {
        timer: TimerKind,
        generation: u64,
        every_ms: u32,
        repeat: bool,
    },
    Cancel(TimerKind),
    /// Drop every pending timer. Issued whenever the session leaves Playing.
    CancelAll,
    Notify(Notification),
}

pub fn apply(session: &mut GameSession, action: Action) -> Vec<Command> {
    let mut out = Vec::new();
    match action {
        Action::EditInput(edit) => edit_input(session, edit),
        Action::Play { count } => play(session, count, &mut out),
        Action::Restart => restart(session, &mut out),
        Action::ClickPoint(id) => click_point(session, &id, &mut out),
        Action::ToggleAutoPlay => toggle_auto_play(session, &mut out),
        Action::TimerFired { timer, generation } => {
            timer_fired(session, timer, generation, &mut out)
        }
    }
    out
}

// ── Input ───────────────────────────────────────────────────

fn edit_input(session: &mut GameSession, edit: InputEdit) {
    if session.status != Status::Idle {
        return;
    }
    match edit {
        InputEdit::Push(c) => {
            // Rejected keystrokes just leave the field as it was
            let _ = session.input.push(c, session.config.max_points);
        }
        InputEdit::Backspace => session.input.backspace(),
        InputEdit::Clear => session.input.clear(),
    }
}

// ── Lifecycle ───────────────────────────────────────────────

fn play(session: &mut GameSession, count: u32, out: &mut Vec<Command>) {
    if session.status != Status::Idle {
        return;
    }
    if count > session.config.max_points {
        console::warn(&format!(
            "point-chase: refusing to play {count} points (max {})",
            session.config.max_points
        ));
        return;
    }
    session.requested_count = count;
    session.status = Status::Playing;
    console::log(&format!("point-chase: play with {count} points"));
    start_round(session, out);
}

fn restart(session: &mut GameSession, out: &mut Vec<Command>) {
    match session.status {
        Status::Idle => {}
        Status::Playing => {
            out.push(Command::CancelAll);
            console::log("point-chase: restart while playing");
            start_round(session, out);
        }
        Status::GameOver | Status::Completed => {
            out.push(Command::CancelAll);
            session.generation += 1;
            session.status = Status::Idle;
            session.points.clear();
            session.fades.clear();
            session.elapsed_ms = 0;
            session.cleared_at_ms = None;
            session.auto_play_enabled = false;
            session.input.clear();
            console::log("point-chase: back to idle");
        }
    }
}

/// Fresh point set for `requested_count`, clock at zero, auto-play off.
fn start_round(session: &mut GameSession, out: &mut Vec<Command>) {
    session.generation += 1;
    session.points = points::generate(session.requested_count, &mut session.rng_seed);
    session.fades.clear();
    session.elapsed_ms = 0;
    session.cleared_at_ms = None;
    session.auto_play_enabled = false;

    if session.points.is_empty() {
        // Nothing to click: the round is over before it starts
        session.cleared_at_ms = Some(0);
        complete(session, out);
        return;
    }

    out.push(Command::Schedule {
        timer: TimerKind::SessionClock,
        generation: session.generation,
        every_ms: session.config.tick_ms,
        repeat: true,
    });
}

fn game_over(session: &mut GameSession, out: &mut Vec<Command>) {
    session.status = Status::GameOver;
    session.generation += 1;
    session.auto_play_enabled = false;
    out.push(Command::CancelAll);
    out.push(Command::Notify(Notification::failure()));
    console::log(&format!(
        "point-chase: game over at {}ms",
        session.elapsed_ms
    ));
}

fn complete(session: &mut GameSession, out: &mut Vec<Command>) {
    session.status = Status::Completed;
    session.generation += 1;
    session.auto_play_enabled = false;
    let final_ms = session.cleared_at_ms.unwrap_or(session.elapsed_ms);
    out.push(Command::CancelAll);
    out.push(Command::Notify(Notification::success(final_ms)));
    console::log(&format!("point-chase: completed in {final_ms}ms"));
}

// ── Clicks ──────────────────────────────────────────────────

fn click_point(session: &mut GameSession, id: &PointId, out: &mut Vec<Command>) {
    if session.status != Status::Playing {
        return;
    }
    let Some(idx) = session.points.iter().position(|p| &p.id == id) else {
        console::warn(&format!("point-chase: click on unknown point {id}"));
        return;
    };
    if session.points[idx].fade_out() {
        return;
    }

    let is_next = session.first_active().map(|p| &p.id) == Some(id);
    if !is_next {
        game_over(session, out);
        return;
    }

    session.points[idx].resolve();
    session.fades.insert(
        id.clone(),
        FadeCountdown::new(session.config.fade_ms, session.config.tick_ms),
    );
    out.push(Command::Schedule {
        timer: TimerKind::Fade(id.clone()),
        generation: session.generation,
        every_ms: session.config.tick_ms,
        repeat: true,
    });

    if session.active_count() == 0 {
        session.cleared_at_ms = Some(session.elapsed_ms);
        out.push(Command::Schedule {
            timer: TimerKind::Completion,
            generation: session.generation,
            every_ms: session.config.fade_ms,
            repeat: false,
        });
    }
}

fn toggle_auto_play(session: &mut GameSession, out: &mut Vec<Command>) {
    if session.status != Status::Playing {
        return;
    }
    session.auto_play_enabled = !session.auto_play_enabled;
    if session.auto_play_enabled {
        out.push(autoplay::start(session));
    } else {
        out.push(autoplay::stop());
    }
}

// ── Timers ──────────────────────────────────────────────────

fn timer_fired(
    session: &mut GameSession,
    timer: TimerKind,
    generation: u64,
    out: &mut Vec<Command>,
) {
    if generation != session.generation || session.status != Status::Playing {
        console::log(&format!(
            "point-chase: dropped stale {timer:?} (gen {generation}, current {})",
            session.generation
        ));
        return;
    }

    match timer {
        TimerKind::SessionClock => {
            session.elapsed_ms += session.config.tick_ms as u64;
        }
        TimerKind::Fade(id) => {
            let finished = match session.fades.get_mut(&id) {
                Some(fade) => fade.tick(),
                None => true,
            };
            if finished {
                out.push(Command::Cancel(TimerKind::Fade(id)));
            }
        }
        TimerKind::AutoPlay => {
            if !session.auto_play_enabled {
                out.push(autoplay::stop());
                return;
            }
            if let Some(id) = autoplay::next_click(session) {
                click_point(session, &id, out);
            }
        }
        TimerKind::Completion => complete(session, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::notify::NotificationKind;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), 42)
    }

    fn playing(count: u32) -> GameSession {
        let mut s = session();
        apply(&mut s, Action::Play { count });
        s
    }

    fn id_of(s: &GameSession, number: u32) -> PointId {
        s.points
            .iter()
            .find(|p| p.sequence_number == number)
            .map(|p| p.id.clone())
            .unwrap()
    }

    fn notifications(cmds: &[Command]) -> Vec<&Notification> {
        cmds.iter()
            .filter_map(|c| match c {
                Command::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn fire(s: &mut GameSession, timer: TimerKind) -> Vec<Command> {
        let generation = s.generation;
        apply(s, Action::TimerFired { timer, generation })
    }

    // ── Play ───────────────────────────────────────────────

    #[test]
    fn play_starts_session() {
        let mut s = session();
        let cmds = apply(&mut s, Action::Play { count: 3 });
        assert_eq!(s.status, Status::Playing);
        assert_eq!(s.points.len(), 3);
        assert_eq!(s.elapsed_ms, 0);
        assert_eq!(s.requested_count, 3);
        assert_eq!(
            cmds,
            vec![Command::Schedule {
                timer: TimerKind::SessionClock,
                generation: s.generation,
                every_ms: 100,
                repeat: true,
            }]
        );
    }

    #[test]
    fn play_only_from_idle() {
        let mut s = playing(3);
        let before: Vec<PointId> = s.points.iter().map(|p| p.id.clone()).collect();
        let cmds = apply(&mut s, Action::Play { count: 5 });
        assert!(cmds.is_empty());
        let after: Vec<PointId> = s.points.iter().map(|p| p.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn play_zero_completes_immediately() {
        let mut s = session();
        let cmds = apply(&mut s, Action::Play { count: 0 });
        assert_eq!(s.status, Status::Completed);
        assert!(s.points.is_empty());
        let notes = notifications(&cmds);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Success);
        assert!(notes[0].message.ends_with("0.0s"));
    }

    #[test]
    fn play_above_max_is_refused() {
        let mut s = session();
        let cmds = apply(&mut s, Action::Play { count: 501 });
        assert!(cmds.is_empty());
        assert_eq!(s.status, Status::Idle);
    }

    // ── Clicks ─────────────────────────────────────────────

    #[test]
    fn in_order_clicks_schedule_completion_after_last() {
        let mut s = playing(3);
        for n in 1..=2 {
            let id = id_of(&s, n);
            let cmds = apply(&mut s, Action::ClickPoint(id));
            assert!(notifications(&cmds).is_empty());
            assert!(!cmds.iter().any(|c| matches!(
                c,
                Command::Schedule { timer: TimerKind::Completion, .. }
            )));
        }
        let id = id_of(&s, 3);
        let cmds = apply(&mut s, Action::ClickPoint(id));
        assert!(cmds.contains(&Command::Schedule {
            timer: TimerKind::Completion,
            generation: s.generation,
            every_ms: 3000,
            repeat: false,
        }));
        assert_eq!(s.status, Status::Playing);
        assert!(s.points.iter().all(|p| p.fade_out()));
    }

    #[test]
    fn correct_click_starts_fade() {
        let mut s = playing(2);
        let id = id_of(&s, 1);
        let cmds = apply(&mut s, Action::ClickPoint(id.clone()));
        assert!(s.point(&id).unwrap().fade_out());
        assert_eq!(s.fade(&id).unwrap().remaining_ms(), 3000);
        assert!(cmds.contains(&Command::Schedule {
            timer: TimerKind::Fade(id),
            generation: s.generation,
            every_ms: 100,
            repeat: true,
        }));
    }

    #[test]
    fn wrong_click_is_game_over_once() {
        let mut s = playing(3);
        let id = id_of(&s, 2);
        let cmds = apply(&mut s, Action::ClickPoint(id));
        assert_eq!(s.status, Status::GameOver);
        assert!(!s.auto_play_enabled);
        assert_eq!(cmds[0], Command::CancelAll);
        assert_eq!(notifications(&cmds), vec![&Notification::failure()]);

        // Further clicks change nothing and notify nothing
        for n in 1..=3 {
            let id = id_of(&s, n);
            let cmds = apply(&mut s, Action::ClickPoint(id));
            assert!(cmds.is_empty());
        }
        assert_eq!(s.status, Status::GameOver);
        assert!(s.points.iter().all(|p| !p.fade_out()));
    }

    #[test]
    fn clicking_resolved_point_is_ignored() {
        let mut s = playing(3);
        let first = id_of(&s, 1);
        apply(&mut s, Action::ClickPoint(first.clone()));
        let cmds = apply(&mut s, Action::ClickPoint(first));
        assert!(cmds.is_empty());
        assert_eq!(s.status, Status::Playing);
    }

    #[test]
    fn unknown_point_is_ignored() {
        let mut s = playing(3);
        let cmds = apply(&mut s, Action::ClickPoint(PointId::new("nope")));
        assert!(cmds.is_empty());
        assert_eq!(s.status, Status::Playing);
    }

    #[test]
    fn clicks_ignored_when_idle() {
        let mut s = session();
        let cmds = apply(&mut s, Action::ClickPoint(PointId::new("id0")));
        assert!(cmds.is_empty());
        assert_eq!(s.status, Status::Idle);
    }

    // ── Restart ────────────────────────────────────────────

    #[test]
    fn restart_while_playing_regenerates() {
        let mut s = playing(5);
        apply(&mut s, Action::ToggleAutoPlay);
        fire(&mut s, TimerKind::SessionClock);
        let old_ids: Vec<PointId> = s.points.iter().map(|p| p.id.clone()).collect();
        let old_generation = s.generation;

        let cmds = apply(&mut s, Action::Restart);
        assert_eq!(s.status, Status::Playing);
        assert_eq!(s.points.len(), 5);
        assert_eq!(s.elapsed_ms, 0);
        assert!(!s.auto_play_enabled);
        assert!(s.generation > old_generation);
        assert!(s.points.iter().all(|p| !old_ids.contains(&p.id)));
        assert_eq!(cmds[0], Command::CancelAll);
        assert!(cmds.contains(&Command::Schedule {
            timer: TimerKind::SessionClock,
            generation: s.generation,
            every_ms: 100,
            repeat: true,
        }));
    }

    #[test]
    fn restart_after_game_over_goes_idle() {
        let mut s = session();
        apply(&mut s, Action::EditInput(InputEdit::Push('3')));
        let count = s.input.value().unwrap();
        apply(&mut s, Action::Play { count });
        fire(&mut s, TimerKind::SessionClock);
        let id = id_of(&s, 3);
        apply(&mut s, Action::ClickPoint(id));
        assert_eq!(s.status, Status::GameOver);

        let cmds = apply(&mut s, Action::Restart);
        assert_eq!(cmds, vec![Command::CancelAll]);
        assert_eq!(s.status, Status::Idle);
        assert_eq!(s.elapsed_ms, 0);
        assert!(s.points.is_empty());
        assert!(s.input.is_empty());
    }

    #[test]
    fn restart_after_completion_goes_idle() {
        let mut s = playing(1);
        let id = id_of(&s, 1);
        apply(&mut s, Action::ClickPoint(id));
        fire(&mut s, TimerKind::Completion);
        assert_eq!(s.status, Status::Completed);

        apply(&mut s, Action::Restart);
        assert_eq!(s.status, Status::Idle);
        assert!(s.input.is_empty());
    }

    #[test]
    fn restart_when_idle_does_nothing() {
        let mut s = session();
        let generation = s.generation;
        assert!(apply(&mut s, Action::Restart).is_empty());
        assert_eq!(s.generation, generation);
    }

    // ── Timers ─────────────────────────────────────────────

    #[test]
    fn session_clock_adds_a_tick() {
        let mut s = playing(2);
        fire(&mut s, TimerKind::SessionClock);
        fire(&mut s, TimerKind::SessionClock);
        assert_eq!(s.elapsed_ms, 200);
    }

    #[test]
    fn completion_reports_time_of_last_click() {
        let mut s = playing(1);
        for _ in 0..12 {
            fire(&mut s, TimerKind::SessionClock);
        }
        let id = id_of(&s, 1);
        apply(&mut s, Action::ClickPoint(id));
        for _ in 0..30 {
            fire(&mut s, TimerKind::SessionClock);
        }
        let cmds = fire(&mut s, TimerKind::Completion);
        assert_eq!(s.status, Status::Completed);
        assert_eq!(
            notifications(&cmds),
            vec![&Notification::success(1200)]
        );
    }

    #[test]
    fn stale_completion_is_dropped_after_restart() {
        // A completion scheduled in one round must never finish the next one
        let mut s = playing(1);
        let id = id_of(&s, 1);
        apply(&mut s, Action::ClickPoint(id));
        let stale = s.generation;

        apply(&mut s, Action::Restart);
        let cmds = apply(
            &mut s,
            Action::TimerFired {
                timer: TimerKind::Completion,
                generation: stale,
            },
        );
        assert_eq!(s.status, Status::Playing);
        assert!(cmds.is_empty());
    }

    #[test]
    fn timers_dropped_after_game_over() {
        let mut s = playing(3);
        let generation = s.generation;
        let id = id_of(&s, 3);
        apply(&mut s, Action::ClickPoint(id));
        let cmds = apply(
            &mut s,
            Action::TimerFired {
                timer: TimerKind::SessionClock,
                generation,
            },
        );
        assert_eq!(s.elapsed_ms, 0);
        assert!(cmds.is_empty());
    }

    #[test]
    fn fade_freezes_on_game_over() {
        let mut s = playing(3);
        let first = id_of(&s, 1);
        apply(&mut s, Action::ClickPoint(first.clone()));
        let generation = s.generation;
        for _ in 0..5 {
            fire(&mut s, TimerKind::Fade(first.clone()));
        }
        let id = id_of(&s, 3);
        apply(&mut s, Action::ClickPoint(id));
        apply(
            &mut s,
            Action::TimerFired {
                timer: TimerKind::Fade(first.clone()),
                generation,
            },
        );
        assert_eq!(s.fade(&first).unwrap().remaining_ms(), 2500);
    }

    #[test]
    fn fade_cancels_itself_at_zero() {
        let mut s = playing(2);
        let first = id_of(&s, 1);
        apply(&mut s, Action::ClickPoint(first.clone()));
        for _ in 0..29 {
            let cmds = fire(&mut s, TimerKind::Fade(first.clone()));
            assert!(cmds.is_empty());
        }
        let cmds = fire(&mut s, TimerKind::Fade(first.clone()));
        assert_eq!(cmds, vec![Command::Cancel(TimerKind::Fade(first.clone()))]);
        assert_eq!(s.fade(&first).unwrap().opacity(), 0.0);
    }

    // ── Auto-play ──────────────────────────────────────────

    #[test]
    fn toggle_auto_play_only_while_playing() {
        let mut s = session();
        assert!(apply(&mut s, Action::ToggleAutoPlay).is_empty());
        assert!(!s.auto_play_enabled);

        let mut s = playing(2);
        let cmds = apply(&mut s, Action::ToggleAutoPlay);
        assert!(s.auto_play_enabled);
        assert_eq!(cmds, vec![autoplay::start(&s)]);

        let cmds = apply(&mut s, Action::ToggleAutoPlay);
        assert!(!s.auto_play_enabled);
        assert_eq!(cmds, vec![autoplay::stop()]);
    }

    #[test]
    fn auto_play_firing_clicks_next_point() {
        let mut s = playing(2);
        apply(&mut s, Action::ToggleAutoPlay);
        fire(&mut s, TimerKind::AutoPlay);
        assert!(s.point(&id_of(&s, 1)).unwrap().fade_out());
        assert!(!s.point(&id_of(&s, 2)).unwrap().fade_out());
        assert_eq!(s.status, Status::Playing);
    }

    #[test]
    fn auto_play_firing_after_toggle_off_stops() {
        let mut s = playing(2);
        apply(&mut s, Action::ToggleAutoPlay);
        apply(&mut s, Action::ToggleAutoPlay);
        let cmds = fire(&mut s, TimerKind::AutoPlay);
        assert_eq!(cmds, vec![autoplay::stop()]);
        assert!(s.points.iter().all(|p| !p.fade_out()));
    }

    // ── Input ──────────────────────────────────────────────

    #[test]
    fn input_edits_only_while_idle() {
        let mut s = session();
        apply(&mut s, Action::EditInput(InputEdit::Push('4')));
        apply(&mut s, Action::EditInput(InputEdit::Push('x')));
        assert_eq!(s.input.as_str(), "4");

        apply(&mut s, Action::Play { count: 4 });
        apply(&mut s, Action::EditInput(InputEdit::Push('2')));
        apply(&mut s, Action::EditInput(InputEdit::Clear));
        assert_eq!(s.input.as_str(), "4");
    }
}
