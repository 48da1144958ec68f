//! Point Chase: click the numbered points in ascending order, against the clock.

pub mod actions;
pub mod autoplay;
pub mod fade;
pub mod logic;
pub mod notify;
pub mod points;
pub mod render;
pub mod scheduler;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::GameConfig;
use crate::input::{ClickState, InputEvent};

use logic::{Action, Command};
use notify::{Notifier, ToastQueue};
use scheduler::{Scheduler, TimerKind};
use state::{GameSession, InputEdit, Status};

/// Runtime around the pure reducer: owns the session, carries out the
/// commands `logic::apply` returns, and drives the timers from clock ticks.
pub struct PointChaseGame<N: Notifier = ToastQueue> {
    pub session: GameSession,
    scheduler: Scheduler,
    pub notifier: N,
}

impl PointChaseGame<ToastQueue> {
    pub fn new(config: GameConfig, rng_seed: u64) -> Self {
        let toasts = ToastQueue::new(config.ticks(config.toast_ms));
        Self::with_notifier(config, rng_seed, toasts)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.session, &self.notifier, f, area, click_state);
    }
}

impl<N: Notifier> PointChaseGame<N> {
    pub fn with_notifier(config: GameConfig, rng_seed: u64, notifier: N) -> Self {
        Self {
            session: GameSession::new(config, rng_seed),
            scheduler: Scheduler::new(),
            notifier,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let commands = logic::apply(&mut self.session, action);
        for command in commands {
            self.execute(command);
        }
        self.scheduler.retain_generation(self.session.generation);
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Schedule {
                timer,
                generation,
                every_ms,
                repeat,
            } => {
                let ticks = self.session.config.ticks(every_ms);
                self.scheduler.schedule(timer, generation, ticks, repeat);
            }
            Command::Cancel(timer) => self.scheduler.cancel(&timer),
            Command::CancelAll => self.scheduler.cancel_all(),
            Command::Notify(notification) => self.notifier.notify(&notification),
        }
    }

    /// Advance by `delta_ticks` clock steps, one at a time, so that anything a
    /// firing cancels is already gone for the rest of that step.
    pub fn tick(&mut self, delta_ticks: u32) {
        for _ in 0..delta_ticks {
            for firing in self.scheduler.advance() {
                self.dispatch(Action::TimerFired {
                    timer: firing.timer,
                    generation: firing.generation,
                });
            }
        }
        self.notifier.tick(delta_ticks);
    }

    #[cfg(test)]
    pub fn is_scheduled(&self, timer: &TimerKind) -> bool {
        self.scheduler.is_scheduled(timer)
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// Play while idle (if the input holds a count), Restart otherwise.
    pub fn press_play_button(&mut self) -> bool {
        if !self.session.play_button_enabled() {
            return false;
        }
        match self.session.status {
            Status::Idle => match self.session.input.value() {
                Ok(count) => self.dispatch(Action::Play { count }),
                Err(_) => return false,
            },
            _ => self.dispatch(Action::Restart),
        }
        true
    }

    fn click_point_at(&mut self, index: usize) -> bool {
        let Some(point) = self.session.points.get(index) else {
            return false;
        };
        let id = point.id.clone();
        self.dispatch(Action::ClickPoint(id));
        true
    }

    /// Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) if c.is_ascii_digit() => {
                if self.session.status != Status::Idle {
                    return false;
                }
                self.dispatch(Action::EditInput(InputEdit::Push(*c)));
                true
            }
            InputEvent::Backspace => {
                if self.session.status != Status::Idle {
                    return false;
                }
                self.dispatch(Action::EditInput(InputEdit::Backspace));
                true
            }
            InputEvent::Submit | InputEvent::Key(' ') => self.press_play_button(),
            InputEvent::Key('a') | InputEvent::Key('A') => {
                if self.session.status != Status::Playing {
                    return false;
                }
                self.dispatch(Action::ToggleAutoPlay);
                true
            }
            InputEvent::Key('r') | InputEvent::Key('R') => {
                if self.session.status == Status::Idle {
                    return false;
                }
                self.dispatch(Action::Restart);
                true
            }
            InputEvent::Key(_) => false,
            InputEvent::Click(actions::PLAY_OR_RESTART) => self.press_play_button(),
            InputEvent::Click(actions::TOGGLE_AUTO_PLAY) => {
                self.handle_input(&InputEvent::Key('a'))
            }
            InputEvent::Click(id) => match actions::point_index(*id) {
                Some(index) => self.click_point_at(index),
                None => false,
            },
        }
    }
}
