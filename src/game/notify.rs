//! Player-facing notifications.
//!
//! The game logic only emits [`Notification`] values; where they end up is
//! up to the [`Notifier`]. The browser build shows them as toasts, tests
//! collect them in a `Vec`.

use std::collections::VecDeque;

use crate::console;
use crate::time::SecondsTenths;

pub const GAME_OVER_MESSAGE: &str = "GAME OVER!";

/// Toasts kept on screen at once; older ones are dropped.
const MAX_TOASTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn failure() -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: GAME_OVER_MESSAGE.into(),
        }
    }

    pub fn success(elapsed_ms: u64) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: format!(
                "Congratulations!!! You have completed the game within {}",
                SecondsTenths::from_ms(elapsed_ms)
            ),
        }
    }
}

pub trait Notifier {
    fn notify(&mut self, notification: &Notification);

    /// Called once per clock tick.
    fn tick(&mut self, _delta_ticks: u32) {}
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: &Notification) {
        self.push(notification.clone());
    }
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub notification: Notification,
    pub ticks_left: u32,
}

/// On-screen notifications that expire after a fixed number of ticks.
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    lifetime_ticks: u32,
}

impl ToastQueue {
    pub fn new(lifetime_ticks: u32) -> Self {
        Self {
            toasts: VecDeque::new(),
            lifetime_ticks: lifetime_ticks.max(1),
        }
    }

    /// Most recent toast still on screen.
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => console::log(&notification.message),
            NotificationKind::Failure => console::warn(&notification.message),
        }
        self.toasts.push_back(Toast {
            notification: notification.clone(),
            ticks_left: self.lifetime_ticks,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        for toast in &mut self.toasts {
            toast.ticks_left = toast.ticks_left.saturating_sub(delta_ticks);
        }
        self.toasts.retain(|t| t.ticks_left > 0);
    }
}
