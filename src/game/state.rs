//! Point Chase state: points, count input, and the session aggregate.

use std::collections::HashMap;
use std::fmt;

use crate::config::GameConfig;

use super::fade::FadeCountdown;

/// Opaque point identifier, unique within a session and across restarts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointId(String);

impl PointId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Placement inside the play field, in percent of its size. Both values lie
/// in `[0, 90)` so a label never starts on the far edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutPosition {
    pub top: f64,
    pub left: f64,
}

/// One numbered target.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: PointId,
    /// 1..=N, the number shown and the click order.
    pub sequence_number: u32,
    pub position: LayoutPosition,
    /// Draw priority; higher is drawn on top. `N - (sequence_number - 1)`.
    pub stack_order: u32,
    fade_out: bool,
}

impl Point {
    pub fn new(
        id: PointId,
        sequence_number: u32,
        position: LayoutPosition,
        stack_order: u32,
    ) -> Self {
        Self {
            id,
            sequence_number,
            position,
            stack_order,
            fade_out: false,
        }
    }

    /// True once the point was clicked correctly. Never goes back to false.
    pub fn fade_out(&self) -> bool {
        self.fade_out
    }

    /// Mark the point resolved. Returns false if it already was.
    pub fn resolve(&mut self) -> bool {
        let changed = !self.fade_out;
        self.fade_out = true;
        changed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Playing,
    GameOver,
    Completed,
}

// ── Count input ─────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountInputError {
    Empty,
    NotADigit(char),
    TooLarge { max: u32 },
}

impl fmt::Display for CountInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountInputError::Empty => write!(f, "no point count entered"),
            CountInputError::NotADigit(c) => write!(f, "{c:?} is not a digit"),
            CountInputError::TooLarge { max } => write!(f, "at most {max} points"),
        }
    }
}

impl std::error::Error for CountInputError {}

/// Edits the player can make to the count field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEdit {
    Push(char),
    Backspace,
    Clear,
}

/// The point count text field. Only ever holds a valid number (or nothing):
/// keystrokes that would make it invalid are rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CountInput {
    text: String,
}

impl CountInput {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push(&mut self, c: char, max: u32) -> Result<(), CountInputError> {
        if !c.is_ascii_digit() {
            return Err(CountInputError::NotADigit(c));
        }
        let mut next = if self.text == "0" {
            String::new()
        } else {
            self.text.clone()
        };
        next.push(c);
        match next.parse::<u64>() {
            Ok(n) if n <= max as u64 => {
                self.text = next;
                Ok(())
            }
            _ => Err(CountInputError::TooLarge { max }),
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn value(&self) -> Result<u32, CountInputError> {
        if self.text.is_empty() {
            return Err(CountInputError::Empty);
        }
        // push() only admits digits, so this can only fail on overflow
        self.text
            .parse::<u32>()
            .map_err(|_| CountInputError::TooLarge { max: u32::MAX })
    }
}

// ── Session ─────────────────────────────────────────────────

/// One play-through. Points belong to the session and are replaced
/// wholesale on restart.
pub struct GameSession {
    pub config: GameConfig,
    pub status: Status,
    pub points: Vec<Point>,
    /// Countdown for every resolved point, keyed by id.
    pub fades: HashMap<PointId, FadeCountdown>,
    pub elapsed_ms: u64,
    /// Elapsed time at the click that resolved the last point.
    pub cleared_at_ms: Option<u64>,
    pub requested_count: u32,
    pub input: CountInput,
    pub auto_play_enabled: bool,
    /// Bumped on every lifecycle transition. Timers carry the generation
    /// they were scheduled in and are ignored once it is stale.
    pub generation: u64,
    pub rng_seed: u64,
}

impl GameSession {
    pub fn new(config: GameConfig, rng_seed: u64) -> Self {
        Self {
            config,
            status: Status::Idle,
            points: Vec::new(),
            fades: HashMap::new(),
            elapsed_ms: 0,
            cleared_at_ms: None,
            requested_count: 0,
            input: CountInput::default(),
            auto_play_enabled: false,
            generation: 0,
            rng_seed,
        }
    }

    /// The unresolved point with the lowest number: the only valid click.
    pub fn first_active(&self) -> Option<&Point> {
        self.points
            .iter()
            .filter(|p| !p.fade_out())
            .min_by_key(|p| p.sequence_number)
    }

    pub fn active_count(&self) -> usize {
        self.points.iter().filter(|p| !p.fade_out()).count()
    }

    pub fn point(&self, id: &PointId) -> Option<&Point> {
        self.points.iter().find(|p| &p.id == id)
    }

    pub fn fade(&self, id: &PointId) -> Option<&FadeCountdown> {
        self.fades.get(id)
    }

    /// Whether the Play/Restart button does anything right now.
    pub fn play_button_enabled(&self) -> bool {
        match self.status {
            Status::Idle => self.input.value().is_ok(),
            _ => true,
        }
    }

    pub fn play_button_label(&self) -> &'static str {
        match self.status {
            Status::Idle => "Play",
            _ => "Restart",
        }
    }
}
