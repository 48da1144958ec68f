//! Game timing and limits.
//!
//! Defaults match the classic game. A page can override any field with a
//! JSON block:
//!
//! ```html
//! <script id="point-chase-config" type="application/json">
//!   { "fade_ms": 2000, "max_points": 100 }
//! </script>
//! ```
//!
//! Missing fields keep their default. A block that fails to parse or
//! validate is ignored with a console warning.

use std::fmt;

use serde::Deserialize;

/// DOM id of the optional JSON config block.
const CONFIG_ELEMENT_ID: &str = "point-chase-config";

/// Upper bound for `max_points`; every point needs its own click action ID.
pub const MAX_POINTS_LIMIT: u32 = 9999;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Clock granularity. Every other duration is a multiple of this.
    pub tick_ms: u32,
    /// How long a resolved point takes to fade out. Also the delay between
    /// the last correct click and completion.
    pub fade_ms: u32,
    /// Auto-play click cadence.
    pub autoplay_interval_ms: u32,
    /// Largest point count the input field accepts.
    pub max_points: u32,
    /// How long a notification toast stays visible.
    pub toast_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            fade_ms: 3000,
            autoplay_interval_ms: 1000,
            max_points: 500,
            toast_ms: 4000,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "config is not valid JSON: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".into()));
        }
        for (name, value) in [
            ("fade_ms", self.fade_ms),
            ("autoplay_interval_ms", self.autoplay_interval_ms),
            ("toast_ms", self.toast_ms),
        ] {
            if value == 0 || value % self.tick_ms != 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} ({value}) must be a positive multiple of tick_ms ({})",
                    self.tick_ms
                )));
            }
        }
        if self.max_points == 0 || self.max_points > MAX_POINTS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_points ({}) must be between 1 and {MAX_POINTS_LIMIT}",
                self.max_points
            )));
        }
        Ok(())
    }

    /// Convert a duration into clock ticks (at least one).
    pub fn ticks(&self, ms: u32) -> u32 {
        (ms / self.tick_ms).max(1)
    }

    #[cfg(test)]
    pub fn ticks_per_sec(&self) -> u32 {
        (1000 / self.tick_ms).max(1)
    }
}

/// Read the config block from the host page, falling back to defaults.
pub fn load() -> GameConfig {
    let json = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .map(|el| el.inner_html());

    let Some(json) = json else {
        return GameConfig::default();
    };

    match GameConfig::from_json(&json) {
        Ok(config) => {
            crate::console::log(&format!("point-chase: loaded config {config:?}"));
            config
        }
        Err(e) => {
            crate::console::warn(&format!("point-chase: {e}; using defaults"));
            GameConfig::default()
        }
    }
}
