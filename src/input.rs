//! Input normalisation and click hit testing.
//!
//! Keyboard and pointer events from the DOM are turned into [`InputEvent`]s
//! here; nothing in this module touches `web_sys`, so all of it is unit
//! tested natively.

use ratzilla::ratatui::layout::Rect;

/// Input events after normalisation from keyboard and mouse/touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A printable key.
    Key(char),
    Backspace,
    /// Enter.
    Submit,
    /// A click on a registered target, identified by its action ID
    /// (see `game::actions`).
    Click(u16),
}

/// A rectangle on screen bound to an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered by the last render, plus the terminal size the
/// pointer handler needs to convert pixels into cells.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-width, one-row target, ignored if `row` lies outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Action ID under a cell. Targets registered later are drawn on top, so
    /// they win when rectangles overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Below this many columns the header collapses to a single column.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel Y offset (relative to the grid's top edge) into a row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;
    if row >= terminal_rows {
        return None;
    }
    Some(row)
}

/// Convert a pixel X offset (relative to the grid's left edge) into a column.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols {
        None
    } else {
        Some(col)
    }
}
