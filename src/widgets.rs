//! Clickable UI building blocks.
//!
//! [`ClickableList`] keeps rendered lines and their click actions together
//! so a target always lands on the row its line is drawn on.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

/// Lines to render, some of them bound to a click action.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Points: 12"));
/// cl.push_clickable(Line::from(" [Enter] Play "), PLAY_OR_RESTART);
/// cl.register_targets(area, &mut cs, 1, 1);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a line that triggers `action_id` when clicked. The target follows
    /// the line if lines are added before it.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a row target for every clickable line. `top_offset` and
    /// `bottom_offset` are the rows taken by borders. Lines are assumed not
    /// to wrap.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        for &(line_idx, action_id) in &self.actions {
            let row = content_y + line_idx;
            if row >= content_end {
                continue;
            }
            cs.add_row_target(area, row, action_id);
        }
    }
}
