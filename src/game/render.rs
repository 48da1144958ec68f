//! Point Chase rendering: header, controls, play field and notification bar.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::time::SecondsTenths;
use crate::widgets::ClickableList;

use super::actions::{point_action, PLAY_OR_RESTART, TOGGLE_AUTO_PLAY};
use super::fade::FadeCountdown;
use super::notify::{NotificationKind, ToastQueue};
use super::state::{GameSession, LayoutPosition, Point, Status};

/// Play field size in cells, borders included.
const FIELD_WIDTH: u16 = 64;
const FIELD_HEIGHT: u16 = 22;

pub fn render(
    session: &GameSession,
    toasts: &ToastQueue,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let controls = build_controls(session, is_narrow_layout(area.width));
    let controls_height = controls.len() as u16 + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(controls_height),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    render_title(session, f, chunks[0]);
    render_controls(controls, f, chunks[1], click_state);
    render_field(session, f, chunks[2], click_state);
    render_status_bar(session, toasts, f, chunks[3], click_state);
}

fn render_title(session: &GameSession, f: &mut Frame, area: Rect) {
    let (title, color) = match session.status {
        Status::Idle | Status::Playing => ("LET'S PLAY", Color::Cyan),
        Status::GameOver => ("GAME OVER!", Color::Red),
        Status::Completed => ("ALL CLEARED", Color::Green),
    };
    let widget = Paragraph::new(Line::from(Span::styled(
        title,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

// ── Controls ────────────────────────────────────────────────

fn build_controls(session: &GameSession, narrow: bool) -> ClickableList<'static> {
    let mut cl = ClickableList::new();

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

    let mut input = session.input.as_str().to_string();
    if session.status == Status::Idle {
        input.push('_');
    }
    let time = SecondsTenths::from_ms(session.elapsed_ms).to_string();
    let mut fields = vec![("Points: ", input), ("Time: ", time)];
    if let Some(p) = session.first_active() {
        if session.status == Status::Playing {
            fields.push(("Next: ", p.sequence_number.to_string()));
        }
    }

    if narrow {
        for (name, text) in fields {
            cl.push(Line::from(vec![
                Span::styled(name, label),
                Span::styled(text, value),
            ]));
        }
    } else {
        let mut spans = Vec::new();
        for (name, text) in fields {
            spans.push(Span::styled(format!(" {name}"), label));
            spans.push(Span::styled(format!("{text:<8}"), value));
        }
        cl.push(Line::from(spans));
    }

    let button_style = if session.play_button_enabled() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let button = format!(" [Enter] {} ", session.play_button_label());
    cl.push_clickable(Line::from(Span::styled(button, button_style)), PLAY_OR_RESTART);

    if session.status == Status::Playing {
        let (state, color) = if session.auto_play_enabled {
            ("ON", Color::Green)
        } else {
            ("OFF", Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(" [A] Auto play: ", Style::default().fg(Color::Yellow)),
            Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]);
        cl.push_clickable(line, TOGGLE_AUTO_PLAY);
    }

    cl
}

fn render_controls(
    cl: ClickableList<'static>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1);
    }
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Controls "),
    );
    f.render_widget(widget, area);
}

// ── Play field ──────────────────────────────────────────────

/// Fixed-size field centred in `area`, shrunk if the screen is smaller.
pub fn field_rect(area: Rect) -> Rect {
    let width = FIELD_WIDTH.min(area.width);
    let height = FIELD_HEIGHT.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Cell rectangle of a point label inside the field's inner area. Labels are
/// kept fully inside the field.
pub fn point_rect(inner: Rect, position: LayoutPosition, label_width: u16) -> Option<Rect> {
    if inner.width == 0 || inner.height == 0 || label_width == 0 {
        return None;
    }
    let width = label_width.min(inner.width);
    let col = ((position.left / 100.0) * inner.width as f64) as u16;
    let row = ((position.top / 100.0) * inner.height as f64) as u16;
    let col = col.min(inner.width - width);
    let row = row.min(inner.height - 1);
    Some(Rect::new(inner.x + col, inner.y + row, width, 1))
}

fn point_label(point: &Point, fade: Option<&FadeCountdown>) -> String {
    match fade {
        Some(fade) => format!(" {} {} ", point.sequence_number, fade.remaining()),
        None => format!(" {} ", point.sequence_number),
    }
}

/// `None` once a point has fully faded; it is no longer drawn.
fn point_style(status: Status, point: &Point, fade: Option<&FadeCountdown>) -> Option<Style> {
    if let Some(fade) = fade {
        let opacity = fade.opacity();
        if opacity <= 0.0 {
            return None;
        }
        let scale = |c: f64| (c * opacity) as u8;
        return Some(
            Style::default()
                .fg(Color::Rgb(scale(255.0), scale(255.0), scale(255.0)))
                .bg(Color::Rgb(scale(255.0), scale(140.0), 0)),
        );
    }
    if status == Status::GameOver && !point.fade_out() {
        return Some(Style::default().fg(Color::Gray).bg(Color::DarkGray));
    }
    Some(
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

fn render_field(
    session: &GameSession,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let field = field_rect(area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(field);
    f.render_widget(block, field);

    if session.status == Status::Idle {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Enter a number of points, then press Play",
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Center);
        let row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, inner.height.min(1));
        f.render_widget(hint, row);
        return;
    }

    // Lowest stack order first: later labels cover earlier ones, and their
    // targets win the hit test the same way.
    let mut order: Vec<usize> = (0..session.points.len()).collect();
    order.sort_by_key(|&i| session.points[i].stack_order);

    let mut cs = click_state.borrow_mut();
    for index in order {
        let point = &session.points[index];
        let fade = session.fade(&point.id);
        let label = point_label(point, fade);
        let Some(rect) = point_rect(inner, point.position, label.chars().count() as u16) else {
            continue;
        };
        if let Some(style) = point_style(session.status, point, fade) {
            f.render_widget(Clear, rect);
            f.render_widget(Paragraph::new(Span::styled(label, style)), rect);
        }

        // Resolved points keep their target, even once invisible, so a click
        // on them is swallowed instead of reaching the point underneath.
        if session.status == Status::Playing {
            if let Some(action) = point_action(index) {
                cs.add_click_target(rect, action);
            }
        }
    }
}

// ── Status bar ──────────────────────────────────────────────

fn render_status_bar(
    session: &GameSession,
    toasts: &ToastQueue,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let line = match toasts.latest() {
        Some(toast) => {
            let color = match toast.notification.kind {
                NotificationKind::Success => Color::Green,
                NotificationKind::Failure => Color::Red,
            };
            Line::from(Span::styled(
                toast.notification.message.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(
            help_text(session.status),
            Style::default().fg(Color::DarkGray),
        )),
    };
    let widget = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, area);

    // After a round the whole bar acts as the Restart button
    if matches!(session.status, Status::GameOver | Status::Completed) {
        let mut cs = click_state.borrow_mut();
        for row in area.y..area.y + area.height {
            cs.add_row_target(area, row, PLAY_OR_RESTART);
        }
    }
}

fn help_text(status: Status) -> &'static str {
    match status {
        Status::Idle => "Type how many points to play, Enter to start",
        Status::Playing => "Click the points in order: 1, 2, 3 ...  R restarts, A toggles auto play",
        Status::GameOver | Status::Completed => "Enter, R or tap here to play again",
    }
}
