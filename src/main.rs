mod config;
mod console;
mod game;
mod input;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use game::PointChaseGame;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use time::GameTime;

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols);
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows);

    console::log(&format!(
        "click: pixel=({mouse_x},{mouse_y}), cell=({col:?},{row:?}), targets={}",
        cs.targets.len()
    ));

    Some((col?, row?))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Seed for point placement: browser randomness mixed with the wall clock.
fn initial_seed() -> u64 {
    let random = (js_sys::Math::random() * u64::MAX as f64) as u64;
    random ^ (js_sys::Date::now() as u64).rotate_left(32)
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let config = config::load();
    let tick_ms = config.tick_ms;
    let game = Rc::new(RefCell::new(PointChaseGame::new(config, initial_seed())));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let game_time = Rc::new(RefCell::new(GameTime::new(tick_ms)));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }

            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let matched = cs.hit_test(col, row);
            drop(cs);

            if let Some(action_id) = matched {
                game.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Backspace => InputEvent::Backspace,
                KeyCode::Enter => InputEvent::Submit,
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = game_time.borrow_mut().update(now_ms());
            let mut game = game.borrow_mut();
            if ticks > 0 {
                game.tick(ticks);
            }

            let size = f.area();

            // Update terminal dimensions and clear click targets
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            game.render(f, size, &click_state);
        }
    });

    Ok(())
}
