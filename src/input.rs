//! Terminal events to game commands

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::game::Command;
use crate::render::Layout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Game(Command),
    /// The terminal changed size; the caller recomputes the layout.
    Resize { cols: u16, rows: u16 },
}

pub fn translate(event: &Event, layout: &Layout) -> Option<Action> {
    match event {
        Event::Key(key) => key_action(key),
        Event::Mouse(mouse) => mouse_action(mouse, layout),
        Event::Resize(cols, rows) => Some(Action::Resize {
            cols: *cols,
            rows: *rows,
        }),
        _ => None,
    }
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    // Release and repeat events would double-flap on terminals that report them
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => {
            Action::Game(Command::Flap)
        }
        KeyCode::Enter => Action::Game(Command::Primary),
        KeyCode::Char('r') => Action::Game(Command::Restart),
        _ => return None,
    };
    Some(action)
}

fn mouse_action(mouse: &MouseEvent, layout: &Layout) -> Option<Action> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let (col, row) = (mouse.column, mouse.row);
    (layout.button.contains(col, row) || layout.canvas.contains(col, row))
        .then_some(Action::Game(Command::Primary))
}
