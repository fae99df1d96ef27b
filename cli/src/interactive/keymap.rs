//! Terminal key bindings
//!
//! Keys are applied to the session here; anything that needs I/O comes
//! back as an [`AppAction`] for the app component to run.

use integra_core::input::Keypad;
use integra_core::session::KeyOutcome;
use integra_core::CalculatorSession;
use iocraft::prelude::{KeyCode, KeyModifiers};

/// Follow-up work for a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// Nothing changed
    Ignore,
    /// The session changed, redraw
    Redraw,
    Solve,
    Copy,
    SavePlot,
    OpenHistory,
    Quit,
}

/// Apply a key to the calculator
pub fn handle_key(
    session: &mut CalculatorSession,
    keypad: &Keypad,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> AppAction {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);

    match code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'c' | 'q' => AppAction::Quit,
            'l' => {
                session.clear();
                AppAction::Redraw
            }
            't' => {
                session.toggle_kind();
                AppAction::Redraw
            }
            'g' => {
                session.toggle_dual_graph();
                AppAction::Redraw
            }
            'a' => {
                session.edit(|field| field.select_all());
                AppAction::Redraw
            }
            'y' => AppAction::Copy,
            'p' => AppAction::SavePlot,
            'r' => AppAction::OpenHistory,
            _ => AppAction::Ignore,
        },
        KeyCode::Char(c) if alt => match keypad.by_shortcut(c) {
            Some(key) => match session.apply_key(key) {
                KeyOutcome::SolveRequested => AppAction::Solve,
                KeyOutcome::Edited(false) => AppAction::Ignore,
                KeyOutcome::Edited(true) | KeyOutcome::Cleared => AppAction::Redraw,
            },
            None => AppAction::Ignore,
        },
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            if session.press_key(c.encode_utf8(&mut buf)) {
                AppAction::Redraw
            } else {
                AppAction::Ignore
            }
        }
        KeyCode::Enter => AppAction::Solve,
        KeyCode::Backspace => redraw_if(session.backspace()),
        KeyCode::Delete => redraw_if(session.delete_forward()),
        KeyCode::Left => {
            session.edit(|field| field.move_left(shift));
            AppAction::Redraw
        }
        KeyCode::Right => {
            session.edit(|field| field.move_right(shift));
            AppAction::Redraw
        }
        KeyCode::Home => {
            session.edit(|field| field.move_home(shift));
            AppAction::Redraw
        }
        KeyCode::End => {
            session.edit(|field| field.move_end(shift));
            AppAction::Redraw
        }
        KeyCode::Tab => {
            session.cycle_focus(true);
            AppAction::Redraw
        }
        KeyCode::BackTab => {
            session.cycle_focus(false);
            AppAction::Redraw
        }
        _ => AppAction::Ignore,
    }
}

fn redraw_if(changed: bool) -> AppAction {
    if changed {
        AppAction::Redraw
    } else {
        AppAction::Ignore
    }
}

/// What a key does while the history panel is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryNav {
    Select(usize),
    Restore(usize),
    Close,
    Ignore,
}

pub fn handle_history_key(
    code: KeyCode,
    modifiers: KeyModifiers,
    selected: usize,
    len: usize,
) -> HistoryNav {
    match code {
        KeyCode::Esc => HistoryNav::Close,
        KeyCode::Char('r') if modifiers.contains(KeyModifiers::CONTROL) => HistoryNav::Close,
        KeyCode::Up if selected > 0 => HistoryNav::Select(selected - 1),
        KeyCode::Down if selected + 1 < len => HistoryNav::Select(selected + 1),
        KeyCode::Enter if selected < len => HistoryNav::Restore(selected),
        _ => HistoryNav::Ignore,
    }
}

/// Shortcut summary for the footer
pub const KEY_HELP: &str =
    "enter solve · C-t definite · C-g plot f/F · C-y copy · C-p save plot · C-r history · C-l clear · C-c quit";
