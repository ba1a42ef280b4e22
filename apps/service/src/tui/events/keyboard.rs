use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::Action;
use crate::tui::state::DashboardState;

/// The dashboard is read-only: the only keys are theme and quit
pub fn handle_key(state: &mut DashboardState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc if key.modifiers.is_empty() => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('d') if key.modifiers.is_empty() => {
            state.toggle_theme();
            Action::Continue
        }
        _ => Action::Continue,
    }
}
