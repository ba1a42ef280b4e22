pub mod keyboard;

use crossterm::event::{Event, KeyEventKind};

use crate::tui::state::DashboardState;

/// What the loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Handle one terminal event
pub fn handle_event(state: &mut DashboardState, event: Event) -> Action {
    match event {
        // Only process key press events, ignore releases and repeats
        Event::Key(k) if k.kind == KeyEventKind::Press => keyboard::handle_key(state, k),
        _ => Action::Continue,
    }
}
