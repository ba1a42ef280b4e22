pub mod footer;
pub mod header;
pub mod metrics;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::tui::state::DashboardState;

/// Render the entire UI
pub fn render(f: &mut Frame, state: &DashboardState) {
    let size = f.size();
    let palette = state.theme.palette();

    f.render_widget(Block::default().style(Style::default().bg(palette.background)), size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    header::render(f, chunks[0], state);
    metrics::render(f, chunks[1], state);
    footer::render(f, chunks[2], state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pulse::{MonitorConfig, Outcome};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn rendered(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_pending_dashboard() {
        let state = DashboardState::new(&MonitorConfig::new("portal", "https://example.com/"), 100);

        let screen = rendered(&state);

        assert!(screen.contains("PENDING..."));
        assert!(screen.contains("--- ms"));
        assert!(screen.contains("Never"));
        assert!(screen.contains("100.00%"));
        assert!(screen.contains("https://example.com/"));
    }

    #[test]
    fn test_dashboard_after_outcome() {
        let monitor = MonitorConfig::new("portal", "https://example.com/");
        let mut state = DashboardState::new(&monitor, 100);
        let outcome = Outcome::from_response(503, Duration::from_millis(231), Utc::now());
        state.apply(&outcome, 75.0, 4);

        let screen = rendered(&state);

        assert!(screen.contains("DOWN (503)"));
        assert!(screen.contains("231 ms"));
        assert!(screen.contains("75.00%"));
        assert!(screen.contains("last 4 of 100"));
    }
}
