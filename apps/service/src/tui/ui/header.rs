use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use crate::tui::state::DashboardState;

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    let palette = state.theme.palette();

    let title = Line::from(vec![
        Span::styled("Pulse. ", Style::default().fg(palette.brand).add_modifier(Modifier::BOLD)),
        Span::styled(state.monitor_name.as_str(), Style::default().fg(palette.text)),
    ]);

    let mut details = vec![
        Span::styled(state.target.as_str(), Style::default().fg(palette.label)),
        Span::styled(
            format!("  every {}s", state.interval.as_secs()),
            Style::default().fg(palette.muted),
        ),
        Span::styled(format!("  {} checks", state.checks), Style::default().fg(palette.muted)),
    ];

    if let Some(error) = &state.last_error {
        let short: String = error.chars().take(60).collect();
        details.push(Span::styled(format!("  -- {short}"), Style::default().fg(palette.down)));
    }

    let header = Paragraph::new(vec![title, Line::from(details)]);

    f.render_widget(Clear, area);
    f.render_widget(header, area);
}
