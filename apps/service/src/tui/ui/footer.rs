use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::DashboardState;
use crate::tui::types::Theme;

pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    let palette = state.theme.palette();
    let theme_label = match state.theme {
        Theme::Dark => "Light mode",
        Theme::Light => "Dark mode",
    };

    let keys = Style::default().fg(palette.border).add_modifier(Modifier::BOLD);
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(format!("D: {theme_label}"), keys),
        Span::styled("   ", Style::default()),
        Span::styled("Q/Esc: Quit", keys),
    ]))
    .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
