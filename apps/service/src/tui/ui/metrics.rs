use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::state::DashboardState;
use crate::tui::types::Palette;

/// 2x2 grid: status, latency, uptime, last check
pub fn render(f: &mut Frame, area: Rect, state: &DashboardState) {
    let palette = state.theme.palette();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = split_row(rows[0]);
    let bottom = split_row(rows[1]);

    let status_color = match state.status {
        None => palette.pending,
        Some(status) if status.is_up() => palette.up,
        Some(_) => palette.down,
    };

    tile(f, top[0], &palette, "CURRENT STATUS", state.status_text(), status_color, None);
    tile(f, top[1], &palette, "CURRENT LATENCY", state.latency_text(), palette.text, None);
    tile(
        f,
        bottom[0],
        &palette,
        "UPTIME",
        state.uptime_text(),
        palette.text,
        Some(format!("last {} of {}", state.window_len, state.window_capacity)),
    );
    tile(f, bottom[1], &palette, "LAST CHECK", state.last_check_text(), palette.text, None);
}

fn split_row(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
}

fn tile(
    f: &mut Frame,
    area: Rect,
    palette: &Palette,
    title: &str,
    value: String,
    color: Color,
    caption: Option<String>,
) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD))),
    ];
    if let Some(caption) = caption {
        lines.push(Line::from(Span::styled(caption, Style::default().fg(palette.muted))));
    }

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title.to_string(), Style::default().fg(palette.label)))
            .border_style(Style::default().fg(palette.border)),
    );

    f.render_widget(widget, area);
}
