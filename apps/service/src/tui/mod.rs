mod events;
mod state;
mod types;
mod ui;

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;

use pulse::Pulse;

use events::Action;
use state::DashboardState;

/// Run the dashboard until the user quits, then stop the scheduler
pub async fn run_dashboard(pulse: &Pulse) -> Result<()> {
    let history = pulse.history();
    let mut state = DashboardState::new(pulse.monitor(), history.window_capacity().await);

    // Subscribe before starting so the first outcome is not missed
    let mut subscription = pulse.subscribe();
    let scheduler = pulse.start();

    // Init terminal in alternate screen
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(&mut stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result: Result<()> = async {
        loop {
            // Drain live outcomes (non-blocking)
            loop {
                match subscription.try_recv() {
                    Ok(outcome) => {
                        let uptime = history.recent_uptime().await;
                        let window_len = history.window_snapshot().await.len();
                        state.apply(&outcome, uptime, window_len);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        tracing::warn!("Dashboard subscription closed, resubscribing");
                        subscription = pulse.subscribe();
                        break;
                    }
                }
            }

            terminal.draw(|f| ui::render(f, &state))?;

            // Poll for events
            if event::poll(Duration::from_millis(250))?
                && events::handle_event(&mut state, event::read()?) == Action::Quit
            {
                return Ok(());
            }
        }
    }
    .await;

    // Cleanup terminal
    drop(terminal);
    let exec_result = execute!(stdout, Show, LeaveAlternateScreen);
    let raw_mode_result = disable_raw_mode();

    tracing::info!("Dashboard closed, stopping scheduler");
    scheduler.stop().await;

    result?;
    exec_result.and(raw_mode_result)?;
    Ok(())
}
