//! Loan Wizard - terminal loan application wizard
//!
//! A Ratatui-based TUI that walks an applicant through loan selection,
//! personal and income details, an EMI offer, document upload and
//! submission, saving progress locally after every change.

mod app;
mod calculator;
mod config;
mod error;
mod state;
mod store;
mod tasks;
mod ui;
mod uploads;
mod validators;

use anyhow::Result;
use app::App;
use config::WizardConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loan_wizard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = WizardConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config: {e:#}");
        WizardConfig::default()
    });
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.poll_tasks();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll faster while a delayed operation is in flight so the spinner moves
        let poll_duration = if app.is_busy() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Global quit: Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }
                app.handle_key(key)?;
            }
        }

        // Let spawned timers run between frames
        tokio::task::yield_now().await;

        if app.should_quit() {
            return Ok(());
        }
    }
}
