// src/main.rs

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use url::Url;

mod app;
mod core;
mod logging;
mod ui;

use app::{App, AppState};
use core::client::{ScanClient, DEFAULT_ENGINE_URL};
use core::models::ScanReport;
use core::report;

/// A finished scan outcome tagged with the generation number of the request
/// that produced it. The receiver drops any message whose generation is no
/// longer the latest.
type ScanOutcome = (u64, ScanReport);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;
    info!("Starting SecuriScan dashboard.");

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let client = Arc::new(ScanClient::new(DEFAULT_ENGINE_URL)?);
    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<ScanOutcome>(8);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &client, &tx)?;
        } else {
            app.on_tick();
        }

        // Deliver finished scans; stale generations are discarded inside.
        while let Ok((generation, scan_report)) = rx.try_recv() {
            app.accept_report(generation, scan_report);
        }
    }

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    Ok(())
}

fn handle_events(
    app: &mut App,
    client: &Arc<ScanClient>,
    tx: &mpsc::Sender<ScanOutcome>,
) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            if app.show_disclaimer {
                match key.code {
                    KeyCode::Enter => app.show_disclaimer = false,
                    KeyCode::Char('q') => app.quit(),
                    _ => {}
                }
                return Ok(());
            }
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, client, tx),
                AppState::Finished => handle_finished_input(app, key.code, client, tx),
                AppState::Scanning => match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Char('l') => app.show_logs = !app.show_logs,
                    // Launching a new scan while one is pending supersedes it:
                    // the older generation's outcome will be discarded.
                    KeyCode::Enter => launch_scan(app, client, tx),
                    _ => {}
                },
            }
        }
    }
    Ok(())
}

fn handle_idle_input(
    app: &mut App,
    key_code: KeyCode,
    client: &Arc<ScanClient>,
    tx: &mpsc::Sender<ScanOutcome>,
) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Tab | KeyCode::Down => app.next_kind(),
        KeyCode::BackTab | KeyCode::Up => app.previous_kind(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => launch_scan(app, client, tx),
        _ => {}
    }
}

fn handle_finished_input(
    app: &mut App,
    key_code: KeyCode,
    client: &Arc<ScanClient>,
    tx: &mpsc::Sender<ScanOutcome>,
) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('e') => app.export_report(),
        KeyCode::Char('l') => app.show_logs = !app.show_logs,
        KeyCode::Enter => launch_scan(app, client, tx),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}

/// Normalizes the typed target and spawns the scan task. The outcome comes
/// back over the channel tagged with its generation number.
fn launch_scan(app: &mut App, client: &Arc<ScanClient>, tx: &mpsc::Sender<ScanOutcome>) {
    if app.input.is_empty() {
        return;
    }

    let raw_input = app.input.clone();
    let target_url = if !raw_input.starts_with("http://") && !raw_input.starts_with("https://") {
        format!("http://{}", raw_input)
    } else {
        raw_input
    };
    // Parsing is best-effort: a malformed URL is the engine's concern and
    // comes back as an upstream-reported error.
    let target_url = Url::parse(&target_url)
        .map(|url| url.to_string())
        .unwrap_or(target_url);

    let kind = app.selected_kind();
    let generation = app.begin_scan();
    let client = Arc::clone(client);
    let tx = tx.clone();

    tokio::spawn(async move {
        let outcome = client.scan(&target_url, kind).await;
        let scan_report = report::from_outcome(kind, &target_url, outcome);
        let _ = tx.send((generation, scan_report)).await;
    });
}
