use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

use crate::cache::SystemClock;
use crate::config::AppConfig;
use crate::todoist::TodoistClient;

mod app;
mod buffer;
mod constants;
mod editor;
mod helpers;
mod refresh;
mod view;

use app::App;
use constants::TICK_RATE;
use refresh::RefreshOutcome;

type Backend = CrosstermBackend<Stdout>;

/// Runs the terminal UI until the user quits.
pub fn run(config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run_async(config))
}

async fn run_async(config: AppConfig) -> Result<()> {
    let client = TodoistClient::with_base_url(config.api_token(), config.api_url())
        .context("failed to build API client")?;
    info!(api_url = config.api_url(), home = config.home_filter(), "starting dewy");

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut app = App::new(
        Arc::new(client),
        config.home_filter().to_string(),
        Arc::new(SystemClock),
        tx,
    );
    let result = run_app(&mut terminal, &mut app, rx).await;

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    result
}

async fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    mut refreshes: UnboundedReceiver<RefreshOutcome>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| app.draw(f))?;
        if app.should_quit() {
            break;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.on_key(key).await,
                Some(Ok(_)) => {}
                Some(Err(err)) => warn!(error = %err, "terminal event error"),
                None => break,
            },
            Some(outcome) = refreshes.recv() => app.apply_refresh(outcome),
            _ = ticker.tick() => app.on_tick(),
        }
    }

    info!("exiting dewy");
    Ok(())
}
