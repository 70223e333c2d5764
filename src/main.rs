use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use blockpeek::client::{AlchemyClient, ChainClient};
use blockpeek::{ui, utils, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; the log file path comes from it
    let config = Config::load().context("Failed to load configuration")?;

    utils::logger::init_logger(&config.log_file)?;
    info!("Starting blockpeek");

    let client: Arc<dyn ChainClient> =
        Arc::new(AlchemyClient::new(&config).context("Failed to create chain client")?);
    info!("Chain client ready");

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run(&mut terminal, client).await;

    // Always restore the terminal, even when the loop errored
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    match &result {
        Ok(_) => info!("blockpeek shutdown gracefully"),
        Err(e) => error!("blockpeek failed: {}", e),
    }
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: Arc<dyn ChainClient>,
) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();
    let mut app = App::new(client, outcome_tx, shutdown);
    app.start();

    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    loop {
        terminal
            .draw(|frame| ui::render(frame, app.state()))
            .context("Failed to draw frame")?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = ui::handle_key(key, app.state()) {
                            app.handle_action(action);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("Terminal event error: {}", e);
                    }
                    None => break,
                }
            }
            Some(outcome) = outcome_rx.recv() => {
                app.apply_outcome(outcome);
            }
            _ = tick.tick() => {}
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
