//! Terminal front end for the arena.

mod app;
mod input;
mod ui;

pub use app::App;
pub use input::{Action, action_for, move_cursor};

use crate::config::ArenaConfig;
use crate::opponent::CompletionService;
use crate::session::{Dispatcher, Orchestrator};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Runs the game until the user quits.
#[instrument(skip_all, fields(service = service.name(), mode = %config.mode()))]
pub async fn run_tui(config: &ArenaConfig, service: Arc<dyn CompletionService>) -> Result<()> {
    info!("Starting terminal UI");

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(
        service,
        config.persona(),
        config.ai_delay(),
        config.request_timeout(),
        reply_tx,
    );
    let orchestrator = Orchestrator::new(*config.mode(), config.persona());
    let mut app = App::new(orchestrator, dispatcher, config.persona().clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app, &mut reply_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }

    info!(
        games = app.session().scoreboard().games(),
        "Terminal UI closed"
    );
    res
}

/// Draw, drain replies, read one key; repeat.
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    reply_rx: &mut mpsc::UnboundedReceiver<crate::session::Reply>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(reply) = reply_rx.try_recv() {
            app.handle_reply(reply);
        }

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code);
        }

        if app.should_quit() {
            return Ok(());
        }

        tokio::task::yield_now().await;
    }
}
