//! Tic-tac-toe arena - unified CLI.

#![warn(missing_docs)]

mod cli;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tictactoe_arena::{
    ArenaConfig, Board, CompletionService, GameMode, LlmClient, MoveClient, MoveSuggestion,
    OfflineService, evaluate,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "tictactoe_arena.log";
const DEFAULT_FILTER: &str = "info,tictactoe_arena=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Play { mode: None }) {
        Command::Play { mode } => {
            initialize_file_tracing()?;
            run_play(&cli.config, mode).await
        }
        Command::Evaluate { board } => {
            initialize_stderr_tracing();
            run_evaluate(&board)
        }
        Command::Suggest { board } => {
            initialize_stderr_tracing();
            run_suggest(&cli.config, &board).await
        }
    }
}

/// Run the terminal game
#[instrument(skip(config_path), fields(config_path = %config_path.display()))]
async fn run_play(config_path: &std::path::Path, mode: Option<GameMode>) -> Result<()> {
    let mut config = ArenaConfig::load_or_default(config_path)?;
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }

    let service = build_service(&config);
    tictactoe_arena::tui::run_tui(&config, service).await
}

/// Print the evaluator's verdict for a board
#[instrument]
fn run_evaluate(board: &str) -> Result<()> {
    let board: Board = board.parse()?;
    let outcome = evaluate(&board);
    info!(%board, %outcome, "Evaluated board");

    println!("{}\n", board.display());
    println!("{}", outcome);
    Ok(())
}

/// Ask the opponent for one move and print it as JSON
#[instrument(skip(config_path), fields(config_path = %config_path.display()))]
async fn run_suggest(config_path: &std::path::Path, board: &str) -> Result<()> {
    let config = ArenaConfig::load_or_default(config_path)?;
    let board: Board = board.parse()?;

    let outcome = evaluate(&board);
    if outcome.is_terminal() {
        bail!("Game is already over: {}", outcome);
    }

    let ai = board.next_player();
    let client = MoveClient::new(
        build_service(&config),
        config.persona().as_str(),
        config.request_timeout(),
    );

    let (suggestion, fallback) = match client.request_move(&board, ai, ai.opponent()).await {
        Ok(suggestion) => (suggestion, false),
        Err(e) => {
            warn!(error = %e, "Move request failed, showing fallback");
            (MoveSuggestion::fallback(&board), true)
        }
    };

    let output = serde_json::json!({
        "player": ai.to_string(),
        "move": suggestion.position.to_index(),
        "commentary": suggestion.commentary,
        "fallback": fallback,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// LLM-backed service, or the offline one when no API key is available.
#[instrument(skip(config), fields(provider = %config.llm_provider()))]
fn build_service(config: &ArenaConfig) -> Arc<dyn CompletionService> {
    match config.create_llm_config() {
        Ok(llm_config) => {
            info!(model = %llm_config.model(), "Using LLM opponent");
            Arc::new(LlmClient::new(llm_config))
        }
        Err(e) => {
            warn!(error = %e, "No LLM available, opponent will play fallback moves");
            Arc::new(OfflineService)
        }
    }
}

/// Logs to a file so the terminal UI stays clean.
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn initialize_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
