//! Command-line interface for tictactoe_arena.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_arena::GameMode;

/// Tic-tac-toe against an LLM opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe_arena")]
#[command(about = "Terminal tic-tac-toe against an LLM opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the arena config file
    #[arg(short, long, global = true, default_value = "arena.toml")]
    pub config: PathBuf,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Starting mode (overrides the config file)
        #[arg(short, long, value_enum)]
        mode: Option<GameMode>,
    },

    /// Print the outcome of a board, e.g. `XXXOO----`
    Evaluate {
        /// Nine cells: X, O, and - _ . or a digit for empty
        board: String,
    },

    /// Ask the opponent once for a move on a board and print it as JSON
    Suggest {
        /// Nine cells: X, O, and - _ . or a digit for empty
        board: String,
    },
}
