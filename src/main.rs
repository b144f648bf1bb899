//! Checkers-Rust: a checkers engine with alpha-beta search.
//!
//! ## Usage
//!
//! - `checkers-rust` - Show a demo
//! - `checkers-rust play` - Start the text protocol on stdin/stdout
//! - `checkers-rust bestmove --board <file|-> --side <light|dark>` - Pick a move
//! - `checkers-rust selfplay` - Let the engine play itself

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use checkers_rust::board::{Board, Color};
use checkers_rust::constants::{DEFAULT_DEPTH, MAX_DEPTH, MAX_GAME_PLIES};
use checkers_rust::engine::{Engine, EngineConfig};
use checkers_rust::game::{Game, GameStatus};
use checkers_rust::legal::Rules;
use checkers_rust::protocol::Session;

/// Checkers-Rust: a checkers engine with alpha-beta search
#[derive(Parser)]
#[command(name = "checkers-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct EngineArgs {
    /// Search depth in plies
    #[arg(
        long,
        global = true,
        env = "CHECKERS_DEPTH",
        default_value_t = DEFAULT_DEPTH,
        value_parser = clap::value_parser!(u32).range(1..=MAX_DEPTH as i64)
    )]
    depth: u32,

    /// Seed for tie-break randomness
    #[arg(long, global = true, env = "CHECKERS_SEED")]
    seed: Option<u64>,

    /// Time budget per search in milliseconds
    #[arg(long, global = true, env = "CHECKERS_TIME_LIMIT_MS")]
    time_limit_ms: Option<u64>,

    /// Let men capture backward
    #[arg(long, global = true, env = "CHECKERS_BACKWARD_CAPTURE")]
    backward_capture: bool,
}

impl EngineArgs {
    fn config(&self) -> EngineConfig {
        let mut config = EngineConfig::default()
            .with_depth(self.depth)
            .with_rules(Rules {
                men_capture_backward: self.backward_capture,
            });
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the text protocol for use with a front end
    Play,
    /// Run a simple demo of the engine
    Demo,
    /// Print the engine's move for a position
    Bestmove {
        /// Board file in text form (8 lines of . w W b B), or - for stdin
        #[arg(long)]
        board: PathBuf,
        /// Side to move
        #[arg(long, default_value = "light")]
        side: Color,
    },
    /// Let the engine play both sides
    Selfplay {
        /// Stop and call it a draw after this many plies
        #[arg(long, default_value_t = MAX_GAME_PLIES)]
        max_plies: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let config = cli.engine.config();

    match cli.command {
        Some(Commands::Play) => {
            let mut session = Session::new(config);
            session.run().context("protocol session failed")?;
        }
        Some(Commands::Bestmove { board, side }) => {
            let board = read_board(&board)?;
            let mut engine = Engine::new(config);
            let report = engine.analyze(&board, side);
            match report.best {
                Some(mv) => println!("{mv} (score {:.1})", report.score),
                None => println!("none"),
            }
        }
        Some(Commands::Selfplay { max_plies }) => run_selfplay(config, max_plies)?,
        Some(Commands::Demo) | None => run_demo(config),
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_board(path: &Path) -> Result<Board> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading board from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    Ok(text.parse::<Board>()?)
}

fn run_selfplay(config: EngineConfig, max_plies: usize) -> Result<()> {
    let mut game = Game::new(config.rules);
    let mut engine = Engine::new(config);

    while game.history().len() < max_plies {
        if let GameStatus::Won(winner) = game.status() {
            print!("{}", game.board());
            println!("{winner} wins after {} plies", game.history().len());
            return Ok(());
        }
        let side = game.to_move();
        let Some(mv) = engine.compute_best_move(game.board(), side) else {
            bail!("no move for {side} in an ongoing game");
        };
        println!("{:>3}. {side}: {mv}", game.history().len() + 1);
        game.play(&mv)?;
    }
    println!("{}draw: {max_plies} plies reached", game.board());
    Ok(())
}

fn run_demo(config: EngineConfig) {
    println!("Checkers-Rust: Checkers Engine with Alpha-Beta Search\n");

    println!("=== Opening Position ===");
    let board = Board::new();
    println!("{board}");

    let mut engine = Engine::new(config);
    let moves = engine.list_legal_moves(&board, Color::Light);
    println!("Light has {} legal moves:", moves.len());
    for mv in &moves {
        println!("  {mv}");
    }

    println!("\n=== Search Demo ===");
    println!("Searching {} plies...", engine.config().depth);
    let report = engine.analyze(&board, Color::Light);
    if let Some(best) = &report.best {
        println!("Best move: {best}");
    }
    println!(
        "Score: {:.1}  ties: {}  nodes: {}",
        report.score,
        report.tied.len(),
        report.nodes
    );
}
