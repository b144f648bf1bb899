//! Line-oriented text protocol for playing against the engine.
//!
//! Each line is one command, optionally preceded by a numeric id. Replies
//! start with `=` on success or `?` on failure, echo the id, and end with a
//! blank line, so a front end can drive a game over stdin/stdout.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `new` - Reset to the opening position, Light to move
//! - `show` - Print the board
//! - `side` - Side to move
//! - `moves [row,col]` - Legal moves, optionally for one piece
//! - `play <row,col> <row,col>` - Play one step (a simple move or one jump)
//! - `genmove` - Let the engine play the side to move
//! - `depth <n>` - Set the search depth
//! - `seed <n>` - Seed the tie-break random source
//! - `status` - `ongoing`, or which side has won
//! - `describe` - Position and move list as plain text
//!
//! ## Example
//!
//! ```ignore
//! use checkers_rust::protocol::Session;
//! let mut session = Session::new(Default::default());
//! session.run()?;
//! ```

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::board::Square;
use crate::constants::MAX_DEPTH;
use crate::engine::{Engine, EngineConfig};
use crate::game::{Game, GameStatus, StepOutcome};
use crate::prompt::describe;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "depth",
    "describe",
    "genmove",
    "known_command",
    "list_commands",
    "moves",
    "name",
    "new",
    "play",
    "quit",
    "seed",
    "show",
    "side",
    "status",
    "version",
];

/// Protocol session state.
pub struct Session {
    game: Game,
    engine: Engine,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            game: Game::new(config.rules),
            engine: Engine::new(config),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop on arbitrary streams until `quit` or EOF.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        info!("protocol session started");
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(command = %command, ?args, "command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        info!("protocol session ended");
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "new" => {
                self.game = Game::new(self.engine.config().rules);
                (true, String::new())
            }

            "show" => (true, format!("\n{}", self.game.board())),

            "side" => (true, self.game.to_move().to_string()),

            "moves" => {
                let moves = match args.first() {
                    Some(arg) => match arg.parse::<Square>() {
                        Ok(sq) => self.game.moves_for_piece(sq),
                        Err(e) => return (false, e),
                    },
                    None => self.game.legal_moves(),
                };
                let lines: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                (true, lines.join("\n"))
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let (from, to) = match (args[0].parse::<Square>(), args[1].parse::<Square>()) {
                    (Ok(from), Ok(to)) => (from, to),
                    (Err(e), _) | (_, Err(e)) => return (false, e),
                };
                match self.game.play_step(from, to) {
                    Ok(StepOutcome::Continue) => (true, "continue".to_string()),
                    Ok(StepOutcome::TurnOver) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                if let GameStatus::Won(_) = self.game.status() {
                    return (true, "none".to_string());
                }
                let side = self.game.to_move();
                let report = if self.game.pending().is_some() {
                    let rest = self.game.legal_moves();
                    self.engine.analyze_among(self.game.board(), side, rest)
                } else {
                    self.engine.analyze(self.game.board(), side)
                };
                let Some(mv) = report.best else {
                    return (true, "none".to_string());
                };
                match self.game.play(&mv) {
                    Ok(()) => (true, mv.to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "depth" => match args.first().map(|a| a.parse::<u32>()) {
                Some(Ok(depth)) if (1..=MAX_DEPTH).contains(&depth) => {
                    self.engine.set_depth(depth);
                    (true, String::new())
                }
                Some(Ok(depth)) => (
                    false,
                    format!("depth must be between 1 and {MAX_DEPTH} (got {depth})"),
                ),
                Some(Err(_)) => (false, "invalid depth".to_string()),
                None => (true, self.engine.config().depth.to_string()),
            },

            "seed" => match args.first().map(|a| a.parse::<u64>()) {
                Some(Ok(seed)) => {
                    self.engine.reseed(seed);
                    (true, String::new())
                }
                Some(Err(_)) => (false, "invalid seed".to_string()),
                None => (false, "missing argument".to_string()),
            },

            "status" => match self.game.status() {
                GameStatus::Ongoing => (true, "ongoing".to_string()),
                GameStatus::Won(winner) => (true, format!("{winner} wins")),
            },

            "describe" => {
                let moves = self.game.legal_moves();
                (
                    true,
                    format!(
                        "\n{}",
                        describe(self.game.board(), self.game.to_move(), &moves)
                    ),
                )
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
