//! Engine configuration and the three externally visible operations.
//!
//! - [`Engine::compute_best_move`] - search for a move, `None` if the side
//!   has no legal moves. [`Engine::compute_best_move_at_depth`] takes the
//!   depth per call.
//! - [`Engine::list_legal_moves`] - every legal move, mandatory capture applied.
//! - [`Engine::list_moves_for_piece`] - the same rule, filtered to one piece.
//!
//! Boards arrive already validated (see [`Board::from_codes`] and the
//! `FromStr` impl); raw coordinates are validated here.

use std::time::Duration;

use fastrand::Rng;

use crate::board::{Board, Color, Square};
use crate::constants::DEFAULT_DEPTH;
use crate::error::CoreError;
use crate::legal::{Rules, legal_moves, moves_for_piece};
use crate::movegen::Move;
use crate::search::{SearchLimits, SearchReport, search, search_among};

/// Runtime engine settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Search depth in plies (at least 1).
    pub depth: u32,
    pub rules: Rules,
    /// Wall-clock budget per search.
    pub time_limit: Option<Duration>,
    /// Seed for tie-break randomness. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            rules: Rules::default(),
            time_limit: None,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth.max(1);
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fresh search limits for one search.
    pub fn limits(&self) -> SearchLimits {
        let limits = SearchLimits::depth(self.depth.max(1));
        match self.time_limit {
            Some(limit) => limits.with_time_limit(limit),
            None => limits,
        }
    }

    pub fn rng(&self) -> Rng {
        match self.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        }
    }
}

/// A configured engine with its own tie-break random source.
pub struct Engine {
    config: EngineConfig,
    rng: Rng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = config.rng();
        Self { config, rng }
    }

    /// Use a caller-supplied random source for tie breaks.
    pub fn with_rng(config: EngineConfig, rng: Rng) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.config.depth = depth.max(1);
    }

    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.rng = Rng::with_seed(seed);
    }

    /// Best move for `side` at the configured depth.
    pub fn compute_best_move(&mut self, board: &Board, side: Color) -> Option<Move> {
        self.compute_best_move_at_depth(board, side, self.config.depth)
    }

    /// Best move for `side` searching `depth` plies. The configured depth
    /// is left as it was.
    pub fn compute_best_move_at_depth(
        &mut self,
        board: &Board,
        side: Color,
        depth: u32,
    ) -> Option<Move> {
        self.analyze_at_depth(board, side, depth).best
    }

    /// Full search report for `side` at the configured depth.
    pub fn analyze(&mut self, board: &Board, side: Color) -> SearchReport {
        self.analyze_at_depth(board, side, self.config.depth)
    }

    /// Same as [`Engine::analyze`] but at an explicit depth.
    pub fn analyze_at_depth(&mut self, board: &Board, side: Color, depth: u32) -> SearchReport {
        let mut limits = self.config.limits();
        limits.depth = depth.max(1);
        search(board, side, &self.config.rules, &limits, &mut self.rng)
    }

    /// Search restricted to the given root moves.
    pub fn analyze_among(&mut self, board: &Board, side: Color, moves: Vec<Move>) -> SearchReport {
        let limits = self.config.limits();
        search_among(board, side, moves, &self.config.rules, &limits, &mut self.rng)
    }

    pub fn list_legal_moves(&self, board: &Board, side: Color) -> Vec<Move> {
        legal_moves(board, side, &self.config.rules)
    }

    /// Legal moves of the piece at raw coordinates `(row, col)`.
    pub fn list_moves_for_piece(
        &self,
        board: &Board,
        row: isize,
        col: isize,
        side: Color,
    ) -> Result<Vec<Move>, CoreError> {
        let from = Square::new(row, col)?;
        Ok(moves_for_piece(board, from, side, &self.config.rules))
    }

    /// `Ok` if `mv` is legal for `side`, else `IllegalMove`.
    pub fn validate(&self, board: &Board, side: Color, mv: &Move) -> Result<(), CoreError> {
        if self.list_legal_moves(board, side).contains(mv) {
            Ok(())
        } else {
            Err(CoreError::IllegalMove {
                from: mv.from,
                to: mv.to,
            })
        }
    }
}
