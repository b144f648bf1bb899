//! Game session: board, side to move, and any jump chain under way.
//!
//! A [`Game`] is an explicit value; every operation reads and updates only
//! the session it is called on. Turns can be played whole with
//! [`Game::play`], or one jump at a time with [`Game::play_step`], in which
//! case the turn stays with the mover while the same piece still has a
//! capture available.

use tracing::info;

use crate::board::{Board, Color, Square};
use crate::chain::chain_moves;
use crate::error::CoreError;
use crate::legal::{Rules, legal_moves, moves_for_piece};
use crate::movegen::{Move, capture_steps};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The other side has no pieces or no legal moves.
    Won(Color),
}

/// A capture sequence begun with [`Game::play_step`] and not yet finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingChain {
    /// Where the moving piece started this turn.
    pub origin: Square,
    /// Where it stands now.
    pub at: Square,
    pub captured: Vec<Square>,
}

/// Whether a step ended the turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The same piece must keep capturing.
    Continue,
    TurnOver,
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Color,
    pending: Option<PendingChain>,
    history: Vec<Move>,
    rules: Rules,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Game {
    /// Standard opening, Light to move.
    pub fn new(rules: Rules) -> Self {
        Self::from_position(Board::new(), Color::Light, rules)
    }

    pub fn from_position(board: Board, to_move: Color, rules: Rules) -> Self {
        Self {
            board,
            to_move,
            pending: None,
            history: Vec::new(),
            rules,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn pending(&self) -> Option<&PendingChain> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Legal moves for the side to move. While a chain is pending these are
    /// the continuations of the moving piece from where it stands.
    pub fn legal_moves(&self) -> Vec<Move> {
        match &self.pending {
            Some(p) => chain_moves(&self.board, p.at, self.to_move, &self.rules),
            None => legal_moves(&self.board, self.to_move, &self.rules),
        }
    }

    pub fn moves_for_piece(&self, from: Square) -> Vec<Move> {
        match &self.pending {
            Some(p) if p.at == from => self.legal_moves(),
            Some(_) => Vec::new(),
            None => moves_for_piece(&self.board, from, self.to_move, &self.rules),
        }
    }

    /// Play a whole move (or, while a chain is pending, its whole remainder).
    pub fn play(&mut self, mv: &Move) -> Result<(), CoreError> {
        if !self.legal_moves().contains(mv) {
            return Err(CoreError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        }
        self.board = self.board.apply(mv);
        let full = match self.pending.take() {
            Some(mut p) => {
                p.captured.extend_from_slice(&mv.captured);
                Move::capture(p.origin, mv.to, p.captured)
            }
            None => mv.clone(),
        };
        self.finish_turn(full);
        Ok(())
    }

    /// Play a single step: one simple move, or one jump of a capture chain.
    pub fn play_step(&mut self, from: Square, to: Square) -> Result<StepOutcome, CoreError> {
        let illegal = CoreError::IllegalMove { from, to };

        let jumped = match self.pending.as_ref().map(|p| p.at) {
            Some(at) if at != from => return Err(illegal),
            Some(_) => self.jump_over(from, to).ok_or(illegal)?,
            None => {
                let piece_moves = self.moves_for_piece(from);
                if piece_moves.is_empty() {
                    return Err(illegal);
                }
                if piece_moves[0].is_capture() {
                    self.jump_over(from, to).ok_or(illegal)?
                } else {
                    let mv = Move::simple(from, to);
                    if !piece_moves.contains(&mv) {
                        return Err(illegal);
                    }
                    self.board = self.board.apply(&mv);
                    self.finish_turn(mv);
                    return Ok(StepOutcome::TurnOver);
                }
            }
        };

        self.board = self.board.apply(&Move::capture(from, to, vec![jumped]));
        let mut chain = self.pending.take().unwrap_or(PendingChain {
            origin: from,
            at: from,
            captured: Vec::new(),
        });
        chain.at = to;
        chain.captured.push(jumped);

        if capture_steps(&self.board, to, &self.rules).is_empty() {
            self.finish_turn(Move::capture(chain.origin, to, chain.captured));
            Ok(StepOutcome::TurnOver)
        } else {
            self.pending = Some(chain);
            Ok(StepOutcome::Continue)
        }
    }

    pub fn status(&self) -> GameStatus {
        if self.pending.is_some() {
            return GameStatus::Ongoing;
        }
        if legal_moves(&self.board, self.to_move, &self.rules).is_empty() {
            GameStatus::Won(self.to_move.opponent())
        } else {
            GameStatus::Ongoing
        }
    }

    /// The square jumped by a single capture from `from` to `to`, if any.
    fn jump_over(&self, from: Square, to: Square) -> Option<Square> {
        capture_steps(&self.board, from, &self.rules)
            .into_iter()
            .find(|s| s.to == to)
            .and_then(|s| s.captured)
    }

    fn finish_turn(&mut self, mv: Move) {
        self.history.push(mv);
        self.pending = None;
        self.to_move = self.to_move.opponent();
        if let GameStatus::Won(winner) = self.status() {
            info!(winner = %winner, plies = self.history.len(), "game over");
        }
    }
}
