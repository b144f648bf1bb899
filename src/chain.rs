//! Jump-chain enumeration.
//!
//! Starting from one piece, follow every single capture, remove the jumped
//! piece, relocate (crowning on the back rank), and keep jumping from the
//! new square on the new board. A chain ends only where no further capture
//! exists. Every such maximal chain is reported; chains are not compared by
//! length, so a shorter maximal chain is as legal as a longer one.

use std::collections::HashSet;

use crate::board::{Board, Color, Square};
use crate::legal::Rules;
use crate::movegen::{Move, capture_steps};

/// One maximal capture sequence by a single piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JumpChain {
    pub from: Square,
    /// Landing square of every jump, in order. Never empty.
    pub landings: Vec<Square>,
    /// Jumped squares, in removal order. Same length as `landings`.
    pub captured: Vec<Square>,
}

impl JumpChain {
    pub fn to(&self) -> Square {
        self.landings.last().copied().unwrap_or(self.from)
    }

    pub fn into_move(self) -> Move {
        let to = self.to();
        Move::capture(self.from, to, self.captured)
    }
}

/// All maximal jump chains for the `side` piece on `from`.
///
/// Empty when the square is empty, holds an opposing piece, or the piece
/// has no capture at all.
pub fn jump_chains(board: &Board, from: Square, side: Color, rules: &Rules) -> Vec<JumpChain> {
    let mut out = Vec::new();
    if matches!(board.get(from), Some(p) if p.color == side) {
        let mut trail = Trail::default();
        extend(board, from, from, rules, &mut trail, &mut out);
    }
    out
}

/// Same as [`jump_chains`], flattened into moves.
///
/// A king may reach the same final capture from several intermediate
/// landings; those chains collapse into one move, first occurrence kept.
pub fn chain_moves(board: &Board, from: Square, side: Color, rules: &Rules) -> Vec<Move> {
    let mut seen = HashSet::new();
    jump_chains(board, from, side, rules)
        .into_iter()
        .map(JumpChain::into_move)
        .filter(|mv| seen.insert(mv.clone()))
        .collect()
}

#[derive(Default)]
struct Trail {
    landings: Vec<Square>,
    captured: Vec<Square>,
}

fn extend(
    board: &Board,
    origin: Square,
    at: Square,
    rules: &Rules,
    trail: &mut Trail,
    out: &mut Vec<JumpChain>,
) {
    let steps = capture_steps(board, at, rules);
    if steps.is_empty() {
        if !trail.captured.is_empty() {
            out.push(JumpChain {
                from: origin,
                landings: trail.landings.clone(),
                captured: trail.captured.clone(),
            });
        }
        return;
    }

    for step in steps {
        let Some(over) = step.captured else {
            continue;
        };
        let mut next = *board;
        next.remove(over);
        if let Some(piece) = next.remove(at) {
            next.place(step.to, piece.landed_on(step.to.row()));
        }

        trail.landings.push(step.to);
        trail.captured.push(over);
        extend(&next, origin, step.to, rules, trail, out);
        trail.landings.pop();
        trail.captured.pop();
    }
}
