//! Single-piece move generation.
//!
//! This module enumerates what one piece can do in one step:
//! - Men step one square along a forward diagonal, or jump an adjacent
//!   opposing piece onto the empty square behind it.
//! - Kings slide any distance along all four diagonals, and capture by
//!   sliding over exactly one opposing piece, landing on any empty square
//!   beyond it.
//!
//! Nothing here chains jumps together; see [`crate::chain`] for that.

use std::fmt;

use crate::board::{Board, Color, Piece, Square};
use crate::constants::DIAGONALS;
use crate::legal::Rules;

/// A complete move for one turn.
///
/// `captured` lists the jumped squares in the order they are removed along
/// the chain. An empty list means a simple (non-capturing) move.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub captured: Vec<Square>,
}

impl Move {
    pub fn simple(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            captured: Vec::new(),
        }
    }

    pub fn capture(from: Square, to: Square, captured: Vec<Square>) -> Self {
        Self { from, to, captured }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)?;
        if self.is_capture() {
            let taken: Vec<String> = self.captured.iter().map(Square::to_string).collect();
            write!(f, " x {}", taken.join(" "))?;
        }
        Ok(())
    }
}

/// One step a piece can take: a destination plus the square it jumps, if any.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub to: Square,
    pub captured: Option<Square>,
}

/// Destinations of non-capturing moves for the piece on `from`.
pub fn simple_targets(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for dir in move_directions(piece) {
        let mut step = 1;
        while let Some(to) = from.offset(dir, step) {
            if board.get(to).is_some() {
                break;
            }
            out.push(to);
            if !piece.is_king() {
                break;
            }
            step += 1;
        }
    }
    out
}

/// Single-jump captures for the piece on `from`, each tagged with the
/// square it removes.
pub fn capture_steps(board: &Board, from: Square, rules: &Rules) -> Vec<Step> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    if piece.is_king() {
        for dir in DIAGONALS {
            king_captures_along(board, from, piece.color, dir, &mut out);
        }
    } else {
        for dir in capture_directions(piece, rules) {
            let (Some(over), Some(land)) = (from.offset(dir, 1), from.offset(dir, 2)) else {
                continue;
            };
            let jumps_opponent = matches!(board.get(over), Some(p) if p.color != piece.color);
            if jumps_opponent && board.get(land).is_none() {
                out.push(Step {
                    to: land,
                    captured: Some(over),
                });
            }
        }
    }
    out
}

/// Walk one diagonal from a king. The first opposing piece may be jumped if
/// empty squares follow it; every such empty square is a landing option.
/// A second opposing piece or any friendly piece ends the scan.
fn king_captures_along(
    board: &Board,
    from: Square,
    color: Color,
    dir: (isize, isize),
    out: &mut Vec<Step>,
) {
    let mut jumped: Option<Square> = None;
    let mut step = 1;
    while let Some(sq) = from.offset(dir, step) {
        match board.get(sq) {
            None => {
                if let Some(over) = jumped {
                    out.push(Step {
                        to: sq,
                        captured: Some(over),
                    });
                }
            }
            Some(p) if p.color == color => break,
            Some(_) => {
                if jumped.is_some() {
                    break;
                }
                jumped = Some(sq);
            }
        }
        step += 1;
    }
}

fn forward_directions(color: Color) -> impl Iterator<Item = (isize, isize)> {
    DIAGONALS
        .into_iter()
        .filter(move |(dr, _)| *dr == color.forward())
}

fn move_directions(piece: Piece) -> Vec<(isize, isize)> {
    if piece.is_king() {
        DIAGONALS.to_vec()
    } else {
        forward_directions(piece.color).collect()
    }
}

fn capture_directions(piece: Piece, rules: &Rules) -> Vec<(isize, isize)> {
    if piece.is_king() || rules.men_capture_backward {
        DIAGONALS.to_vec()
    } else {
        forward_directions(piece.color).collect()
    }
}
