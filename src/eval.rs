//! Static position evaluation.

use crate::board::{Board, Color, Piece, Square};
use crate::constants::{ADVANCE_WEIGHT, KING_BONUS, PIECE_VALUE};

/// Scores the board from `side`'s perspective.
///
/// Each piece is worth `PIECE_VALUE`, kings `KING_BONUS` more, plus
/// `ADVANCE_WEIGHT` per row travelled toward its own promotion rank.
/// Own pieces add, opposing pieces subtract, so swapping `side` negates
/// the score.
pub fn evaluate(board: &Board, side: Color) -> f64 {
    Square::all()
        .filter_map(|sq| board.get(sq).map(|p| (sq, p)))
        .map(|(sq, p)| {
            let v = piece_value(p, sq.row());
            if p.color == side { v } else { -v }
        })
        .sum()
}

#[inline]
pub fn piece_value(piece: Piece, row: usize) -> f64 {
    let mut v = PIECE_VALUE;
    if piece.is_king() {
        v += KING_BONUS;
    }
    v + ADVANCE_WEIGHT * piece.color.advancement(row) as f64
}
