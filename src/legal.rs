//! Legal-move aggregation with mandatory capture.
//!
//! For a whole side: if any piece has a jump chain, the legal set is the
//! union of all jump chains and simple moves are illegal. Otherwise it is
//! the union of simple moves. The per-piece query applies the same rule and
//! then filters, so a piece without captures has no moves while another
//! piece of its side must capture.

use crate::board::{Board, Color, Square};
use crate::chain::chain_moves;
use crate::movegen::{Move, simple_targets};

/// Rule variant switches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rules {
    /// Let men jump backward as well as forward. Simple moves stay forward.
    pub men_capture_backward: bool,
}

/// All legal moves for `side`, in row-major piece order.
pub fn legal_moves(board: &Board, side: Color, rules: &Rules) -> Vec<Move> {
    let captures: Vec<Move> = board
        .pieces(side)
        .flat_map(|(sq, _)| chain_moves(board, sq, side, rules))
        .collect();
    if !captures.is_empty() {
        return captures;
    }

    board
        .pieces(side)
        .flat_map(|(from, _)| {
            simple_targets(board, from)
                .into_iter()
                .map(move |to| Move::simple(from, to))
        })
        .collect()
}

/// Legal moves of the piece on `from`, under the side-wide capture rule.
pub fn moves_for_piece(board: &Board, from: Square, side: Color, rules: &Rules) -> Vec<Move> {
    if !matches!(board.get(from), Some(p) if p.color == side) {
        return Vec::new();
    }
    legal_moves(board, side, rules)
        .into_iter()
        .filter(|mv| mv.from == from)
        .collect()
}

/// True when `side` must capture this turn.
pub fn must_capture(board: &Board, side: Color, rules: &Rules) -> bool {
    board
        .pieces(side)
        .any(|(sq, _)| !chain_moves(board, sq, side, rules).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn sq(row: isize, col: isize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_opening_moves_light() {
        let moves = legal_moves(&Board::new(), Color::Light, &Rules::default());
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|m| !m.is_capture()));
        assert!(moves.iter().all(|m| m.from.row() == 5 && m.to.row() == 4));
    }

    #[test]
    fn test_opening_moves_dark() {
        let moves = legal_moves(&Board::new(), Color::Dark, &Rules::default());
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|m| m.from.row() == 2 && m.to.row() == 3));
    }

    #[test]
    fn test_mandatory_capture_excludes_simple_moves() {
        let board = Board::empty()
            .with(sq(4, 1), Piece::man(Color::Light))
            .with(sq(3, 2), Piece::man(Color::Dark))
            .with(sq(6, 5), Piece::man(Color::Light));
        let rules = Rules::default();
        let moves = legal_moves(&board, Color::Light, &rules);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].is_capture());
        assert!(must_capture(&board, Color::Light, &rules));

        // the free piece may not move at all
        assert!(moves_for_piece(&board, sq(6, 5), Color::Light, &rules).is_empty());
        assert_eq!(moves_for_piece(&board, sq(4, 1), Color::Light, &rules).len(), 1);
    }

    #[test]
    fn test_moves_for_piece_without_captures() {
        let board = Board::new();
        let rules = Rules::default();
        let moves = moves_for_piece(&board, sq(5, 2), Color::Light, &rules);
        let mut to: Vec<Square> = moves.iter().map(|m| m.to).collect();
        to.sort();
        assert_eq!(to, vec![sq(4, 1), sq(4, 3)]);
        // back-row piece is blocked
        assert!(moves_for_piece(&board, sq(6, 1), Color::Light, &rules).is_empty());
        // opponent's piece or empty square
        assert!(moves_for_piece(&board, sq(2, 1), Color::Light, &rules).is_empty());
        assert!(moves_for_piece(&board, sq(4, 1), Color::Light, &rules).is_empty());
    }

    #[test]
    fn test_no_pieces_no_moves() {
        let board = Board::empty().with(sq(0, 1), Piece::man(Color::Dark));
        assert!(legal_moves(&board, Color::Light, &Rules::default()).is_empty());
    }

    #[test]
    fn test_blocked_side_has_no_moves() {
        // Light man on (1,0) blocked by a dark man it cannot jump (edge).
        let board = Board::empty()
            .with(sq(1, 0), Piece::man(Color::Light))
            .with(sq(0, 1), Piece::man(Color::Dark));
        assert!(legal_moves(&board, Color::Light, &Rules::default()).is_empty());
    }
}
