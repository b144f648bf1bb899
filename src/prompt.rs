//! Plain-text position descriptions for an external commentary service.
//!
//! The engine never talks to that service itself. It only renders a board,
//! the side to move and a move list as structured text, and defines how a
//! failed reply degrades: the caller gets a fixed apology, never an engine
//! error.

use std::fmt::Write as _;

use tracing::warn;

use crate::board::{Board, Color};
use crate::movegen::Move;

/// Shown to the user when the commentary service fails.
pub const APOLOGY: &str =
    "Sorry, no suggestion is available right now. Please try again in a moment.";

/// Something that turns a position description into human-readable text.
pub trait Commentator {
    fn comment(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Render the board, side to move and numbered move list.
///
/// ```
/// use checkers_rust::board::{Board, Color};
/// use checkers_rust::legal::{Rules, legal_moves};
/// use checkers_rust::prompt::describe;
///
/// let board = Board::new();
/// let moves = legal_moves(&board, Color::Light, &Rules::default());
/// let text = describe(&board, Color::Light, &moves);
/// assert!(text.contains("side: light"));
/// assert!(text.contains("1. 5,0 -> 4,1"));
/// ```
pub fn describe(board: &Board, side: Color, moves: &[Move]) -> String {
    let mut out = String::new();
    out.push_str("board (row 0 at top; . empty, w/W light man/king, b/B dark man/king):\n");
    out.push_str(&board.to_string());
    let _ = writeln!(out, "side: {side}");
    if moves.is_empty() {
        out.push_str("moves: none\n");
        return out;
    }
    out.push_str("moves:\n");
    for (i, mv) in moves.iter().enumerate() {
        let _ = writeln!(out, "{}. {mv}", i + 1);
    }
    out
}

/// Ask `commentator` about the position, falling back to [`APOLOGY`].
pub fn comment_or_apologize(
    commentator: &dyn Commentator,
    board: &Board,
    side: Color,
    moves: &[Move],
) -> String {
    let prompt = describe(board, side, moves);
    match commentator.comment(&prompt) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => APOLOGY.to_string(),
        Err(e) => {
            warn!(error = %e, "commentary unavailable");
            APOLOGY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    struct Echo;
    impl Commentator for Echo {
        fn comment(&self, prompt: &str) -> anyhow::Result<String> {
            Ok(format!("seen {} lines", prompt.lines().count()))
        }
    }

    struct Down;
    impl Commentator for Down {
        fn comment(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("service timed out")
        }
    }

    #[test]
    fn test_describe_lists_captures() {
        let sq = |r, c| Square::new(r, c).unwrap();
        let moves = vec![Move::capture(sq(4, 1), sq(0, 5), vec![sq(3, 2), sq(1, 4)])];
        let text = describe(&Board::empty(), Color::Light, &moves);
        assert!(text.contains("1. 4,1 -> 0,5 x 3,2 1,4"));
    }

    #[test]
    fn test_describe_without_moves() {
        let text = describe(&Board::empty(), Color::Dark, &[]);
        assert!(text.contains("side: dark"));
        assert!(text.ends_with("moves: none\n"));
    }

    #[test]
    fn test_comment_passes_through() {
        let text = comment_or_apologize(&Echo, &Board::new(), Color::Light, &[]);
        assert!(text.starts_with("seen "));
    }

    #[test]
    fn test_failure_becomes_apology() {
        let text = comment_or_apologize(&Down, &Board::new(), Color::Light, &[]);
        assert_eq!(text, APOLOGY);
    }
}
