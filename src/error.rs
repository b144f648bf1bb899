//! Error kinds raised at the engine's entry boundary.
//!
//! Only input validation can fail. Once a board has been accepted, move
//! generation, simulation and search are total and never produce these.

use thiserror::Error;

use crate::board::Square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Coordinates outside `[0, 7]`.
    #[error("invalid position ({row}, {col}): coordinates must be in 0..8")]
    InvalidPosition { row: isize, col: isize },

    /// The requested move is not in the legal set for the side or piece.
    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    /// Wrong dimensions or an unknown cell encoding.
    #[error("malformed board: {message}")]
    MalformedBoard { message: String },
}

impl CoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidPosition { .. } => "invalid_position",
            CoreError::IllegalMove { .. } => "illegal_move",
            CoreError::MalformedBoard { .. } => "malformed_board",
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        CoreError::MalformedBoard {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let e = CoreError::InvalidPosition { row: 8, col: 0 };
        assert_eq!(e.kind(), "invalid_position");
        assert_eq!(CoreError::malformed("x").kind(), "malformed_board");
    }

    #[test]
    fn test_display_mentions_coordinates() {
        let e = CoreError::InvalidPosition { row: -1, col: 3 };
        assert!(e.to_string().contains("(-1, 3)"));
    }
}
