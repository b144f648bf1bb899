//! Constants for board geometry, evaluation weights, and search defaults.
//!
//! Everything here is fixed at compile time. Runtime knobs (search depth,
//! rule variant, time limit, seed) live in [`crate::engine::EngineConfig`]
//! and default to the values below.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Checkers is always played on 8x8.
pub const N: usize = 8;

/// Number of rows each side fills in the opening layout.
pub const OPENING_ROWS: usize = 3;

/// Row on which Light men are promoted (Light travels toward row 0).
pub const LIGHT_BACK_RANK: usize = 0;

/// Row on which Dark men are promoted (Dark travels toward row N - 1).
pub const DARK_BACK_RANK: usize = N - 1;

/// The four diagonal directions as (row delta, col delta).
/// Order: up-left, up-right, down-left, down-right.
pub const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Material value of any piece.
pub const PIECE_VALUE: f64 = 10.0;

/// Extra value of a king on top of `PIECE_VALUE`.
pub const KING_BONUS: f64 = 20.0;

/// Bonus per row advanced toward the promotion rank.
pub const ADVANCE_WEIGHT: f64 = 0.5;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies.
pub const DEFAULT_DEPTH: u32 = 5;

/// Nodes between clock and stop-flag checks inside the search tree.
pub const CHECK_INTERVAL: u64 = 1024;

/// Deepest search the CLI and protocol will accept.
pub const MAX_DEPTH: u32 = 12;

/// Upper bound on plies in a self-play game before it is declared drawn.
pub const MAX_GAME_PLIES: usize = 200;

// =============================================================================
// Cell Encodings
// =============================================================================

/// Empty square in the text encoding.
pub const EMPTY_CHAR: char = '.';

/// Integer-grid codes: 0 empty, 1 Light man, 2 Dark man, 3 Light king, 4 Dark king.
pub const CODE_EMPTY: u8 = 0;
pub const CODE_LIGHT_MAN: u8 = 1;
pub const CODE_DARK_MAN: u8 = 2;
pub const CODE_LIGHT_KING: u8 = 3;
pub const CODE_DARK_KING: u8 = 4;
