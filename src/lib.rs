//! Checkers-Rust: a checkers (draughts) rules engine with alpha-beta search.
//!
//! This crate computes legal moves, including forced multi-jump captures
//! and long-range king captures, and picks a move for an automated opponent
//! with a depth-limited minimax search.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation weights, search defaults
//! - [`board`] - Board model, encodings, and the move simulator
//! - [`movegen`] - Single-piece moves and single jumps
//! - [`chain`] - Multi-jump chain enumeration
//! - [`legal`] - Side-wide legal moves with mandatory capture
//! - [`eval`] - Static evaluation
//! - [`search`] - Minimax with alpha-beta pruning
//! - [`engine`] - Configuration and the public move operations
//! - [`game`] - Game session with step-by-step jump chains
//! - [`prompt`] - Plain-text position descriptions for commentary
//! - [`protocol`] - Line-oriented text protocol
//!
//! ## Example
//!
//! ```
//! use checkers_rust::board::{Board, Color};
//! use checkers_rust::engine::{Engine, EngineConfig};
//!
//! let board = Board::new();
//! let mut engine = Engine::new(EngineConfig::default().with_depth(3).with_seed(1));
//!
//! assert_eq!(engine.list_legal_moves(&board, Color::Light).len(), 7);
//! let best = engine.compute_best_move(&board, Color::Light).unwrap();
//! println!("Best move: {best}");
//! ```

pub mod board;
pub mod chain;
pub mod constants;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod prompt;
pub mod protocol;
pub mod search;

pub use board::{Board, Color, Piece, Rank, Square};
pub use engine::{Engine, EngineConfig};
pub use error::CoreError;
pub use movegen::Move;
