//! Minimax search with alpha-beta pruning.
//!
//! The root tries every legal move of the searching side, scores the
//! resulting position with a depth-limited alpha-beta search, and picks
//! uniformly at random among the moves sharing the best score. Leaf and
//! terminal positions are always scored from the root side's perspective.
//!
//! There is no transposition table, iterative deepening or move ordering;
//! children are searched in generation order.
//!
//! A search can be bounded by a time limit or stopped through a shared
//! flag. Both are checked before each root move and every
//! [`CHECK_INTERVAL`] nodes inside the tree. A root move interrupted
//! mid-tree is dropped, so a stopped search returns the best move among
//! those already fully scored.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use fastrand::Rng;
use tracing::{debug, trace, warn};

use crate::board::{Board, Color};
use crate::constants::{CHECK_INTERVAL, DEFAULT_DEPTH};
use crate::engine::EngineConfig;
use crate::eval::evaluate;
use crate::legal::{Rules, legal_moves};
use crate::movegen::Move;

/// Depth and cancellation bounds for one search.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Search depth in plies, counting the root move. Values below 1 act as 1.
    pub depth: u32,
    /// Wall-clock budget measured from the start of the search.
    pub time_limit: Option<Duration>,
    stop: Arc<AtomicBool>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(DEFAULT_DEPTH)
    }
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        Self {
            depth,
            time_limit: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Ask a running search to wrap up after the current root move.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// A handle that can stop this search from another thread.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn expired(&self, started: Instant) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        matches!(self.time_limit, Some(limit) if started.elapsed() >= limit)
    }
}

/// Outcome of a root search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Chosen move, `None` when the side has no legal moves.
    pub best: Option<Move>,
    /// Score of `best` from the searching side's perspective.
    pub score: f64,
    /// Every root move that shared the best score.
    pub tied: Vec<Move>,
    /// Nodes visited below the root.
    pub nodes: u64,
    /// False when the search was stopped before scoring every root move.
    pub completed: bool,
}

/// Recursive alpha-beta state shared by one search.
pub struct Searcher<'a> {
    root: Color,
    rules: &'a Rules,
    nodes: u64,
    limits: Option<(&'a SearchLimits, Instant)>,
    stopped: bool,
}

impl<'a> Searcher<'a> {
    /// A searcher that scores leaves for `root` and never stops early.
    pub fn new(root: Color, rules: &'a Rules) -> Self {
        Self {
            root,
            rules,
            nodes: 0,
            limits: None,
            stopped: false,
        }
    }

    /// A searcher that gives up once `limits` expire, measured from `started`.
    pub fn bounded(
        root: Color,
        rules: &'a Rules,
        limits: &'a SearchLimits,
        started: Instant,
    ) -> Self {
        Self {
            limits: Some((limits, started)),
            ..Self::new(root, rules)
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// True once the search was interrupted. Values returned after that
    /// point are meaningless.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let Some((limits, started)) = self.limits else {
            return false;
        };
        if self.nodes % CHECK_INTERVAL == 0 && limits.expired(started) {
            debug!(nodes = self.nodes, "search interrupted");
            self.stopped = true;
        }
        self.stopped
    }

    /// Minimax value of `board` with `to_move` on turn and `depth` plies left.
    ///
    /// Returns the static evaluation when `depth` is zero or `to_move` has
    /// no legal moves. Siblings are skipped once `beta <= alpha`; that only
    /// saves work and never changes the value returned. A bounded searcher
    /// unwinds with 0.0 once its limits expire; check [`Searcher::stopped`].
    pub fn alpha_beta(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        to_move: Color,
    ) -> f64 {
        self.nodes += 1;
        if self.should_stop() {
            return 0.0;
        }
        if depth == 0 {
            return evaluate(board, self.root);
        }
        let moves = legal_moves(board, to_move, self.rules);
        if moves.is_empty() {
            return evaluate(board, self.root);
        }

        let next = to_move.opponent();
        if maximizing {
            let mut best = f64::NEG_INFINITY;
            for mv in &moves {
                let child = board.apply(mv);
                let v = self.alpha_beta(&child, depth - 1, alpha, beta, false, next);
                if self.stopped {
                    return 0.0;
                }
                best = best.max(v);
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = f64::INFINITY;
            for mv in &moves {
                let child = board.apply(mv);
                let v = self.alpha_beta(&child, depth - 1, alpha, beta, true, next);
                if self.stopped {
                    return 0.0;
                }
                best = best.min(v);
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

/// Pick a move for `side`.
///
/// Each root move is scored independently with a full window, searching
/// `limits.depth - 1` further plies from the opponent's point of view. Ties
/// for the best score are broken with `rng`.
pub fn search(
    board: &Board,
    side: Color,
    rules: &Rules,
    limits: &SearchLimits,
    rng: &mut Rng,
) -> SearchReport {
    let moves = legal_moves(board, side, rules);
    search_among(board, side, moves, rules, limits, rng)
}

/// Like [`search`], but only the given root moves are considered. Used to
/// finish a jump chain that is already under way.
pub fn search_among(
    board: &Board,
    side: Color,
    moves: Vec<Move>,
    rules: &Rules,
    limits: &SearchLimits,
    rng: &mut Rng,
) -> SearchReport {
    let started = Instant::now();
    let depth = limits.depth.max(1);

    if moves.is_empty() {
        debug!(side = %side, "no legal moves");
        return SearchReport {
            best: None,
            score: evaluate(board, side),
            tied: Vec::new(),
            nodes: 0,
            completed: true,
        };
    }

    let mut searcher = Searcher::bounded(side, rules, limits, started);
    let mut scored: Vec<(Move, f64)> = Vec::with_capacity(moves.len());
    let mut completed = true;

    for mv in &moves {
        if limits.expired(started) {
            completed = false;
            break;
        }
        let child = board.apply(mv);
        let score = searcher.alpha_beta(
            &child,
            depth - 1,
            f64::NEG_INFINITY,
            f64::INFINITY,
            false,
            side.opponent(),
        );
        if searcher.stopped() {
            completed = false;
            break;
        }
        trace!(mv = %mv, score, "root move scored");
        scored.push((mv.clone(), score));
    }

    if scored.is_empty() {
        // Stopped before anything was scored: fall back to the first move.
        let first = moves[0].clone();
        warn!(side = %side, "search stopped before any root move was scored");
        return SearchReport {
            score: evaluate(&board.apply(&first), side),
            best: Some(first.clone()),
            tied: vec![first],
            nodes: searcher.nodes(),
            completed: false,
        };
    }

    let best_score = scored
        .iter()
        .map(|(_, s)| *s)
        .fold(f64::NEG_INFINITY, f64::max);
    let tied: Vec<Move> = scored
        .into_iter()
        .filter(|(_, s)| *s == best_score)
        .map(|(m, _)| m)
        .collect();
    let best = tied[rng.usize(..tied.len())].clone();

    if !completed {
        warn!(side = %side, scored = tied.len(), "search stopped early");
    }
    debug!(
        side = %side,
        depth,
        best = %best,
        score = best_score,
        ties = tied.len(),
        nodes = searcher.nodes(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search finished"
    );

    SearchReport {
        best: Some(best),
        score: best_score,
        tied,
        nodes: searcher.nodes(),
        completed,
    }
}

/// A search running on its own thread.
pub struct SearchHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<SearchReport>,
}

impl SearchHandle {
    /// Request the search to stop after the current root move.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn join(self) -> thread::Result<SearchReport> {
        self.thread.join()
    }
}

/// Run [`search`] on a dedicated thread over an owned copy of `board`.
pub fn spawn(board: Board, side: Color, config: &EngineConfig) -> SearchHandle {
    let limits = config.limits();
    let stop = limits.stop_flag();
    let rules = config.rules;
    let mut rng = config.rng();
    let thread = thread::spawn(move || search(&board, side, &rules, &limits, &mut rng));
    SearchHandle { stop, thread }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, Square};

    fn sq(row: isize, col: isize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_search_opening_returns_a_legal_move() {
        let board = Board::new();
        let rules = Rules::default();
        let mut rng = Rng::with_seed(7);
        let report = search(&board, Color::Light, &rules, &SearchLimits::depth(3), &mut rng);
        let best = report.best.expect("opening has moves");
        assert!(legal_moves(&board, Color::Light, &rules).contains(&best));
        assert!(report.completed);
        assert!(report.nodes > 0);
        assert!(report.tied.contains(&best));
    }

    #[test]
    fn test_search_takes_free_piece() {
        // Dark can capture an unprotected light man; it is the only legal move.
        let board = Board::empty()
            .with(sq(2, 1), Piece::man(Color::Dark))
            .with(sq(3, 2), Piece::man(Color::Light))
            .with(sq(7, 6), Piece::man(Color::Light));
        let rules = Rules::default();
        let report = search(
            &board,
            Color::Dark,
            &rules,
            &SearchLimits::depth(4),
            &mut Rng::with_seed(1),
        );
        let best = report.best.unwrap();
        assert_eq!(best.captured, vec![sq(3, 2)]);
    }

    #[test]
    fn test_search_no_moves() {
        let board = Board::empty().with(sq(3, 2), Piece::man(Color::Light));
        let report = search(
            &board,
            Color::Dark,
            &Rules::default(),
            &SearchLimits::default(),
            &mut Rng::with_seed(1),
        );
        assert!(report.best.is_none());
        assert!(report.tied.is_empty());
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let board = Board::new();
        let rules = Rules::default();
        let limits = SearchLimits::depth(2);
        let a = search(&board, Color::Dark, &rules, &limits, &mut Rng::with_seed(42));
        let b = search(&board, Color::Dark, &rules, &limits, &mut Rng::with_seed(42));
        assert_eq!(a.best, b.best);
        assert_eq!(a.score, b.score);
        assert_eq!(a.tied, b.tied);
    }

    #[test]
    fn test_stopped_search_still_returns_a_move() {
        let board = Board::new();
        let limits = SearchLimits::depth(6);
        limits.stop();
        let report = search(
            &board,
            Color::Light,
            &Rules::default(),
            &limits,
            &mut Rng::with_seed(3),
        );
        assert!(!report.completed);
        assert_eq!(
            report.best,
            legal_moves(&board, Color::Light, &Rules::default()).into_iter().next()
        );
    }

    #[test]
    fn test_zero_time_limit_stops_early() {
        let limits = SearchLimits::depth(4).with_time_limit(Duration::ZERO);
        let report = search(
            &Board::new(),
            Color::Dark,
            &Rules::default(),
            &limits,
            &mut Rng::with_seed(3),
        );
        assert!(!report.completed);
        assert!(report.best.is_some());
    }

    fn full_tree_nodes(board: &Board, depth: u32, to_move: Color, rules: &Rules) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = legal_moves(board, to_move, rules);
        1 + moves
            .iter()
            .map(|mv| full_tree_nodes(&board.apply(mv), depth - 1, to_move.opponent(), rules))
            .sum::<u64>()
    }

    #[test]
    fn test_pruning_visits_fewer_nodes_than_full_tree() {
        let board = Board::new();
        let rules = Rules::default();
        let mut pruned = Searcher::new(Color::Light, &rules);
        pruned.alpha_beta(
            &board,
            4,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            Color::Light,
        );
        assert!(pruned.nodes() < full_tree_nodes(&board, 4, Color::Light, &rules));
    }

    /// Four kings a side on the back ranks: a wide tree that takes far
    /// longer than any test budget to search deeply.
    fn open_kings() -> Board {
        let mut board = Board::empty();
        for col in [1, 3, 5, 7] {
            board.place(sq(0, col), Piece::king(Color::Dark));
        }
        for col in [0, 2, 4, 6] {
            board.place(sq(7, col), Piece::king(Color::Light));
        }
        board
    }

    #[test]
    fn test_stop_flag_interrupts_inside_tree() {
        let rules = Rules::default();
        let limits = SearchLimits::depth(12);
        limits.stop();
        let mut searcher = Searcher::bounded(Color::Light, &rules, &limits, Instant::now());
        searcher.alpha_beta(
            &open_kings(),
            12,
            f64::NEG_INFINITY,
            f64::INFINITY,
            true,
            Color::Light,
        );
        assert!(searcher.stopped());
        assert!(searcher.nodes() <= CHECK_INTERVAL);
    }

    #[test]
    fn test_deep_search_honors_time_limit() {
        let limits = SearchLimits::depth(12).with_time_limit(Duration::from_millis(50));
        let started = Instant::now();
        let report = search(
            &open_kings(),
            Color::Light,
            &Rules::default(),
            &limits,
            &mut Rng::with_seed(8),
        );
        assert!(!report.completed);
        assert!(report.best.is_some());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_spawned_search_joins() {
        let config = EngineConfig::default().with_depth(2).with_seed(9);
        let handle = spawn(Board::new(), Color::Light, &config);
        let report = handle.join().expect("search thread panicked");
        assert!(report.best.is_some());
    }
}
