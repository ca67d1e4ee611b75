//! A time-bounded minimax agent for Connect 4

use crate::{
    board::{Board, Piece},
    config::{Pruning, SearchConfig},
    evaluator::{self, Weights},
    Decision, SearchStats,
};

use std::time::{Duration, Instant};

/// Score of a position won by the engine, large enough to dominate any heuristic score
pub const WIN_SCORE: i64 = 10_000_000_000_000;

/// An agent searching a fixed number of plies with alpha-beta pruning
///
/// # Notes
/// The engine maximizes for its own piece and minimizes for the opponent.
/// Leaves are scored with [`WIN_SCORE`] for decided games, 0 for a full board,
/// and the static evaluator otherwise.
///
/// Children are tried in ascending column order and a new best only replaces
/// the old one on strict improvement, so the lowest column wins ties.
#[derive(Clone)]
pub struct MinimaxEngine {
    piece: Piece,
    weights: Weights,
    pruning: Pruning,
    time_budget: Duration,
    max_depth: usize,

    /// The number of nodes searched by this engine so far (for diagnostics only)
    pub node_count: usize,
}

impl MinimaxEngine {
    /// Creates a new engine playing `piece`
    pub fn new(piece: Piece, config: &SearchConfig) -> Self {
        Self {
            piece,
            weights: config.weights.into(),
            pruning: config.pruning,
            time_budget: config.time_budget,
            max_depth: config.max_depth,
            node_count: 0,
        }
    }

    /// Scores a leaf from the engine's point of view
    pub fn evaluate(&self, board: &Board) -> i64 {
        if board.has_four_in_row(self.piece) {
            WIN_SCORE
        } else if board.has_four_in_row(self.piece.opponent()) {
            -WIN_SCORE
        } else if board.is_full() {
            0
        } else {
            evaluator::score(board, self.piece, &self.weights) as i64
        }
    }

    /// Performs a depth-limited game tree search
    ///
    /// Returns the best column (none at a leaf) and the backed-up score
    pub fn search(
        &mut self,
        board: &Board,
        depth: usize,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
    ) -> (Option<usize>, i64) {
        self.node_count += 1;

        if depth == 0 || board.is_terminal() {
            return (None, self.evaluate(board));
        }

        let mover = if maximizing {
            self.piece
        } else {
            self.piece.opponent()
        };

        let mut best_move = None;
        let mut best_score = if maximizing { i64::MIN } else { i64::MAX };

        for column in board.valid_columns() {
            let mut next = *board;
            next.play(column, mover);

            let (_, score) = self.search(&next, depth - 1, alpha, beta, !maximizing);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(column);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(column);
                }
                beta = beta.min(best_score);
            }

            // the other side will never allow this branch
            if self.pruning == Pruning::AlphaBeta && alpha >= beta {
                break;
            }
        }

        (best_move, best_score)
    }

    /// Calculates the best move with iterative deepening under the time budget
    ///
    /// A pass that starts before the deadline always runs to completion.
    pub fn select_move(&mut self, board: &Board) -> Option<Decision> {
        let fallback = board.valid_columns().next()?;
        let start = Instant::now();
        self.node_count = 0;

        let mut best = (fallback, self.evaluate(board), 0);
        for depth in 0..=self.max_depth {
            if start.elapsed() >= self.time_budget {
                log::debug!("time budget exhausted before depth {}", depth);
                break;
            }

            let (column, score) = self.search(board, depth, i64::MIN, i64::MAX, true);
            log::debug!(
                "depth {}: column {:?}, score {}, {} nodes, {:.3}s",
                depth,
                column,
                score,
                self.node_count,
                start.elapsed().as_secs_f64()
            );
            if let Some(column) = column {
                best = (column, score, depth);
            }
        }

        let (column, score, depth) = best;
        Some(Decision {
            column,
            nodes: self.node_count,
            stats: SearchStats::Minimax { score, depth },
        })
    }
}
