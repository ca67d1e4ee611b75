//! Monte-Carlo Tree Search with UCT selection
//!
//! Each call to [`MctsEngine::select_move`] grows a fresh tree rooted at the
//! current position by repeating selection, expansion, a random rollout and
//! backpropagation until the time budget (or iteration cap) runs out. The
//! most visited root child is then played.

pub mod node;
pub mod tree;

use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};

use std::time::{Duration, Instant};

use crate::{
    board::{Board, Piece},
    config::SearchConfig,
    Decision, SearchStats,
};
use node::NodeId;
use tree::SearchTree;

pub struct MctsEngine {
    piece: Piece,
    exploration: f64,
    time_budget: Duration,
    max_iterations: Option<u32>,
    rng: StdRng,
}

impl MctsEngine {
    /// Creates a new engine playing `piece`
    pub fn new(piece: Piece, config: &SearchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            piece,
            exploration: config.exploration,
            time_budget: config.time_budget,
            max_iterations: config.max_iterations,
            rng,
        }
    }

    /// +1 if the engine has won, -1 if the opponent has, 0 otherwise
    fn outcome(&self, board: &Board) -> f64 {
        if board.has_four_in_row(self.piece) {
            1.0
        } else if board.has_four_in_row(self.piece.opponent()) {
            -1.0
        } else {
            0.0
        }
    }

    /// Descends through fully expanded nodes by UCT
    fn select(&self, tree: &SearchTree) -> NodeId {
        let mut current = SearchTree::ROOT;
        while !tree.get(current).terminal && tree.is_fully_expanded(current) {
            match tree.best_uct_child(current, self.exploration) {
                Some(child) if child != current => current = child,
                _ => break,
            }
        }
        current
    }

    /// Adds the first child of `id` not already in the tree, or returns `id`
    /// itself if it is terminal or has no undiscovered children
    fn expand(&self, tree: &mut SearchTree, id: NodeId) -> NodeId {
        let node = tree.get(id);
        if node.terminal {
            return id;
        }

        let candidate = node.board.valid_columns().find_map(|column| {
            let mut next = node.board;
            next.play(column, node.to_move);
            let known = node
                .children
                .iter()
                .any(|&child| tree.get(child).board == next);
            if known {
                None
            } else {
                Some(next)
            }
        });

        match candidate {
            Some(board) => tree.add_child(id, board),
            None => {
                tree.get_mut(id).exhausted = true;
                id
            }
        }
    }

    /// Plays uniformly random moves from `board` until the game ends
    fn rollout(&mut self, mut board: Board, mut to_move: Piece) -> f64 {
        loop {
            if board.has_four_in_row(to_move.opponent()) {
                break;
            }
            match board.valid_columns().choose(&mut self.rng) {
                Some(column) => {
                    board.play(column, to_move);
                    to_move = to_move.opponent();
                }
                // draw
                None => break,
            }
        }
        self.outcome(&board)
    }

    /// Runs the search and returns the most visited root move
    pub fn select_move(&mut self, board: &Board) -> Option<Decision> {
        let fallback = board.valid_columns().next()?;
        let start = Instant::now();
        let mut tree = SearchTree::new(*board, self.piece);

        let mut iterations = 0u32;
        while start.elapsed() < self.time_budget
            && self.max_iterations.map_or(true, |cap| iterations < cap)
        {
            let selected = self.select(&tree);
            let leaf = self.expand(&mut tree, selected);

            let node = tree.get(leaf);
            let outcome = if node.terminal {
                self.outcome(&node.board)
            } else {
                let (board, to_move) = (node.board, node.to_move);
                self.rollout(board, to_move)
            };

            tree.backpropagate(leaf, outcome, self.piece);
            iterations += 1;
        }

        let chosen = tree.most_visited_child();
        let (column, visits, mean) = match chosen {
            Some(child) => {
                let node = tree.get(child);
                let column = board.changed_column(&node.board).unwrap_or(fallback);
                (column, node.visits, node.mean())
            }
            None => (fallback, 0, 0.0),
        };

        log::debug!(
            "mcts: {} iterations, {} nodes, column {} with {} visits (mean {:.3}) in {:.3}s",
            iterations,
            tree.len(),
            column,
            visits,
            mean,
            start.elapsed().as_secs_f64()
        );

        Some(Decision {
            column,
            nodes: tree.len(),
            stats: SearchStats::Mcts {
                iterations,
                visits,
                mean,
            },
        })
    }
}
