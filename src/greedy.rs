//! One-ply lookahead over the static evaluator

use crate::{
    board::{Board, Piece},
    config::WeightPreset,
    evaluator::{self, Weights},
    Decision, SearchStats,
};

pub struct GreedyEngine {
    weights: Weights,
}

impl GreedyEngine {
    pub fn new(preset: WeightPreset) -> Self {
        Self {
            weights: preset.into(),
        }
    }

    /// Scores every child position and returns the best one
    ///
    /// Columns are scanned in ascending order and only a strictly better
    /// score replaces the running best, so ties go to the lowest column.
    pub fn select_move(&self, board: &Board, piece: Piece) -> Option<Decision> {
        let mut best: Option<(usize, i32)> = None;
        let mut nodes = 0;

        for column in board.valid_columns() {
            let mut next = *board;
            next.play(column, piece);
            nodes += 1;

            let score = evaluator::score(&next, piece, &self.weights);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((column, score));
            }
        }

        best.map(|(column, score)| Decision {
            column,
            nodes,
            stats: SearchStats::Greedy { score },
        })
    }
}
