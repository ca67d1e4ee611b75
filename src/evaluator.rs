//! Static heuristic scoring of board positions

use crate::{
    board::{Board, Cell, Piece, WINDOWS},
    config::WeightPreset,
    HEIGHT, WIDTH, WINDOW_LENGTH,
};

/// Window and center-column rewards used by [`score`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Weights {
    /// Per own piece in the center column
    pub center: i32,
    /// Window completely filled by own pieces
    pub four: i32,
    /// Three own pieces and one empty cell
    pub three: i32,
    /// Two own pieces and two empty cells
    pub two: i32,
    /// Three opponent pieces and one empty cell, expected to be negative
    pub opponent_three: i32,
}

impl Weights {
    /// Tuning used by the minimax search
    pub const MINIMAX: Weights = Weights {
        center: 3,
        four: 100,
        three: 5,
        two: 2,
        opponent_three: -4,
    };

    /// Defence-heavy tuning used by the one-ply greedy engine
    pub const GREEDY: Weights = Weights {
        center: 3,
        four: 100,
        three: 10,
        two: 5,
        opponent_three: -80,
    };
}

impl From<WeightPreset> for Weights {
    fn from(preset: WeightPreset) -> Self {
        match preset {
            WeightPreset::Minimax => Weights::MINIMAX,
            WeightPreset::Greedy => Weights::GREEDY,
        }
    }
}

fn window_score(window: &[Cell; WINDOW_LENGTH], piece: Piece, weights: &Weights) -> i32 {
    let own = Cell::from(piece);
    let opp = Cell::from(piece.opponent());

    let own_count = window.iter().filter(|&&c| c == own).count();
    let opp_count = window.iter().filter(|&&c| c == opp).count();
    let empty_count = window.iter().filter(|c| c.is_empty()).count();

    let mut score = match (own_count, empty_count) {
        (4, _) => weights.four,
        (3, 1) => weights.three,
        (2, 2) => weights.two,
        _ => 0,
    };
    if opp_count == 3 && empty_count == 1 {
        score += weights.opponent_three;
    }
    score
}

/// Rates `board` from `piece`'s point of view
pub fn score(board: &Board, piece: Piece, weights: &Weights) -> i32 {
    let own = Cell::from(piece);
    let center_count = (0..HEIGHT)
        .filter(|&row| board.cell(row, WIDTH / 2) == own)
        .count() as i32;

    let windows: i32 = WINDOWS
        .iter()
        .map(|window| window_score(&board.window(window), piece, weights))
        .sum();

    center_count * weights.center + windows
}
