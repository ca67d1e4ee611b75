//! Search engines for playing the board game 'Connect 4' against a human
//!
//! Three interchangeable strategies share one board and one win detector:
//! a one-ply greedy evaluator, a time-bounded iterative-deepening minimax
//! with alpha-beta pruning, and a Monte-Carlo Tree Search with UCT selection.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_duel::{board::Piece, config::{SearchConfig, Strategy}, *};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut board = create_initial_board();
//! for column in 0..3 {
//!     apply_move(&mut board, column, Piece::Ai)?;
//! }
//!
//! let config = SearchConfig::for_strategy(Strategy::Minimax).with_max_depth(2);
//! let decision = choose_move(&board, Piece::Ai, Strategy::Minimax, &config)?;
//!
//! assert_eq!(decision.column, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod evaluator;

pub mod config;

pub mod greedy;

pub mod minimax;

pub mod mcts;

mod test;

use board::{Board, MoveError, Piece};
use config::{SearchConfig, Strategy};
use greedy::GreedyEngine;
use mcts::MctsEngine;
use minimax::MinimaxEngine;

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of aligned tiles needed to win
pub const WINDOW_LENGTH: usize = 4;

// a window must fit along every direction of the board
const_assert!(WINDOW_LENGTH <= WIDTH && WINDOW_LENGTH <= HEIGHT);

/// Errors surfaced by [`choose_move`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no legal moves remain, the board is full")]
    NoLegalMoves,
}

/// Strategy-specific details of a decision
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SearchStats {
    /// Heuristic score of the chosen child position
    Greedy { score: i32 },
    /// Backed-up score and depth of the deepest completed pass
    Minimax { score: i64, depth: usize },
    /// Number of playouts, and visit count and mean outcome of the chosen child
    Mcts {
        iterations: u32,
        visits: u32,
        mean: f64,
    },
}

/// The result of one call to a decision engine
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decision {
    /// Zero-indexed column to play
    pub column: usize,
    /// Positions evaluated (greedy, minimax) or tree nodes allocated (MCTS)
    pub nodes: usize,
    pub stats: SearchStats,
}

/// Creates an empty board for the start of a game
pub fn create_initial_board() -> Board {
    Board::new()
}

/// Checks that `column` is on the board and not full
pub fn is_valid_column(board: &Board, column: usize) -> bool {
    board.is_valid_column(column)
}

/// Drops `piece` into `column`, returning the row it landed in
pub fn apply_move(board: &mut Board, column: usize, piece: Piece) -> Result<usize, MoveError> {
    board.drop_piece(column, piece)
}

/// Checks whether `piece` has four in a row anywhere on the board
pub fn has_won(board: &Board, piece: Piece) -> bool {
    board.has_four_in_row(piece)
}

/// Runs one decision engine for `piece` on `board`
///
/// Every engine works on private copies of `board`, so the caller's board is
/// never mutated. A board with no open column yields [`EngineError::NoLegalMoves`].
pub fn choose_move(
    board: &Board,
    piece: Piece,
    strategy: Strategy,
    config: &SearchConfig,
) -> Result<Decision, EngineError> {
    if board.is_full() {
        return Err(EngineError::NoLegalMoves);
    }

    let decision = match strategy {
        Strategy::Greedy => GreedyEngine::new(config.weights).select_move(board, piece),
        Strategy::Minimax => MinimaxEngine::new(piece, config).select_move(board),
        Strategy::Mcts => MctsEngine::new(piece, config).select_move(board),
    }
    .ok_or(EngineError::NoLegalMoves)?;

    log::info!(
        "{:?} chose column {} after {} nodes ({:?})",
        strategy,
        decision.column,
        decision.nodes,
        decision.stats
    );
    Ok(decision)
}
