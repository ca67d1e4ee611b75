//! Search tree nodes

use crate::board::{Board, Piece};

/// Index of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub struct SearchNode {
    pub board: Board,

    /// Parent index, `None` for the root. Only followed during backpropagation.
    pub parent: Option<NodeId>,

    /// Children in the order they were discovered
    pub children: Vec<NodeId>,

    pub visits: u32,

    /// Sum of rollout outcomes, from the point of view of `mover`
    pub score: f64,

    /// Piece whose turn it is on `board`
    pub to_move: Piece,

    /// Piece whose move produced `board`
    pub mover: Piece,

    pub terminal: bool,

    /// Set once expansion finds no new child
    pub exhausted: bool,
}

impl SearchNode {
    pub fn new(board: Board, parent: Option<NodeId>, to_move: Piece) -> Self {
        Self {
            board,
            parent,
            children: Vec::new(),
            visits: 0,
            score: 0.0,
            to_move,
            mover: to_move.opponent(),
            terminal: board.is_terminal(),
            exhausted: false,
        }
    }

    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.score / self.visits as f64
        }
    }

    /// Upper confidence bound of this node as seen from its parent
    pub fn uct(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        self.mean() + exploration * ((parent_visits as f64).ln() / self.visits as f64).sqrt()
    }
}
