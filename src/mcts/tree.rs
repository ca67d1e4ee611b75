//! Arena-backed search tree
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`], so parent
//! links never own anything and the whole tree is dropped at once.

use super::node::{NodeId, SearchNode};
use crate::board::{Board, Piece};

#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(board: Board, to_move: Piece) -> Self {
        Self {
            nodes: vec![SearchNode::new(board, None, to_move)],
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A node is fully expanded once every legal move has a child and
    /// every child has been visited
    pub fn is_fully_expanded(&self, id: NodeId) -> bool {
        let node = self.get(id);
        if node.exhausted {
            return true;
        }
        node.children.len() == node.board.valid_columns().count()
            && node.children.iter().all(|&child| self.get(child).visits > 0)
    }

    /// The child with the highest UCT value, first discovered on ties
    pub fn best_uct_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let mut best: Option<(NodeId, f64)> = None;
        for &child in node.children.iter() {
            let value = self.get(child).uct(node.visits, exploration);
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((child, value));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Attaches a new child under `parent` and returns its id
    pub fn add_child(&mut self, parent: NodeId, board: Board) -> NodeId {
        let to_move = self.get(parent).to_move.opponent();
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SearchNode::new(board, Some(parent), to_move));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Walks from `leaf` to the root, crediting `outcome` (from `piece`'s point
    /// of view) to every node whose move was made by `piece`
    pub fn backpropagate(&mut self, leaf: NodeId, outcome: f64, piece: Piece) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            if node.mover == piece {
                node.score += outcome;
            } else {
                node.score -= outcome;
            }
            node.visits += 1;
            current = node.parent;
        }
    }

    /// The root child with the most visits, first discovered on ties
    pub fn most_visited_child(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &child in self.get(Self::ROOT).children.iter() {
            let visits = self.get(child).visits;
            if best.map_or(true, |(_, best_visits)| visits > best_visits) {
                best = Some((child, visits));
            }
        }
        best.map(|(child, _)| child)
    }
}
