use std::ops::Range;

use tracing::trace;

use crate::{Board, Player};

/// Index of a node inside its [`SearchTree`].
pub type NodeId = usize;

/// Vertex of the search tree.
#[derive(Clone, Debug)]
pub struct Node {
    board: Board,
    to_move: Player,
    column: Option<usize>,
    winner: Option<Player>,
    children: Option<Range<NodeId>>,
}

impl Node {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Player whose turn it is on this node's board.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Column that produced this node; `None` at the root.
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }
}

/// Arena of reachable positions. Children of a node occupy a contiguous
/// index range in ascending column order and are generated on first request,
/// so the arena only ever holds what a search actually visited.
#[derive(Clone, Debug)]
pub struct SearchTree {
    nodes: Vec<Node>,
    n: usize,
}

impl SearchTree {
    pub const ROOT: NodeId = 0;

    pub fn new(board: Board, to_move: Player, n: usize) -> Self {
        let winner = board.winner(n);
        Self {
            nodes: vec![Node {
                board,
                to_move,
                column: None,
                winner,
                children: None,
            }],
            n,
        }
    }

    /// Eagerly builds every position up to `depth` plies below the root.
    pub fn build(board: Board, to_move: Player, n: usize, depth: usize) -> Self {
        let mut tree = Self::new(board, to_move, n);
        tree.build_from(Self::ROOT, depth);
        tree
    }

    fn build_from(&mut self, id: NodeId, depth: usize) {
        if depth == 0 {
            return;
        }
        for child in self.expand(id) {
            self.build_from(child, depth - 1);
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children already generated for `id`; empty if it was never expanded.
    pub fn children(&self, id: NodeId) -> Range<NodeId> {
        self.nodes[id].children.clone().unwrap_or(0..0)
    }

    /// Generates the children of `id` if needed and returns their range.
    /// A decided board has no children.
    pub fn expand(&mut self, id: NodeId) -> Range<NodeId> {
        if let Some(children) = &self.nodes[id].children {
            return children.clone();
        }

        let start = self.nodes.len();
        let parent = &self.nodes[id];
        let children: Vec<Node> = if parent.winner.is_some() {
            Vec::new()
        } else {
            let mover = parent.to_move;
            parent
                .board
                .valid_columns()
                .filter_map(|col| {
                    let board = parent.board.drop_piece(col, mover).ok()?;
                    let winner = board.winner(self.n);
                    Some(Node {
                        board,
                        to_move: mover.opponent(),
                        column: Some(col),
                        winner,
                        children: None,
                    })
                })
                .collect()
        };
        self.nodes.extend(children);

        let range = start..self.nodes.len();
        trace!(node = id, children = range.len(), "expanded node");
        self.nodes[id].children = Some(range.clone());
        range
    }

    /// Drops the children of `id` and everything below them, leaving `id`
    /// unexpanded. Its children must be the most recently generated block,
    /// which holds once a depth-first search has finished scoring `id`.
    pub fn release(&mut self, id: NodeId) {
        if let Some(children) = self.nodes[id].children.take() {
            debug_assert_eq!(children.end, self.nodes.len());
            self.nodes.truncate(children.start);
        }
    }
}
