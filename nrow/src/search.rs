use tracing::{debug, warn};

use crate::tree::{NodeId, SearchTree};
use crate::{Board, GameError, Heuristic, Player, SearchConfig, WindowHeuristic};

/// Anything that can pick a column for its side: a search strategy, a human
/// at a prompt, or whatever else a driver plugs in.
pub trait PlayerController {
    fn player(&self) -> Player;

    /// Column to play on `board`. The returned column is always valid on it.
    fn choose_move(&mut self, board: &Board) -> Result<usize, GameError>;

    fn name(&self) -> &str;
}

/// Work done by a single search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions generated during the search, root included.
    pub nodes: usize,
    /// Most positions held in the tree at once. Scored subtrees are released,
    /// so this stays near `depth * width` however many nodes were generated.
    pub peak: usize,
    /// Positions whose children were generated.
    pub expanded: usize,
    /// Heuristic evaluations at leaves.
    pub evaluated: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub column: usize,
    /// Backed-up score of `column` from the searching player's view.
    pub score: i32,
    pub stats: SearchStats,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Algorithm {
    Minimax,
    AlphaBeta,
}

/// Exhaustive depth-bounded minimax.
#[derive(Clone, Debug)]
pub struct Minimax<H = WindowHeuristic> {
    config: SearchConfig,
    heuristic: H,
}

impl<H: Heuristic> Minimax<H> {
    pub fn new(config: SearchConfig, heuristic: H) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self { config, heuristic })
    }

    pub fn search(&self, board: &Board) -> Result<SearchOutcome, GameError> {
        search(&self.config, &self.heuristic, board, Algorithm::Minimax)
    }
}

impl Minimax<WindowHeuristic> {
    pub fn with_window_heuristic(player: Player, n: usize, depth: usize) -> Result<Self, GameError> {
        Self::new(SearchConfig::new(player, n, depth)?, WindowHeuristic::new(n))
    }
}

impl<H: Heuristic> PlayerController for Minimax<H> {
    fn player(&self) -> Player {
        self.config.player
    }

    fn choose_move(&mut self, board: &Board) -> Result<usize, GameError> {
        self.search(board).map(|outcome| outcome.column)
    }

    fn name(&self) -> &str {
        "minimax"
    }
}

/// Minimax with alpha-beta pruning. Picks the same column with the same
/// score as [`Minimax`] while visiting fewer positions.
#[derive(Clone, Debug)]
pub struct AlphaBeta<H = WindowHeuristic> {
    config: SearchConfig,
    heuristic: H,
}

impl<H: Heuristic> AlphaBeta<H> {
    pub fn new(config: SearchConfig, heuristic: H) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self { config, heuristic })
    }

    pub fn search(&self, board: &Board) -> Result<SearchOutcome, GameError> {
        search(&self.config, &self.heuristic, board, Algorithm::AlphaBeta)
    }
}

impl AlphaBeta<WindowHeuristic> {
    pub fn with_window_heuristic(player: Player, n: usize, depth: usize) -> Result<Self, GameError> {
        Self::new(SearchConfig::new(player, n, depth)?, WindowHeuristic::new(n))
    }
}

impl<H: Heuristic> PlayerController for AlphaBeta<H> {
    fn player(&self) -> Player {
        self.config.player
    }

    fn choose_move(&mut self, board: &Board) -> Result<usize, GameError> {
        self.search(board).map(|outcome| outcome.column)
    }

    fn name(&self) -> &str {
        "alphabeta"
    }
}

/// The root's children are the searching player's candidate moves; each is
/// scored with `config.depth` further plies, the opponent replying first.
fn search<H: Heuristic>(
    config: &SearchConfig,
    heuristic: &H,
    board: &Board,
    algorithm: Algorithm,
) -> Result<SearchOutcome, GameError> {
    if let Some(winner) = board.winner(config.n) {
        return Err(GameError::GameDecided { winner });
    }
    if board.is_full() {
        return Err(GameError::NoMoves);
    }

    let mut searcher = Searcher {
        tree: SearchTree::new(board.clone(), config.player, config.n),
        heuristic,
        player: config.player,
        stats: SearchStats {
            nodes: 1,
            peak: 1,
            ..SearchStats::default()
        },
    };

    let mut best: Option<(usize, i32)> = None;
    let mut alpha = i32::MIN;
    for child in searcher.expand(SearchTree::ROOT) {
        let Some(column) = searcher.tree.node(child).column() else {
            continue;
        };
        if !board.is_valid(column) {
            warn!(column, "search tree produced a move the board rejects");
            continue;
        }
        let score = match algorithm {
            Algorithm::Minimax => searcher.minimax(child, config.depth, false),
            Algorithm::AlphaBeta => {
                searcher.alpha_beta(child, config.depth, alpha, i32::MAX, false)
            }
        };
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((column, score));
            alpha = alpha.max(score);
        }
    }

    let (column, score) = best.ok_or(GameError::NoMoves)?;
    let stats = searcher.stats;
    debug!(
        ?algorithm,
        heuristic = heuristic.name(),
        player = config.player.id(),
        depth = config.depth,
        column,
        score,
        nodes = stats.nodes,
        peak = stats.peak,
        evaluated = stats.evaluated,
        "selected move"
    );
    Ok(SearchOutcome {
        column,
        score,
        stats,
    })
}

struct Searcher<'a, H> {
    tree: SearchTree,
    heuristic: &'a H,
    player: Player,
    stats: SearchStats,
}

impl<H: Heuristic> Searcher<'_, H> {
    fn expand(&mut self, id: NodeId) -> std::ops::Range<NodeId> {
        if self.tree.node(id).is_expanded() {
            return self.tree.children(id);
        }
        let children = self.tree.expand(id);
        self.stats.expanded += 1;
        self.stats.nodes += children.len();
        self.stats.peak = self.stats.peak.max(self.tree.len());
        children
    }

    /// `None` when `id` must be scored statically: out of depth, decided,
    /// or a full board.
    fn children(&mut self, id: NodeId, depth: usize) -> Option<std::ops::Range<NodeId>> {
        if depth == 0 || self.tree.node(id).winner().is_some() {
            return None;
        }
        let children = self.expand(id);
        (!children.is_empty()).then_some(children)
    }

    /// Heuristic score of a leaf. Decided positions are shifted by the depth
    /// still remaining so that faster wins and slower losses rank higher.
    fn leaf(&mut self, id: NodeId, depth: usize) -> i32 {
        self.stats.evaluated += 1;
        let node = self.tree.node(id);
        let score = self.heuristic.score(self.player, node.board());
        let distance = depth as i32;
        match node.winner() {
            Some(winner) if winner == self.player => score.saturating_add(distance),
            Some(_) => score.saturating_sub(distance),
            None => score,
        }
    }

    fn minimax(&mut self, id: NodeId, depth: usize, maximizing: bool) -> i32 {
        let Some(children) = self.children(id, depth) else {
            return self.leaf(id, depth);
        };
        let scores = children.map(|child| self.minimax(child, depth - 1, !maximizing));
        let best = if maximizing { scores.max() } else { scores.min() };
        self.tree.release(id);
        best.unwrap_or_else(|| self.leaf(id, depth))
    }

    fn alpha_beta(
        &mut self,
        id: NodeId,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        let Some(children) = self.children(id, depth) else {
            return self.leaf(id, depth);
        };

        if maximizing {
            let mut best = i32::MIN;
            for child in children {
                let score = self.alpha_beta(child, depth - 1, alpha, beta, false);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            self.tree.release(id);
            best
        } else {
            let mut best = i32::MAX;
            for child in children {
                let score = self.alpha_beta(child, depth - 1, alpha, beta, true);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            self.tree.release(id);
            best
        }
    }
}
