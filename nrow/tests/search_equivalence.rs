use nrow::{AlphaBeta, Board, Minimax, Player, SearchConfig, SearchTree, WindowHeuristic};

const N: usize = 3;

/// Every undecided 4x4 position reachable in at most `max_moves` moves,
/// paired with the side to move.
fn positions(max_moves: usize) -> Vec<(Board, Player)> {
    let mut out = Vec::new();
    let mut frontier = vec![(Board::new(4, 4).unwrap(), Player::One)];
    for moves in 0..=max_moves {
        let mut next = Vec::new();
        for (board, to_move) in frontier {
            if board.winner(N).is_some() || board.is_full() {
                continue;
            }
            if moves < max_moves {
                for col in board.valid_columns() {
                    next.push((board.drop_piece(col, to_move).unwrap(), to_move.opponent()));
                }
            }
            out.push((board, to_move));
        }
        frontier = next;
    }
    out
}

fn strategies(player: Player, depth: usize) -> (Minimax, AlphaBeta) {
    let config = SearchConfig::new(player, N, depth).unwrap();
    (
        Minimax::new(config, WindowHeuristic::new(N)).unwrap(),
        AlphaBeta::new(config, WindowHeuristic::new(N)).unwrap(),
    )
}

#[test]
fn alpha_beta_matches_minimax_on_small_boards() {
    let shallow = positions(3);
    let deep = positions(2);
    assert_eq!(deep.len(), 21);

    for depth in 0..=6 {
        let boards = if depth <= 4 { &shallow } else { &deep };
        for (board, to_move) in boards {
            let (minimax, alpha_beta) = strategies(*to_move, depth);
            let mm = minimax.search(board).unwrap();
            let ab = alpha_beta.search(board).unwrap();
            assert_eq!(mm.score, ab.score, "depth {depth} board:\n{board}");
            assert_eq!(mm.column, ab.column, "depth {depth} board:\n{board}");
            assert!(
                ab.stats.nodes <= mm.stats.nodes,
                "alpha-beta built {} nodes, minimax {} (depth {depth})",
                ab.stats.nodes,
                mm.stats.nodes
            );
            assert!(ab.stats.evaluated <= mm.stats.evaluated);
        }
    }
}

#[test]
fn minimax_visits_the_whole_tree() {
    for (board, to_move) in positions(2) {
        for depth in 0..=3 {
            let (minimax, _) = strategies(to_move, depth);
            let outcome = minimax.search(&board).unwrap();
            let full = SearchTree::build(board.clone(), to_move, N, depth + 1);
            assert_eq!(outcome.stats.nodes, full.len());
        }
    }
}

#[test]
fn alpha_beta_prunes_behind_a_decisive_branch() {
    // Player one wins at once in column 0; later candidates get cut off.
    let board = Board::from_rows(&["....", "....", "1...", "12.2"]).unwrap();
    for depth in 2..=4 {
        let (minimax, alpha_beta) = strategies(Player::One, depth);
        let mm = minimax.search(&board).unwrap();
        let ab = alpha_beta.search(&board).unwrap();
        assert_eq!(ab.column, 0);
        assert_eq!(mm.score, ab.score);
        assert!(
            ab.stats.nodes < mm.stats.nodes,
            "depth {depth}: alpha-beta {} vs minimax {}",
            ab.stats.nodes,
            mm.stats.nodes
        );
        assert!(ab.stats.expanded < mm.stats.expanded);
    }
}
