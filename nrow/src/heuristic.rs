use crate::board::{Board, DIRECTIONS};
use crate::Player;

/// Score of a completed run. Every non-winning position scores strictly
/// inside `(-WIN_SCORE, WIN_SCORE)`.
pub const WIN_SCORE: i32 = 1_000_000_000;

const CENTER_WEIGHT: i32 = 3;

/// Static evaluation of a board from one player's point of view.
/// Implementations must be pure: the same inputs always give the same score.
pub trait Heuristic {
    fn score(&self, player: Player, board: &Board) -> i32;

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Scans every length-`n` window on the board. A window holding only one
/// side's pieces is worth more the fuller it gets; mixed windows are dead.
/// Pieces in the centre column earn a small bonus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WindowHeuristic {
    n: usize,
}

impl WindowHeuristic {
    pub fn new(n: usize) -> Self {
        Self { n }
    }
}

/// Reward for an open window holding `pieces` of one side: 1, 4, 16, ...
fn window_reward(pieces: usize) -> i32 {
    match pieces {
        0 => 0,
        k => 4i32.saturating_pow((k - 1) as u32),
    }
}

impl Heuristic for WindowHeuristic {
    fn score(&self, player: Player, board: &Board) -> i32 {
        match board.winner(self.n) {
            Some(winner) if winner == player => return WIN_SCORE,
            Some(_) => return -WIN_SCORE,
            None => {}
        }

        let mut score: i32 = 0;
        let center = board.width() / 2;
        for row in 0..board.height() {
            match board.cell(row, center) {
                Some(p) if p == player => score += CENTER_WEIGHT,
                Some(_) => score -= CENTER_WEIGHT,
                None => {}
            }
        }

        for row in 0..board.height() {
            for col in 0..board.width() {
                for &(dr, dc) in DIRECTIONS.iter() {
                    let Some(cells) = board.run(row, col, dr, dc, self.n) else {
                        continue;
                    };
                    let (mut mine, mut theirs) = (0, 0);
                    for cell in cells {
                        match cell {
                            Some(p) if p == player => mine += 1,
                            Some(_) => theirs += 1,
                            None => {}
                        }
                    }
                    match (mine, theirs) {
                        (m, 0) => score = score.saturating_add(window_reward(m)),
                        (0, t) => score = score.saturating_sub(window_reward(t)),
                        _ => {} // blocked window
                    }
                }
            }
        }
        score.clamp(-(WIN_SCORE - 1), WIN_SCORE - 1)
    }

    fn name(&self) -> &str {
        "window"
    }
}
