use std::fmt;

use crate::{GameError, Outcome, Player};

/// Scan directions as (row step, column step), rows counted from the top.
/// Order: horizontal, vertical, diagonal down-right, diagonal down-left.
pub(crate) const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Gravity-fill grid. Row 0 is the top row; pieces settle toward the
/// highest row index. Moves never mutate a board, they return a new one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Player>>,
    heights: Vec<usize>, // pieces stacked in each column
}

impl Board {
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
            heights: vec![0; width],
        })
    }

    /// Parse rows listed top to bottom. `.` is empty, `1`/`X` is player one
    /// and `2`/`O` is player two. Whitespace inside a row is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GameError> {
        let parsed: Vec<Vec<Option<Player>>> = rows
            .iter()
            .enumerate()
            .map(|(row, line)| parse_row(row, line))
            .collect::<Result<_, _>>()?;

        let height = parsed.len();
        let width = parsed.first().map(Vec::len).unwrap_or(0);
        let mut board = Board::new(width, height).map_err(|_| GameError::ParseBoard {
            row: 0,
            reason: "board must have at least one row and one column".to_string(),
        })?;

        for (row, cells) in parsed.iter().enumerate() {
            if cells.len() != width {
                return Err(GameError::ParseBoard {
                    row,
                    reason: format!("expected {width} cells, found {}", cells.len()),
                });
            }
            for (col, cell) in cells.iter().enumerate() {
                board.cells[row * width + col] = *cell;
            }
        }

        for col in 0..width {
            let stacked = (0..height)
                .rev()
                .take_while(|&row| board.cell(row, col).is_some())
                .count();
            if let Some(row) = (0..height - stacked).find(|&row| board.cell(row, col).is_some()) {
                return Err(GameError::ParseBoard {
                    row,
                    reason: format!("piece in column {col} is floating"),
                });
            }
            board.heights[col] = stacked;
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Occupant of a cell; `None` for empty or out-of-range coordinates.
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells[row * self.width + col]
    }

    pub fn pieces(&self) -> usize {
        self.heights.iter().sum()
    }

    pub fn is_valid(&self, column: usize) -> bool {
        column < self.width && self.heights[column] < self.height
    }

    pub fn valid_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(move |&col| self.is_valid(col))
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&h| h >= self.height)
    }

    /// Board after `player` drops a piece into `column`.
    pub fn drop_piece(&self, column: usize, player: Player) -> Result<Board, GameError> {
        if column >= self.width {
            return Err(GameError::ColumnOutOfBounds {
                column,
                width: self.width,
            });
        }
        let stacked = self.heights[column];
        if stacked >= self.height {
            return Err(GameError::ColumnFull { column });
        }
        let row = self.height - 1 - stacked;
        let mut next = self.clone();
        next.cells[row * self.width + column] = Some(player);
        next.heights[column] += 1;
        Ok(next)
    }

    /// First player found owning `n` consecutive cells. Cells are scanned
    /// row-major from the top-left corner and each cell tries the directions
    /// in `DIRECTIONS` order.
    pub fn winner(&self, n: usize) -> Option<Player> {
        if n == 0 {
            return None;
        }
        for row in 0..self.height {
            for col in 0..self.width {
                let Some(owner) = self.cell(row, col) else {
                    continue;
                };
                for &(dr, dc) in DIRECTIONS.iter() {
                    let complete = self
                        .run(row, col, dr, dc, n)
                        .is_some_and(|mut cells| cells.all(|cell| cell == Some(owner)));
                    if complete {
                        return Some(owner);
                    }
                }
            }
        }
        None
    }

    /// `Some` once the game is decided: a winner, or a full board without one.
    pub fn outcome(&self, n: usize) -> Option<Outcome> {
        match self.winner(n) {
            Some(player) => Some(Outcome::Winner(player)),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }

    /// Cells of the length-`n` run starting at (`row`, `col`) stepping by
    /// (`dr`, `dc`), or `None` if the run leaves the board.
    pub(crate) fn run(
        &self,
        row: usize,
        col: usize,
        dr: isize,
        dc: isize,
        n: usize,
    ) -> Option<impl Iterator<Item = Option<Player>> + '_> {
        let reach = n.checked_sub(1)? as isize;
        let end_row = row as isize + dr * reach;
        let end_col = col as isize + dc * reach;
        if end_row < 0
            || end_col < 0
            || end_row >= self.height as isize
            || end_col >= self.width as isize
        {
            return None;
        }
        Some((0..n as isize).map(move |step| {
            let r = (row as isize + dr * step) as usize;
            let c = (col as isize + dc * step) as usize;
            self.cells[r * self.width + c]
        }))
    }
}

fn parse_row(row: usize, line: &str) -> Result<Vec<Option<Player>>, GameError> {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .map(|symbol| match symbol {
            '.' => Ok(None),
            '1' | 'X' | 'x' => Ok(Some(Player::One)),
            '2' | 'O' | 'o' => Ok(Some(Player::Two)),
            other => Err(GameError::ParseBoard {
                row,
                reason: format!("unexpected symbol {other:?}"),
            }),
        })
        .collect()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            let line: Vec<String> = (0..self.width)
                .map(|col| {
                    self.cell(row, col)
                        .map(Player::symbol)
                        .unwrap_or('.')
                        .to_string()
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let footer: Vec<String> = (0..self.width).map(|col| (col % 10).to_string()).collect();
        write!(f, "{}", footer.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &Board, moves: &[(usize, Player)]) -> Board {
        moves.iter().fold(board.clone(), |b, &(col, player)| {
            b.drop_piece(col, player).unwrap()
        })
    }

    fn assert_gravity(board: &Board) {
        for col in 0..board.width() {
            let mut seen_piece = false;
            for row in 0..board.height() {
                match board.cell(row, col) {
                    Some(_) => seen_piece = true,
                    None => assert!(!seen_piece, "gap below a piece in column {col}"),
                }
            }
        }
    }

    #[test]
    fn drop_settles_on_lowest_empty_row() {
        let board = Board::new(4, 3).unwrap();
        let board = play(&board, &[(1, Player::One), (1, Player::Two)]);
        assert_eq!(board.cell(2, 1), Some(Player::One));
        assert_eq!(board.cell(1, 1), Some(Player::Two));
        assert_eq!(board.cell(0, 1), None);
        assert_eq!(board.pieces(), 2);
    }

    #[test]
    fn drop_leaves_receiver_untouched() {
        let board = Board::new(3, 3).unwrap();
        let next = board.drop_piece(0, Player::One).unwrap();
        assert_eq!(board.pieces(), 0);
        assert_eq!(next.pieces(), 1);
        assert_ne!(board, next);
    }

    #[test]
    fn full_column_is_invalid() {
        let board = Board::new(3, 2).unwrap();
        let board = play(&board, &[(2, Player::One), (2, Player::Two)]);
        assert!(!board.is_valid(2));
        assert!(board.is_valid(0));
        assert!(!board.is_valid(3));
        assert_eq!(
            board.drop_piece(2, Player::One),
            Err(GameError::ColumnFull { column: 2 })
        );
        assert_eq!(
            board.drop_piece(5, Player::One),
            Err(GameError::ColumnOutOfBounds { column: 5, width: 3 })
        );
        assert_eq!(board.valid_columns().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn gravity_holds_after_every_drop() {
        let mut board = Board::new(4, 4).unwrap();
        let mut player = Player::One;
        let sequence = [3, 0, 0, 2, 3, 3, 1, 0, 3, 2, 2, 1, 0, 1, 1, 2];
        for col in sequence {
            board = board.drop_piece(col, player).unwrap();
            player = player.opponent();
            assert_gravity(&board);
            for c in 0..board.width() {
                assert_eq!(board.is_valid(c), board.cell(0, c).is_none());
            }
        }
        assert!(board.is_full());
        assert_eq!(board.valid_columns().count(), 0);
    }

    #[test]
    fn detects_runs_in_every_direction() {
        let n = 3;
        let horizontal = Board::from_rows(&["....", "....", "....", ".111"]).unwrap();
        let vertical = Board::from_rows(&["....", "2...", "2...", "2..."]).unwrap();
        let down_right = Board::from_rows(&["....", "1...", "21..", "221."]).unwrap();
        let down_left = Board::from_rows(&["....", "...2", "..21", ".211"]).unwrap();
        assert_eq!(horizontal.winner(n), Some(Player::One));
        assert_eq!(vertical.winner(n), Some(Player::Two));
        assert_eq!(down_right.winner(n), Some(Player::One));
        assert_eq!(down_left.winner(n), Some(Player::Two));
    }

    #[test]
    fn every_placed_run_is_reported() {
        let (width, height, n) = (5, 5, 3);
        for row in 0..height {
            for col in 0..width {
                for &(dr, dc) in DIRECTIONS.iter() {
                    let cells: Vec<(usize, usize)> = (0..n as isize)
                        .map(|k| (row as isize + dr * k, col as isize + dc * k))
                        .filter(|&(r, c)| r >= 0 && c >= 0 && (r as usize) < height && (c as usize) < width)
                        .map(|(r, c)| (r as usize, c as usize))
                        .collect();
                    if cells.len() < n {
                        continue;
                    }
                    let mut board = Board::new(width, height).unwrap();
                    for &(r, c) in &cells {
                        board.cells[r * width + c] = Some(Player::Two);
                    }
                    assert_eq!(board.winner(n), Some(Player::Two), "run at {row},{col} dir {dr},{dc}");
                }
            }
        }
    }

    #[test]
    fn no_winner_without_complete_run() {
        let board = Board::from_rows(&["....", "1...", "12..", "2112"]).unwrap();
        assert_eq!(board.winner(3), None);
        assert_eq!(board.outcome(3), None);
        assert_eq!(Board::new(4, 4).unwrap().winner(3), None);
    }

    #[test]
    fn first_run_in_scan_order_wins_ties() {
        // Both players own a run; player two's sits on the higher row.
        let board = Board::from_rows(&["222", "111"]).unwrap();
        assert_eq!(board.winner(3), Some(Player::Two));
    }

    #[test]
    fn full_board_without_winner_is_a_draw() {
        let board = Board::from_rows(&["12", "21"]).unwrap();
        assert_eq!(board.winner(3), None);
        assert_eq!(board.outcome(3), Some(Outcome::Draw));
    }

    #[test]
    fn from_rows_rejects_floating_pieces() {
        let res = Board::from_rows(&["1..", "...", "2.."]);
        assert!(matches!(res, Err(GameError::ParseBoard { row: 0, .. })));
    }

    #[test]
    fn from_rows_rejects_ragged_and_unknown_input() {
        assert!(matches!(
            Board::from_rows(&["...", ".."]),
            Err(GameError::ParseBoard { row: 1, .. })
        ));
        assert!(matches!(
            Board::from_rows(&["..z"]),
            Err(GameError::ParseBoard { row: 0, .. })
        ));
        assert!(Board::from_rows(&[]).is_err());
    }

    #[test]
    fn display_renders_rows_and_column_footer() {
        let board = Board::from_rows(&["...", ".2.", "11."]).unwrap();
        assert_eq!(board.to_string(), ". . .\n. 2 .\n1 1 .\n0 1 2");
    }
}
