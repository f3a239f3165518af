//! N-in-a-row engine with minimax and alpha-beta search.
//! The board is a gravity-fill grid of configurable size; a player wins by
//! lining up `n` pieces horizontally, vertically or diagonally. Search
//! strategies receive a board and answer with the column to play for their
//! configured side.
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod board;
mod heuristic;
mod search;
mod tree;

pub use board::Board;
pub use heuristic::{Heuristic, WindowHeuristic, WIN_SCORE};
pub use search::{AlphaBeta, Minimax, PlayerController, SearchOutcome, SearchStats};
pub use tree::{Node, NodeId, SearchTree};

/// Deepest look-ahead a search strategy accepts.
pub const MAX_DEPTH: usize = 12;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn from_id(id: u8) -> Result<Player, GameError> {
        match id {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(GameError::InvalidPlayer(other)),
        }
    }

    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    fn symbol(self) -> char {
        match self {
            Player::One => '1',
            Player::Two => '2',
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Player::from_id(id)
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        player.id()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.id())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("column {column} is out of bounds (board is {width} wide)")]
    ColumnOutOfBounds { column: usize, width: usize },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("no legal moves remain")]
    NoMoves,
    #[error("game is already decided: {winner} has won")]
    GameDecided { winner: Player },
    #[error("player id {0} is invalid (expected 1 or 2)")]
    InvalidPlayer(u8),
    #[error("win length {0} is out of range (must be at least 2)")]
    WinLengthOutOfRange(usize),
    #[error("depth {0} is out of range (0-{max})", max = MAX_DEPTH)]
    DepthOutOfRange(usize),
    #[error("board dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid board text at row {row}: {reason}")]
    ParseBoard { row: usize, reason: String },
    #[error("{player} could not choose a move: {reason}")]
    ControllerFailed { player: Player, reason: String },
}

/// Final state of a finished game.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Winner(Player),
    Draw,
}

/// Configuration of a search strategy: which side it plays, the win length
/// and how many plies it looks past its own candidate move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub player: Player,
    pub n: usize,
    pub depth: usize,
}

impl SearchConfig {
    pub fn new(player: Player, n: usize, depth: usize) -> Result<Self, GameError> {
        let config = Self { player, n, depth };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.n < 2 {
            return Err(GameError::WinLengthOutOfRange(self.n));
        }
        if self.depth > MAX_DEPTH {
            return Err(GameError::DepthOutOfRange(self.depth));
        }
        Ok(())
    }
}

/// Board geometry and win length for a game instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub n: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 7,
            height: 6,
            n: 4,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.n < 2 {
            return Err(GameError::WinLengthOutOfRange(self.n));
        }
        Ok(())
    }

    pub fn empty_board(&self) -> Result<Board, GameError> {
        self.validate()?;
        Board::new(self.width, self.height)
    }
}
