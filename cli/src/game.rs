use std::io::Write;

use anyhow::{bail, Result};
use nrow::{Board, GameConfig, Outcome, Player, PlayerController};
use serde::Serialize;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub player: Player,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub config: GameConfig,
    pub outcome: Outcome,
    pub moves: Vec<MoveRecord>,
}

/// Alternates two controllers, player one first, until the board is decided.
pub struct Game {
    config: GameConfig,
    board: Board,
    players: [Box<dyn PlayerController>; 2],
    history: Vec<MoveRecord>,
}

impl Game {
    pub fn new(config: GameConfig, players: [Box<dyn PlayerController>; 2]) -> Result<Self> {
        if players[0].player() != Player::One || players[1].player() != Player::Two {
            bail!("controllers must play as player 1 and player 2, in that order");
        }
        let board = config.empty_board()?;
        Ok(Self {
            config,
            board,
            players,
            history: Vec::new(),
        })
    }

    /// Plays to the end, writing the board to `out` after every move.
    pub fn play(mut self, out: &mut impl Write) -> Result<GameSummary> {
        writeln!(out, "{}\n", self.board)?;
        let mut turn = 0;
        let outcome = loop {
            if let Some(outcome) = self.board.outcome(self.config.n) {
                break outcome;
            }
            let controller = &mut self.players[turn % 2];
            let player = controller.player();
            let column = controller.choose_move(&self.board)?;
            if !self.board.is_valid(column) {
                bail!("{} ({player}) chose invalid column {column}", controller.name());
            }
            self.board = self.board.drop_piece(column, player)?;
            info!(player = player.id(), column, controller = controller.name(), "move played");
            self.history.push(MoveRecord { player, column });
            writeln!(out, "{player} plays column {column}\n{}\n", self.board)?;
            turn += 1;
        };

        match outcome {
            Outcome::Winner(player) => writeln!(out, "{player} wins!")?,
            Outcome::Draw => writeln!(out, "Draw.")?,
        }
        info!(?outcome, moves = self.history.len(), "game finished");
        Ok(GameSummary {
            config: self.config,
            outcome,
            moves: self.history,
        })
    }
}
