use std::io::{self, BufRead, Write};

use nrow::{Board, GameError, Player, PlayerController};
use tracing::warn;

/// Where typed answers come from. Returns 0 once input has ended.
pub trait LineSource {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

/// Locks stdin for one line at a time, so two human seats can share it.
impl LineSource for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.lock().read_line(buf)
    }
}

impl<T: AsRef<[u8]>> LineSource for io::Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Reads columns typed at a prompt.
pub struct HumanPlayer<R, W> {
    player: Player,
    input: R,
    output: W,
}

impl<R: LineSource, W: Write> HumanPlayer<R, W> {
    pub fn new(player: Player, input: R, output: W) -> Self {
        Self {
            player,
            input,
            output,
        }
    }

    fn prompt(&mut self, board: &Board) -> io::Result<Option<String>> {
        write!(
            self.output,
            "{}, choose a column (0-{}): ",
            self.player,
            board.width() - 1
        )?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, board: &Board) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.prompt(board)? else {
                return Ok(None);
            };
            match answer.parse::<usize>() {
                Ok(column) if board.is_valid(column) => return Ok(Some(column)),
                Ok(column) => {
                    warn!(column, "rejected unplayable column");
                    writeln!(self.output, "Column {column} is not playable.")?;
                }
                Err(_) => writeln!(self.output, "{answer:?} is not a column number.")?,
            }
        }
    }

    fn failed(&self, reason: impl ToString) -> GameError {
        GameError::ControllerFailed {
            player: self.player,
            reason: reason.to_string(),
        }
    }
}

impl<R: LineSource, W: Write> PlayerController for HumanPlayer<R, W> {
    fn player(&self) -> Player {
        self.player
    }

    fn choose_move(&mut self, board: &Board) -> Result<usize, GameError> {
        if board.is_full() {
            return Err(GameError::NoMoves);
        }
        match self.ask(board) {
            Ok(Some(column)) => Ok(column),
            Ok(None) => Err(self.failed("input ended")),
            Err(err) => Err(self.failed(err)),
        }
    }

    fn name(&self) -> &str {
        "human"
    }
}
