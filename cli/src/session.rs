use std::io::{self, BufRead, Write};

use pocketmines_core::{Board, MarkOutcome, RevealOutcome};

use crate::command::{Action, Command};

const PROMPT: &str = "Enter 'r' to reveal, 'f' to flag, or 'u' to unflag, followed by row and column (e.g., r 1 2, f 1 2, or u 1 2): ";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Won,
    Lost,
    /// Input ran out before the game was decided.
    Abandoned,
}

/// Line-oriented game loop: draw the board, read a command, apply it, until the board is decided.
pub struct Session<R, W> {
    board: Board,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(board: Board, input: R, output: W) -> Self {
        Self {
            board,
            input,
            output,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn run(&mut self) -> io::Result<SessionEnd> {
        let mut line = String::new();

        while !self.board.is_game_over() && !self.board.is_game_won() {
            write!(self.output, "{}", self.board.render_state())?;
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                log::info!("Input closed before the game ended");
                writeln!(self.output)?;
                writeln!(self.output, "No more input, game abandoned.")?;
                return Ok(SessionEnd::Abandoned);
            }
            if line.trim().is_empty() {
                continue;
            }

            match Command::parse(&line, self.board.size()) {
                Ok(command) => self.apply(command),
                Err(err) => {
                    log::debug!("Rejected input {:?}: {}", line.trim_end(), err);
                    writeln!(self.output, "{}", err)?;
                }
            }
        }

        write!(self.output, "{}", self.board.render_state())?;
        let end = if self.board.is_game_won() && !self.board.is_game_over() {
            writeln!(self.output, "Congratulations! You've won the game!")?;
            SessionEnd::Won
        } else {
            writeln!(self.output, "Game Over! You hit a mine.")?;
            SessionEnd::Lost
        };
        self.output.flush()?;
        Ok(end)
    }

    fn apply(&mut self, Command { action, row, col }: Command) {
        match action {
            Action::Reveal => {
                let outcome = self.board.reveal(row, col);
                if outcome == RevealOutcome::NoChange {
                    log::debug!("Reveal at ({}, {}) had no effect", row, col);
                }
            }
            Action::Flag | Action::Unflag => {
                let outcome = if action == Action::Flag {
                    self.board.flag(row, col)
                } else {
                    self.board.unflag(row, col)
                };
                if outcome == MarkOutcome::NoChange {
                    log::debug!("{:?} at ({}, {}) had no effect", action, row, col);
                }
            }
        }
    }
}
