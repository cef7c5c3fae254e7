use pocketmines_core::Coord;
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Reveal,
    Flag,
    Unflag,
}

impl Action {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "r" => Some(Self::Reveal),
            "f" => Some(Self::Flag),
            "u" => Some(Self::Unflag),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Please enter an action followed by row and column, e.g. r 1 2.")]
    MissingFields,
    #[error("Unexpected input after the column: {0:?}.")]
    TrailingInput(String),
    #[error("Invalid number {0:?}. Row and column must be whole numbers.")]
    InvalidNumber(String),
    #[error("Invalid input. Please enter values within the range 0 to {max}.")]
    OutOfRange { max: Coord },
    #[error("Invalid action. Please enter 'r' to reveal, 'f' to flag, or 'u' to unflag.")]
    UnknownAction(String),
}

/// One player turn, `<action> <row> <col>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub row: isize,
    pub col: isize,
}

impl Command {
    /// Parses a line for a board of side `size`.
    ///
    /// Coordinates are range checked before the action token, so `x 9 9` reports the range problem.
    pub fn parse(line: &str, size: Coord) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let (Some(action), Some(row), Some(col)) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(CommandError::MissingFields);
        };
        if let Some(extra) = tokens.next() {
            return Err(CommandError::TrailingInput(extra.to_owned()));
        }

        let row = parse_index(row)?;
        let col = parse_index(col)?;
        let in_range = |value: isize| (0..isize::from(size)).contains(&value);
        if !in_range(row) || !in_range(col) {
            return Err(CommandError::OutOfRange {
                max: size.saturating_sub(1),
            });
        }

        let action = Action::from_token(action)
            .ok_or_else(|| CommandError::UnknownAction(action.to_owned()))?;

        Ok(Self { action, row, col })
    }
}

fn parse_index(token: &str) -> Result<isize, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::InvalidNumber(token.to_owned()))
}
