use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a front end should draw for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    Hidden,
    Flag,
    Mine,
    Hint(u8),
}

impl Glyph {
    /// Hints outside `0..=9` cannot come from a real board and draw as `?`.
    pub fn as_char(self) -> char {
        match self {
            Self::Hidden => '.',
            Self::Flag => 'F',
            Self::Mine => 'M',
            Self::Hint(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        }
    }
}

/// Snapshot of everything the player can see.
///
/// `Display` draws it with a header of column indices and every row prefixed by its index:
///
/// ```text
///   0 1 2
/// 0 F 0 0
/// 1 1 1 0
/// 2 . 1 0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    glyphs: Array2<Glyph>,
}

impl BoardView {
    pub(crate) fn new(glyphs: Array2<Glyph>) -> Self {
        Self { glyphs }
    }

    pub fn size(&self) -> Coord {
        self.glyphs.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn glyph_at(&self, coords: Coord2) -> Glyph {
        self.glyphs[coords.to_nd_index()]
    }

    pub fn glyphs(&self) -> &Array2<Glyph> {
        &self.glyphs
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("  ")?;
        for col in 0..self.glyphs.ncols() {
            write!(f, "{} ", col)?;
        }
        writeln!(f)?;

        for (row, glyphs) in self.glyphs.rows().into_iter().enumerate() {
            write!(f, "{} ", row)?;
            for glyph in glyphs {
                write!(f, "{} ", glyph.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn displays_header_and_row_indices() {
        let mut board = Board::new(MineLayout::from_mine_coords(3, &[(2, 0)]).unwrap());
        board.flag(0, 0);
        board.reveal(0, 2);

        assert_eq!(
            board.render_state().to_string(),
            "  0 1 2 \n0 F 0 0 \n1 1 1 0 \n2 . 1 0 \n"
        );
    }

    #[test]
    fn glyph_chars_match_printed_board() {
        assert_eq!(Glyph::Hidden.as_char(), '.');
        assert_eq!(Glyph::Flag.as_char(), 'F');
        assert_eq!(Glyph::Mine.as_char(), 'M');
        assert_eq!(Glyph::Hint(8).as_char(), '8');
    }

    #[test]
    fn impossible_hints_draw_as_question_mark() {
        assert_eq!(Glyph::Hint(10).as_char(), '?');
        assert_eq!(Glyph::Hint(u8::MAX).as_char(), '?');
    }
}
