use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Complete state of one game: cell contents, what the player has uncovered or flagged, and whether a mine went off.
///
/// Mutators never fail. Anything that cannot apply (out of range, already revealed, flagged) is a
/// [`RevealOutcome::NoChange`] or [`MarkOutcome::NoChange`]. The board does not lock itself once the
/// game is decided, callers stop when [`Board::status`] is final.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    content: Array2<CellContent>,
    cells: Array2<CellState>,
    mine_count: CellCount,
    game_over: bool,
}

impl Board {
    pub fn new(layout: MineLayout) -> Self {
        let size = layout.size();
        let mut content: Array2<CellContent> = Array2::default((size, size).to_nd_index());

        for coords in layout.iter_mines() {
            content[coords.to_nd_index()] = CellContent::Mine;
        }
        for ((row, col), cell) in content.indexed_iter_mut() {
            if !cell.is_mine() {
                *cell = CellContent::Hint(layout.adjacent_mine_count((row as Coord, col as Coord)));
            }
        }

        Self {
            content,
            cells: Array2::default((size, size).to_nd_index()),
            mine_count: layout.mine_count(),
            game_over: false,
        }
    }

    pub fn generate(config: GameConfig, generator: impl MineGenerator) -> Self {
        Self::new(generator.generate(config))
    }

    pub fn size(&self) -> Coord {
        self.content.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_flagged())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn content_at(&self, coords: Coord2) -> CellContent {
        self.content[coords.to_nd_index()]
    }

    pub fn state_at(&self, coords: Coord2) -> CellState {
        self.cells[coords.to_nd_index()]
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_game_won(&self) -> bool {
        self.content
            .iter()
            .zip(self.cells.iter())
            .all(|(content, state)| content.is_mine() || state.is_revealed())
    }

    pub fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::Lost
        } else if self.is_game_won() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    pub fn reveal(&mut self, row: isize, col: isize) -> RevealOutcome {
        let Some(coords) = locate(row, col, self.size()) else {
            return RevealOutcome::NoChange;
        };
        if !matches!(self.cells[coords.to_nd_index()], CellState::Hidden) {
            return RevealOutcome::NoChange;
        }

        self.cells[coords.to_nd_index()] = CellState::Revealed;

        match self.content[coords.to_nd_index()] {
            CellContent::Mine => {
                log::debug!("Hit mine at {:?}", coords);
                self.game_over = true;
                self.reveal_mines();
                return RevealOutcome::HitMine;
            }
            CellContent::Hint(0) => self.flood_fill(coords),
            CellContent::Hint(count) => {
                log::debug!("Revealed cell at {:?}, mine count: {}", coords, count);
            }
        }

        if self.is_game_won() {
            log::debug!("All safe cells revealed");
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    pub fn flag(&mut self, row: isize, col: isize) -> MarkOutcome {
        self.set_flag(row, col, true)
    }

    pub fn unflag(&mut self, row: isize, col: isize) -> MarkOutcome {
        self.set_flag(row, col, false)
    }

    pub fn render_state(&self) -> BoardView {
        BoardView::new(Array2::from_shape_fn(self.cells.raw_dim(), |index| {
            match (self.cells[index], self.content[index]) {
                (CellState::Revealed, CellContent::Mine) => Glyph::Mine,
                (CellState::Revealed, CellContent::Hint(count)) => Glyph::Hint(count),
                (CellState::Flagged, _) => Glyph::Flag,
                (CellState::Hidden, _) => Glyph::Hidden,
            }
        }))
    }

    fn set_flag(&mut self, row: isize, col: isize, flagged: bool) -> MarkOutcome {
        let Some(coords) = locate(row, col, self.size()) else {
            return MarkOutcome::NoChange;
        };

        let next = if flagged {
            CellState::Flagged
        } else {
            CellState::Hidden
        };
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_revealed() || *cell == next {
            return MarkOutcome::NoChange;
        }

        *cell = next;
        MarkOutcome::Changed
    }

    /// Opens the region around an already revealed zero cell at `origin`.
    fn flood_fill(&mut self, origin: Coord2) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self.content.iter_neighbors(origin).collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            // flagged cells block the fill, revealed ones were handled already
            if !matches!(self.cells[coords.to_nd_index()], CellState::Hidden) {
                continue;
            }

            self.cells[coords.to_nd_index()] = CellState::Revealed;
            let content = self.content[coords.to_nd_index()];
            log::trace!("Flood revealed cell at {:?}, content: {:?}", coords, content);

            if content == CellContent::Hint(0) {
                to_visit.extend(
                    self.content
                        .iter_neighbors(coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn reveal_mines(&mut self) {
        for (cell, content) in self.cells.iter_mut().zip(self.content.iter()) {
            if content.is_mine() {
                *cell = CellState::Revealed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord, mines: &[Coord2]) -> Board {
        Board::new(MineLayout::from_mine_coords(size, mines).unwrap())
    }

    fn revealed(board: &Board) -> BTreeSet<Coord2> {
        board
            .cells
            .indexed_iter()
            .filter(|(_, state)| state.is_revealed())
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    #[test]
    fn hints_count_neighboring_mines() {
        let board = board(3, &[(0, 0), (2, 2)]);

        assert_eq!(board.content_at((0, 0)), CellContent::Mine);
        assert_eq!(board.content_at((1, 1)), CellContent::Hint(2));
        assert_eq!(board.content_at((0, 2)), CellContent::Hint(0));
        assert_eq!(board.content_at((2, 1)), CellContent::Hint(1));
    }

    #[test]
    fn flood_fill_opens_zero_region_and_its_border() {
        // mines down the right column, zero region is the left two columns
        let mut board = board(5, &[(0, 4), (2, 4), (4, 4)]);

        assert_eq!(board.reveal(2, 0), RevealOutcome::Revealed);

        let expected: BTreeSet<Coord2> = (0..5)
            .flat_map(|row| (0..4).map(move |col| (row, col)))
            .collect();
        assert_eq!(revealed(&board), expected);
        assert_eq!(board.state_at((1, 4)), CellState::Hidden);
        assert_eq!(board.state_at((3, 4)), CellState::Hidden);
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut board = board(3, &[(2, 2)]);

        board.flag(0, 2);
        board.reveal(0, 0);

        assert_eq!(board.state_at((0, 2)), CellState::Flagged);
        assert_eq!(board.state_at((1, 1)), CellState::Revealed);
        assert!(!board.is_game_won());
    }

    #[test]
    fn revealing_mine_ends_game_and_shows_all_mines() {
        let mut board = board(5, &[(0, 0), (3, 3), (4, 1)]);
        board.flag(4, 1);

        assert_eq!(board.reveal(3, 3), RevealOutcome::HitMine);

        assert!(board.is_game_over());
        assert_eq!(board.status(), GameStatus::Lost);
        for mine in [(0, 0), (3, 3), (4, 1)] {
            assert_eq!(board.state_at(mine), CellState::Revealed);
        }
        assert_eq!(board.state_at((2, 2)), CellState::Hidden);
    }

    #[test]
    fn won_once_every_safe_cell_is_revealed() {
        let mines = [(0, 0), (2, 3), (4, 4)];
        let mut board = board(5, &mines);
        board.flag(0, 0);

        let mut last = RevealOutcome::NoChange;
        for row in 0..5 {
            for col in 0..5 {
                if !mines.contains(&(row as Coord, col as Coord)) {
                    let outcome = board.reveal(row, col);
                    if outcome.has_update() {
                        last = outcome;
                    }
                }
            }
        }

        assert_eq!(last, RevealOutcome::Won);
        assert!(board.is_game_won());
        assert!(!board.is_game_over());
        assert_eq!(board.status(), GameStatus::Won);
        assert_eq!(board.state_at((2, 3)), CellState::Hidden);
    }

    #[test]
    fn flagged_cell_is_immune_to_reveal_until_unflagged() {
        let mut board = board(3, &[(0, 0)]);

        assert_eq!(board.flag(1, 1), MarkOutcome::Changed);
        assert_eq!(board.reveal(1, 1), RevealOutcome::NoChange);
        assert_eq!(board.state_at((1, 1)), CellState::Flagged);
        assert_eq!(board.status(), GameStatus::InProgress);

        assert_eq!(board.unflag(1, 1), MarkOutcome::Changed);
        assert_eq!(board.reveal(1, 1), RevealOutcome::Revealed);
        assert_eq!(board.state_at((1, 1)), CellState::Revealed);
        assert_eq!(board.state_at((2, 2)), CellState::Hidden);
    }

    #[test]
    fn unflagged_zero_cell_floods_to_a_win() {
        let mut board = board(3, &[(0, 0)]);
        board.flag(2, 2);
        board.unflag(2, 2);

        assert_eq!(board.reveal(2, 2), RevealOutcome::Won);
        assert_eq!(board.status(), GameStatus::Won);
        assert_eq!(board.state_at((0, 0)), CellState::Hidden);
    }

    #[test]
    fn out_of_range_calls_are_no_ops() {
        let mut board = board(5, &[(1, 1)]);
        let before = board.clone();

        for (row, col) in [(-1, 0), (0, -1), (5, 0), (0, 5), (isize::MIN, isize::MAX)] {
            assert_eq!(board.reveal(row, col), RevealOutcome::NoChange);
            assert_eq!(board.flag(row, col), MarkOutcome::NoChange);
            assert_eq!(board.unflag(row, col), MarkOutcome::NoChange);
        }

        assert_eq!(board, before);
    }

    #[test]
    fn flag_on_revealed_cell_is_ignored() {
        let mut board = board(3, &[(0, 0)]);
        board.reveal(1, 1);

        assert_eq!(board.flag(1, 1), MarkOutcome::NoChange);
        assert_eq!(board.unflag(1, 1), MarkOutcome::NoChange);
        assert_eq!(board.state_at((1, 1)), CellState::Revealed);
        assert_eq!(board.flag_count(), 0);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = board(3, &[(0, 0)]);
        board.reveal(1, 1);
        let before = board.clone();

        assert_eq!(board.reveal(1, 1), RevealOutcome::NoChange);
        assert_eq!(board, before);
    }

    #[test]
    fn repeated_flag_and_unflag_report_no_change() {
        let mut board = board(3, &[(0, 0)]);

        assert_eq!(board.unflag(1, 1), MarkOutcome::NoChange);
        assert_eq!(board.flag(1, 1), MarkOutcome::Changed);
        assert_eq!(board.flag(1, 1), MarkOutcome::NoChange);
        assert_eq!(board.flag_count(), 1);
    }

    #[test]
    fn render_hides_unrevealed_mines() {
        let mut board = board(2, &[(0, 0)]);
        board.flag(0, 1);
        board.reveal(1, 1);

        let view = board.render_state();
        assert_eq!(view.glyph_at((0, 0)), Glyph::Hidden);
        assert_eq!(view.glyph_at((0, 1)), Glyph::Flag);
        assert_eq!(view.glyph_at((1, 1)), Glyph::Hint(1));

        board.reveal(0, 0);
        assert_eq!(board.render_state().glyph_at((0, 0)), Glyph::Mine);
    }
}
