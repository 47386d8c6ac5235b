use core::ops::Index;
use std::collections::VecDeque;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cell-level effect of a reveal, before any game-state decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellReveal {
    /// Target was already revealed or is flagged.
    NoChange,
    /// Target was safe; `opened` counts it plus every flood-filled cell.
    Safe { opened: CellCount },
    /// Target was a mine, it alone got revealed.
    Mine,
}

/// Rectangular minefield with per-cell reveal and flag state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    revealed_safe: CellCount,
    flagged_count: CellCount,
}

impl Board {
    /// Board of the configured shape without any mine.
    pub fn empty(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cells: Array2::default(config.size().to_nd_index()),
            mine_count: 0,
            revealed_safe: 0,
            flagged_count: 0,
        })
    }

    /// Builds a board from explicit mine positions, duplicates are counted once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        let mut board = Self {
            cells: Array2::default(size.to_nd_index()),
            mine_count: 0,
            revealed_safe: 0,
            flagged_count: 0,
        };

        for &coords in mine_coords {
            let coords = board.validate_coords(coords)?;
            board.place_mine(coords);
        }
        if board.mine_count >= board.total_cells() {
            return Err(GameError::TooManyMines);
        }

        board.compute_adjacency();
        Ok(board)
    }

    /// Marks `coords` as a mine, returns `false` when it already was one.
    pub(crate) fn place_mine(&mut self, coords: Coord2) -> bool {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_mine {
            return false;
        }
        cell.is_mine = true;
        self.mine_count += 1;
        true
    }

    pub(crate) fn compute_adjacency(&mut self) {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                let count = if self[coords].is_mine {
                    0
                } else {
                    self.count_adjacent_mines(coords)
                };
                self.cells[coords.to_nd_index()].adjacent_mines = count;
            }
        }
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count()
            .try_into()
            .unwrap_or(u8::MAX)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        )
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn get(&self, coords: Coord2) -> Option<Cell> {
        self.cells.get(coords.to_nd_index()).copied()
    }

    /// Win condition: every non-mine cell is revealed, flags are irrelevant.
    pub fn all_safe_revealed(&self) -> bool {
        self.revealed_safe == self.safe_cell_count()
    }

    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .indexed_iter()
            .filter(|(_, cell)| cell.is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors(coords, self.size())
    }

    /// Reveals one cell; a safe zero cell flood-fills outwards.
    ///
    /// Revealed or flagged targets are left untouched. The fill stops at
    /// revealed, flagged and mined cells, so mines are only ever revealed by
    /// a direct hit.
    pub fn reveal_cell(&mut self, coords: Coord2) -> Result<CellReveal> {
        let coords = self.validate_coords(coords)?;
        let cell = self[coords];

        if !cell.is_revealable() {
            return Ok(CellReveal::NoChange);
        }

        if cell.is_mine {
            self.cells[coords.to_nd_index()].is_revealed = true;
            log::debug!("Revealed mine at {:?}", coords);
            return Ok(CellReveal::Mine);
        }

        self.open_safe(coords);
        let mut opened: CellCount = 1;
        log::debug!("Open cell at {:?}, mine count: {}", coords, cell.adjacent_mines);

        if cell.adjacent_mines == 0 {
            let mut to_visit: VecDeque<_> = self.fill_candidates(coords).collect();
            log::trace!("Starting flood-fill from {:?}, initial neighbors: {:?}", coords, to_visit);

            while let Some(visit_coords) = to_visit.pop_front() {
                // queued more than once before being opened
                if !self[visit_coords].is_revealable() {
                    continue;
                }

                self.open_safe(visit_coords);
                opened += 1;
                log::trace!(
                    "Flood opened cell at {:?}, mine count: {}",
                    visit_coords,
                    self[visit_coords].adjacent_mines
                );

                if self[visit_coords].adjacent_mines == 0 {
                    to_visit.extend(self.fill_candidates(visit_coords));
                }
            }
        }

        Ok(CellReveal::Safe { opened })
    }

    /// Toggles the flag on an unrevealed cell.
    pub fn flag_cell(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        Ok(MarkOutcome::Changed)
    }

    fn open_safe(&mut self, coords: Coord2) {
        self.cells[coords.to_nd_index()].is_revealed = true;
        self.revealed_safe += 1;
    }

    fn fill_candidates(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_neighbors(coords).filter(|&pos| {
            let cell = self[pos];
            cell.is_revealable() && !cell.is_mine
        })
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn adjacency_counts_match_neighbourhood() {
        let board = board((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(board[(1, 1)].adjacent_mines, 2);
        assert_eq!(board[(0, 1)].adjacent_mines, 1);
        assert_eq!(board[(0, 2)].adjacent_mines, 0);
        assert_eq!(board[(2, 0)].adjacent_mines, 0);
        assert_eq!(board.mine_count(), 2);
    }

    #[test]
    fn duplicate_mine_coords_are_counted_once() {
        let board = board((2, 2), &[(0, 0), (0, 0)]);
        assert_eq!(board.mine_count(), 1);
        assert_eq!(board.safe_cell_count(), 3);
    }

    #[test]
    fn out_of_range_coords_are_rejected() {
        assert_eq!(
            Board::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
        let mut board = board((2, 2), &[(0, 0)]);
        assert_eq!(board.reveal_cell((0, 5)), Err(GameError::InvalidCoords));
        assert_eq!(board.flag_cell((5, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn full_board_is_rejected() {
        assert_eq!(
            Board::from_mine_coords((1, 2), &[(0, 0), (0, 1)]),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn flood_fill_opens_zero_region_and_its_border() {
        let mut board = board((3, 3), &[(2, 2)]);

        let reveal = board.reveal_cell((0, 0)).unwrap();

        assert_eq!(reveal, CellReveal::Safe { opened: 8 });
        assert!(board[(0, 0)].is_open_zero());
        assert!(board[(1, 1)].is_revealed);
        assert_eq!(board[(1, 1)].adjacent_mines, 1);
        assert!(!board[(2, 2)].is_revealed);
        assert!(board.all_safe_revealed());
    }

    #[test]
    fn flood_fill_stops_at_flags() {
        let mut board = board((1, 5), &[(0, 4)]);
        board.flag_cell((0, 2)).unwrap();

        let reveal = board.reveal_cell((0, 0)).unwrap();

        assert_eq!(reveal, CellReveal::Safe { opened: 2 });
        assert!(!board[(0, 2)].is_revealed);
        assert!(!board[(0, 3)].is_revealed);
    }

    #[test]
    fn numbered_cell_does_not_cascade() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(
            board.reveal_cell((1, 1)).unwrap(),
            CellReveal::Safe { opened: 1 }
        );
        assert_eq!(board.revealed_safe_count(), 1);
    }

    #[test]
    fn mine_reveal_does_not_cascade() {
        let mut board = board((3, 3), &[(1, 1)]);

        assert_eq!(board.reveal_cell((1, 1)).unwrap(), CellReveal::Mine);
        assert!(board[(1, 1)].is_revealed);
        assert_eq!(board.revealed_safe_count(), 0);
    }

    #[test]
    fn flagged_and_revealed_cells_ignore_reveal() {
        let mut board = board((2, 2), &[(0, 0)]);

        board.flag_cell((0, 0)).unwrap();
        assert_eq!(board.reveal_cell((0, 0)).unwrap(), CellReveal::NoChange);

        board.reveal_cell((1, 1)).unwrap();
        assert_eq!(board.reveal_cell((1, 1)).unwrap(), CellReveal::NoChange);
    }

    #[test]
    fn flag_toggles_and_ignores_revealed_cells() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.flag_cell((0, 1)).unwrap(), MarkOutcome::Changed);
        assert!(board[(0, 1)].is_flagged);
        assert_eq!(board.flagged_count(), 1);

        assert_eq!(board.flag_cell((0, 1)).unwrap(), MarkOutcome::Changed);
        assert!(!board[(0, 1)].is_flagged);
        assert_eq!(board.flagged_count(), 0);

        board.reveal_cell((1, 1)).unwrap();
        assert_eq!(board.flag_cell((1, 1)).unwrap(), MarkOutcome::NoChange);
        assert!(!board[(1, 1)].is_flagged);
    }
}
