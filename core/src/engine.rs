use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Cell-interaction state machine over one board.
///
/// Moves on a finished game, or on cells that do not accept them, are ignored
/// and reported as `NoChange`. Only out-of-range coordinates are errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    board: Board,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl PlayEngine {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            state: GameState::Playing,
            triggered_mine: None,
        }
    }

    /// Discards the current game and starts playing on `board`.
    pub fn reset(&mut self, board: Board) {
        *self = Self::new(board);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    /// Unflagged mine estimate, negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.board.flagged_count() as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        self.board.get(coords).ok_or(GameError::InvalidCoords)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// All mine positions, for presentation after a loss.
    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.board.mine_positions()
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() {
            log::debug!("Ignoring reveal at {:?}, game is {:?}", coords, self.state);
            return Ok(RevealOutcome::NoChange);
        }

        Ok(match self.board.reveal_cell(coords)? {
            CellReveal::NoChange => RevealOutcome::NoChange,
            CellReveal::Mine => {
                self.triggered_mine = Some(coords);
                self.state = GameState::Lost;
                RevealOutcome::HitMine
            }
            CellReveal::Safe { .. } if self.board.all_safe_revealed() => {
                self.state = GameState::Won;
                RevealOutcome::Won
            }
            CellReveal::Safe { .. } => RevealOutcome::Revealed,
        })
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_finished() {
            log::debug!("Ignoring flag at {:?}, game is {:?}", coords, self.state);
            return Ok(MarkOutcome::NoChange);
        }

        self.board.flag_cell(coords)
    }
}
