use serde::{Deserialize, Serialize};

/// One board position.
///
/// A flagged cell cannot be revealed directly; once revealed, the flag is ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Mines in the 8-neighbourhood, only meaningful for non-mine cells.
    pub adjacent_mines: u8,
}

impl Cell {
    /// Whether a direct reveal click would act on this cell.
    pub const fn is_revealable(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    /// Whether this cell takes part in the flood fill past itself.
    pub const fn is_open_zero(self) -> bool {
        self.is_revealed && !self.is_mine && self.adjacent_mines == 0
    }
}
