use super::*;

/// Purely random placement: uniform `(row, col)` draws, redrawing on cells that already hold a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        use rand::prelude::*;

        let mut board = Board::empty(config)?;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        // terminates because validation keeps at least one safe cell
        let mut draws: u32 = 0;
        let mut mines_placed: CellCount = 0;
        while mines_placed < config.mines {
            let coords = (
                rng.random_range(0..config.rows),
                rng.random_range(0..config.cols),
            );
            draws += 1;
            if board.place_mine(coords) {
                mines_placed += 1;
            }
        }
        log::trace!(
            "Placed {} mines on {}x{} with {} draws",
            mines_placed,
            config.rows,
            config.cols,
            draws
        );

        board.compute_adjacency();

        // double check mine count
        if board.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                board.mine_count(),
                config.mines
            );
        }
        Ok(board)
    }
}
