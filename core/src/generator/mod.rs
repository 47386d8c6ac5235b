use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}

/// Fresh board for `config` with uniformly placed mines, reproducible from `seed`.
pub fn initialize_board(config: GameConfig, seed: u64) -> Result<Board> {
    RandomMinefieldGenerator::new(seed).generate(config)
}
