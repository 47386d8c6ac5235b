use std::time::Duration;

use crate::*;

/// A timed game at one difficulty.
///
/// The timer starts on the first move that changes the board and stops on the
/// move that finishes the game.
#[derive(Clone, Debug)]
pub struct Round<C> {
    engine: PlayEngine,
    difficulty: Difficulty,
    clock: C,
    started_at: Option<Duration>,
    ended_at: Option<Duration>,
}

impl<C: Clock> Round<C> {
    pub fn new(difficulty: Difficulty, seed: u64, clock: C) -> Result<Self> {
        let board = initialize_board(difficulty.board(), seed)?;
        Ok(Self::with_board(difficulty, board, clock))
    }

    pub fn with_board(difficulty: Difficulty, board: Board, clock: C) -> Self {
        Self {
            engine: PlayEngine::new(board),
            difficulty,
            clock,
            started_at: None,
            ended_at: None,
        }
    }

    /// Replaces the board with a fresh one, possibly at another difficulty.
    pub fn restart(&mut self, difficulty: Difficulty, seed: u64) -> Result<()> {
        let board = initialize_board(difficulty.board(), seed)?;
        self.engine.reset(board);
        self.difficulty = difficulty;
        self.started_at = None;
        self.ended_at = None;
        Ok(())
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whole seconds since the first move, frozen once the game ends.
    pub fn elapsed_secs(&self) -> u64 {
        match self.started_at {
            Some(started_at) => {
                let end = self.ended_at.unwrap_or_else(|| self.clock.now());
                end.saturating_sub(started_at).as_secs()
            }
            None => 0,
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let outcome = self.engine.reveal(coords)?;
        if outcome.has_update() {
            self.mark_move();
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let outcome = self.engine.toggle_flag(coords)?;
        if outcome.has_update() {
            self.mark_move();
        }
        Ok(outcome)
    }

    fn mark_move(&mut self) {
        let now = self.clock.now();
        self.started_at.get_or_insert(now);
        if self.engine.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
            log::debug!(
                "{} game ended {:?} after {}s",
                self.difficulty,
                self.engine.state(),
                self.elapsed_secs()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month};

    fn clock() -> ManualClock {
        ManualClock::new(Date::from_calendar_date(2026, Month::October, 19).unwrap())
    }

    #[test]
    fn timer_runs_from_first_move_to_end() {
        let clock = clock();
        let board = Board::from_mine_coords((1, 3), &[(0, 0)]).unwrap();
        let mut round = Round::with_board(Difficulty::Easy, board, &clock);

        clock.advance_secs(10);
        assert_eq!(round.elapsed_secs(), 0);

        round.reveal((0, 1)).unwrap();
        clock.advance_secs(25);
        assert_eq!(round.elapsed_secs(), 25);

        assert_eq!(round.reveal((0, 2)).unwrap(), RevealOutcome::Won);
        clock.advance_secs(100);
        assert_eq!(round.elapsed_secs(), 25);
    }

    #[test]
    fn only_effective_moves_start_timer() {
        let clock = clock();
        let board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut round = Round::with_board(Difficulty::Easy, board, &clock);

        assert_eq!(round.reveal((5, 5)), Err(GameError::InvalidCoords));
        clock.advance_secs(5);
        assert_eq!(round.elapsed_secs(), 0);

        assert_eq!(round.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        clock.advance_secs(5);
        assert_eq!(round.elapsed_secs(), 5);
    }

    #[test]
    fn restart_changes_difficulty_and_resets_timer() {
        let clock = clock();
        let mut round = Round::new(Difficulty::Easy, 7, &clock).unwrap();
        let safe = (0..9)
            .flat_map(|row| (0..9).map(move |col| (row, col)))
            .find(|&pos| !round.engine().board()[pos].is_mine)
            .unwrap();
        round.reveal(safe).unwrap();
        clock.advance_secs(3);

        round.restart(Difficulty::Hard, 8).unwrap();

        assert_eq!(round.difficulty(), Difficulty::Hard);
        assert_eq!(round.engine().size(), (16, 30));
        assert_eq!(round.elapsed_secs(), 0);
        assert_eq!(round.state(), GameState::Playing);
    }
}
