use time::Date;

use crate::*;

/// Result of reporting a minesweeper win.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WinReward {
    Granted { event: RewardEvent, plays_today: u32 },
    /// Coins were granted but the play count could not be stored.
    Uncounted { event: RewardEvent, reason: RewardError },
    /// Win acknowledged without coins; the counter was left alone.
    CapReached { plays_today: u32 },
}

/// Grants minesweeper wins subject to the daily cap.
#[derive(Clone, Debug)]
pub struct GameRewards<S> {
    counter: DailyPlayCounter<S>,
    max_daily_plays: u32,
}

impl<S: CounterStore> GameRewards<S> {
    pub fn new(store: S, config: &RewardConfig) -> Self {
        Self {
            counter: DailyPlayCounter::new(store),
            max_daily_plays: config.max_daily_plays,
        }
    }

    pub fn max_daily_plays(&self) -> u32 {
        self.max_daily_plays
    }

    pub fn counter(&self) -> &DailyPlayCounter<S> {
        &self.counter
    }

    pub fn into_store(self) -> S {
        self.counter.into_store()
    }

    pub fn plays_left(&self, user: &str, today: Date) -> RewardResult<u32> {
        let plays = self.counter.plays(user, Activity::Minesweeper, today)?;
        Ok(self.max_daily_plays.saturating_sub(plays))
    }

    /// Checks the cap, grants the reward, then counts the play.
    ///
    /// The counter only moves after `grant` succeeded; a failed grant is
    /// returned and the play stays uncounted. Once coins are granted a store
    /// failure no longer makes the call fail, it yields `WinReward::Uncounted`.
    pub fn record_win<G: RewardGrant + ?Sized>(
        &mut self,
        grant: &mut G,
        user: &str,
        difficulty: Difficulty,
        elapsed_secs: u64,
        today: Date,
    ) -> RewardResult<WinReward> {
        let plays_today = self.counter.plays(user, Activity::Minesweeper, today)?;
        if plays_today >= self.max_daily_plays {
            log::info!(
                "{} already has {} rewarded wins today, no coins granted",
                user,
                plays_today
            );
            return Ok(WinReward::CapReached { plays_today });
        }

        let event = RewardEvent {
            amount: minesweeper_reward(difficulty, elapsed_secs),
            description: format!("Minesweeper win ({difficulty}, {elapsed_secs}s)"),
        };
        deliver_reward(grant, user, &event)?;

        match self.counter.increment(user, Activity::Minesweeper, today) {
            Ok(plays_today) => Ok(WinReward::Granted { event, plays_today }),
            Err(reason) => {
                log::warn!(
                    "{} was granted {} coins but the win was not counted: {}",
                    user,
                    event.amount,
                    reason
                );
                Ok(WinReward::Uncounted { event, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[derive(Default)]
    struct CountingGrant {
        calls: u32,
        fail: bool,
    }

    impl RewardGrant for CountingGrant {
        fn grant_reward(&mut self, user: &str, amount: u32, _: &str) -> RewardResult<()> {
            self.calls += 1;
            if self.fail {
                Err(RewardError::GrantFailed {
                    user: user.to_string(),
                    amount,
                    reason: "backend unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    struct ReadOnlyStore;

    impl CounterStore for ReadOnlyStore {
        fn get_counter(&self, _: &str) -> RewardResult<u32> {
            Ok(0)
        }

        fn set_counter(&mut self, _: &str, _: u32) -> RewardResult<()> {
            Err(RewardError::Store("read-only".to_string()))
        }
    }

    fn today() -> Date {
        Date::from_calendar_date(2026, Month::October, 19).unwrap()
    }

    #[test]
    fn win_past_cap_is_not_granted_or_counted() {
        let config = RewardConfig::default();
        let mut rewards = GameRewards::new(MemoryCounterStore::new(), &config);
        let mut grant = CountingGrant::default();

        for n in 1..=config.max_daily_plays {
            let reward = rewards
                .record_win(&mut grant, "anne", Difficulty::Easy, 30, today())
                .unwrap();
            assert!(matches!(reward, WinReward::Granted { plays_today, .. } if plays_today == n));
        }

        let reward = rewards
            .record_win(&mut grant, "anne", Difficulty::Easy, 30, today())
            .unwrap();

        assert_eq!(
            reward,
            WinReward::CapReached {
                plays_today: config.max_daily_plays
            }
        );
        assert_eq!(grant.calls, config.max_daily_plays);
        assert_eq!(
            rewards.counter().plays("anne", Activity::Minesweeper, today()),
            Ok(config.max_daily_plays)
        );
        assert_eq!(rewards.plays_left("anne", today()), Ok(0));
    }

    #[test]
    fn failed_grant_leaves_counter_untouched() {
        let mut rewards = GameRewards::new(MemoryCounterStore::new(), &RewardConfig::default());
        let mut grant = CountingGrant {
            fail: true,
            ..Default::default()
        };

        let err = rewards
            .record_win(&mut grant, "anne", Difficulty::Medium, 10, today())
            .unwrap_err();

        assert!(matches!(err, RewardError::GrantFailed { amount: 19, .. }));
        assert_eq!(rewards.plays_left("anne", today()), Ok(3));
    }

    #[test]
    fn store_failure_after_grant_keeps_the_coins() {
        let mut rewards = GameRewards::new(ReadOnlyStore, &RewardConfig::default());
        let mut ledger = Ledger::new();

        let reward = rewards
            .record_win(&mut ledger, "anne", Difficulty::Easy, 30, today())
            .unwrap();

        let WinReward::Uncounted { event, reason } = reward else {
            panic!("expected an uncounted win, got {reward:?}");
        };
        assert_eq!(event.amount, 14);
        assert_eq!(reason, RewardError::Store("read-only".to_string()));
        assert_eq!(ledger.balance("anne"), 14);
    }

    #[test]
    fn reward_amount_includes_time_bonus() {
        let mut rewards = GameRewards::new(MemoryCounterStore::new(), &RewardConfig::default());
        let mut ledger = Ledger::new();

        let reward = rewards
            .record_win(&mut ledger, "anne", Difficulty::Easy, 30, today())
            .unwrap();

        let WinReward::Granted { event, .. } = reward else {
            panic!("expected a grant, got {reward:?}");
        };
        assert_eq!(event.amount, 14);
        assert_eq!(ledger.balance("anne"), 14);
    }

    #[test]
    fn custom_cap_is_honoured() {
        let config = RewardConfig {
            max_daily_plays: 5,
            ..Default::default()
        };
        let mut rewards = GameRewards::new(MemoryCounterStore::new(), &config);
        let mut ledger = Ledger::new();

        for _ in 0..6 {
            rewards
                .record_win(&mut ledger, "anne", Difficulty::Easy, 400, today())
                .unwrap();
        }

        assert_eq!(ledger.balance("anne"), 5 * 5);
    }
}
