use serde::{Deserialize, Serialize};

use crate::*;

/// Wins slower than this earn no time bonus.
pub const TIME_BONUS_WINDOW_SECS: u64 = 300;

/// One bonus coin per full bucket left in the window.
pub const TIME_BONUS_BUCKET_SECS: u64 = 30;

/// Cadence and size of watch rewards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchPolicy {
    pub interval_secs: u32,
    pub reward_per_interval: u32,
}

impl Default for WatchPolicy {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            reward_per_interval: 3,
        }
    }
}

impl WatchPolicy {
    /// Interval in ticks, never zero.
    pub const fn interval(&self) -> u32 {
        if self.interval_secs == 0 {
            1
        } else {
            self.interval_secs
        }
    }
}

/// Reward tuning shared by every activity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Rewarded minesweeper wins per user and calendar day.
    pub max_daily_plays: u32,
    pub watch: WatchPolicy,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            max_daily_plays: 3,
            watch: WatchPolicy::default(),
        }
    }
}

pub fn time_bonus(elapsed_secs: u64) -> u32 {
    let bonus = TIME_BONUS_WINDOW_SECS.saturating_sub(elapsed_secs) / TIME_BONUS_BUCKET_SECS;
    bonus as u32
}

/// Base reward of the difficulty plus the time bonus.
pub fn minesweeper_reward(difficulty: Difficulty, elapsed_secs: u64) -> u32 {
    difficulty.reward() + time_bonus(elapsed_secs)
}
