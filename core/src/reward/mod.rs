use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

pub use daily::*;
pub use game::*;
pub use ledger::*;
pub use policy::*;
pub use scheduler::*;

mod daily;
mod game;
mod ledger;
mod policy;
mod scheduler;

/// Reward-earning activity, also the activity segment of daily counter keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    Watch,
    Minesweeper,
}

impl Activity {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Watch => "watch",
            Self::Minesweeper => "minesweeper",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coins to credit, with the line shown in the transaction log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub amount: u32,
    pub description: String,
}

/// Balance-update collaborator, wired by the application to its persistence layer.
pub trait RewardGrant {
    fn grant_reward(&mut self, user: &str, amount: u32, description: &str) -> RewardResult<()>;
}

impl<G: RewardGrant + ?Sized> RewardGrant for &mut G {
    fn grant_reward(&mut self, user: &str, amount: u32, description: &str) -> RewardResult<()> {
        (**self).grant_reward(user, amount, description)
    }
}

/// Hands `event` to `grant`, logging the outcome.
///
/// A failed grant is returned as is; nothing local is rolled back and nothing is retried.
pub fn deliver_reward<G: RewardGrant + ?Sized>(
    grant: &mut G,
    user: &str,
    event: &RewardEvent,
) -> RewardResult<()> {
    match grant.grant_reward(user, event.amount, &event.description) {
        Ok(()) => {
            log::info!("Granted {} coins to {}: {}", event.amount, user, event.description);
            Ok(())
        }
        Err(err) => {
            log::warn!("Reward for {} not recorded: {}", user, err);
            Err(err)
        }
    }
}
