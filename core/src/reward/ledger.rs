use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Earn,
    Spend,
}

/// One row of the transaction log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub user: String,
    pub kind: TransactionKind,
    pub amount: u64,
    pub description: String,
}

/// Coin balances per user plus the log of every movement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    balances: HashMap<String, u64>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, user: &str) -> u64 {
        self.balances.get(user).copied().unwrap_or(0)
    }

    /// Transactions of `user`, oldest first.
    pub fn transactions<'a>(&'a self, user: &'a str) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |tx| tx.user == user)
    }

    /// Deducts `amount`, e.g. to unlock a catalog entry. Returns the new balance.
    pub fn spend(&mut self, user: &str, amount: u64, description: &str) -> RewardResult<u64> {
        let available = self.balance(user);
        if available < amount {
            return Err(RewardError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let balance = available - amount;
        self.balances.insert(user.to_string(), balance);
        self.record(user, TransactionKind::Spend, amount, description);
        Ok(balance)
    }

    fn record(&mut self, user: &str, kind: TransactionKind, amount: u64, description: &str) {
        let id = self.transactions.len() as u64 + 1;
        self.transactions.push(Transaction {
            id,
            user: user.to_string(),
            kind,
            amount,
            description: description.to_string(),
        });
    }
}

impl RewardGrant for Ledger {
    fn grant_reward(&mut self, user: &str, amount: u32, description: &str) -> RewardResult<()> {
        let balance = self.balances.entry(user.to_string()).or_insert(0);
        *balance = balance.saturating_add(u64::from(amount));
        self.record(user, TransactionKind::Earn, u64::from(amount), description);
        Ok(())
    }
}
