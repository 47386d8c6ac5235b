use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::*;

/// Durable integer key-value store holding the daily counters.
pub trait CounterStore {
    /// Missing keys read as 0.
    fn get_counter(&self, key: &str) -> RewardResult<u32>;
    fn set_counter(&mut self, key: &str, value: u32) -> RewardResult<()>;
}

impl<S: CounterStore + ?Sized> CounterStore for &mut S {
    fn get_counter(&self, key: &str) -> RewardResult<u32> {
        (**self).get_counter(key)
    }

    fn set_counter(&mut self, key: &str, value: u32) -> RewardResult<()> {
        (**self).set_counter(key, value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCounterStore {
    counters: HashMap<String, u32>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn get_counter(&self, key: &str) -> RewardResult<u32> {
        Ok(self.counters.get(key).copied().unwrap_or(0))
    }

    fn set_counter(&mut self, key: &str, value: u32) -> RewardResult<()> {
        self.counters.insert(key.to_string(), value);
        Ok(())
    }
}

/// `"{username}_{activity}_{date}"`, date as `YYYY-MM-DD`.
///
/// A new day produces a new key, so counters start again from 0.
pub fn daily_counter_key(user: &str, activity: Activity, date: Date) -> String {
    format!("{user}_{activity}_{date}")
}

/// Per-user, per-day play counts on top of a `CounterStore`.
#[derive(Clone, Debug, Default)]
pub struct DailyPlayCounter<S> {
    store: S,
}

impl<S: CounterStore> DailyPlayCounter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn plays(&self, user: &str, activity: Activity, date: Date) -> RewardResult<u32> {
        self.store.get_counter(&daily_counter_key(user, activity, date))
    }

    /// Bumps and persists the count, returning the new value.
    pub fn increment(&mut self, user: &str, activity: Activity, date: Date) -> RewardResult<u32> {
        let key = daily_counter_key(user, activity, date);
        let count = self.store.get_counter(&key)?.saturating_add(1);
        self.store.set_counter(&key, count)?;
        Ok(count)
    }
}
