use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use hashbrown::HashMap;
use pirate_vault_core::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

const COUNTERS_FILE: &str = "counters.json";
const LEDGER_FILE: &str = "ledger.json";

/// Reads `path` as JSON, a missing file yields the default value.
fn load_json<T: DeserializeOwned + Default>(path: &Path) -> anyhow::Result<T> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("Could not parse {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(err).with_context(|| format!("Could not read {}", path.display())),
    }
}

/// Writes through a temporary file so a crash never leaves half a document behind.
fn save_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, text).with_context(|| format!("Could not write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Could not replace {}", path.display()))?;
    Ok(())
}

/// Directory holding the vault's data files.
#[derive(Clone, Debug)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Could not create data dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn counter_store(&self) -> anyhow::Result<JsonCounterStore> {
        let path = self.root.join(COUNTERS_FILE);
        let counters = load_json(&path)?;
        Ok(JsonCounterStore { path, counters })
    }

    pub fn ledger(&self) -> anyhow::Result<FileLedger> {
        let path = self.root.join(LEDGER_FILE);
        let ledger = load_json(&path)?;
        Ok(FileLedger { path, ledger })
    }
}

/// Daily counters persisted as one JSON object.
#[derive(Debug)]
pub struct JsonCounterStore {
    path: PathBuf,
    counters: HashMap<String, u32>,
}

impl CounterStore for JsonCounterStore {
    fn get_counter(&self, key: &str) -> RewardResult<u32> {
        Ok(self.counters.get(key).copied().unwrap_or(0))
    }

    /// The new value is only visible once it reached the disk.
    fn set_counter(&mut self, key: &str, value: u32) -> RewardResult<()> {
        let mut updated = self.counters.clone();
        updated.insert(key.to_string(), value);
        save_json(&self.path, &updated).map_err(|err| RewardError::Store(format!("{err:#}")))?;
        self.counters = updated;
        Ok(())
    }
}

/// Ledger saved after every movement.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    ledger: Ledger,
}

impl FileLedger {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn spend(&mut self, user: &str, amount: u64, description: &str) -> anyhow::Result<u64> {
        let mut updated = self.ledger.clone();
        let balance = updated.spend(user, amount, description)?;
        save_json(&self.path, &updated)?;
        self.ledger = updated;
        Ok(balance)
    }
}

impl RewardGrant for FileLedger {
    /// Only keeps the grant in memory once it reached the disk.
    fn grant_reward(&mut self, user: &str, amount: u32, description: &str) -> RewardResult<()> {
        let mut updated = self.ledger.clone();
        updated.grant_reward(user, amount, description)?;
        save_json(&self.path, &updated).map_err(|err| RewardError::GrantFailed {
            user: user.to_string(),
            amount,
            reason: format!("{err:#}"),
        })?;
        self.ledger = updated;
        Ok(())
    }
}
