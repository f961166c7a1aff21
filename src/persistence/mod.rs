//! Key/value persistence for progression
//!
//! The simulation only ever talks to a [`ProgressionStore`]: string values
//! under string keys, read once at session start and written after every
//! state-changing action. Values are JSON documents.
//!
//! Reads are forgiving: a missing or malformed value means "use the default".

pub mod file;

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use file::{JsonFileStore, StoreError};

/// Storage keys
pub mod keys {
    pub const TOTAL_GOLD: &str = "totalGold";
    pub const TOTAL_JADES: &str = "totalJades";
    pub const TOTAL_DISTANCE: &str = "totalDistance";
    pub const HIGH_SCORE: &str = "highScore";
    pub const INVENTORY: &str = "inventory";
    pub const HAS_HORSESHOE: &str = "hasHorseshoe";
    pub const OWNED_SKINS: &str = "ownedSkins";
    pub const EQUIPPED_SKIN: &str = "equippedSkin";
    pub const QUEST_DATE: &str = "questDate";
    pub const QUEST_PROGRESS: &str = "questProgress";
    pub const QUESTS_CLAIMED: &str = "questsClaimed";
    pub const LEADERBOARD: &str = "leaderboard";
}

/// Contract between the session and whatever holds saved progression
///
/// Implementations must not fail loudly: a store that cannot write logs the
/// problem and carries on.
pub trait ProgressionStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// In-memory store (tests, or a session that should not touch disk)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ProgressionStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Read and decode a value, falling back to `T::default()`
pub fn load_json<T: DeserializeOwned + Default>(store: &dyn ProgressionStore, key: &str) -> T {
    let Some(raw) = store.load(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Ignoring malformed '{key}' ({err})");
            T::default()
        }
    }
}

/// Encode and write a value
pub fn save_json<T: Serialize + ?Sized>(store: &mut dyn ProgressionStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => store.save(key, &json),
        Err(err) => log::warn!("Could not encode '{key}': {err}"),
    }
}

/// Seconds since the Unix epoch
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Current UTC date as `YYYY-MM-DD` (daily quest key)
pub fn today_key() -> String {
    date_key(now_secs())
}

/// `YYYY-MM-DD` for a Unix timestamp (UTC)
pub fn date_key(unix_secs: u64) -> String {
    let (y, m, d) = civil_from_days((unix_secs / 86_400) as i64);
    format!("{y:04}-{m:02}-{d:02}")
}

/// Proleptic Gregorian date from days since 1970-01-01
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m, d)
}
