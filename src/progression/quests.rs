//! Daily quests
//!
//! Three fixed quests reset whenever the stored date differs from today.
//! Progress snaps to the goal, and each reward can be claimed once per day.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Rejection;
use crate::persistence::{ProgressionStore, keys, load_json, save_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    /// Break rocks while invincible
    Stones,
    /// Best single-run distance today
    Distance,
    /// Jade pickups collected
    Jades,
}

/// Static definition of a daily quest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quest {
    pub kind: QuestKind,
    pub title: &'static str,
    pub goal: u64,
    /// Gold paid on claim
    pub reward: u64,
}

pub const QUESTS: [Quest; 3] = [
    Quest {
        kind: QuestKind::Stones,
        title: "Break 20 Stones",
        goal: 20,
        reward: 50,
    },
    Quest {
        kind: QuestKind::Distance,
        title: "Reach 3,000m in one run",
        goal: 3000,
        reward: 100,
    },
    Quest {
        kind: QuestKind::Jades,
        title: "Collect 5 Jades",
        goal: 5,
        reward: 150,
    },
];

impl QuestKind {
    pub fn quest(self) -> &'static Quest {
        match self {
            QuestKind::Stones => &QUESTS[0],
            QuestKind::Distance => &QUESTS[1],
            QuestKind::Jades => &QUESTS[2],
        }
    }
}

/// Today's quest progress and claims
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestBook {
    pub date: String,
    pub progress: BTreeMap<QuestKind, u64>,
    pub claimed: BTreeMap<QuestKind, bool>,
}

impl QuestBook {
    /// Fresh book for `today`
    pub fn new(today: &str) -> Self {
        Self {
            date: today.to_string(),
            ..Self::default()
        }
    }

    /// Load today's book, resetting it if the stored date is stale
    pub fn load(store: &mut dyn ProgressionStore, today: &str) -> Self {
        let saved_date = store.load(keys::QUEST_DATE).and_then(|raw| {
            serde_json::from_str::<String>(&raw)
                .ok()
                .or(Some(raw))
        });
        if saved_date.as_deref() != Some(today) {
            log::info!("New day ({today}), resetting daily quests");
            let book = Self::new(today);
            book.save(store);
            return book;
        }

        let mut book = Self {
            date: today.to_string(),
            progress: load_json(store, keys::QUEST_PROGRESS),
            claimed: load_json(store, keys::QUESTS_CLAIMED),
        };
        for (kind, value) in book.progress.iter_mut() {
            *value = (*value).min(kind.quest().goal);
        }
        book
    }

    pub fn save(&self, store: &mut dyn ProgressionStore) {
        save_json(store, keys::QUEST_DATE, &self.date);
        save_json(store, keys::QUEST_PROGRESS, &self.progress);
        save_json(store, keys::QUESTS_CLAIMED, &self.claimed);
    }

    pub fn progress(&self, kind: QuestKind) -> u64 {
        self.progress.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_complete(&self, kind: QuestKind) -> bool {
        self.progress(kind) >= kind.quest().goal
    }

    pub fn is_claimed(&self, kind: QuestKind) -> bool {
        self.claimed.get(&kind).copied().unwrap_or(false)
    }

    /// Add to a counter quest. Returns whether progress changed.
    pub fn record(&mut self, kind: QuestKind, amount: u64) -> bool {
        let next = self.progress(kind).saturating_add(amount);
        self.set(kind, next)
    }

    /// Raise a best-of quest. Returns whether progress changed.
    pub fn record_max(&mut self, kind: QuestKind, value: u64) -> bool {
        let next = self.progress(kind).max(value);
        self.set(kind, next)
    }

    fn set(&mut self, kind: QuestKind, value: u64) -> bool {
        let value = value.min(kind.quest().goal);
        if value == self.progress(kind) {
            return false;
        }
        self.progress.insert(kind, value);
        true
    }

    /// Mark a completed quest claimed, returning its gold reward
    pub fn claim(&mut self, kind: QuestKind) -> Result<u64, Rejection> {
        if self.is_claimed(kind) {
            return Err(Rejection::QuestAlreadyClaimed);
        }
        if !self.is_complete(kind) {
            return Err(Rejection::QuestIncomplete);
        }
        self.claimed.insert(kind, true);
        Ok(kind.quest().reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_progress_snaps_to_goal() {
        let mut book = QuestBook::new("2024-05-01");
        for _ in 0..30 {
            book.record(QuestKind::Stones, 1);
        }
        assert_eq!(book.progress(QuestKind::Stones), 20);
        assert!(!book.record(QuestKind::Stones, 1));
    }

    #[test]
    fn test_distance_keeps_best_run() {
        let mut book = QuestBook::new("2024-05-01");
        book.record_max(QuestKind::Distance, 1200);
        book.record_max(QuestKind::Distance, 800);
        assert_eq!(book.progress(QuestKind::Distance), 1200);
    }

    #[test]
    fn test_claim_once() {
        let mut book = QuestBook::new("2024-05-01");
        assert_eq!(book.claim(QuestKind::Jades), Err(Rejection::QuestIncomplete));
        book.record(QuestKind::Jades, 5);
        assert_eq!(book.claim(QuestKind::Jades), Ok(150));
        assert_eq!(
            book.claim(QuestKind::Jades),
            Err(Rejection::QuestAlreadyClaimed)
        );
    }

    #[test]
    fn test_same_day_reload_keeps_progress() {
        let mut store = MemoryStore::new();
        let mut book = QuestBook::load(&mut store, "2024-05-01");
        book.record(QuestKind::Stones, 7);
        book.record(QuestKind::Jades, 5);
        book.claim(QuestKind::Jades).unwrap();
        book.save(&mut store);

        let again = QuestBook::load(&mut store, "2024-05-01");
        assert_eq!(again, book);
    }

    #[test]
    fn test_new_day_resets() {
        let mut store = MemoryStore::new();
        let mut book = QuestBook::load(&mut store, "2024-05-01");
        book.record(QuestKind::Jades, 5);
        book.claim(QuestKind::Jades).unwrap();
        book.save(&mut store);

        let tomorrow = QuestBook::load(&mut store, "2024-05-02");
        assert_eq!(tomorrow.progress(QuestKind::Jades), 0);
        assert!(!tomorrow.is_claimed(QuestKind::Jades));
        assert_eq!(store.load(keys::QUEST_DATE).as_deref(), Some("\"2024-05-02\""));
    }
}
