//! Persistent player progression
//!
//! Everything that survives between runs: currencies, consumables, skins, the
//! horseshoe, lifetime stats, daily quests and the run leaderboard. Every
//! mutating call here persists what it changed.

pub mod quests;
pub mod skins;

use serde::{Deserialize, Serialize};

pub use quests::{QUESTS, Quest, QuestBook, QuestKind};
pub use skins::{Price, Skin};

use crate::HighScores;
use crate::Rejection;
use crate::persistence::{ProgressionStore, keys, load_json, save_json};
use crate::sim::state::EffectKind;
use crate::tuning::Tuning;

/// Currencies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub gold: u64,
    pub jade: u64,
}

impl Wallet {
    /// Spend gold and jade together, or neither
    pub fn spend(&mut self, gold: u64, jade: u64) -> Result<(), Rejection> {
        if self.gold < gold {
            return Err(Rejection::InsufficientGold);
        }
        if self.jade < jade {
            return Err(Rejection::InsufficientJade);
        }
        self.gold -= gold;
        self.jade -= jade;
        Ok(())
    }
}

/// Consumable charges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub magnet: u32,
    pub potion: u32,
}

impl Inventory {
    pub fn count(&self, kind: EffectKind) -> u32 {
        match kind {
            EffectKind::Magnet => self.magnet,
            EffectKind::Potion => self.potion,
        }
    }

    fn slot(&mut self, kind: EffectKind) -> &mut u32 {
        match kind {
            EffectKind::Magnet => &mut self.magnet,
            EffectKind::Potion => &mut self.potion,
        }
    }

    pub fn add(&mut self, kind: EffectKind) {
        *self.slot(kind) += 1;
    }

    /// Use up one charge
    pub fn take(&mut self, kind: EffectKind) -> Result<(), Rejection> {
        let slot = self.slot(kind);
        if *slot == 0 {
            return Err(Rejection::NoCharges);
        }
        *slot -= 1;
        Ok(())
    }
}

/// Shop price of one consumable charge
pub fn item_price(kind: EffectKind, tuning: &Tuning) -> u64 {
    match kind {
        EffectKind::Magnet => tuning.magnet_price,
        EffectKind::Potion => tuning.potion_price,
    }
}

/// Saved player state
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub wallet: Wallet,
    pub inventory: Inventory,
    pub owned_skins: Vec<Skin>,
    pub equipped_skin: Skin,
    pub has_horseshoe: bool,
    /// Best single-run distance (m)
    pub high_score: u64,
    /// Lifetime distance (m)
    pub total_distance: u64,
    pub quests: QuestBook,
    pub leaderboard: HighScores,
}

impl Progression {
    /// Baseline for a player with no save
    pub fn new(today: &str) -> Self {
        Self {
            wallet: Wallet::default(),
            inventory: Inventory::default(),
            owned_skins: vec![Skin::ClassicFarmer],
            equipped_skin: Skin::ClassicFarmer,
            has_horseshoe: false,
            high_score: 0,
            total_distance: 0,
            quests: QuestBook::new(today),
            leaderboard: HighScores::new(),
        }
    }

    /// Read saved progression; missing or malformed keys use the baseline
    pub fn load(store: &mut dyn ProgressionStore, today: &str) -> Self {
        let mut owned_skins: Vec<Skin> = load_json(store, keys::OWNED_SKINS);
        if !owned_skins.contains(&Skin::ClassicFarmer) {
            owned_skins.insert(0, Skin::ClassicFarmer);
        }
        let mut seen = Vec::with_capacity(owned_skins.len());
        owned_skins.retain(|skin| {
            if seen.contains(skin) {
                false
            } else {
                seen.push(*skin);
                true
            }
        });

        let mut equipped_skin: Skin = load_json(store, keys::EQUIPPED_SKIN);
        if !owned_skins.contains(&equipped_skin) {
            log::warn!("Equipped skin {} is not owned, reverting", equipped_skin.name());
            equipped_skin = Skin::ClassicFarmer;
        }

        let progression = Self {
            wallet: Wallet {
                gold: load_json(store, keys::TOTAL_GOLD),
                jade: load_json(store, keys::TOTAL_JADES),
            },
            inventory: load_json(store, keys::INVENTORY),
            owned_skins,
            equipped_skin,
            has_horseshoe: load_json(store, keys::HAS_HORSESHOE),
            high_score: load_json(store, keys::HIGH_SCORE),
            total_distance: load_json(store, keys::TOTAL_DISTANCE),
            quests: QuestBook::load(store, today),
            leaderboard: HighScores::load(store),
        };
        log::info!(
            "Loaded progression: {} gold, {} jade, best {}m",
            progression.wallet.gold,
            progression.wallet.jade,
            progression.high_score
        );
        progression
    }

    /// Write every key
    pub fn save(&self, store: &mut dyn ProgressionStore) {
        save_json(store, keys::TOTAL_GOLD, &self.wallet.gold);
        save_json(store, keys::TOTAL_JADES, &self.wallet.jade);
        save_json(store, keys::TOTAL_DISTANCE, &self.total_distance);
        save_json(store, keys::HIGH_SCORE, &self.high_score);
        save_json(store, keys::INVENTORY, &self.inventory);
        save_json(store, keys::HAS_HORSESHOE, &self.has_horseshoe);
        save_json(store, keys::OWNED_SKINS, &self.owned_skins);
        save_json(store, keys::EQUIPPED_SKIN, &self.equipped_skin);
        self.quests.save(store);
        self.leaderboard.save(store);
    }

    pub fn owns(&self, skin: Skin) -> bool {
        self.owned_skins.contains(&skin)
    }

    /// Buy one consumable charge
    pub fn buy_item(&mut self, kind: EffectKind, tuning: &Tuning) -> Result<(), Rejection> {
        self.wallet.spend(item_price(kind, tuning), 0)?;
        self.inventory.add(kind);
        log::info!("Bought {kind:?} ({} gold left)", self.wallet.gold);
        Ok(())
    }

    /// Buy and auto-equip a skin
    pub fn buy_skin(&mut self, skin: Skin) -> Result<(), Rejection> {
        if self.owns(skin) {
            return Err(Rejection::AlreadyOwned);
        }
        match skin.price() {
            Price::Free => {}
            Price::Gold(g) => self.wallet.spend(g, 0)?,
            Price::Jade(j) => self.wallet.spend(0, j)?,
        }
        self.owned_skins.push(skin);
        self.equipped_skin = skin;
        log::info!("Unlocked skin {}", skin.name());
        Ok(())
    }

    pub fn equip_skin(&mut self, skin: Skin) -> Result<(), Rejection> {
        if !self.owns(skin) {
            return Err(Rejection::NotOwned);
        }
        self.equipped_skin = skin;
        Ok(())
    }

    /// Mint the lucky horseshoe (one per player)
    pub fn mint_horseshoe(&mut self, tuning: &Tuning) -> Result<(), Rejection> {
        if self.has_horseshoe {
            return Err(Rejection::AlreadyOwned);
        }
        self.wallet
            .spend(tuning.horseshoe_gold_price, tuning.horseshoe_jade_price)?;
        self.has_horseshoe = true;
        log::info!("Minted the horseshoe");
        Ok(())
    }

    /// Claim a daily quest reward into the wallet
    pub fn claim_quest(&mut self, kind: QuestKind) -> Result<u64, Rejection> {
        let reward = self.quests.claim(kind)?;
        self.wallet.gold += reward;
        Ok(reward)
    }
}
