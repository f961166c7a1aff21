//! Reward resolution
//!
//! Every gold multiplier is applied here, in one fixed order:
//! weather, then equipped ability, then owned-item bonus. Rounding happens
//! once, at the end.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::WeatherKind;
use crate::progression::Skin;
use crate::tuning::Tuning;

/// Multipliers in effect for a collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardModifiers {
    pub weather: f32,
    pub ability: f32,
    /// Fractional bonus (0.25 = +25%)
    pub item_bonus: f32,
}

impl Default for RewardModifiers {
    fn default() -> Self {
        Self {
            weather: 1.0,
            ability: 1.0,
            item_bonus: 0.0,
        }
    }
}

impl RewardModifiers {
    pub fn for_run(weather: WeatherKind, skin: Skin, has_horseshoe: bool, tuning: &Tuning) -> Self {
        let weather = match weather {
            WeatherKind::Bloodmoon => tuning.bloodmoon_gold_multiplier,
            WeatherKind::None | WeatherKind::Storm | WeatherKind::Sandstorm => 1.0,
        };
        Self {
            weather,
            ability: skin.gold_multiplier(),
            item_bonus: if has_horseshoe {
                tuning.horseshoe_bonus
            } else {
                0.0
            },
        }
    }
}

/// Gold earned for `base` collected coins
pub fn resolve_gold(base: u32, mods: &RewardModifiers) -> u64 {
    let gold = base as f32 * mods.weather * mods.ability * (1.0 + mods.item_bonus);
    gold.round().max(0.0) as u64
}

/// Whether a broken obstacle drops a jade
pub fn roll_jade_drop(rng: &mut Pcg32, chance: f32) -> bool {
    rng.random::<f32>() < chance
}
