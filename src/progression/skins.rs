//! Player skins and the gameplay perks they carry

use serde::{Deserialize, Serialize};

/// What a skin costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    Free,
    Gold(u64),
    Jade(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Skin {
    #[default]
    #[serde(rename = "Classic Farmer")]
    ClassicFarmer,
    #[serde(rename = "Iron Knight")]
    IronKnight,
    #[serde(rename = "Neon Runner")]
    NeonRunner,
    #[serde(rename = "Golden Dash")]
    GoldenDash,
    #[serde(rename = "Molten Core")]
    MoltenCore,
}

impl Skin {
    pub const ALL: [Skin; 5] = [
        Skin::ClassicFarmer,
        Skin::IronKnight,
        Skin::NeonRunner,
        Skin::GoldenDash,
        Skin::MoltenCore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Skin::ClassicFarmer => "Classic Farmer",
            Skin::IronKnight => "Iron Knight",
            Skin::NeonRunner => "Neon Runner",
            Skin::GoldenDash => "Golden Dash",
            Skin::MoltenCore => "Molten Core",
        }
    }

    pub fn price(self) -> Price {
        match self {
            Skin::ClassicFarmer => Price::Free,
            Skin::IronKnight => Price::Gold(150),
            Skin::NeonRunner => Price::Jade(10),
            Skin::GoldenDash => Price::Gold(500),
            Skin::MoltenCore => Price::Jade(50),
        }
    }

    /// Extra potion seconds when drinking a potion
    pub fn potion_bonus(self) -> f32 {
        match self {
            Skin::IronKnight => 3.0,
            _ => 0.0,
        }
    }

    /// Starting speed multiplier
    pub fn speed_multiplier(self) -> f32 {
        match self {
            Skin::NeonRunner => 1.15,
            _ => 1.0,
        }
    }

    /// Gold multiplier applied to every coin
    pub fn gold_multiplier(self) -> f32 {
        match self {
            Skin::GoldenDash => 5.0,
            _ => 1.0,
        }
    }

    /// Always-on coin pickup reach, added to any magnet radius
    pub fn magnet_bonus(self) -> f32 {
        match self {
            Skin::GoldenDash => 0.5,
            _ => 0.0,
        }
    }

    /// Collision expansion while a potion is running
    pub fn potion_expansion(self) -> f32 {
        match self {
            Skin::MoltenCore => 1.0,
            _ => 0.0,
        }
    }

    /// Jade bonus granted every `n` obstacles broken, as `(n, jade)`
    pub fn break_streak_bonus(self) -> Option<(u32, u64)> {
        match self {
            Skin::MoltenCore => Some((10, 5)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_as_display_name() {
        for skin in Skin::ALL {
            let json = serde_json::to_string(&skin).unwrap();
            assert_eq!(json, format!("\"{}\"", skin.name()));
        }
    }

    #[test]
    fn test_only_classic_is_free() {
        let free: Vec<Skin> = Skin::ALL
            .into_iter()
            .filter(|s| s.price() == Price::Free)
            .collect();
        assert_eq!(free, vec![Skin::ClassicFarmer]);
    }

    #[test]
    fn test_classic_has_no_perks() {
        let s = Skin::ClassicFarmer;
        assert_eq!(s.gold_multiplier(), 1.0);
        assert_eq!(s.speed_multiplier(), 1.0);
        assert_eq!(s.magnet_bonus(), 0.0);
        assert_eq!(s.potion_bonus(), 0.0);
        assert_eq!(s.potion_expansion(), 0.0);
        assert_eq!(s.break_streak_bonus(), None);
    }
}
