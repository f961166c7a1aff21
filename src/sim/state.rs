//! Core simulation types
//!
//! Entities, closed kind enumerations, and the events the simulation emits for
//! rendering/audio collaborators.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::pool::{EntityId, Poolable};
use crate::Rejection;
use crate::consts::*;
use crate::progression::Skin;

/// One of the three lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Signed lane index (-1, 0, 1)
    pub fn offset(self) -> i8 {
        match self {
            Lane::Left => -1,
            Lane::Center => 0,
            Lane::Right => 1,
        }
    }

    /// World x of the lane center
    pub fn x(self) -> f32 {
        self.offset() as f32 * LANE_WIDTH
    }

    /// Neighbour to the left, clamped at the edge
    pub fn left(self) -> Lane {
        match self {
            Lane::Right => Lane::Center,
            _ => Lane::Left,
        }
    }

    /// Neighbour to the right, clamped at the edge
    pub fn right(self) -> Lane {
        match self {
            Lane::Left => Lane::Center,
            _ => Lane::Right,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Crate,
    Hay,
    Rock,
    DoubleCrate,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Crate,
        ObstacleKind::Hay,
        ObstacleKind::Rock,
        ObstacleKind::DoubleCrate,
    ];

    /// Half extents of the (uncontracted) bounding box
    pub fn half_extents(self) -> Vec3 {
        match self {
            ObstacleKind::Crate | ObstacleKind::Hay | ObstacleKind::Rock => Vec3::splat(0.5),
            ObstacleKind::DoubleCrate => Vec3::new(0.5, 1.0, 0.5),
        }
    }

    /// Center height when resting on the track
    pub fn rest_y(self) -> f32 {
        match self {
            ObstacleKind::Rock => 0.4,
            ObstacleKind::Crate | ObstacleKind::Hay => 0.5,
            ObstacleKind::DoubleCrate => 1.0,
        }
    }

    /// Camera shake intensity when smashed through
    pub fn hit_intensity(self) -> f32 {
        match self {
            ObstacleKind::Rock => 0.4,
            ObstacleKind::DoubleCrate => 0.5,
            ObstacleKind::Crate | ObstacleKind::Hay => 0.1,
        }
    }
}

/// An obstacle on the track
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: ObstacleKind,
    pub lane: Lane,
    pub pos: Vec3,
    pub active: bool,
}

impl Obstacle {
    /// Put a freshly acquired obstacle on the track
    pub fn place(&mut self, lane: Lane, z: f32) {
        self.lane = lane;
        self.pos = Vec3::new(lane.x(), self.kind.rest_y(), z);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.kind.half_extents())
    }
}

impl Poolable for Obstacle {
    type Kind = ObstacleKind;

    fn create(id: EntityId, kind: ObstacleKind) -> Self {
        Self {
            id,
            kind,
            lane: Lane::Center,
            pos: Vec3::ZERO,
            active: false,
        }
    }
    fn id(&self) -> EntityId {
        self.id
    }
    fn kind(&self) -> ObstacleKind {
        self.kind
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
    fn reset(&mut self) {
        self.lane = Lane::Center;
        self.pos = Vec3::ZERO;
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Spawned by the track, counted into run gold
    Gold,
    /// Dropped by broken obstacles, credited straight to the wallet
    Jade,
}

/// Pickup lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoinState {
    #[default]
    Idle,
    /// Steering toward the player under a magnet
    Attracted,
    /// Collected; fading out before returning to the pool
    Popping,
}

/// A coin or jade pickup
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub id: EntityId,
    pub kind: PickupKind,
    pub lane: Lane,
    pub pos: Vec3,
    /// Bob animation phase offset (radians)
    pub bob_phase: f32,
    /// Spin around the track axis (radians)
    pub spin: f32,
    pub state: CoinState,
    /// Pop animation scale (1 = normal)
    pub scale: f32,
    /// Pop animation opacity (1 = opaque)
    pub opacity: f32,
    pub active: bool,
}

impl Coin {
    /// Put a freshly acquired pickup at a world position
    pub fn place(&mut self, lane: Lane, pos: Vec3, bob_phase: f32) {
        self.lane = lane;
        self.pos = pos;
        self.bob_phase = bob_phase;
        self.spin = 0.0;
        self.state = CoinState::Idle;
        self.scale = 1.0;
        self.opacity = 1.0;
    }

    pub fn bounds(&self) -> Aabb {
        let half = Vec3::new(COIN_RADIUS, COIN_RADIUS, COIN_THICKNESS * 0.5) * self.scale;
        Aabb::from_center(self.pos, half)
    }

    pub fn is_popping(&self) -> bool {
        self.state == CoinState::Popping
    }

    /// Mark collected and start the fade-out
    pub fn start_pop(&mut self) {
        self.state = CoinState::Popping;
        self.scale = 1.0;
        self.opacity = 1.0;
    }
}

impl Poolable for Coin {
    type Kind = PickupKind;

    fn create(id: EntityId, kind: PickupKind) -> Self {
        Self {
            id,
            kind,
            lane: Lane::Center,
            pos: Vec3::ZERO,
            bob_phase: 0.0,
            spin: 0.0,
            state: CoinState::Idle,
            scale: 1.0,
            opacity: 1.0,
            active: false,
        }
    }
    fn id(&self) -> EntityId {
        self.id
    }
    fn kind(&self) -> PickupKind {
        self.kind
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
    fn reset(&mut self) {
        self.place(Lane::Center, Vec3::ZERO, 0.0);
    }
}

/// Timed, consumable effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Magnet,
    Potion,
}

/// Weather conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeatherKind {
    #[default]
    None,
    Storm,
    Sandstorm,
    Bloodmoon,
}

impl WeatherKind {
    /// Kinds a weather roll can produce, in weight order
    pub const ROLLABLE: [WeatherKind; 3] = [
        WeatherKind::Storm,
        WeatherKind::Sandstorm,
        WeatherKind::Bloodmoon,
    ];
}

/// Player-facing notifications (toasts)
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Rejected(Rejection),
    /// Iron Knight extends the potion
    PotionBonus { seconds: f32 },
    NewPersonalBest { distance: u64 },
    SkinUnlocked(Skin),
    SkinEquipped(Skin),
    HorseshoeMinted,
    QuestClaimed { reward: u64 },
    Revived { grace: f32 },
}

/// Discrete simulation output for rendering/audio/UI collaborators
///
/// Notifications only: the simulation never waits on a response.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// `coins` picked up this tick, worth `gold` after multipliers
    CoinCollected { coins: u32, gold: u64 },
    JadeCollected { position: Vec3 },
    /// An invincible player smashed through an obstacle
    ObstacleBroken {
        kind: ObstacleKind,
        position: Vec3,
        intensity: f32,
    },
    JadeDropped { position: Vec3 },
    GameOver { distance: u64, run_gold: u64 },
    ReviveOffered { cost: u64, window: f32 },
    ReviveExpired,
    EffectActivated(EffectKind),
    EffectExpired(EffectKind),
    WeatherChanged(WeatherKind),
    Lightning,
    /// Crossed a multiple of the milestone distance
    Milestone { bucket: u64 },
    Landed { position: Vec3 },
    Notice(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_clamps_at_edges() {
        assert_eq!(Lane::Left.left(), Lane::Left);
        assert_eq!(Lane::Right.right(), Lane::Right);
        assert_eq!(Lane::Center.left(), Lane::Left);
        assert_eq!(Lane::Left.right().right(), Lane::Right);
    }

    #[test]
    fn test_lane_x() {
        assert_eq!(Lane::Left.x(), -LANE_WIDTH);
        assert_eq!(Lane::Center.x(), 0.0);
        assert_eq!(Lane::Right.x(), LANE_WIDTH);
    }

    #[test]
    fn test_obstacle_sits_on_ground() {
        for kind in ObstacleKind::ALL {
            let mut obstacle = Obstacle::create(1, kind);
            obstacle.place(Lane::Right, -30.0);
            let bounds = obstacle.bounds();
            assert!(bounds.min.y <= 0.1, "{kind:?} floats above the track");
            assert_eq!(bounds.center().x, LANE_WIDTH);
        }
    }

    #[test]
    fn test_pop_resets_animation() {
        let mut coin = Coin::create(7, PickupKind::Gold);
        coin.place(Lane::Left, Vec3::new(-2.0, 0.5, -10.0), 1.0);
        coin.start_pop();
        assert!(coin.is_popping());
        coin.reset();
        assert_eq!(coin.state, CoinState::Idle);
        assert_eq!(coin.opacity, 1.0);
    }
}
