//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives here.
//! `Tuning::default()` is the shipped balance; a JSON document may override
//! any subset of fields.

use serde::{Deserialize, Serialize};

/// Spawn probability bands for one uniform draw in [0, 1)
///
/// `[0, obstacle_below)` spawns an obstacle, `[coin_from, 1)` spawns a coin,
/// anything in between leaves the spawn point empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBands {
    pub obstacle_below: f32,
    pub coin_from: f32,
}

/// What a single spawn draw produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSlot {
    Obstacle,
    Empty,
    Coin,
}

impl SpawnBands {
    pub const fn new(obstacle_below: f32, coin_from: f32) -> Self {
        Self {
            obstacle_below,
            coin_from,
        }
    }

    /// Force the bands into a disjoint partition of [0, 1)
    pub fn normalized(self) -> Self {
        let obstacle_below = self.obstacle_below.clamp(0.0, 1.0);
        let coin_from = self.coin_from.clamp(obstacle_below, 1.0);
        Self {
            obstacle_below,
            coin_from,
        }
    }

    /// Classify a draw in [0, 1)
    pub fn classify(&self, roll: f32) -> SpawnSlot {
        if roll < self.obstacle_below {
            SpawnSlot::Obstacle
        } else if roll < self.coin_from {
            SpawnSlot::Empty
        } else {
            SpawnSlot::Coin
        }
    }
}

/// Game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run pacing ===
    /// Speed at the start of a run (units/s)
    pub start_speed: f32,
    /// Seconds of play between speed increases
    pub speed_ramp_interval: f32,
    /// Multiplicative speed increase per interval
    pub speed_ramp_factor: f32,
    /// Distance between milestone notifications (m)
    pub milestone_distance: f32,

    // === Player ===
    pub jump_velocity: f32,
    pub gravity: f32,
    /// Exponential lane ease rate (1/s)
    pub lane_ease_rate: f32,
    /// Ease rate multiplier while buffeted by a sandstorm
    pub sandstorm_ease_factor: f32,
    /// Lateral drift amplitude while buffeted
    pub sandstorm_drift_amplitude: f32,
    /// Lateral drift angular frequency (rad/s)
    pub sandstorm_drift_frequency: f32,

    // === Spawning ===
    /// Bands used when a segment is relocated
    pub segment_bands: SpawnBands,
    /// Bands used for the pre-warm window on run reset
    pub prewarm_bands: SpawnBands,

    // === Items ===
    pub magnet_duration: f32,
    pub potion_duration: f32,
    /// Collision expansion used for coin pickup while a magnet is active
    pub magnet_radius: f32,
    /// Center distance within which coins steer toward the player
    pub attraction_range: f32,
    /// Steering speed of attracted coins (units/s)
    pub attraction_speed: f32,
    pub magnet_price: u64,
    pub potion_price: u64,

    // === Weather ===
    /// Run distance after which weather may roll
    pub weather_distance_threshold: f32,
    /// Seconds between weather rolls
    pub weather_cycle: f32,
    /// Relative weights for storm, sandstorm, bloodmoon
    pub weather_weights: [f32; 3],
    /// Gold multiplier while a blood moon is up
    pub bloodmoon_gold_multiplier: f32,
    /// Lightning interval range during a storm (min, max seconds)
    pub lightning_interval: (f32, f32),

    // === Day/night ===
    /// Full day/night cycle length (s)
    pub day_cycle_length: f32,

    // === Revive ===
    /// Revive costs in gold; the length is the per-run revive limit
    pub revive_costs: Vec<u64>,
    /// Seconds the revive offer stays open
    pub revive_window: f32,
    /// Invincibility granted on revive (s)
    pub revive_grace: f32,
    /// Obstacles within this z distance are cleared on revive
    pub revive_clear_radius: f32,

    // === Rewards ===
    /// Chance that a broken obstacle drops a jade
    pub jade_drop_chance: f32,
    /// Horseshoe gold bonus (fraction, applied last)
    pub horseshoe_bonus: f32,
    pub horseshoe_gold_price: u64,
    pub horseshoe_jade_price: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Run pacing
            start_speed: 10.0,
            speed_ramp_interval: 10.0,
            speed_ramp_factor: 1.05,
            milestone_distance: 500.0,

            // Player
            jump_velocity: 12.0,
            gravity: -30.0,
            lane_ease_rate: 10.0,
            sandstorm_ease_factor: 0.5,
            sandstorm_drift_amplitude: 0.6,
            sandstorm_drift_frequency: 1.5,

            // Spawning
            segment_bands: SpawnBands::new(0.45, 0.55),
            prewarm_bands: SpawnBands::new(0.4, 0.6),

            // Items
            magnet_duration: 30.0,
            potion_duration: 20.0,
            magnet_radius: 4.0,
            attraction_range: 8.0,
            attraction_speed: 15.0,
            magnet_price: 30,
            potion_price: 100,

            // Weather
            weather_distance_threshold: 2000.0,
            weather_cycle: 30.0,
            weather_weights: [1.0, 1.0, 1.0],
            bloodmoon_gold_multiplier: 2.0,
            lightning_interval: (3.0, 8.0),

            // Day/night
            day_cycle_length: 180.0,

            // Revive
            revive_costs: vec![100, 250, 500],
            revive_window: 10.0,
            revive_grace: 4.0,
            revive_clear_radius: 40.0,

            // Rewards
            jade_drop_chance: 0.65,
            horseshoe_bonus: 0.25,
            horseshoe_gold_price: 1000,
            horseshoe_jade_price: 100,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.validated(),
            Err(err) => {
                log::warn!("Malformed tuning ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Clamp values that would break simulation invariants
    pub fn validated(mut self) -> Self {
        self.segment_bands = self.segment_bands.normalized();
        self.prewarm_bands = self.prewarm_bands.normalized();
        self.day_cycle_length = self.day_cycle_length.max(1.0);
        self.speed_ramp_interval = self.speed_ramp_interval.max(0.01);
        self.weather_cycle = self.weather_cycle.max(0.01);
        self.jade_drop_chance = self.jade_drop_chance.clamp(0.0, 1.0);
        if self.lightning_interval.1 < self.lightning_interval.0 {
            self.lightning_interval.1 = self.lightning_interval.0;
        }
        if self.weather_weights.iter().all(|w| *w <= 0.0) {
            self.weather_weights = [1.0, 1.0, 1.0];
        }
        self
    }

    /// Number of revives allowed per run
    pub fn revive_limit(&self) -> u32 {
        self.revive_costs.len() as u32
    }

    /// Gold cost of the next revive, if any remain
    pub fn revive_cost(&self, revives_used: u32) -> Option<u64> {
        self.revive_costs.get(revives_used as usize).copied()
    }
}
