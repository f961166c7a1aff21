//! Harvest Dash - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track, player, effects, collisions, session)
//! - `progression`: Wallet, inventory, skins and daily quests
//! - `persistence`: Key/value store contract used to save progression
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod progression;
pub mod rejection;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use rejection::Rejection;
pub use tuning::Tuning;

/// World geometry constants
///
/// The track runs along -z (forward); objects move toward +z as the player
/// advances and leave the world behind the camera.
pub mod consts {
    /// Horizontal spacing between lane centers
    pub const LANE_WIDTH: f32 = 2.0;
    /// Player box edge length (unit cube)
    pub const PLAYER_SIZE: f32 = 1.0;
    /// Resting height of the player's center
    pub const GROUND_Y: f32 = 0.5;
    /// Player z never changes; the world moves instead
    pub const PLAYER_Z: f32 = 0.0;
    /// Hard x limit for the player (fences sit at ±3.5)
    pub const PLAYABLE_HALF_WIDTH: f32 = 3.0;

    /// Track segment length along z
    pub const SEGMENT_LENGTH: f32 = 50.0;
    /// Number of live track segments
    pub const SEGMENT_COUNT: usize = 6;
    /// A segment is relocated once its far edge passes this z
    pub const SEGMENT_RECYCLE_Z: f32 = 25.0;
    /// Spawn points per relocated segment
    pub const SPAWNS_PER_SEGMENT: usize = 8;

    /// Obstacles and pickups past this z are behind the camera
    pub const DESPAWN_Z: f32 = 10.0;

    /// Pre-warm window (first spawn z, exclusive end z, step)
    pub const PREWARM_START_Z: f32 = -20.0;
    pub const PREWARM_END_Z: f32 = -300.0;
    pub const PREWARM_STEP: f32 = 10.0;

    /// Coin disc (wheel orientation)
    pub const COIN_RADIUS: f32 = 0.3;
    pub const COIN_THICKNESS: f32 = 0.1;
    pub const COIN_Y: f32 = 0.5;
    /// Coin bob amplitude and angular frequency (rad/s)
    pub const COIN_BOB_AMPLITUDE: f32 = 0.1;
    pub const COIN_BOB_SPEED: f32 = 5.0;
    /// Coin spin (rad/s)
    pub const COIN_SPIN_SPEED: f32 = 2.0;
    /// Pop animation: scale growth and fade rate per second
    pub const COIN_POP_GROWTH: f32 = 5.0;
    pub const COIN_POP_FADE: f32 = 3.0;

    /// Hitbox forgiveness
    pub const PLAYER_CONTRACTION: f32 = 0.2;
    pub const OBSTACLE_CONTRACTION: f32 = 0.1;

    /// Largest frame delta the driver feeds into a tick
    pub const MAX_FRAME_DT: f32 = 0.1;
}

