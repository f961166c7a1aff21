//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one `Pcg32` owned by the session)
//! - Stable iteration order (spawn order)
//! - Run-relative clocks, never wall time
//! - No rendering, audio or platform dependencies

pub mod bounds;
pub mod collision;
pub mod effects;
pub mod environment;
pub mod player;
pub mod pool;
pub mod reward;
pub mod session;
pub mod state;
pub mod tick;
pub mod track;

pub use bounds::Aabb;
pub use effects::{EffectState, WeatherState, apply_speed_ramp};
pub use environment::{DayNight, DayPhase, Environment, environment_at, phase_at};
pub use player::Player;
pub use pool::{EntityId, EntityPool, Poolable};
pub use reward::{RewardModifiers, resolve_gold};
pub use session::{Overlay, RunState, Screen, ScreenState, Session};
pub use state::{
    Coin, CoinState, EffectKind, GameEvent, Lane, Notice, Obstacle, ObstacleKind, PickupKind,
    WeatherKind,
};
pub use tick::{TickInput, tick};
pub use track::Track;
