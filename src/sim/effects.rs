//! Timed effects, speed ramp and weather
//!
//! Everything here is a counter advanced by `dt`; nothing schedules callbacks.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{EffectKind, GameEvent, WeatherKind};
use crate::Rejection;
use crate::tuning::Tuning;

/// Magnet and potion timers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    pub magnet_active: bool,
    pub magnet_timer: f32,
    pub potion_active: bool,
    pub potion_timer: f32,
}

impl EffectState {
    fn slot(&mut self, kind: EffectKind) -> (&mut bool, &mut f32) {
        match kind {
            EffectKind::Magnet => (&mut self.magnet_active, &mut self.magnet_timer),
            EffectKind::Potion => (&mut self.potion_active, &mut self.potion_timer),
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Magnet => self.magnet_active,
            EffectKind::Potion => self.potion_active,
        }
    }

    /// Seconds left (0 when inactive)
    pub fn remaining(&self, kind: EffectKind) -> f32 {
        match kind {
            EffectKind::Magnet if self.magnet_active => self.magnet_timer,
            EffectKind::Potion if self.potion_active => self.potion_timer,
            _ => 0.0,
        }
    }

    /// Start an effect from a consumable; refused while it is running
    pub fn activate(&mut self, kind: EffectKind, duration: f32) -> Result<(), Rejection> {
        let (active, timer) = self.slot(kind);
        if *active {
            return Err(Rejection::AlreadyActive);
        }
        *active = true;
        *timer = duration;
        Ok(())
    }

    /// Grant an effect for at least `duration` (revive grace)
    pub fn grant(&mut self, kind: EffectKind, duration: f32) {
        let (active, timer) = self.slot(kind);
        *timer = if *active { timer.max(duration) } else { duration };
        *active = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Count down running effects, reporting the ones that ran out
    pub fn tick(&mut self, dt: f32, expired: &mut Vec<EffectKind>) {
        for kind in [EffectKind::Magnet, EffectKind::Potion] {
            let (active, timer) = self.slot(kind);
            if !*active {
                continue;
            }
            *timer -= dt;
            if *timer <= 0.0 {
                *active = false;
                *timer = 0.0;
                expired.push(kind);
            }
        }
    }
}

/// Compound the run speed once per full ramp interval
///
/// `timer` accumulates play time; a large `dt` may cross several intervals.
pub fn apply_speed_ramp(speed: f32, timer: &mut f32, dt: f32, tuning: &Tuning) -> f32 {
    let mut speed = speed;
    *timer += dt;
    while *timer >= tuning.speed_ramp_interval {
        *timer -= tuning.speed_ramp_interval;
        speed *= tuning.speed_ramp_factor;
    }
    speed
}

/// Weather cycle state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherState {
    pub kind: WeatherKind,
    /// Seconds since the current weather began
    pub timer: f32,
    /// Seconds until the next weather change
    pub cycle_timer: f32,
    /// Seconds until the next lightning strike (storm only)
    pub lightning_timer: f32,
}

impl WeatherState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            cycle_timer: tuning.weather_cycle,
            ..Self::default()
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Advance the cycle; only runs past the distance threshold
    pub fn tick(
        &mut self,
        dt: f32,
        distance: f32,
        rng: &mut Pcg32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if distance < tuning.weather_distance_threshold {
            return;
        }

        self.timer += dt;
        self.cycle_timer -= dt;
        if self.cycle_timer <= 0.0 {
            self.cycle_timer = tuning.weather_cycle;
            let next = match self.kind {
                WeatherKind::None => roll_weather(rng, tuning),
                _ => WeatherKind::None,
            };
            self.set(next, rng, tuning);
            events.push(GameEvent::WeatherChanged(next));
        }

        if self.kind == WeatherKind::Storm {
            self.lightning_timer -= dt;
            if self.lightning_timer <= 0.0 {
                self.lightning_timer = lightning_delay(rng, tuning);
                events.push(GameEvent::Lightning);
            }
        }
    }

    fn set(&mut self, kind: WeatherKind, rng: &mut Pcg32, tuning: &Tuning) {
        log::info!("Weather: {:?} -> {:?}", self.kind, kind);
        self.kind = kind;
        self.timer = 0.0;
        if kind == WeatherKind::Storm {
            self.lightning_timer = lightning_delay(rng, tuning);
        }
    }
}

/// Weighted draw over the rollable weather kinds
pub fn roll_weather(rng: &mut Pcg32, tuning: &Tuning) -> WeatherKind {
    let weights = tuning.weather_weights.map(|w| w.max(0.0));
    let total: f32 = weights.iter().sum();
    let mut roll = rng.random::<f32>() * total;
    for (kind, weight) in WeatherKind::ROLLABLE.into_iter().zip(weights) {
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    // Float slop at the top of the range
    WeatherKind::ROLLABLE
        .into_iter()
        .zip(weights)
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map_or(WeatherKind::Storm, |(kind, _)| kind)
}

fn lightning_delay(rng: &mut Pcg32, tuning: &Tuning) -> f32 {
    let (lo, hi) = tuning.lightning_interval;
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
