//! Day/night cycle
//!
//! The environment is a pure function of `day_time mod cycle_length`, so
//! renderers can sample it at any time without carrying their own state.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Sky colors as linear RGB
const SKY_DAY: Vec3 = Vec3::new(0x87 as f32 / 255.0, 0xCE as f32 / 255.0, 0xEB as f32 / 255.0);
const SKY_SUNSET: Vec3 = Vec3::new(1.0, 0x8C as f32 / 255.0, 0.0);
const SKY_NIGHT: Vec3 = Vec3::new(0.0, 0.0, 0x30 as f32 / 255.0);

/// Phase boundaries as fractions of the cycle
const SUNSET_START: f32 = 90.0 / 180.0;
const NIGHT_START: f32 = 105.0 / 180.0;
const NIGHT_FULL: f32 = 120.0 / 180.0;
const SUNRISE_START: f32 = 165.0 / 180.0;

const SUN_DAY: f32 = 1.0;
const SUN_NIGHT: f32 = 0.1;
const AMBIENT_DAY: f32 = 0.6;
const AMBIENT_NIGHT: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Sunset,
    Night,
    Sunrise,
}

/// Lighting snapshot for one moment of the cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub phase: DayPhase,
    pub sky_color: Vec3,
    pub star_opacity: f32,
    pub sun_intensity: f32,
    pub ambient_intensity: f32,
    /// Jade glow strength (jade shines at night)
    pub jade_glow: f32,
}

/// Run clock for the cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayNight {
    pub day_time: f32,
}

impl DayNight {
    pub fn reset(&mut self) {
        self.day_time = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        self.day_time += dt;
    }

    pub fn environment(&self, cycle_length: f32) -> Environment {
        environment_at(self.day_time, cycle_length)
    }
}

/// Fraction of the cycle elapsed, in [0, 1)
fn cycle_fraction(t: f32, cycle_length: f32) -> f32 {
    let cycle = cycle_length.max(f32::EPSILON);
    (t.rem_euclid(cycle) / cycle).clamp(0.0, 1.0)
}

fn progress(f: f32, start: f32, end: f32) -> f32 {
    ((f - start) / (end - start)).clamp(0.0, 1.0)
}

pub fn phase_at(t: f32, cycle_length: f32) -> DayPhase {
    let f = cycle_fraction(t, cycle_length);
    if f < SUNSET_START {
        DayPhase::Day
    } else if f < NIGHT_START {
        DayPhase::Sunset
    } else if f < SUNRISE_START {
        DayPhase::Night
    } else {
        DayPhase::Sunrise
    }
}

pub fn environment_at(t: f32, cycle_length: f32) -> Environment {
    let f = cycle_fraction(t, cycle_length);
    let phase = phase_at(t, cycle_length);

    // 0 = full day, 1 = full night
    let darkness = match phase {
        DayPhase::Day => 0.0,
        DayPhase::Sunset => progress(f, SUNSET_START, NIGHT_START) * 0.5,
        DayPhase::Night => 0.5 + progress(f, NIGHT_START, NIGHT_FULL) * 0.5,
        DayPhase::Sunrise => 1.0 - progress(f, SUNRISE_START, 1.0),
    };

    let sky_color = match phase {
        DayPhase::Day => SKY_DAY,
        DayPhase::Sunset => SKY_DAY.lerp(SKY_SUNSET, progress(f, SUNSET_START, NIGHT_START)),
        DayPhase::Night => SKY_SUNSET.lerp(SKY_NIGHT, progress(f, NIGHT_START, NIGHT_FULL)),
        DayPhase::Sunrise => SKY_NIGHT.lerp(SKY_DAY, progress(f, SUNRISE_START, 1.0)),
    };

    let star_opacity = match phase {
        DayPhase::Day | DayPhase::Sunset => 0.0,
        DayPhase::Night => progress(f, NIGHT_START, NIGHT_FULL),
        DayPhase::Sunrise => 1.0 - progress(f, SUNRISE_START, 1.0),
    };

    Environment {
        phase,
        sky_color,
        star_opacity,
        sun_intensity: SUN_DAY + (SUN_NIGHT - SUN_DAY) * darkness,
        ambient_intensity: AMBIENT_DAY + (AMBIENT_NIGHT - AMBIENT_DAY) * darkness,
        jade_glow: darkness,
    }
}
