//! Player controller: lane easing and jump physics

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::collision::player_bounds;
use super::state::Lane;
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Target lane
    pub lane: Lane,
    pub pos: Vec3,
    pub vertical_velocity: f32,
    pub is_jumping: bool,
    /// Time spent buffeted (drives the sandstorm drift)
    pub drift_time: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: Lane::Center,
            pos: Vec3::new(0.0, GROUND_Y, PLAYER_Z),
            vertical_velocity: 0.0,
            is_jumping: false,
            drift_time: 0.0,
        }
    }
}

impl Player {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn move_left(&mut self) {
        self.lane = self.lane.left();
    }

    pub fn move_right(&mut self) {
        self.lane = self.lane.right();
    }

    /// Start a jump; ignored while airborne
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if self.is_jumping {
            return false;
        }
        self.is_jumping = true;
        self.vertical_velocity = tuning.jump_velocity;
        true
    }

    /// Integrate one frame. Returns true on the frame the player lands.
    pub fn update(&mut self, dt: f32, buffeted: bool, tuning: &Tuning) -> bool {
        // Lateral
        let mut target_x = self.lane.x();
        let mut rate = tuning.lane_ease_rate;
        if buffeted {
            self.drift_time += dt;
            rate *= tuning.sandstorm_ease_factor;
            target_x += (self.drift_time * tuning.sandstorm_drift_frequency).sin()
                * tuning.sandstorm_drift_amplitude;
        }
        let ease = 1.0 - (-rate * dt).exp();
        self.pos.x += (target_x - self.pos.x) * ease;
        if buffeted {
            self.pos.x = self.pos.x.clamp(-PLAYABLE_HALF_WIDTH, PLAYABLE_HALF_WIDTH);
        }

        // Vertical
        if !self.is_jumping {
            return false;
        }
        self.pos.y += self.vertical_velocity * dt;
        self.vertical_velocity += tuning.gravity * dt;
        if self.pos.y <= GROUND_Y {
            self.pos.y = GROUND_Y;
            self.vertical_velocity = 0.0;
            self.is_jumping = false;
            return true;
        }
        false
    }

    pub fn bounds(&self) -> Aabb {
        player_bounds(self.pos)
    }
}
