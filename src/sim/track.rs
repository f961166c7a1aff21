//! Procedural track
//!
//! The world scrolls toward +z while the player stays at z = 0. A fixed ring of
//! segments gives the illusion of an endless road: when a segment falls behind
//! the camera it jumps to the front and repopulates its stretch of road.
//! Obstacles and pickups always come from the entity pools.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::pool::{EntityId, EntityPool};
use super::state::{Coin, CoinState, Lane, Obstacle, ObstacleKind, PickupKind};
use crate::consts::*;
use crate::tuning::{SpawnBands, SpawnSlot, Tuning};

/// A stretch of road (only its z matters to the simulation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Center z
    pub z: f32,
}

impl Segment {
    /// Edge furthest from the camera
    pub fn far_edge(&self) -> f32 {
        self.z - SEGMENT_LENGTH / 2.0
    }
}

/// Per-frame context the track needs from the rest of the simulation
#[derive(Debug, Clone, Copy)]
pub struct TrackFrame {
    pub dt: f32,
    pub speed: f32,
    /// Run time for animations
    pub elapsed: f32,
    pub player_pos: Vec3,
    pub magnet_active: bool,
}

/// Segments plus the active obstacle/pickup lists and their pools
#[derive(Debug, Default)]
pub struct Track {
    pub segments: Vec<Segment>,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active gold and jade pickups in spawn order
    pub coins: Vec<Coin>,
    obstacle_pool: EntityPool<Obstacle>,
    coin_pool: EntityPool<Coin>,
}

impl Track {
    pub fn new() -> Self {
        let mut track = Self::default();
        track.layout_segments();
        track
    }

    fn layout_segments(&mut self) {
        self.segments = (0..SEGMENT_COUNT)
            .map(|i| Segment {
                z: -(i as f32) * SEGMENT_LENGTH - SEGMENT_LENGTH / 2.0,
            })
            .collect();
    }

    /// Return everything to the pools and pre-warm a fresh stretch of road
    pub fn reset(&mut self, rng: &mut Pcg32, tuning: &Tuning) {
        for obstacle in self.obstacles.drain(..) {
            self.obstacle_pool.release(obstacle);
        }
        for coin in self.coins.drain(..) {
            self.coin_pool.release(coin);
        }
        self.layout_segments();

        let mut z = PREWARM_START_Z;
        while z > PREWARM_END_Z {
            self.spawn_at(z, &tuning.prewarm_bands, rng);
            z -= PREWARM_STEP;
        }
        log::debug!(
            "Track reset: {} obstacles, {} coins pre-warmed",
            self.obstacles.len(),
            self.coins.len()
        );
    }

    /// One spawn point: a single draw decides obstacle, nothing, or coin
    pub fn spawn_at(&mut self, z: f32, bands: &SpawnBands, rng: &mut Pcg32) {
        match bands.classify(rng.random::<f32>()) {
            SpawnSlot::Obstacle => {
                let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
                let lane = Lane::ALL[rng.random_range(0..Lane::ALL.len())];
                self.spawn_obstacle(kind, lane, z);
            }
            SpawnSlot::Coin => {
                let lane = Lane::ALL[rng.random_range(0..Lane::ALL.len())];
                let phase = rng.random::<f32>() * std::f32::consts::TAU;
                self.spawn_coin(lane, z, phase);
            }
            SpawnSlot::Empty => {}
        }
    }

    pub fn spawn_obstacle(&mut self, kind: ObstacleKind, lane: Lane, z: f32) -> EntityId {
        let mut obstacle = self.obstacle_pool.acquire(kind);
        obstacle.place(lane, z);
        let id = obstacle.id;
        self.obstacles.push(obstacle);
        id
    }

    pub fn spawn_coin(&mut self, lane: Lane, z: f32, bob_phase: f32) -> EntityId {
        let mut coin = self.coin_pool.acquire(PickupKind::Gold);
        coin.place(lane, Vec3::new(lane.x(), COIN_Y, z), bob_phase);
        let id = coin.id;
        self.coins.push(coin);
        id
    }

    /// Drop a jade where an obstacle was smashed
    pub fn spawn_jade(&mut self, position: Vec3) -> EntityId {
        let mut jade = self.coin_pool.acquire(PickupKind::Jade);
        let lane = Lane::ALL
            .into_iter()
            .min_by(|a, b| {
                (a.x() - position.x)
                    .abs()
                    .total_cmp(&(b.x() - position.x).abs())
            })
            .unwrap_or_default();
        jade.place(lane, Vec3::new(position.x, COIN_Y, position.z), 0.0);
        let id = jade.id;
        self.coins.push(jade);
        id
    }

    /// Scroll the world by one frame
    pub fn advance(&mut self, frame: &TrackFrame, rng: &mut Pcg32, tuning: &Tuning) {
        let step = frame.speed * frame.dt;

        self.advance_segments(step, rng, tuning);

        // Obstacles
        let mut i = 0;
        while i < self.obstacles.len() {
            self.obstacles[i].pos.z += step;
            if self.obstacles[i].pos.z > DESPAWN_Z {
                let obstacle = self.obstacles.remove(i);
                self.obstacle_pool.release(obstacle);
            } else {
                i += 1;
            }
        }

        // Pickups
        let mut i = 0;
        while i < self.coins.len() {
            let coin = &mut self.coins[i];
            let done = if coin.is_popping() {
                coin.scale += frame.dt * COIN_POP_GROWTH;
                coin.opacity -= frame.dt * COIN_POP_FADE;
                coin.pos.z += step;
                coin.opacity <= 0.0
            } else {
                if coin.kind == PickupKind::Gold && frame.magnet_active {
                    attract(coin, frame, tuning);
                }
                coin.pos.z += step;
                coin.spin += COIN_SPIN_SPEED * frame.dt;
                coin.pos.y = COIN_Y
                    + (frame.elapsed * COIN_BOB_SPEED + coin.bob_phase).sin() * COIN_BOB_AMPLITUDE;
                coin.pos.z > DESPAWN_Z
            };

            if done {
                let coin = self.coins.remove(i);
                self.coin_pool.release(coin);
            } else {
                i += 1;
            }
        }
    }

    fn advance_segments(&mut self, step: f32, rng: &mut Pcg32, tuning: &Tuning) {
        for segment in &mut self.segments {
            segment.z += step;
        }

        for idx in 0..self.segments.len() {
            if self.segments[idx].far_edge() <= SEGMENT_RECYCLE_Z {
                continue;
            }
            let front = self
                .segments
                .iter()
                .map(|s| s.z)
                .fold(f32::INFINITY, f32::min);
            let new_z = front - SEGMENT_LENGTH;
            self.segments[idx].z = new_z;

            let spacing = SEGMENT_LENGTH / SPAWNS_PER_SEGMENT as f32;
            for j in 0..SPAWNS_PER_SEGMENT {
                let z = new_z + j as f32 * spacing - SEGMENT_LENGTH / 2.0;
                self.spawn_at(z, &tuning.segment_bands, rng);
            }
        }
    }

    /// Smash an obstacle: remove it from play and return it to the pool
    pub fn break_obstacle(&mut self, id: EntityId) -> Option<(ObstacleKind, Vec3)> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        let obstacle = self.obstacles.remove(index);
        let hit = (obstacle.kind, obstacle.pos);
        self.obstacle_pool.release(obstacle);
        Some(hit)
    }

    /// Remove every obstacle within `radius` (along z) of `z`
    pub fn clear_obstacles_near(&mut self, z: f32, radius: f32) -> usize {
        let mut cleared = 0;
        let mut i = 0;
        while i < self.obstacles.len() {
            if (self.obstacles[i].pos.z - z).abs() < radius {
                let obstacle = self.obstacles.remove(i);
                self.obstacle_pool.release(obstacle);
                cleared += 1;
            } else {
                i += 1;
            }
        }
        cleared
    }

    pub fn obstacle_pool(&self) -> &EntityPool<Obstacle> {
        &self.obstacle_pool
    }

    pub fn coin_pool(&self) -> &EntityPool<Coin> {
        &self.coin_pool
    }
}

/// Steer a coin toward the player if it is inside the attraction range
fn attract(coin: &mut Coin, frame: &TrackFrame, tuning: &Tuning) {
    let to_player = frame.player_pos - coin.pos;
    if to_player.length() < tuning.attraction_range {
        coin.state = CoinState::Attracted;
        coin.pos += to_player.normalize_or_zero() * tuning.attraction_speed * frame.dt;
    } else if coin.state == CoinState::Attracted {
        coin.state = CoinState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn frame(dt: f32, speed: f32) -> TrackFrame {
        TrackFrame {
            dt,
            speed,
            elapsed: 0.0,
            player_pos: Vec3::new(0.0, GROUND_Y, PLAYER_Z),
            magnet_active: false,
        }
    }

    #[test]
    fn test_reset_prewarms_ahead_of_player() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut track = Track::new();
        track.reset(&mut rng, &Tuning::default());

        assert!(!track.obstacles.is_empty() || !track.coins.is_empty());
        for o in &track.obstacles {
            assert!(o.pos.z <= PREWARM_START_Z && o.pos.z > PREWARM_END_Z);
            assert!(o.active);
        }
        assert_eq!(track.segments.len(), SEGMENT_COUNT);
    }

    #[test]
    fn test_reset_recycles_previous_entities() {
        let mut rng = Pcg32::seed_from_u64(11);
        let tuning = Tuning::default();
        let mut track = Track::new();
        track.reset(&mut rng, &tuning);
        let built = track.obstacle_pool().constructed() + track.coin_pool().constructed();

        track.reset(&mut rng, &tuning);
        let live = track.obstacles.len() + track.coins.len();
        let parked = track.obstacle_pool().len() + track.coin_pool().len();
        let built_after = track.obstacle_pool().constructed() + track.coin_pool().constructed();
        // Every constructed entity is either live or parked
        assert_eq!(live + parked, built_after);
        assert!(built_after >= built);
    }

    #[test]
    fn test_segment_relocates_to_front() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = Tuning::default();
        let mut track = Track::new();
        // Push the nearest segment (center -25) past the recycle line
        track.advance(&frame(1.0, 76.0), &mut rng, &tuning);

        let front: f32 = track.segments.iter().map(|s| s.z).fold(f32::INFINITY, f32::min);
        // Previous front (-275) moved by 76, then one segment length further out
        assert_eq!(front, -249.0);
        assert_eq!(track.segments[0].z, -249.0);
        assert!(track.segments.iter().all(|s| s.far_edge() <= SEGMENT_RECYCLE_Z));
        // 8 spawn points were rolled for the relocated segment
        assert!(!track.obstacles.is_empty() || !track.coins.is_empty());
    }

    #[test]
    fn test_passed_obstacles_return_to_pool() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = Tuning::default();
        let mut track = Track::new();
        track.spawn_obstacle(ObstacleKind::Hay, Lane::Left, 9.5);
        track.advance(&frame(0.1, 10.0), &mut rng, &tuning);

        assert!(track.obstacles.is_empty());
        assert_eq!(track.obstacle_pool().len_of(ObstacleKind::Hay), 1);
    }

    #[test]
    fn test_obstacle_at_despawn_line_stays_live() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = Tuning::default();
        let mut track = Track::new();
        track.spawn_obstacle(ObstacleKind::Crate, Lane::Right, DESPAWN_Z);
        track.advance(&frame(0.0, 10.0), &mut rng, &tuning);

        assert_eq!(track.obstacles.len(), 1);
        assert_eq!(track.obstacle_pool().len_of(ObstacleKind::Crate), 0);
    }

    #[test]
    fn test_popping_coin_fades_then_pools() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = Tuning::default();
        let mut track = Track::new();
        track.spawn_coin(Lane::Center, -5.0, 0.0);
        track.coins[0].start_pop();

        track.advance(&frame(0.1, 0.0), &mut rng, &tuning);
        assert_eq!(track.coins.len(), 1);
        assert!(track.coins[0].scale > 1.0);

        for _ in 0..4 {
            track.advance(&frame(0.1, 0.0), &mut rng, &tuning);
        }
        assert!(track.coins.is_empty());
        assert_eq!(track.coin_pool().len_of(PickupKind::Gold), 1);
    }

    #[test]
    fn test_magnet_steers_nearby_coins() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = Tuning::default();
        let mut track = Track::new();
        track.spawn_coin(Lane::Right, -5.0, 0.0);
        track.spawn_coin(Lane::Right, -40.0, 0.0);

        let mut f = frame(0.1, 0.0);
        f.magnet_active = true;
        track.advance(&f, &mut rng, &tuning);

        let near = &track.coins[0];
        let far = &track.coins[1];
        assert_eq!(near.state, CoinState::Attracted);
        assert!(near.pos.x < LANE_WIDTH);
        assert!(near.pos.z > -5.0);
        assert_eq!(far.state, CoinState::Idle);
        assert_eq!(far.pos.x, LANE_WIDTH);
    }

    #[test]
    fn test_clear_obstacles_near() {
        let mut track = Track::new();
        track.spawn_obstacle(ObstacleKind::Rock, Lane::Center, -5.0);
        track.spawn_obstacle(ObstacleKind::Crate, Lane::Left, -30.0);
        track.spawn_obstacle(ObstacleKind::Crate, Lane::Left, -60.0);

        assert_eq!(track.clear_obstacles_near(0.0, 40.0), 2);
        assert_eq!(track.obstacles.len(), 1);
        assert_eq!(track.obstacles[0].pos.z, -60.0);
    }

    #[test]
    fn test_jade_snaps_to_nearest_lane() {
        let mut track = Track::new();
        track.spawn_jade(Vec3::new(1.7, 0.5, -3.0));
        let jade = &track.coins[0];
        assert_eq!(jade.kind, PickupKind::Jade);
        assert_eq!(jade.lane, Lane::Right);
        assert_eq!(jade.pos.x, 1.7);
    }
}
