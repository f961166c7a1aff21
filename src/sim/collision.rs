//! Collision detection between the player and track entities
//!
//! Everything is box-vs-box. Boxes are contracted a little so grazing contact
//! does not end a run, while the coin test grows the player box by the magnet
//! radius.

use glam::Vec3;

use super::bounds::Aabb;
use super::state::{Coin, Obstacle, PickupKind};
use crate::consts::*;

/// Player bounding box at a world position
pub fn player_bounds(pos: Vec3) -> Aabb {
    Aabb::from_center(pos, Vec3::splat(PLAYER_SIZE * 0.5))
}

/// First obstacle (in spawn order) overlapping the player, if any
///
/// `expansion` grows the player box after the contraction has been applied.
pub fn check_obstacle_collision<'a>(
    obstacles: &'a [Obstacle],
    player: &Aabb,
    expansion: f32,
) -> Option<&'a Obstacle> {
    let player = player.expanded(-PLAYER_CONTRACTION + expansion);
    obstacles.iter().find(|obstacle| {
        debug_assert!(obstacle.active, "collision against pooled obstacle {}", obstacle.id);
        obstacle
            .bounds()
            .expanded(-OBSTACLE_CONTRACTION)
            .intersects(&player)
    })
}

/// Collect every gold coin inside the (magnet-expanded) player box
///
/// Collected coins switch to popping; already popping coins are skipped.
/// Returns how many were collected.
pub fn check_coin_collision(coins: &mut [Coin], player: &Aabb, magnet_radius: f32) -> u32 {
    let reach = player.expanded(magnet_radius);
    let mut collected = 0;
    for coin in coins
        .iter_mut()
        .filter(|c| c.kind == PickupKind::Gold && !c.is_popping())
    {
        debug_assert!(coin.active, "collision against pooled coin {}", coin.id);
        if coin.bounds().intersects(&reach) {
            coin.start_pop();
            collected += 1;
        }
    }
    collected
}

/// Collect jade pickups on plain contact (magnets don't reach jade)
///
/// Returns the positions of the collected jade.
pub fn check_jade_collision(coins: &mut [Coin], player: &Aabb) -> Vec<Vec3> {
    coins
        .iter_mut()
        .filter(|c| c.kind == PickupKind::Jade && !c.is_popping())
        .filter(|c| c.bounds().intersects(player))
        .map(|jade| {
            jade.start_pop();
            jade.pos
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pool::Poolable;
    use crate::sim::state::{Lane, ObstacleKind};

    fn obstacle(id: u32, kind: ObstacleKind, lane: Lane, z: f32) -> Obstacle {
        let mut o = Obstacle::create(id, kind);
        o.active = true;
        o.place(lane, z);
        o
    }

    fn coin(id: u32, x: f32) -> Coin {
        let mut c = Coin::create(id, PickupKind::Gold);
        c.active = true;
        c.place(Lane::Center, Vec3::new(x, GROUND_Y, PLAYER_Z), 0.0);
        c
    }

    fn standing() -> Aabb {
        player_bounds(Vec3::new(0.0, GROUND_Y, PLAYER_Z))
    }

    #[test]
    fn test_obstacle_in_lane_hits() {
        let obstacles = vec![obstacle(1, ObstacleKind::Crate, Lane::Center, 0.0)];
        let hit = check_obstacle_collision(&obstacles, &standing(), 0.0);
        assert_eq!(hit.map(|o| o.id), Some(1));
    }

    #[test]
    fn test_neighbouring_lane_misses() {
        let obstacles = vec![obstacle(1, ObstacleKind::DoubleCrate, Lane::Left, 0.0)];
        assert!(check_obstacle_collision(&obstacles, &standing(), 0.0).is_none());
    }

    #[test]
    fn test_contraction_forgives_grazing() {
        // Raw boxes overlap by 0.1; the contractions pull them apart
        let obstacles = vec![obstacle(1, ObstacleKind::Crate, Lane::Center, -0.9)];
        assert!(check_obstacle_collision(&obstacles, &standing(), 0.0).is_none());
        // A full unit of ability expansion reaches it again
        assert!(check_obstacle_collision(&obstacles, &standing(), 1.0).is_some());
    }

    #[test]
    fn test_jumping_clears_low_obstacle() {
        let obstacles = vec![obstacle(1, ObstacleKind::Hay, Lane::Center, 0.0)];
        let airborne = player_bounds(Vec3::new(0.0, 2.0, PLAYER_Z));
        assert!(check_obstacle_collision(&obstacles, &airborne, 0.0).is_none());
    }

    #[test]
    fn test_first_in_spawn_order_wins() {
        let obstacles = vec![
            obstacle(4, ObstacleKind::Rock, Lane::Center, 0.2),
            obstacle(2, ObstacleKind::Crate, Lane::Center, -0.2),
        ];
        let hit = check_obstacle_collision(&obstacles, &standing(), 0.0);
        assert_eq!(hit.map(|o| o.id), Some(4));
    }

    #[test]
    fn test_magnet_radius_boundary() {
        let radius = 4.0;
        // Player half width 0.5 + radius + coin half width 0.3
        let edge = PLAYER_SIZE * 0.5 + radius + COIN_RADIUS;
        let eps = 0.01;

        let mut outside = [coin(1, edge + eps)];
        assert_eq!(check_coin_collision(&mut outside, &standing(), radius), 0);
        assert!(!outside[0].is_popping());

        let mut inside = [coin(2, edge - eps)];
        assert_eq!(check_coin_collision(&mut inside, &standing(), radius), 1);
        assert!(inside[0].is_popping());
    }

    #[test]
    fn test_popping_coin_counts_once() {
        let mut coins = [coin(1, 0.0), coin(2, 0.0)];
        assert_eq!(check_coin_collision(&mut coins, &standing(), 0.0), 2);
        assert_eq!(check_coin_collision(&mut coins, &standing(), 0.0), 0);
    }

    #[test]
    fn test_jade_ignores_magnet() {
        let mut jade = Coin::create(9, PickupKind::Jade);
        jade.active = true;
        jade.place(Lane::Right, Vec3::new(LANE_WIDTH, GROUND_Y, PLAYER_Z), 0.0);
        let mut coins = [jade];

        assert_eq!(check_coin_collision(&mut coins, &standing(), 4.0), 0);
        assert!(check_jade_collision(&mut coins, &standing()).is_empty());

        let beside = player_bounds(Vec3::new(LANE_WIDTH, GROUND_Y, PLAYER_Z));
        let got = check_jade_collision(&mut coins, &beside);
        assert_eq!(got.len(), 1);
        assert!(coins[0].is_popping());
    }
}
