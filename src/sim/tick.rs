//! Per-frame simulation step
//!
//! One call advances every subsystem in a fixed order:
//! inputs, revive offer, run pacing, effects and environment, player, track,
//! then collisions with their rewards. `dt` is variable; every rate is per
//! second.

use super::collision::{check_coin_collision, check_jade_collision, check_obstacle_collision};
use super::effects::apply_speed_ramp;
use super::pool::EntityId;
use super::reward::{RewardModifiers, resolve_gold, roll_jade_drop};
use super::session::{Screen, Session};
use super::state::{EffectKind, GameEvent, ObstacleKind, WeatherKind};
use super::track::TrackFrame;
use crate::progression::QuestKind;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Quick-use a consumable
    pub use_item: Option<EffectKind>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the session by `dt` seconds
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) {
    if input.pause {
        session.toggle_pause();
    }
    if input.move_left {
        session.move_left();
    }
    if input.move_right {
        session.move_right();
    }
    if input.jump {
        session.jump();
    }
    if let Some(kind) = input.use_item {
        // Refusals are reported as notices
        let _ = session.use_item(kind);
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    // The revive offer runs out even behind an overlay
    tick_revive_offer(session, dt);

    if !session.run.is_playing {
        return;
    }

    session.run.elapsed += dt;
    advance_run(session, dt);
    advance_effects(session, dt);

    // Player
    let buffeted = session.weather.kind == WeatherKind::Sandstorm;
    if session.player.update(dt, buffeted, &session.tuning) {
        session.events.push(GameEvent::Landed {
            position: session.player.pos,
        });
    }

    // Track
    let frame = TrackFrame {
        dt,
        speed: session.run.speed,
        elapsed: session.run.elapsed,
        player_pos: session.player.pos,
        magnet_active: session.effects.magnet_active,
    };
    session.track.advance(&frame, &mut session.rng, &session.tuning);

    // Obstacles first so a jade dropped this frame can be picked up at once
    resolve_obstacle_hit(session);
    if session.run.is_playing {
        collect_pickups(session);
    }
}

fn tick_revive_offer(session: &mut Session, dt: f32) {
    if session.screen != Screen::GameOver {
        return;
    }
    let Some(remaining) = session.revive_timer.as_mut() else {
        return;
    };
    *remaining -= dt;
    if *remaining <= 0.0 {
        session.revive_timer = None;
        session.events.push(GameEvent::ReviveExpired);
        session.finalize_run();
    }
}

/// Speed ramp, distance and milestones
fn advance_run(session: &mut Session, dt: f32) {
    let run = &mut session.run;
    run.speed = apply_speed_ramp(run.speed, &mut run.speed_timer, dt, &session.tuning);

    let milestone = session.tuning.milestone_distance.max(1.0);
    let before = (run.distance / milestone).floor() as u64;
    run.distance += run.speed * dt;
    let after = (run.distance / milestone).floor() as u64;
    let meters = run.meters();

    session
        .progression
        .quests
        .record_max(QuestKind::Distance, meters);

    if after > before {
        for bucket in before + 1..=after {
            session.events.push(GameEvent::Milestone { bucket });
        }
        // Distance quest progress is persisted at milestones and at game over
        session.save();
    }
}

/// Effect timers, day/night and weather
fn advance_effects(session: &mut Session, dt: f32) {
    let mut expired = Vec::new();
    session.effects.tick(dt, &mut expired);
    for kind in expired {
        log::debug!("{kind:?} expired");
        session.events.push(GameEvent::EffectExpired(kind));
    }

    session.day_night.advance(dt);

    session.weather.tick(
        dt,
        session.run.distance,
        &mut session.rng,
        &session.tuning,
        &mut session.events,
    );
}

fn collect_pickups(session: &mut Session) {
    let player = session.player.bounds();
    let skin = session.progression.equipped_skin;

    let jades = check_jade_collision(&mut session.track.coins, &player);
    if !jades.is_empty() {
        for position in jades {
            session.progression.wallet.jade += 1;
            session.progression.quests.record(QuestKind::Jades, 1);
            session.events.push(GameEvent::JadeCollected { position });
        }
        session.save();
    }

    let mut magnet_radius = skin.magnet_bonus();
    if session.effects.magnet_active {
        magnet_radius += session.tuning.magnet_radius;
    }
    let coins = check_coin_collision(&mut session.track.coins, &player, magnet_radius);
    if coins > 0 {
        let mods = RewardModifiers::for_run(
            session.weather.kind,
            skin,
            session.progression.has_horseshoe,
            &session.tuning,
        );
        let gold = resolve_gold(coins, &mods);
        session.run.run_coins += gold;
        session.events.push(GameEvent::CoinCollected { coins, gold });
    }
}

fn resolve_obstacle_hit(session: &mut Session) {
    let potion = session.effects.potion_active;
    let expansion = if potion {
        session.progression.equipped_skin.potion_expansion()
    } else {
        0.0
    };
    let player = session.player.bounds();
    let hit: Option<EntityId> =
        check_obstacle_collision(&session.track.obstacles, &player, expansion).map(|o| o.id);

    match hit {
        Some(id) if potion => smash(session, id),
        Some(_) => session.game_over(),
        None => {}
    }
}

/// An invincible player breaks through an obstacle
fn smash(session: &mut Session, id: EntityId) {
    let Some((kind, position)) = session.track.break_obstacle(id) else {
        return;
    };
    session.events.push(GameEvent::ObstacleBroken {
        kind,
        position,
        intensity: kind.hit_intensity(),
    });

    if kind == ObstacleKind::Rock {
        session.progression.quests.record(QuestKind::Stones, 1);
    }

    if roll_jade_drop(&mut session.rng, session.tuning.jade_drop_chance) {
        session.track.spawn_jade(position);
        session.events.push(GameEvent::JadeDropped { position });
    }

    if let Some((every, jade)) = session.progression.equipped_skin.break_streak_bonus() {
        session.run.break_streak += 1;
        if session.run.break_streak >= every {
            session.run.break_streak = 0;
            session.progression.wallet.jade += jade;
            log::info!("Break streak bonus: +{jade} jade");
        }
    }
    session.save();
}
