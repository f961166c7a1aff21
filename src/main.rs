//! Harvest Dash headless driver
//!
//! Plays seeded runs with a simple autopilot against a JSON save file and logs
//! what happens. Usage: `harvest-dash [seed] [seconds] [save-path] [tuning.json]`

use std::panic::{AssertUnwindSafe, catch_unwind};

use harvest_dash::Tuning;
use harvest_dash::consts::{MAX_FRAME_DT, PLAYER_Z};
use harvest_dash::persistence::{JsonFileStore, today_key};
use harvest_dash::sim::{GameEvent, Lane, ScreenState, Session, TickInput, tick};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Distance ahead of the player the autopilot reacts to
const LOOKAHEAD: f32 = 14.0;
/// Obstacles closer than this are jumped instead of dodged
const JUMP_DISTANCE: f32 = 4.0;
const DEFAULT_SECONDS: f32 = 120.0;
const DEFAULT_SAVE: &str = "harvest-dash-save.json";

struct Driver {
    session: Session,
    input: TickInput,
    frame_rng: Pcg32,
    runs: u32,
}

impl Driver {
    fn new(session: Session, seed: u64) -> Self {
        Self {
            session,
            input: TickInput::default(),
            frame_rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            runs: 0,
        }
    }

    /// Frame time between 1/120 s and a long hitch, clamped like a real loop
    fn next_dt(&mut self) -> f32 {
        let dt: f32 = if self.frame_rng.random::<f32>() < 0.02 {
            self.frame_rng.random_range(0.05..0.25)
        } else {
            self.frame_rng.random_range(1.0 / 120.0..1.0 / 30.0)
        };
        dt.min(MAX_FRAME_DT)
    }

    fn update(&mut self, dt: f32) {
        match self.session.screen_state() {
            ScreenState::Menu => {
                if self.session.start().is_ok() {
                    self.runs += 1;
                    log::info!("Run {} started", self.runs);
                }
            }
            ScreenState::GameOver => self.settle_game_over(),
            ScreenState::Playing => self.steer(),
            _ => {
                self.session.close_overlay();
            }
        }

        let input = self.input.clone();
        let result = catch_unwind(AssertUnwindSafe(|| tick(&mut self.session, &input, dt)));
        if result.is_err() {
            log::error!("Simulation step panicked, returning to the menu");
            self.session.recover_to_menu();
        }

        // One-shot inputs
        self.input = TickInput::default();

        for event in self.session.drain_events() {
            log_event(&event);
        }
    }

    /// Revive when the wallet allows it, otherwise walk away
    fn settle_game_over(&mut self) {
        let affordable = self
            .session
            .revive_cost()
            .is_some_and(|cost| cost <= self.session.progression().wallet.gold);
        if affordable && self.session.revive().is_ok() {
            return;
        }
        if self.session.revive_remaining().is_some() {
            self.session.dismiss_revive();
        }
        let _ = self.session.go_to_main_menu();
    }

    /// Pick a clear lane, or jump what cannot be dodged
    fn steer(&mut self) {
        let player = self.session.player();
        let lane = player.lane;
        let grounded = !player.is_jumping;

        let nearest_in = |lane: Lane| {
            self.session
                .track()
                .obstacles
                .iter()
                .filter(|o| o.lane == lane)
                .map(|o| PLAYER_Z - o.pos.z)
                .filter(|ahead| (0.0..LOOKAHEAD).contains(ahead))
                .fold(None, |best: Option<f32>, d| Some(best.map_or(d, |b| b.min(d))))
        };

        let Some(ahead) = nearest_in(lane) else {
            return;
        };
        let left = lane.left();
        let right = lane.right();
        if left != lane && nearest_in(left).is_none() {
            self.input.move_left = true;
        } else if right != lane && nearest_in(right).is_none() {
            self.input.move_right = true;
        } else if ahead < JUMP_DISTANCE && grounded {
            self.input.jump = true;
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::GameOver { distance, run_gold } => {
            log::info!("Game over at {distance}m with {run_gold} gold");
        }
        GameEvent::Milestone { bucket } => log::info!("Milestone {bucket}"),
        GameEvent::WeatherChanged(kind) => log::info!("Weather: {kind:?}"),
        GameEvent::Notice(notice) => log::info!("{notice:?}"),
        GameEvent::CoinCollected { .. } | GameEvent::Landed { .. } => {}
        other => log::debug!("{other:?}"),
    }
}

fn main() {
    env_logger::init();
    log::info!("Harvest Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42_u64);
    let seconds = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SECONDS);
    let save_path = args.next().unwrap_or_else(|| DEFAULT_SAVE.to_string());
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read tuning {path}: {e}, using defaults");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let store = JsonFileStore::open_or_fresh(&save_path);
    let session = Session::new(Box::new(store), tuning, seed, &today_key());
    let mut driver = Driver::new(session, seed);

    let mut clock = 0.0;
    while clock < seconds {
        let dt = driver.next_dt();
        driver.update(dt);
        clock += dt;
    }

    let progression = driver.session.progression();
    log::info!(
        "Played {} runs in {seconds}s: {} gold, {} jade, best {}m (saved to {save_path})",
        driver.runs,
        progression.wallet.gold,
        progression.wallet.jade,
        progression.high_score
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_times_stay_clamped() {
        let session = Session::in_memory(Tuning::default(), 3, "2024-05-01");
        let mut driver = Driver::new(session, 3);
        for _ in 0..2000 {
            let dt = driver.next_dt();
            assert!(dt > 0.0 && dt <= MAX_FRAME_DT, "bad frame time {dt}");
        }
    }

    #[test]
    fn test_autopilot_plays_and_restarts() {
        let session = Session::in_memory(Tuning::default(), 8, "2024-05-01");
        let mut driver = Driver::new(session, 8);
        for _ in 0..3000 {
            let dt = driver.next_dt();
            driver.update(dt);
        }
        assert!(driver.runs >= 1);
    }
}
