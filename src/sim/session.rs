//! Game session: screens, player actions and run bookkeeping
//!
//! The session owns every piece of mutable game state; there are no globals.
//! Per-frame simulation lives in [`super::tick`]; this module holds the
//! discrete transitions (start, pause, overlays, shop, revive, game over).
//!
//! Actions that are refused return a [`Rejection`] and also queue a
//! `Notice::Rejected` so the UI can show a toast. Refusals never change state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{EffectState, WeatherState};
use super::environment::{DayNight, Environment};
use super::player::Player;
use super::state::{EffectKind, GameEvent, Notice};
use super::track::Track;
use crate::Rejection;
use crate::consts::*;
use crate::persistence::{MemoryStore, ProgressionStore, now_secs};
use crate::progression::{Progression, QuestKind, Skin};
use crate::tuning::Tuning;

/// Base screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Menu,
    /// In-run heads-up display
    Hud,
    Paused,
    GameOver,
}

/// Modal panel drawn over a base screen (at most one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Shop,
    Bag,
    Quests,
    Guide,
}

impl Overlay {
    /// Base screens the overlay may be opened from
    fn opens_from(self, screen: Screen) -> bool {
        match self {
            Overlay::Shop => matches!(screen, Screen::Menu | Screen::Paused | Screen::GameOver),
            Overlay::Bag => true,
            Overlay::Quests => screen == Screen::Menu,
            Overlay::Guide => matches!(screen, Screen::Menu | Screen::Paused),
        }
    }
}

/// What the player is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenState {
    Menu,
    Playing,
    Paused,
    GameOver,
    ShopOpen,
    BagOpen,
    QuestsOpen,
    GuideOpen,
}

/// Per-run counters, reset by `start`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub is_playing: bool,
    pub game_over: bool,
    /// Meters travelled (fractional)
    pub distance: f32,
    pub speed: f32,
    /// Play time toward the next speed step
    pub speed_timer: f32,
    /// Gold earned this run, after multipliers
    pub run_coins: u64,
    pub revive_count: u32,
    /// Play time this run (animation clock)
    pub elapsed: f32,
    /// Gold already moved to the wallet by an earlier death this run
    pub banked_coins: u64,
    /// Meters already added to lifetime distance by an earlier death
    pub banked_distance: u64,
    /// Obstacles smashed toward the next streak bonus
    pub break_streak: u32,
    /// Leaderboard entry written
    pub recorded: bool,
}

impl RunState {
    /// Whole meters travelled
    pub fn meters(&self) -> u64 {
        self.distance.max(0.0).floor() as u64
    }
}

pub struct Session {
    pub(crate) tuning: Tuning,
    pub(crate) run: RunState,
    pub(crate) player: Player,
    pub(crate) track: Track,
    pub(crate) effects: EffectState,
    pub(crate) weather: WeatherState,
    pub(crate) day_night: DayNight,
    pub(crate) progression: Progression,
    pub(crate) screen: Screen,
    pub(crate) overlay: Option<Overlay>,
    /// Seconds left on the revive offer
    pub(crate) revive_timer: Option<f32>,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    store: Box<dyn ProgressionStore>,
}

impl Session {
    /// Load progression from `store` and sit on the main menu
    pub fn new(mut store: Box<dyn ProgressionStore>, tuning: Tuning, seed: u64, today: &str) -> Self {
        let tuning = tuning.validated();
        let progression = Progression::load(store.as_mut(), today);
        Self {
            run: RunState::default(),
            player: Player::default(),
            track: Track::new(),
            effects: EffectState::default(),
            weather: WeatherState::new(&tuning),
            day_night: DayNight::default(),
            progression,
            screen: Screen::Menu,
            overlay: None,
            revive_timer: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            store,
            tuning,
        }
    }

    /// Session backed by a throwaway in-memory store
    pub fn in_memory(tuning: Tuning, seed: u64, today: &str) -> Self {
        Self::new(Box::new(MemoryStore::new()), tuning, seed, today)
    }

    // === Views ===

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Direct track access for drivers and scripted scenarios
    pub fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    pub fn effects(&self) -> &EffectState {
        &self.effects
    }

    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }

    pub fn environment(&self) -> Environment {
        self.day_night.environment(self.tuning.day_cycle_length)
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn store(&self) -> &dyn ProgressionStore {
        self.store.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.run.is_playing
    }

    pub fn screen_state(&self) -> ScreenState {
        match (self.overlay, self.screen) {
            (Some(Overlay::Shop), _) => ScreenState::ShopOpen,
            (Some(Overlay::Bag), _) => ScreenState::BagOpen,
            (Some(Overlay::Quests), _) => ScreenState::QuestsOpen,
            (Some(Overlay::Guide), _) => ScreenState::GuideOpen,
            (None, Screen::Menu) => ScreenState::Menu,
            (None, Screen::Hud) => ScreenState::Playing,
            (None, Screen::Paused) => ScreenState::Paused,
            (None, Screen::GameOver) => ScreenState::GameOver,
        }
    }

    /// Seconds left to accept the revive offer
    pub fn revive_remaining(&self) -> Option<f32> {
        self.revive_timer
    }

    /// Gold the next revive would cost, if any are left this run
    pub fn revive_cost(&self) -> Option<u64> {
        self.tuning.revive_cost(self.run.revive_count)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Helpers ===

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.events.push(GameEvent::Notice(notice));
    }

    fn reject<T>(&mut self, rejection: Rejection) -> Result<T, Rejection> {
        log::debug!("Rejected: {rejection}");
        self.notify(Notice::Rejected(rejection));
        Err(rejection)
    }

    pub(crate) fn save(&mut self) {
        self.progression.save(self.store.as_mut());
    }

    fn require_overlay(&mut self, overlay: Overlay) -> Result<(), Rejection> {
        if self.overlay == Some(overlay) {
            Ok(())
        } else {
            self.reject(Rejection::InvalidScreen)
        }
    }

    // === Screen flow ===

    /// Begin a new run from the menu or the game over screen
    pub fn start(&mut self) -> Result<(), Rejection> {
        if self.overlay.is_some() || !matches!(self.screen, Screen::Menu | Screen::GameOver) {
            return self.reject(Rejection::InvalidScreen);
        }
        if self.screen == Screen::GameOver {
            self.finalize_run();
        }

        let skin = self.progression.equipped_skin;
        self.run = RunState {
            is_playing: true,
            speed: self.tuning.start_speed * skin.speed_multiplier(),
            ..RunState::default()
        };
        self.player.reset();
        self.effects.clear();
        self.weather.reset(&self.tuning);
        self.day_night.reset();
        self.track.reset(&mut self.rng, &self.tuning);
        self.revive_timer = None;
        self.screen = Screen::Hud;
        log::info!("Run started ({}, speed {:.1})", skin.name(), self.run.speed);
        Ok(())
    }

    /// HUD ⇄ Paused. Returns whether anything changed.
    pub fn toggle_pause(&mut self) -> bool {
        if self.overlay.is_some() {
            return false;
        }
        match self.screen {
            Screen::Hud => {
                self.screen = Screen::Paused;
                self.run.is_playing = false;
                true
            }
            Screen::Paused => {
                self.screen = Screen::Hud;
                self.run.is_playing = true;
                true
            }
            Screen::Menu | Screen::GameOver => false,
        }
    }

    pub fn open_overlay(&mut self, overlay: Overlay) -> Result<(), Rejection> {
        if self.overlay.is_some() || !overlay.opens_from(self.screen) {
            return self.reject(Rejection::InvalidScreen);
        }
        self.overlay = Some(overlay);
        self.run.is_playing = false;
        Ok(())
    }

    /// Close the open overlay; play resumes only if it was opened over the HUD
    pub fn close_overlay(&mut self) -> bool {
        if self.overlay.take().is_none() {
            return false;
        }
        self.run.is_playing = self.screen == Screen::Hud && !self.run.game_over;
        true
    }

    /// Leave a run for the main menu (from pause, game over, or the in-run bag)
    ///
    /// Quitting mid-run abandons it: nothing is banked.
    pub fn go_to_main_menu(&mut self) -> Result<(), Rejection> {
        let allowed = match self.overlay {
            None => matches!(self.screen, Screen::Paused | Screen::GameOver),
            Some(Overlay::Bag) => matches!(self.screen, Screen::Hud | Screen::Paused),
            Some(_) => false,
        };
        if !allowed {
            return self.reject(Rejection::InvalidScreen);
        }
        if self.screen == Screen::GameOver {
            self.revive_timer = None;
            self.finalize_run();
        } else {
            log::info!("Run abandoned at {}m", self.run.meters());
        }
        self.overlay = None;
        self.screen = Screen::Menu;
        self.run.is_playing = false;
        self.run.game_over = false;
        Ok(())
    }

    /// Return to the menu after a failed tick, keeping saved progression
    pub fn recover_to_menu(&mut self) {
        log::warn!("Recovering session to the main menu");
        self.overlay = None;
        self.screen = Screen::Menu;
        self.run = RunState::default();
        self.revive_timer = None;
        self.effects.clear();
        self.player.reset();
    }

    // === Run input ===

    pub fn move_left(&mut self) {
        if self.run.is_playing {
            self.player.move_left();
        }
    }

    pub fn move_right(&mut self) {
        if self.run.is_playing {
            self.player.move_right();
        }
    }

    pub fn jump(&mut self) -> bool {
        self.run.is_playing && self.player.jump(&self.tuning)
    }

    /// Spend a charge to start an effect (HUD, or the bag during a run)
    pub fn use_item(&mut self, kind: EffectKind) -> Result<(), Rejection> {
        let in_run = match self.overlay {
            None => self.screen == Screen::Hud && self.run.is_playing,
            Some(Overlay::Bag) => matches!(self.screen, Screen::Hud | Screen::Paused),
            Some(_) => false,
        };
        if !in_run {
            return self.reject(Rejection::NotPlaying);
        }
        if self.effects.is_active(kind) {
            return self.reject(Rejection::AlreadyActive);
        }
        if let Err(rejection) = self.progression.inventory.take(kind) {
            return self.reject(rejection);
        }

        let bonus = match kind {
            EffectKind::Magnet => 0.0,
            EffectKind::Potion => self.progression.equipped_skin.potion_bonus(),
        };
        let duration = match kind {
            EffectKind::Magnet => self.tuning.magnet_duration,
            EffectKind::Potion => self.tuning.potion_duration,
        } + bonus;
        if let Err(rejection) = self.effects.activate(kind, duration) {
            return self.reject(rejection);
        }

        self.events.push(GameEvent::EffectActivated(kind));
        if bonus > 0.0 {
            self.notify(Notice::PotionBonus { seconds: bonus });
        }
        log::info!("{kind:?} active for {duration:.0}s");
        self.save();
        if self.overlay == Some(Overlay::Bag) {
            self.close_overlay();
        }
        Ok(())
    }

    // === Death and revive ===

    /// End the run: bank rewards, update records, and offer a revive
    pub(crate) fn game_over(&mut self) {
        self.run.is_playing = false;
        self.run.game_over = true;
        self.screen = Screen::GameOver;
        self.overlay = None;

        let meters = self.run.meters();
        let gold = self.run.run_coins.saturating_sub(self.run.banked_coins);
        let distance = meters.saturating_sub(self.run.banked_distance);
        self.progression.wallet.gold += gold;
        self.progression.total_distance += distance;
        self.run.banked_coins = self.run.run_coins;
        self.run.banked_distance = meters;

        if meters > self.progression.high_score {
            self.progression.high_score = meters;
            self.notify(Notice::NewPersonalBest { distance: meters });
        }
        self.events.push(GameEvent::GameOver {
            distance: meters,
            run_gold: self.run.run_coins,
        });
        log::info!(
            "Game over at {meters}m with {} gold (revives used: {})",
            self.run.run_coins,
            self.run.revive_count
        );

        match self.revive_cost() {
            Some(cost) => {
                let window = self.tuning.revive_window;
                self.revive_timer = Some(window);
                self.events.push(GameEvent::ReviveOffered { cost, window });
                self.save();
            }
            None => self.finalize_run(),
        }
    }

    /// Write the leaderboard entry once the run can no longer continue
    pub(crate) fn finalize_run(&mut self) {
        if !self.run.game_over || self.run.recorded {
            return;
        }
        self.run.recorded = true;
        if let Some(rank) =
            self.progression
                .leaderboard
                .add_run(self.run.meters(), self.run.run_coins, now_secs())
        {
            log::info!("Run ranked #{rank} on the leaderboard");
        }
        self.save();
    }

    /// Pay to continue a run from the game over screen
    pub fn revive(&mut self) -> Result<(), Rejection> {
        if self.overlay.is_some() || self.screen != Screen::GameOver {
            return self.reject(Rejection::InvalidScreen);
        }
        let Some(cost) = self.revive_cost() else {
            return self.reject(Rejection::ReviveLimitReached);
        };
        if self.revive_timer.is_none() {
            return self.reject(Rejection::ReviveWindowClosed);
        }
        if let Err(rejection) = self.progression.wallet.spend(cost, 0) {
            return self.reject(rejection);
        }

        self.run.revive_count += 1;
        self.revive_timer = None;
        self.run.game_over = false;
        self.run.is_playing = true;
        self.screen = Screen::Hud;

        let cleared = self
            .track
            .clear_obstacles_near(PLAYER_Z, self.tuning.revive_clear_radius);
        let grace = self.tuning.revive_grace;
        self.effects.grant(EffectKind::Potion, grace);
        self.notify(Notice::Revived { grace });
        log::info!(
            "Revived for {cost} gold ({} of {}), cleared {cleared} obstacles",
            self.run.revive_count,
            self.tuning.revive_limit()
        );
        self.save();
        Ok(())
    }

    /// Decline the revive offer
    pub fn dismiss_revive(&mut self) -> bool {
        if self.revive_timer.take().is_none() {
            return false;
        }
        self.finalize_run();
        true
    }

    // === Shop, skins, quests ===

    pub fn buy_item(&mut self, kind: EffectKind) -> Result<(), Rejection> {
        self.require_overlay(Overlay::Shop)?;
        if let Err(rejection) = self.progression.buy_item(kind, &self.tuning) {
            return self.reject(rejection);
        }
        self.save();
        Ok(())
    }

    pub fn buy_skin(&mut self, skin: Skin) -> Result<(), Rejection> {
        self.require_overlay(Overlay::Shop)?;
        if let Err(rejection) = self.progression.buy_skin(skin) {
            return self.reject(rejection);
        }
        self.notify(Notice::SkinUnlocked(skin));
        self.save();
        Ok(())
    }

    pub fn equip_skin(&mut self, skin: Skin) -> Result<(), Rejection> {
        self.require_overlay(Overlay::Shop)?;
        if let Err(rejection) = self.progression.equip_skin(skin) {
            return self.reject(rejection);
        }
        self.notify(Notice::SkinEquipped(skin));
        self.save();
        Ok(())
    }

    pub fn mint_horseshoe(&mut self) -> Result<(), Rejection> {
        self.require_overlay(Overlay::Shop)?;
        if let Err(rejection) = self.progression.mint_horseshoe(&self.tuning) {
            return self.reject(rejection);
        }
        self.notify(Notice::HorseshoeMinted);
        self.save();
        Ok(())
    }

    pub fn claim_quest(&mut self, kind: QuestKind) -> Result<u64, Rejection> {
        self.require_overlay(Overlay::Quests)?;
        match self.progression.claim_quest(kind) {
            Ok(reward) => {
                self.notify(Notice::QuestClaimed { reward });
                self.save();
                Ok(reward)
            }
            Err(rejection) => self.reject(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::keys;

    const TODAY: &str = "2024-05-01";

    fn session_with(store: MemoryStore) -> Session {
        Session::new(Box::new(store), Tuning::default(), 42, TODAY)
    }

    fn rejections(session: &mut Session) -> Vec<Rejection> {
        session
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Notice(Notice::Rejected(r)) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_and_pause() {
        let mut s = Session::in_memory(Tuning::default(), 1, TODAY);
        assert_eq!(s.screen_state(), ScreenState::Menu);
        assert!(!s.toggle_pause());

        s.start().unwrap();
        assert_eq!(s.screen_state(), ScreenState::Playing);
        assert!(s.is_playing());
        assert_eq!(s.run().speed, 10.0);

        assert!(s.toggle_pause());
        assert_eq!(s.screen_state(), ScreenState::Paused);
        assert!(!s.is_playing());
        assert!(s.toggle_pause());
        assert!(s.is_playing());
    }

    #[test]
    fn test_start_refused_mid_run() {
        let mut s = Session::in_memory(Tuning::default(), 1, TODAY);
        s.start().unwrap();
        assert_eq!(s.start(), Err(Rejection::InvalidScreen));
        assert_eq!(rejections(&mut s), vec![Rejection::InvalidScreen]);
    }

    #[test]
    fn test_neon_runner_starts_faster() {
        let store = MemoryStore::new()
            .with(keys::OWNED_SKINS, r#"["Classic Farmer","Neon Runner"]"#)
            .with(keys::EQUIPPED_SKIN, r#""Neon Runner""#);
        let mut s = session_with(store);
        s.start().unwrap();
        assert!((s.run().speed - 11.5).abs() < 1e-5);
    }

    #[test]
    fn test_overlay_permissions() {
        let mut s = Session::in_memory(Tuning::default(), 1, TODAY);
        assert_eq!(s.open_overlay(Overlay::Quests), Ok(()));
        // One overlay at a time
        assert_eq!(s.open_overlay(Overlay::Guide), Err(Rejection::InvalidScreen));
        s.close_overlay();

        s.start().unwrap();
        assert_eq!(s.open_overlay(Overlay::Shop), Err(Rejection::InvalidScreen));
        assert_eq!(s.open_overlay(Overlay::Quests), Err(Rejection::InvalidScreen));
        assert_eq!(s.open_overlay(Overlay::Bag), Ok(()));
        assert!(!s.is_playing());
        s.close_overlay();
        assert!(s.is_playing());

        s.toggle_pause();
        assert_eq!(s.open_overlay(Overlay::Guide), Ok(()));
        s.close_overlay();
        assert_eq!(s.screen_state(), ScreenState::Paused);
        assert!(!s.is_playing());
    }

    #[test]
    fn test_use_item_rules() {
        let store = MemoryStore::new().with(keys::INVENTORY, r#"{"magnet":1,"potion":0}"#);
        let mut s = session_with(store);
        assert_eq!(s.use_item(EffectKind::Magnet), Err(Rejection::NotPlaying));

        s.start().unwrap();
        assert_eq!(s.use_item(EffectKind::Potion), Err(Rejection::NoCharges));
        assert_eq!(s.use_item(EffectKind::Magnet), Ok(()));
        assert!(s.effects().is_active(EffectKind::Magnet));
        assert_eq!(s.use_item(EffectKind::Magnet), Err(Rejection::AlreadyActive));
        assert_eq!(s.progression().inventory.magnet, 0);
    }

    #[test]
    fn test_using_item_from_bag_closes_it() {
        let store = MemoryStore::new().with(keys::INVENTORY, r#"{"potion":1}"#);
        let mut s = session_with(store);
        s.start().unwrap();
        s.open_overlay(Overlay::Bag).unwrap();
        s.use_item(EffectKind::Potion).unwrap();
        assert_eq!(s.screen_state(), ScreenState::Playing);
        assert!(s.is_playing());
        assert_eq!(s.effects().remaining(EffectKind::Potion), 20.0);
    }

    #[test]
    fn test_iron_knight_potion_bonus() {
        let store = MemoryStore::new()
            .with(keys::INVENTORY, r#"{"potion":1}"#)
            .with(keys::OWNED_SKINS, r#"["Classic Farmer","Iron Knight"]"#)
            .with(keys::EQUIPPED_SKIN, r#""Iron Knight""#);
        let mut s = session_with(store);
        s.start().unwrap();
        s.use_item(EffectKind::Potion).unwrap();
        assert_eq!(s.effects().remaining(EffectKind::Potion), 23.0);
        assert!(
            s.drain_events()
                .contains(&GameEvent::Notice(Notice::PotionBonus { seconds: 3.0 }))
        );
    }

    #[test]
    fn test_shop_requires_shop_overlay() {
        let store = MemoryStore::new().with(keys::TOTAL_GOLD, "100");
        let mut s = session_with(store);
        assert_eq!(s.buy_item(EffectKind::Magnet), Err(Rejection::InvalidScreen));
        s.open_overlay(Overlay::Shop).unwrap();
        assert_eq!(s.buy_item(EffectKind::Magnet), Ok(()));
        assert_eq!(s.progression().wallet.gold, 70);
        assert_eq!(s.store().load(keys::TOTAL_GOLD).as_deref(), Some("70"));
    }

    #[test]
    fn test_game_over_banks_once_across_revive() {
        let store = MemoryStore::new().with(keys::TOTAL_GOLD, "1000");
        let mut s = session_with(store);
        s.start().unwrap();
        s.run.run_coins = 40;
        s.run.distance = 120.7;
        s.game_over();
        assert_eq!(s.progression().wallet.gold, 1040);
        assert_eq!(s.progression().total_distance, 120);
        assert_eq!(s.progression().high_score, 120);
        assert_eq!(s.revive_remaining(), Some(10.0));

        s.revive().unwrap();
        assert_eq!(s.progression().wallet.gold, 940);
        s.run.run_coins = 55;
        s.run.distance = 300.2;
        s.game_over();
        // Only the second stretch is banked
        assert_eq!(s.progression().wallet.gold, 955);
        assert_eq!(s.progression().total_distance, 300);
    }

    #[test]
    fn test_leaderboard_written_once_per_run() {
        let mut s = Session::in_memory(Tuning::default(), 1, TODAY);
        s.start().unwrap();
        s.run.distance = 50.0;
        s.game_over();
        assert!(s.progression().leaderboard.is_empty());
        assert!(s.dismiss_revive());
        assert_eq!(s.progression().leaderboard.entries.len(), 1);
        assert!(!s.dismiss_revive());

        s.go_to_main_menu().unwrap();
        assert_eq!(s.progression().leaderboard.entries.len(), 1);
        assert_eq!(s.screen_state(), ScreenState::Menu);
    }

    #[test]
    fn test_quit_from_bag_abandons_run() {
        let mut s = Session::in_memory(Tuning::default(), 1, TODAY);
        s.start().unwrap();
        s.run.run_coins = 12;
        assert_eq!(s.go_to_main_menu(), Err(Rejection::InvalidScreen));
        s.open_overlay(Overlay::Bag).unwrap();
        s.go_to_main_menu().unwrap();
        assert_eq!(s.screen_state(), ScreenState::Menu);
        assert_eq!(s.progression().wallet.gold, 0);
    }
}
