//! Game loop driver
//!
//! Owns the match state and everything around it: the screen machine
//! (`StartPage -> Playing -> GameOver`), the victory overlay, host commands,
//! and the fan-out of simulation events to audio and the host observer.
//! The host calls [`Game::frame`] from its per-frame callback.

use crate::audio::{AudioManager, Haptic, SoundEffect};
use crate::config::{GameConfig, LevelConfig, MonsterCatalog};
use crate::persistence::{KeyValueStore, Progress};
use crate::renderer::{Hud, RenderSurface, render_frame};
use crate::settings::Settings;
use crate::sim::{
    AbilityKind, GameEvent, GameState, Player, TickInput, TickStatus, WaveScheduler, tick,
};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    StartPage,
    Playing,
    GameOver,
}

/// Host-issued commands (menu and dialog buttons)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a level, optionally equipping a skill first
    StartGame {
        level_id: u32,
        skill_id: Option<String>,
    },
    /// Victory dialog: continue with the following level
    NextLevel,
    /// Victory dialog or back button: leave the match
    ReturnHome,
    /// Game over dialog: replay the same level
    Restart,
}

/// Terminal conditions surfaced to the host UI. All methods default to no-ops.
pub trait GameObserver {
    fn on_game_over(&mut self, _score: u64) {}
    fn on_score_change(&mut self, _score: u64) {}
    fn set_victory(&mut self, _victory: bool) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

/// Per-match subsystems, dropped on `destroy`
#[derive(Debug)]
struct Session {
    level: LevelConfig,
    player: Player,
    scheduler: WaveScheduler,
}

pub struct Game {
    config: GameConfig,
    catalog: MonsterCatalog,
    settings: Settings,
    progress: Progress,
    store: Box<dyn KeyValueStore>,
    audio: AudioManager,
    observer: Box<dyn GameObserver>,
    state: GameState,
    session: Option<Session>,
    screen: Screen,
    victory: bool,
    /// Host frame callback is live
    running: bool,
    base_seed: u64,
    matches_started: u64,
}

impl Game {
    /// Build a game on the start page. An invalid level list or monster
    /// catalog is replaced by the baked-in defaults.
    pub fn new(
        config: GameConfig,
        catalog: MonsterCatalog,
        store: Box<dyn KeyValueStore>,
        mut audio: AudioManager,
        observer: Box<dyn GameObserver>,
        seed: u64,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{e}; using default levels");
                GameConfig::default()
            }
        };
        let catalog = match catalog.validate() {
            Ok(()) => catalog,
            Err(e) => {
                log::warn!("{e}; using default monster catalog");
                MonsterCatalog::default()
            }
        };
        let settings = Settings::load(store.as_ref());
        let progress = Progress::load(store.as_ref());
        settings.apply_to(&mut audio);

        Self {
            config,
            catalog,
            settings,
            progress,
            store,
            audio,
            observer,
            state: GameState::new(seed),
            session: None,
            screen: Screen::StartPage,
            victory: false,
            running: false,
            base_seed: seed,
            matches_started: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_victory(&self) -> bool {
        self.victory
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable match state, for hosts and tests that script a match
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn player(&self) -> Option<&Player> {
        self.session.as_ref().map(|s| &s.player)
    }

    pub fn scheduler(&self) -> Option<&WaveScheduler> {
        self.session.as_ref().map(|s| &s.scheduler)
    }

    pub fn level_id(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.level.id)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings dialog: flip and persist the music toggle
    pub fn toggle_music(&mut self) -> bool {
        let on = self.settings.toggle_music();
        self.settings.apply_to(&mut self.audio);
        if on && self.screen == Screen::Playing {
            self.audio.start_music();
        }
        self.settings.save(self.store.as_mut());
        on
    }

    /// Settings dialog: flip and persist the sound toggle
    pub fn toggle_sound(&mut self) -> bool {
        let on = self.settings.toggle_sound();
        self.settings.apply_to(&mut self.audio);
        self.settings.save(self.store.as_mut());
        on
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::StartGame { level_id, skill_id } => {
                if let Some(skill_id) = skill_id {
                    self.settings.skill_id = skill_id;
                    self.settings.save(self.store.as_mut());
                }
                self.start(level_id);
            }
            Command::NextLevel => {
                self.set_victory(false);
                let next = self.level_id().unwrap_or(0) + 1;
                if self.config.level(next).is_some() {
                    self.start(next);
                } else {
                    log::info!("No level after {}, back to the start page", next - 1);
                    self.return_home();
                }
            }
            Command::ReturnHome => {
                self.set_victory(false);
                self.return_home();
            }
            Command::Restart => {
                let level_id = self.level_id().unwrap_or(1);
                self.start(level_id);
            }
        }
    }

    /// Begin a match on `level_id` (unknown ids fall back to the first level)
    pub fn start(&mut self, level_id: u32) {
        let level = match self.config.level(level_id) {
            Some(level) => level.clone(),
            None => {
                log::warn!("Unknown level {level_id}, starting the first level");
                match self.config.levels.first() {
                    Some(level) => level.clone(),
                    None => return,
                }
            }
        };

        self.matches_started += 1;
        self.state.seed = self.base_seed.wrapping_add(self.matches_started);
        self.state.reset();

        let mut player = Player::new(self.state.field);
        player.set_skill(&self.settings.skill_id);
        let scheduler = WaveScheduler::new(level.resolved_waves());

        log::info!(
            "Starting level {} '{}' with {} waves, skill {:?}",
            level.id,
            level.name,
            scheduler.wave_count(),
            player.current_ability().kind
        );

        self.session = Some(Session {
            level,
            player,
            scheduler,
        });
        self.screen = Screen::Playing;
        self.set_victory(false);
        self.running = true;
        self.audio.start_music();
    }

    /// Stop the frame callback and drop the match subsystems. The next
    /// `start` rebuilds everything through `GameState::reset`.
    pub fn destroy(&mut self) {
        self.running = false;
        self.session = None;
        self.audio.stop_music();
        log::debug!("Game loop stopped");
    }

    fn return_home(&mut self) {
        self.destroy();
        self.screen = Screen::StartPage;
    }

    fn set_victory(&mut self, victory: bool) {
        if self.victory != victory {
            self.victory = victory;
            self.observer.set_victory(victory);
        }
    }

    /// Per-frame callback: advance the match one step (while playing)
    pub fn frame(&mut self, input: &TickInput) -> Screen {
        if !self.running || self.screen != Screen::Playing {
            return self.screen;
        }
        let Some(session) = self.session.as_mut() else {
            return self.screen;
        };

        if self.victory {
            // Overlay up: only the passive ability timers keep going
            session.player.update_timers(&mut self.state);
            self.dispatch_events();
            return self.screen;
        }

        let outcome = tick(
            &mut self.state,
            &mut session.player,
            &mut session.scheduler,
            &self.catalog,
            input,
        );
        let level_id = session.level.id;
        self.dispatch_events();

        match outcome.status {
            TickStatus::Running => {}
            TickStatus::GameOver => {
                self.screen = Screen::GameOver;
                self.running = false;
                self.audio.stop_music();
                self.observer.on_game_over(self.state.score);
            }
            TickStatus::Victory => {
                log::info!("Level {level_id} cleared with score {}", self.state.score);
                self.set_victory(true);
                let next = level_id + 1;
                if self.config.level(next).is_some() && self.progress.unlock(next) {
                    self.progress.save(self.store.as_mut());
                }
            }
        }

        self.screen
    }

    /// Forward queued simulation events to audio and the observer
    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Shoot => self.audio.play(SoundEffect::Shoot),
                GameEvent::Hit => self.audio.play(SoundEffect::Hit),
                GameEvent::Explosion => self.audio.play(SoundEffect::Explosion),
                GameEvent::StructureDamaged(_) => self.audio.vibrate(Haptic::Light),
                GameEvent::DefenseLineDestroyed => self.audio.vibrate(Haptic::Medium),
                GameEvent::VillageDestroyed => self.audio.vibrate(Haptic::Heavy),
                GameEvent::LevelUp { .. } => {
                    self.audio.play(SoundEffect::LevelUp);
                    self.audio.vibrate(Haptic::Heavy);
                }
                GameEvent::WaveStarted { .. } => {}
                GameEvent::ScoreChanged(score) => self.observer.on_score_change(score),
                GameEvent::AbilityTriggered(kind) => {
                    let cue = match kind {
                        AbilityKind::ClearBoard => SoundEffect::Explosion,
                        AbilityKind::DefenseBuff => SoundEffect::LevelUp,
                        AbilityKind::RapidFire => SoundEffect::Shoot,
                    };
                    self.audio.play(cue);
                    self.audio.vibrate(Haptic::Heavy);
                }
                GameEvent::GameOver => self.audio.play(SoundEffect::GameOver),
            }
        }
    }

    /// Draw the current match, if any
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        if self.screen != Screen::Playing {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        let hud = Hud {
            score: self.state.score,
            coins: self.state.coins,
            level: self.state.level,
            wave: session.scheduler.wave_index() + 1,
            wave_total: session.scheduler.wave_count(),
            ability_ready: session.player.current_ability().readiness(),
        };
        render_frame(
            surface,
            &self.state,
            &session.player,
            session.level.background_or_default(),
            &hud,
        );
    }
}
