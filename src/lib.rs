//! Village Defense - a single-screen wave defense arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (entities, pooling, waves, collisions)
//! - `game`: Loop driver, phase machine and host-facing commands
//! - `config`: Level, wave, monster and skill configuration
//! - `renderer`: Render-surface boundary
//! - `audio`: Sound and haptic cue boundary
//! - `persistence`: Key-value storage and unlocked-level progress
//! - `settings`: Player preferences

pub mod audio;
pub mod config;
pub mod game;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{GameConfig, MonsterCatalog};
pub use game::{Command, Game, GameObserver, Screen};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second (one step per display frame)
    pub const FRAME_RATE: u32 = 60;

    /// Default play field (logical pixels, origin top-left, y grows down)
    pub const SCREEN_WIDTH: f32 = 375.0;
    pub const SCREEN_HEIGHT: f32 = 667.0;

    /// Player
    pub const PLAYER_WIDTH: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Gap between the player's feet and the bottom edge (room for the village)
    pub const PLAYER_BOTTOM_MARGIN: f32 = 100.0;
    /// Frames between auto-fired bullets
    pub const PLAYER_SHOOT_INTERVAL: u64 = 15;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 16.0;
    pub const BULLET_HEIGHT: f32 = 30.0;
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_DAMAGE: f32 = 1.0;

    /// Homing splash attack
    pub const SPLASH_SIZE: f32 = 40.0;
    pub const SPLASH_SPEED: f32 = 8.0;
    pub const SPLASH_DAMAGE: f32 = 2.0;
    pub const SPLASH_INTERVAL: u32 = 60;
    /// Animation frames in the splash sheet; the hit animation plays 1..FRAME_COUNT
    pub const SPLASH_FRAME_COUNT: u32 = 4;
    /// Frames per hit-animation step
    pub const SPLASH_FRAME_STEP: u64 = 5;

    /// Structures
    pub const DEFENSE_LINE_OFFSET: f32 = 180.0; // distance from bottom edge
    pub const DEFENSE_LINE_HEIGHT: f32 = 20.0;
    pub const VILLAGE_WIDTH: f32 = 200.0;
    pub const VILLAGE_HEIGHT: f32 = 80.0;

    /// Health caps (rise on level-up up to the ceilings)
    pub const BASE_STRUCTURE_HEALTH: u32 = 100;
    pub const VILLAGE_HEALTH_PER_LEVEL: u32 = 20;
    pub const VILLAGE_HEALTH_CEILING: u32 = 200;
    pub const DEFENSE_LINE_HEALTH_PER_LEVEL: u32 = 10;
    pub const DEFENSE_LINE_HEALTH_CEILING: u32 = 150;
    /// Defense buff: bonus on both caps, and the ceiling for buffed caps
    pub const DEFENSE_BUFF_AMOUNT: u32 = 50;
    pub const DEFENSE_BUFF_CEILING: u32 = 200;

    /// Score needed per player level
    pub const SCORE_PER_LEVEL: u64 = 200;
    /// Spawn interval multiplier applied on every level-up
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.9;
    /// Difficulty scaling never pushes a wave interval below this many frames
    pub const MIN_SPAWN_INTERVAL: u64 = 15;

    /// Monster sprint
    pub const SPRINT_DURATION_TICKS: u32 = 60;
    pub const SPRINT_TRIGGER_DISTANCE: f32 = 100.0;
    /// Horizontal pixels from centre below which monsters stop drifting
    pub const RECENTER_DEADZONE: f32 = 5.0;

    /// Coin-fly effect
    pub const COIN_FLY_SIZE: f32 = 28.0;
    pub const COIN_FLY_DURATION: u32 = 30;
    /// HUD coin counter position (coin-fly destination)
    pub const COIN_HUD_X: f32 = 54.0;
    pub const COIN_HUD_Y: f32 = 120.0;

    /// Fallback wave synthesis
    pub const DEFAULT_WAVE_COUNTS: [u32; 4] = [2, 4, 6, 8];
    pub const DEFAULT_WAVE_INTERVAL: f32 = 60.0;
}

/// The rectangular play field every entity lives in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: consts::SCREEN_WIDTH,
            height: consts::SCREEN_HEIGHT,
        }
    }
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Monsters start re-centering once they pass this y
    #[inline]
    pub fn midpoint_y(&self) -> f32 {
        self.height / 2.0
    }

    /// Top edge of the defense line
    #[inline]
    pub fn defense_line_y(&self) -> f32 {
        self.height - consts::DEFENSE_LINE_OFFSET
    }

    /// Resolve a configured dimension: values in (0, 1] are a fraction of `extent`
    #[inline]
    pub fn resolve_dimension(value: f32, extent: f32) -> f32 {
        if value > 0.0 && value <= 1.0 {
            value * extent
        } else {
            value
        }
    }
}

/// Unit vector from `from` toward `to`, or `None` when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Option<Vec2> {
    let delta = to - from;
    if delta.length_squared() > 0.0 {
        Some(delta.normalize())
    } else {
        None
    }
}
