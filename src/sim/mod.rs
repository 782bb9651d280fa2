//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform code:
//! - One step per display frame, timers are frame countdowns
//! - Seeded RNG only (owned by `GameState`)
//! - Collections keep spawn order; collision scans depend on it

pub mod collision;
pub mod effects;
pub mod entity;
pub mod monster;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod state;
pub mod structure;
pub mod tick;
pub mod waves;

pub use collision::{CollisionReport, resolve_collisions};
pub use effects::CoinFly;
pub use entity::{Aabb, Body, Entity, EntityId};
pub use monster::{Monster, MonsterStep};
pub use player::{Ability, AbilityKind, Player};
pub use pool::{ObjectPool, PoolCategory, Poolable, Pooled};
pub use projectile::{Bullet, Splash, SplashStep};
pub use state::{GameEvent, GameState};
pub use structure::{Structure, StructureKind};
pub use tick::{TickInput, TickOutcome, TickStatus, check_level_up, level_for_score, tick};
pub use waves::{SpawnEvent, WaveScheduler};
