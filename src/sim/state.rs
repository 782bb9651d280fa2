//! Match state shared by every simulation component
//!
//! `GameState` is constructed explicitly and passed by `&mut` to whatever
//! needs it. [`GameState::reset`] returns it to start-of-match defaults in
//! place, recovering every live entity into the pool so instances survive
//! across matches.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::effects::CoinFly;
use super::entity::EntityId;
use super::monster::{Monster, MonsterStep};
use super::player::AbilityKind;
use super::pool::ObjectPool;
use super::projectile::{Bullet, Splash, SplashStep};
use super::structure::{Structure, StructureKind};
use crate::PlayField;
use crate::consts::*;

/// Something that happened during a tick, drained by the driver once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player fired a bullet
    Shoot,
    /// A projectile damaged a monster without killing it
    Hit,
    /// A monster was killed by damage
    Explosion,
    /// A monster reached a structure
    StructureDamaged(StructureKind),
    DefenseLineDestroyed,
    VillageDestroyed,
    LevelUp { level: u32 },
    WaveStarted { index: usize },
    ScoreChanged(u64),
    AbilityTriggered(AbilityKind),
    GameOver,
}

/// Complete match state
#[derive(Debug)]
pub struct GameState {
    pub field: PlayField,
    /// Seed the RNG was created from (restored on reset)
    pub seed: u64,
    /// Simulation tick counter
    pub frame: u64,
    pub score: u64,
    pub coins: u64,
    pub level: u32,
    /// Current village health cap
    pub village_health: u32,
    /// Current defense-line health cap
    pub defense_line_health: u32,
    /// Extra cap granted by an active defense buff (0 when none)
    pub cap_bonus: u32,
    pub is_game_over: bool,
    /// Live monsters in spawn order
    pub monsters: Vec<Monster>,
    pub bullets: Vec<Bullet>,
    pub splashes: Vec<Splash>,
    pub coin_flies: Vec<CoinFly>,
    pub defense_line: Structure,
    pub village: Structure,
    pub pool: ObjectPool,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    next_id: EntityId,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_field(PlayField::default(), seed)
    }

    pub fn with_field(field: PlayField, seed: u64) -> Self {
        Self {
            field,
            seed,
            frame: 0,
            score: 0,
            coins: 0,
            level: 1,
            village_health: BASE_STRUCTURE_HEALTH,
            defense_line_health: BASE_STRUCTURE_HEALTH,
            cap_bonus: 0,
            is_game_over: false,
            monsters: Vec::new(),
            bullets: Vec::new(),
            splashes: Vec::new(),
            coin_flies: Vec::new(),
            defense_line: Structure::defense_line(&field, BASE_STRUCTURE_HEALTH),
            village: Structure::village(&field, BASE_STRUCTURE_HEALTH),
            pool: ObjectPool::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Return every per-match field to its start-of-match default. Live
    /// entities are recovered to the pool; the pool itself is kept.
    pub fn reset(&mut self) {
        for mut monster in self.monsters.drain(..) {
            monster.retire();
            self.pool.recover(monster);
        }
        for mut bullet in self.bullets.drain(..) {
            bullet.body.deactivate();
            self.pool.recover(bullet);
        }
        for mut splash in self.splashes.drain(..) {
            splash.body.deactivate();
            self.pool.recover(splash);
        }
        for mut coin in self.coin_flies.drain(..) {
            coin.body.deactivate();
            self.pool.recover(coin);
        }

        self.frame = 0;
        self.score = 0;
        self.coins = 0;
        self.level = 1;
        self.village_health = BASE_STRUCTURE_HEALTH;
        self.defense_line_health = BASE_STRUCTURE_HEALTH;
        self.cap_bonus = 0;
        self.is_game_over = false;
        self.defense_line = Structure::defense_line(&self.field, self.defense_line_health);
        self.village = Structure::village(&self.field, self.village_health);
        self.events.clear();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Difficulty multiplier for monsters spawned at the current level
    pub fn difficulty(&self) -> f32 {
        1.0 + 0.5 * (self.level.saturating_sub(1)) as f32
    }

    /// Increment the level and raise both structure health caps toward
    /// their ceilings.
    pub fn level_up(&mut self) {
        self.level += 1;
        self.apply_caps();
        self.events.push(GameEvent::LevelUp { level: self.level });
        log::info!(
            "Level {} (village cap {}, defense line cap {})",
            self.level,
            self.village_health,
            self.defense_line_health
        );
    }

    /// Village and defense-line caps earned by the current level
    pub fn level_caps(&self) -> (u32, u32) {
        let steps = self.level.saturating_sub(1);
        (
            (BASE_STRUCTURE_HEALTH + steps * VILLAGE_HEALTH_PER_LEVEL).min(VILLAGE_HEALTH_CEILING),
            (BASE_STRUCTURE_HEALTH + steps * DEFENSE_LINE_HEALTH_PER_LEVEL)
                .min(DEFENSE_LINE_HEALTH_CEILING),
        )
    }

    /// Recompute both caps from the level plus any buff bonus and push them
    /// down to the structures
    pub fn apply_caps(&mut self) {
        let (village, defense_line) = self.level_caps();
        let bonus = self.cap_bonus;
        let buffed = |cap: u32| {
            if bonus == 0 {
                cap
            } else {
                (cap + bonus).min(DEFENSE_BUFF_CEILING).max(cap)
            }
        };
        (self.village_health, self.defense_line_health) = (buffed(village), buffed(defense_line));
        self.sync_structure_caps();
    }

    /// Push the global health caps down to the structures
    pub fn sync_structure_caps(&mut self) {
        self.village.sync_cap(self.village_health);
        self.defense_line.sync_cap(self.defense_line_health);
    }

    pub fn game_over(&mut self) {
        if !self.is_game_over {
            self.is_game_over = true;
            self.events.push(GameEvent::GameOver);
            log::info!("Game over at frame {} with score {}", self.frame, self.score);
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    // --- Spawning ---

    pub fn spawn_bullet(&mut self, pos: Vec2, speed: f32, damage: f32) -> EntityId {
        let id = self.next_entity_id();
        let mut bullet: Bullet = self.pool.acquire(Bullet::default);
        bullet.init(id, pos, speed, damage);
        self.bullets.push(bullet);
        id
    }

    pub fn spawn_splash(&mut self, pos: Vec2, speed: f32, damage: f32) -> EntityId {
        let id = self.next_entity_id();
        let mut splash: Splash = self.pool.acquire(Splash::default);
        splash.init(id, pos, speed, damage, &self.monsters);
        self.splashes.push(splash);
        id
    }

    pub fn spawn_coin_fly(&mut self, start: Vec2, value: u32) -> EntityId {
        let id = self.next_entity_id();
        let mut coin: CoinFly = self.pool.acquire(CoinFly::default);
        coin.init(id, start, Vec2::new(COIN_HUD_X, COIN_HUD_Y), value);
        self.coin_flies.push(coin);
        id
    }

    // --- Removal (idempotent: absent ids are a no-op) ---

    /// Remove a monster without reward. Returns false if it was already gone.
    pub fn remove_monster(&mut self, id: EntityId) -> bool {
        let Some(idx) = self.monsters.iter().position(|m| m.body.id == id) else {
            return false;
        };
        let mut monster = self.monsters.remove(idx);
        log::debug!("Monster {} ({}) removed, {} left", id, monster.kind, self.monsters.len());
        monster.retire();
        self.pool.recover(monster);
        true
    }

    pub fn remove_bullet(&mut self, id: EntityId) -> bool {
        let Some(idx) = self.bullets.iter().position(|b| b.body.id == id) else {
            return false;
        };
        let mut bullet = self.bullets.remove(idx);
        bullet.body.deactivate();
        self.pool.recover(bullet);
        true
    }

    pub fn remove_splash(&mut self, id: EntityId) -> bool {
        let Some(idx) = self.splashes.iter().position(|s| s.body.id == id) else {
            return false;
        };
        let mut splash = self.splashes.remove(idx);
        splash.body.deactivate();
        self.pool.recover(splash);
        true
    }

    pub fn remove_coin_fly(&mut self, id: EntityId) -> bool {
        let Some(idx) = self.coin_flies.iter().position(|c| c.body.id == id) else {
            return false;
        };
        let mut coin = self.coin_flies.remove(idx);
        coin.body.deactivate();
        self.pool.recover(coin);
        true
    }

    /// Remove a monster killed by damage and pay out its reward to both
    /// score and coins. Returns the reward, or `None` if the monster had
    /// already been removed this tick (no double payout).
    pub fn kill_monster(&mut self, id: EntityId) -> Option<u32> {
        let monster = self.monsters.iter().find(|m| m.body.id == id)?;
        let reward = monster.score;
        let origin = monster.body.center() - Vec2::splat(COIN_FLY_SIZE / 2.0);

        if !self.remove_monster(id) {
            return None;
        }
        self.coins += u64::from(reward);
        self.add_score(u64::from(reward));
        self.spawn_coin_fly(origin, reward);
        self.events.push(GameEvent::Explosion);
        Some(reward)
    }

    // --- Per-tick collection updates ---

    /// Move bullets and recover the ones that left the field
    pub fn update_bullets(&mut self) {
        let mut expired = Vec::new();
        for bullet in &mut self.bullets {
            if !bullet.update() {
                expired.push(bullet.body.id);
            }
        }
        for id in expired {
            self.remove_bullet(id);
        }
    }

    /// Move monsters; ones that walk off the bottom are recovered unscored
    pub fn update_monsters(&mut self) {
        let mut escaped = Vec::new();
        for monster in &mut self.monsters {
            if monster.update(&self.field, &mut self.rng) == MonsterStep::LeftField {
                escaped.push(monster.body.id);
            }
        }
        for id in escaped {
            self.remove_monster(id);
        }
    }

    /// Advance homing attacks. A strike damages its monster immediately and
    /// kills it when health runs out.
    pub fn update_splashes(&mut self) {
        let mut finished = Vec::new();
        let mut kills = Vec::new();

        for i in 0..self.splashes.len() {
            let splash = &mut self.splashes[i];
            match splash.update(&self.monsters, self.frame, &self.field) {
                SplashStep::Flying => {}
                SplashStep::Finished => finished.push(splash.body.id),
                SplashStep::Struck(target) => {
                    let damage = splash.damage;
                    if let Some(monster) = self.monsters.iter_mut().find(|m| m.body.id == target) {
                        if monster.take_damage(damage) {
                            kills.push(target);
                        } else {
                            self.events.push(GameEvent::Hit);
                        }
                    }
                }
            }
        }

        for id in kills {
            self.kill_monster(id);
        }
        for id in finished {
            self.remove_splash(id);
        }
    }

    pub fn update_coin_flies(&mut self) {
        let mut arrived = Vec::new();
        for coin in &mut self.coin_flies {
            if coin.update() {
                arrived.push(coin.body.id);
            }
        }
        for id in arrived {
            self.remove_coin_fly(id);
        }
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonsterCatalog;
    use crate::sim::pool::PoolCategory;

    fn spawn_monster(state: &mut GameState, kind: &str) -> EntityId {
        let catalog = MonsterCatalog::default();
        let id = state.next_entity_id();
        let mut monster: Monster = state.pool.acquire(Monster::default);
        let difficulty = state.difficulty();
        monster.init(id, catalog.get(kind).unwrap(), difficulty, &state.field, &mut state.rng);
        state.monsters.push(monster);
        id
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1);
        assert_eq!(state.level, 1);
        assert_eq!(state.village_health, 100);
        assert_eq!(state.defense_line_health, 100);
        assert!(state.defense_line.is_alive);
        assert!(state.village.is_alive);
        assert!(!state.is_game_over);
    }

    #[test]
    fn test_level_up_caps() {
        let mut state = GameState::new(1);
        state.level_up();
        assert_eq!(state.level, 2);
        assert_eq!(state.village_health, 120);
        assert_eq!(state.defense_line_health, 110);
        assert_eq!(state.village.max_health, 120.0);

        for _ in 0..10 {
            state.level_up();
        }
        assert_eq!(state.village_health, VILLAGE_HEALTH_CEILING);
        assert_eq!(state.defense_line_health, DEFENSE_LINE_HEALTH_CEILING);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut state = GameState::new(1);
        let id = state.spawn_bullet(Vec2::new(10.0, 10.0), 10.0, 1.0);
        assert!(state.remove_bullet(id));
        assert!(!state.remove_bullet(id));
        assert!(state.bullets.is_empty());
        assert_eq!(state.pool.available(PoolCategory::Bullet), 1);

        let m = spawn_monster(&mut state, "niu");
        assert!(state.remove_monster(m));
        assert!(!state.remove_monster(m));
        assert_eq!(state.pool.available(PoolCategory::Monster), 1);
    }

    #[test]
    fn test_kill_pays_once() {
        let mut state = GameState::new(1);
        let m = spawn_monster(&mut state, "feiji");
        assert_eq!(state.kill_monster(m), Some(20));
        assert_eq!(state.kill_monster(m), None);
        assert_eq!(state.score, 20);
        assert_eq!(state.coins, 20);
        assert_eq!(state.coin_flies.len(), 1);
        assert!(state.events.contains(&GameEvent::Explosion));
    }

    #[test]
    fn test_reset_recovers_everything() {
        let mut state = GameState::new(5);
        spawn_monster(&mut state, "niu");
        state.spawn_bullet(Vec2::ZERO, 10.0, 1.0);
        state.spawn_coin_fly(Vec2::ZERO, 10);
        state.score = 500;
        state.level_up();
        state.game_over();

        state.reset();
        assert!(state.monsters.is_empty());
        assert!(state.bullets.is_empty());
        assert!(state.coin_flies.is_empty());
        assert_eq!(state.pool.total_available(), 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.defense_line.max_health, 100.0);
        assert!(!state.is_game_over);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_escaped_monster_is_not_scored() {
        let mut state = GameState::new(1);
        let m = spawn_monster(&mut state, "niu");
        state.monsters[0].body.pos.y = state.field.height + 100.0;
        state.update_monsters();
        assert!(state.monsters.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.coins, 0);
        assert!(!state.remove_monster(m));
    }

    #[test]
    fn test_splash_kill_rewards() {
        let mut state = GameState::new(1);
        let m = spawn_monster(&mut state, "feiji");
        state.monsters[0].hp = 1.0;
        state.monsters[0].body.pos = Vec2::new(100.0, 200.0);
        let target = state.monsters[0].body.center();
        state.spawn_splash(target - Vec2::splat(SPLASH_SIZE / 2.0), 0.0, 2.0);

        state.update_splashes();
        assert!(state.monsters.iter().all(|x| x.body.id != m));
        assert_eq!(state.score, 20);
        assert_eq!(state.splashes.len(), 1, "splash stays for its hit animation");
        assert!(state.splashes[0].is_hit);
    }
}
