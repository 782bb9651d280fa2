//! The player's shooter and its special abilities
//!
//! The shooter sits at a fixed height near the bottom of the field, follows
//! the pointer horizontally, auto-fires bullets on a frame cadence and
//! launches a homing splash once per interval while monsters are on the
//! field. One of three abilities is equipped at a time; all cooldowns and
//! durations are frame countdowns.

use glam::Vec2;

use super::entity::{Body, Entity};
use super::state::{GameEvent, GameState};
use crate::PlayField;
use crate::consts::*;

/// The fixed triple of special abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    /// Destroy every monster on the field for half score
    ClearBoard,
    /// Temporarily raise and refill structure health
    DefenseBuff,
    /// Halve the bullet interval for a few seconds
    RapidFire,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 3] = [
        AbilityKind::ClearBoard,
        AbilityKind::DefenseBuff,
        AbilityKind::RapidFire,
    ];

    /// Map a configured skill id to its ability
    pub fn from_skill_id(id: &str) -> Option<Self> {
        match id {
            "clearScreen" => Some(Self::ClearBoard),
            "defenseBuff" => Some(Self::DefenseBuff),
            "rapidFire" => Some(Self::RapidFire),
            _ => None,
        }
    }

    pub fn skill_id(self) -> &'static str {
        match self {
            Self::ClearBoard => "clearScreen",
            Self::DefenseBuff => "defenseBuff",
            Self::RapidFire => "rapidFire",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::ClearBoard => 0,
            Self::DefenseBuff => 1,
            Self::RapidFire => 2,
        }
    }

    pub fn cooldown_ticks(self) -> u32 {
        let seconds = match self {
            Self::ClearBoard => 30,
            Self::DefenseBuff => 45,
            Self::RapidFire => 20,
        };
        seconds * FRAME_RATE
    }

    /// Ticks the effect lasts (0 for instant abilities)
    pub fn duration_ticks(self) -> u32 {
        let seconds = match self {
            Self::ClearBoard => 0,
            Self::DefenseBuff => 10,
            Self::RapidFire => 5,
        };
        seconds * FRAME_RATE
    }
}

/// Runtime state of one ability slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ability {
    pub kind: AbilityKind,
    pub cooldown_remaining: u32,
    pub active_remaining: u32,
}

impl Ability {
    fn new(kind: AbilityKind) -> Self {
        Self {
            kind,
            cooldown_remaining: 0,
            active_remaining: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    pub fn is_active(&self) -> bool {
        self.active_remaining > 0
    }

    /// Cooldown progress 0-1 (1 = ready), for the HUD
    pub fn readiness(&self) -> f32 {
        let total = self.kind.cooldown_ticks();
        if total == 0 {
            return 1.0;
        }
        1.0 - self.cooldown_remaining as f32 / total as f32
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub field: PlayField,
    pub bullet_damage: f32,
    pub bullet_speed: f32,
    pub splash_damage: f32,
    pub splash_speed: f32,
    pub splash_interval: u32,
    pub splash_timer: u32,
    pub abilities: [Ability; 3],
    /// Index of the equipped ability
    pub current: usize,
}

impl Player {
    pub fn new(field: PlayField) -> Self {
        let mut player = Self {
            body: Body::new(Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)),
            field,
            bullet_damage: BULLET_DAMAGE,
            bullet_speed: BULLET_SPEED,
            splash_damage: SPLASH_DAMAGE,
            splash_speed: SPLASH_SPEED,
            splash_interval: SPLASH_INTERVAL,
            splash_timer: 0,
            abilities: AbilityKind::ALL.map(Ability::new),
            current: 0,
        };
        player.reset();
        player
    }

    /// Back to start-of-match stats, centred, every ability ready. The
    /// equipped ability is kept.
    pub fn reset(&mut self) {
        let pos = Vec2::new(
            self.field.center_x() - PLAYER_WIDTH / 2.0,
            self.field.height - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
        );
        self.body.activate(0, pos);
        self.bullet_damage = BULLET_DAMAGE;
        self.bullet_speed = BULLET_SPEED;
        self.splash_damage = SPLASH_DAMAGE;
        self.splash_speed = SPLASH_SPEED;
        self.splash_interval = SPLASH_INTERVAL;
        self.splash_timer = 0;
        self.abilities = AbilityKind::ALL.map(Ability::new);
    }

    /// Equip the ability matching a skill id; unknown ids keep the current one
    pub fn set_skill(&mut self, skill_id: &str) -> AbilityKind {
        match AbilityKind::from_skill_id(skill_id) {
            Some(kind) => self.current = kind.index(),
            None => log::warn!("Unknown skill '{skill_id}', keeping {:?}", self.current_ability().kind),
        }
        self.current_ability().kind
    }

    pub fn current_ability(&self) -> &Ability {
        &self.abilities[self.current]
    }

    /// Equip the next ability in the triple
    pub fn cycle_ability(&mut self) -> AbilityKind {
        self.current = (self.current + 1) % self.abilities.len();
        self.current_ability().kind
    }

    pub fn is_rapid_fire(&self) -> bool {
        self.abilities[AbilityKind::RapidFire.index()].is_active()
    }

    /// Frames between bullets
    pub fn shoot_interval(&self) -> u64 {
        if self.is_rapid_fire() {
            PLAYER_SHOOT_INTERVAL / 2
        } else {
            PLAYER_SHOOT_INTERVAL
        }
    }

    /// Follow the pointer horizontally, staying inside the field
    pub fn move_to(&mut self, x: f32) {
        let max_x = (self.field.width - self.body.width()).max(0.0);
        self.body.pos.x = (x - self.body.width() / 2.0).clamp(0.0, max_x);
    }

    /// Stat increase on level-up
    pub fn upgrade(&mut self) {
        self.bullet_damage += 0.5;
        self.bullet_speed += 1.0;
    }

    /// Per-tick player step: move, fire, launch splashes, run timers
    pub fn update(&mut self, state: &mut GameState, target_x: Option<f32>) {
        if state.is_game_over {
            return;
        }
        if let Some(x) = target_x {
            self.move_to(x);
        }

        if state.frame % self.shoot_interval() == 0 {
            self.shoot(state);
        }

        self.splash_timer += 1;
        if self.splash_timer >= self.splash_interval {
            self.shoot_splash(state);
            self.splash_timer = 0;
        }

        self.update_timers(state);
    }

    fn muzzle(&self, projectile_width: f32) -> Vec2 {
        Vec2::new(
            self.body.pos.x + self.body.width() / 2.0 - projectile_width / 2.0,
            self.body.pos.y - 10.0,
        )
    }

    pub fn shoot(&self, state: &mut GameState) {
        state.spawn_bullet(self.muzzle(BULLET_WIDTH), self.bullet_speed, self.bullet_damage);
        state.events.push(GameEvent::Shoot);
    }

    /// Launch a homing splash; nothing happens on an empty field
    pub fn shoot_splash(&self, state: &mut GameState) {
        if state.monsters.is_empty() {
            return;
        }
        state.spawn_splash(self.muzzle(SPLASH_SIZE), self.splash_speed, self.splash_damage);
        state.events.push(GameEvent::Shoot);
    }

    /// Advance cooldowns and active durations. Runs even while the victory
    /// overlay suspends the rest of the simulation.
    pub fn update_timers(&mut self, state: &mut GameState) {
        let mut expired = Vec::new();
        for ability in &mut self.abilities {
            ability.cooldown_remaining = ability.cooldown_remaining.saturating_sub(1);
            if ability.active_remaining > 0 {
                ability.active_remaining -= 1;
                if ability.active_remaining == 0 {
                    expired.push(ability.kind);
                }
            }
        }
        for kind in expired {
            self.on_expire(kind, state);
        }
    }

    fn on_expire(&mut self, kind: AbilityKind, state: &mut GameState) {
        log::debug!("{kind:?} wore off");
        if kind != AbilityKind::DefenseBuff {
            return;
        }
        // Back to whatever the level has earned; health is clamped
        state.cap_bonus = 0;
        state.apply_caps();
    }

    /// Fire the equipped ability. Returns false while it is cooling down.
    pub fn trigger_ability(&mut self, state: &mut GameState) -> bool {
        let ability = self.abilities[self.current];
        if !ability.is_ready() {
            return false;
        }

        match ability.kind {
            AbilityKind::ClearBoard => {
                let ids: Vec<_> = state.monsters.iter().map(|m| (m.body.id, m.score)).collect();
                let mut points = 0;
                for (id, score) in ids {
                    if state.remove_monster(id) {
                        points += u64::from(score / 2);
                    }
                }
                if points > 0 {
                    state.add_score(points);
                }
            }
            AbilityKind::DefenseBuff => {
                state.cap_bonus = DEFENSE_BUFF_AMOUNT;
                state.apply_caps();
                state.village.heal(DEFENSE_BUFF_AMOUNT as f32);
                state.defense_line.heal(DEFENSE_BUFF_AMOUNT as f32);
            }
            AbilityKind::RapidFire => {}
        }

        let slot = &mut self.abilities[self.current];
        slot.cooldown_remaining = slot.kind.cooldown_ticks();
        slot.active_remaining = slot.kind.duration_ticks();
        state.events.push(GameEvent::AbilityTriggered(slot.kind));
        log::info!("{:?} triggered", slot.kind);
        true
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
