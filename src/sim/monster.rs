//! Monsters descending on the village
//!
//! Instances are pooled: [`Monster::init`] fully re-initializes a recycled
//! instance, and [`Monster::retire`] clears everything that must not leak
//! into the next life (notably the sprint countdown).

use glam::Vec2;
use rand::Rng;

use super::entity::{Body, Entity, EntityId};
use crate::PlayField;
use crate::config::MonsterSpec;
use crate::consts::{RECENTER_DEADZONE, SPRINT_DURATION_TICKS, SPRINT_TRIGGER_DISTANCE};

/// Frames each walk-cycle image stays on screen
const ANIMATION_STEP_TICKS: u32 = 11;

/// Outcome of a monster's movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterStep {
    Moving,
    /// Walked off the bottom of the field without being killed
    LeftField,
}

#[derive(Debug, Clone)]
pub struct Monster {
    pub body: Body,
    /// Catalog key
    pub kind: String,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    /// Speed without sprint boost
    pub base_speed: f32,
    /// Damage dealt to a structure on contact
    pub attack: f32,
    /// Reward on death
    pub score: u32,
    pub difficulty: f32,
    pub sprint_chance: f32,
    /// Frames of sprint remaining (0 = not sprinting)
    pub sprint_ticks: u32,
    /// Frames alive, drives the walk-cycle animation
    pub age: u32,
    pub frame_count: u32,
}

impl Default for Monster {
    fn default() -> Self {
        Self {
            body: Body::new(Vec2::ZERO),
            kind: String::new(),
            hp: 0.0,
            max_hp: 0.0,
            speed: 0.0,
            base_speed: 0.0,
            attack: 0.0,
            score: 0,
            difficulty: 1.0,
            sprint_chance: 0.0,
            sprint_ticks: 0,
            age: 0,
            frame_count: 1,
        }
    }
}

impl Monster {
    /// Reset every attribute from `spec` and place the monster just above the
    /// top edge at a random x in the middle 70% of the field.
    pub fn init(
        &mut self,
        id: EntityId,
        spec: &MonsterSpec,
        difficulty: f32,
        field: &PlayField,
        rng: &mut impl Rng,
    ) {
        let (width, height) = spec.size_on(field);
        let margin = field.width * 0.3;
        let x = rng.random::<f32>() * (field.width - margin) + margin * 0.5;

        self.body.size = Vec2::new(width, height);
        self.body.activate(id, Vec2::new(x, -height));

        self.kind.clear();
        self.kind.push_str(&spec.kind);
        self.difficulty = difficulty;
        self.hp = spec.hp * difficulty;
        self.max_hp = self.hp;
        self.base_speed = spec.speed * (1.0 + 0.1 * (difficulty - 1.0));
        self.speed = self.base_speed;
        self.attack = spec.attack;
        self.score = spec.score;
        self.sprint_chance = spec.sprint_chance;
        self.sprint_ticks = 0;
        self.age = 0;
        self.frame_count = spec.frames.len().max(1) as u32;
    }

    pub fn is_alive(&self) -> bool {
        self.body.active && self.hp > 0.0
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprint_ticks > 0
    }

    /// Health remaining as a 0-1 fraction
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Current walk-cycle image
    pub fn animation_frame(&self) -> u32 {
        (self.age / ANIMATION_STEP_TICKS) % self.frame_count
    }

    /// Apply damage; returns true once health is at or below zero
    pub fn take_damage(&mut self, damage: f32) -> bool {
        self.hp -= damage;
        self.hp <= 0.0
    }

    /// Advance one frame: sprint bookkeeping, descent, and re-centering once
    /// past the field's vertical midpoint.
    pub fn update(&mut self, field: &PlayField, rng: &mut impl Rng) -> MonsterStep {
        self.age = self.age.wrapping_add(1);
        self.update_sprint(field, rng);

        self.body.pos.y += self.speed;

        if self.body.pos.y > field.midpoint_y() {
            let to_center = field.center_x() - self.body.center().x;
            if to_center.abs() > RECENTER_DEADZONE {
                self.body.pos.x += self.speed * 0.5 * to_center.signum();
            }
        }

        if self.body.pos.y > field.height + self.body.height() {
            MonsterStep::LeftField
        } else {
            MonsterStep::Moving
        }
    }

    fn update_sprint(&mut self, field: &PlayField, rng: &mut impl Rng) {
        if self.sprint_ticks > 0 {
            self.sprint_ticks -= 1;
            if self.sprint_ticks == 0 {
                self.speed = self.base_speed;
            }
            return;
        }

        let distance = field.defense_line_y() - (self.body.pos.y + self.body.height());
        if distance > 0.0
            && distance < SPRINT_TRIGGER_DISTANCE
            && rng.random::<f32>() < self.sprint_chance
        {
            self.sprint_ticks = SPRINT_DURATION_TICKS;
            self.speed = self.base_speed * 2.0;
        }
    }

    /// Take the monster out of play before it goes back to the pool
    pub fn retire(&mut self) {
        self.body.deactivate();
        self.sprint_ticks = 0;
        self.speed = self.base_speed;
    }
}

impl Entity for Monster {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
