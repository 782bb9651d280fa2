//! Defensive structures: the forward defense line and the rear village
//!
//! Monsters can only reach the village once the defense line has fallen.

use glam::Vec2;

use super::entity::{Body, Entity};
use crate::PlayField;
use crate::consts::{DEFENSE_LINE_HEIGHT, VILLAGE_HEIGHT, VILLAGE_WIDTH};

/// Structure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureKind {
    DefenseLine,
    Village,
}

#[derive(Debug, Clone)]
pub struct Structure {
    pub kind: StructureKind,
    pub body: Body,
    pub health: f32,
    pub max_health: f32,
    pub is_alive: bool,
}

impl Structure {
    /// Full-width line `DEFENSE_LINE_OFFSET` px above the bottom edge
    pub fn defense_line(field: &PlayField, max_health: u32) -> Self {
        let mut body = Body::new(Vec2::new(field.width, DEFENSE_LINE_HEIGHT));
        body.activate(0, Vec2::new(0.0, field.defense_line_y()));
        Self::with_body(StructureKind::DefenseLine, body, max_health)
    }

    /// Village centred on the bottom edge
    pub fn village(field: &PlayField, max_health: u32) -> Self {
        let mut body = Body::new(Vec2::new(VILLAGE_WIDTH, VILLAGE_HEIGHT));
        body.activate(
            0,
            Vec2::new(field.center_x() - VILLAGE_WIDTH / 2.0, field.height - VILLAGE_HEIGHT),
        );
        Self::with_body(StructureKind::Village, body, max_health)
    }

    fn with_body(kind: StructureKind, body: Body, max_health: u32) -> Self {
        Self {
            kind,
            body,
            health: max_health as f32,
            max_health: max_health as f32,
            is_alive: true,
        }
    }

    /// Apply damage; returns true if this hit destroyed the structure
    pub fn take_damage(&mut self, damage: f32) -> bool {
        if !self.is_alive {
            return false;
        }
        self.health -= damage;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.destroy();
            return true;
        }
        false
    }

    pub fn destroy(&mut self) {
        self.is_alive = false;
        self.body.active = false;
    }

    /// Follow the global health cap; health never stays above it
    pub fn sync_cap(&mut self, cap: u32) {
        self.max_health = cap as f32;
        self.health = self.health.min(self.max_health);
    }

    /// Restore health, never above the current cap
    pub fn heal(&mut self, amount: f32) {
        if self.is_alive {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Entity for Structure {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let field = PlayField::new(400.0, 800.0);
        let line = Structure::defense_line(&field, 100);
        let village = Structure::village(&field, 100);
        assert_eq!(line.body.pos, Vec2::new(0.0, 620.0));
        assert_eq!(line.body.width(), 400.0);
        assert_eq!(village.body.pos, Vec2::new(100.0, 720.0));
        // Village sits behind (below) the line
        assert!(village.body.pos.y > line.body.pos.y + line.body.height());
    }

    #[test]
    fn test_destroyed_at_zero() {
        let field = PlayField::default();
        let mut line = Structure::defense_line(&field, 100);
        for _ in 0..9 {
            assert!(!line.take_damage(10.0));
        }
        assert_eq!(line.health, 10.0);
        assert!(line.is_alive);
        assert!(line.take_damage(10.0));
        assert_eq!(line.health, 0.0);
        assert!(!line.is_alive);
        assert!(!line.body.active);
        // Further damage is ignored
        assert!(!line.take_damage(10.0));
    }

    #[test]
    fn test_heal_respects_cap() {
        let field = PlayField::default();
        let mut village = Structure::village(&field, 100);
        village.take_damage(30.0);
        village.heal(50.0);
        assert_eq!(village.health, 100.0);
        village.sync_cap(150);
        village.heal(80.0);
        assert_eq!(village.health, 150.0);
    }

    #[test]
    fn test_lower_cap_clamps_health() {
        let field = PlayField::default();
        let mut line = Structure::defense_line(&field, 150);
        line.sync_cap(110);
        assert_eq!(line.max_health, 110.0);
        assert_eq!(line.health, 110.0);
        line.sync_cap(160);
        assert_eq!(line.health, 110.0);
    }
}
