//! Player projectiles: straight bullets and homing splash attacks

use glam::Vec2;

use super::entity::{Body, Entity, EntityId};
use super::monster::Monster;
use crate::consts::{
    BULLET_HEIGHT, BULLET_WIDTH, SPLASH_FRAME_COUNT, SPLASH_FRAME_STEP, SPLASH_SIZE,
};
use crate::{PlayField, direction_to};

/// A bullet flying straight up
#[derive(Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    /// Upward speed in pixels per frame
    pub speed: f32,
    pub damage: f32,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            body: Body::new(Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)),
            speed: 0.0,
            damage: 0.0,
        }
    }
}

impl Bullet {
    pub fn init(&mut self, id: EntityId, pos: Vec2, speed: f32, damage: f32) {
        self.body.size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
        self.body.activate(id, pos);
        self.speed = speed;
        self.damage = damage;
    }

    /// Move up; returns false once the bullet has left the top of the field
    pub fn update(&mut self) -> bool {
        self.body.pos.y -= self.speed;
        self.body.pos.y >= -self.body.height()
    }
}

impl Entity for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Outcome of one splash step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashStep {
    Flying,
    /// Struck this monster; damage is applied by the owner of the monster list
    Struck(EntityId),
    /// Hit animation finished or the splash left the field
    Finished,
}

/// A homing attack that flies toward the nearest live monster
///
/// The heading is fixed when a target is chosen and only recomputed when that
/// target disappears. Without any target the splash flies straight up.
#[derive(Debug, Clone)]
pub struct Splash {
    pub body: Body,
    pub speed: f32,
    pub damage: f32,
    pub direction: Vec2,
    /// Sprite rotation (radians, 0 = pointing up)
    pub angle: f32,
    pub target: Option<EntityId>,
    /// Set on impact; the splash then plays its hit animation and finishes
    pub is_hit: bool,
    pub frame_index: u32,
}

impl Default for Splash {
    fn default() -> Self {
        Self {
            body: Body::new(Vec2::splat(SPLASH_SIZE)),
            speed: 0.0,
            damage: 0.0,
            direction: Vec2::NEG_Y,
            angle: 0.0,
            target: None,
            is_hit: false,
            frame_index: 0,
        }
    }
}

impl Splash {
    pub fn init(
        &mut self,
        id: EntityId,
        pos: Vec2,
        speed: f32,
        damage: f32,
        monsters: &[Monster],
    ) {
        self.body.size = Vec2::splat(SPLASH_SIZE);
        self.body.activate(id, pos);
        self.speed = speed;
        self.damage = damage;
        self.is_hit = false;
        self.frame_index = 0;
        self.target = None;
        self.retarget(monsters);
    }

    /// Nearest active monster by centre distance
    pub fn nearest_monster(&self, monsters: &[Monster]) -> Option<EntityId> {
        let origin = self.body.center();
        monsters
            .iter()
            .filter(|m| m.body.active)
            .min_by(|a, b| {
                let da = a.body.center().distance_squared(origin);
                let db = b.body.center().distance_squared(origin);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|m| m.body.id)
    }

    /// Pick the nearest target and aim at it, or fly straight up
    fn retarget(&mut self, monsters: &[Monster]) {
        self.target = self.nearest_monster(monsters);
        let heading = self
            .target
            .and_then(|id| monsters.iter().find(|m| m.body.id == id))
            .and_then(|m| direction_to(self.body.center(), m.body.center()));

        match heading {
            Some(dir) => {
                self.direction = dir;
                self.angle = dir.y.atan2(dir.x) + std::f32::consts::FRAC_PI_2;
            }
            None => {
                self.direction = Vec2::NEG_Y;
                self.angle = 0.0;
            }
        }
    }

    fn target_alive(&self, monsters: &[Monster]) -> bool {
        self.target
            .is_some_and(|id| monsters.iter().any(|m| m.body.id == id && m.body.active))
    }

    /// Advance one frame against the current monster list
    pub fn update(&mut self, monsters: &[Monster], frame: u64, field: &PlayField) -> SplashStep {
        if self.is_hit {
            if frame % SPLASH_FRAME_STEP == 0 {
                self.frame_index += 1;
                if self.frame_index >= SPLASH_FRAME_COUNT {
                    return SplashStep::Finished;
                }
            }
            return SplashStep::Flying;
        }

        if !self.target_alive(monsters) {
            self.retarget(monsters);
        }

        self.body.pos += self.direction * self.speed;

        let pos = self.body.pos;
        if pos.x < -self.body.width()
            || pos.x > field.width
            || pos.y < -self.body.height()
            || pos.y > field.height
        {
            return SplashStep::Finished;
        }

        // First monster in collection order that we touch
        if let Some(monster) = monsters.iter().find(|m| self.collides_with(*m)) {
            self.is_hit = true;
            self.frame_index = 1;
            return SplashStep::Struck(monster.body.id);
        }

        SplashStep::Flying
    }
}

impl Entity for Splash {
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

    fn monster_at(id: EntityId, x: f32, y: f32) -> Monster {
        let mut m = Monster::default();
        m.body.size = Vec2::new(30.0, 30.0);
        m.body.activate(id, Vec2::new(x, y));
        m.hp = 3.0;
        m
    }

    #[test]
    fn test_bullet_moves_up_and_expires() {
        let mut b = Bullet::default();
        b.init(1, Vec2::new(0.0, 5.0), 10.0, 1.0);
        assert!(b.update());
        assert_eq!(b.body.pos.y, -5.0);
        assert!(b.update());
        assert!(b.update());
        assert!(!b.update(), "bullet fully above the field expires");
    }

    #[test]
    fn test_splash_targets_nearest() {
        let monsters = vec![monster_at(1, 0.0, 0.0), monster_at(2, 180.0, 300.0)];
        let mut s = Splash::default();
        s.init(9, Vec2::new(180.0, 500.0), 8.0, 2.0, &monsters);
        assert_eq!(s.target, Some(2));
        assert!(s.direction.y < 0.0);
    }

    #[test]
    fn test_splash_without_target_flies_up() {
        let mut s = Splash::default();
        s.init(9, Vec2::new(100.0, 500.0), 8.0, 2.0, &[]);
        assert_eq!(s.target, None);
        assert_eq!(s.direction, Vec2::NEG_Y);
        let field = PlayField::new(400.0, 800.0);
        assert_eq!(s.update(&[], 1, &field), SplashStep::Flying);
        assert_eq!(s.body.pos, Vec2::new(100.0, 492.0));
    }

    #[test]
    fn test_splash_retargets_when_target_gone() {
        let field = PlayField::new(400.0, 800.0);
        let mut monsters = vec![monster_at(1, 180.0, 400.0), monster_at(2, 0.0, 100.0)];
        let mut s = Splash::default();
        s.init(9, Vec2::new(180.0, 500.0), 8.0, 2.0, &monsters);
        assert_eq!(s.target, Some(1));

        monsters.remove(0);
        s.update(&monsters, 1, &field);
        assert_eq!(s.target, Some(2));
        assert!(s.direction.x < 0.0);
    }

    #[test]
    fn test_splash_hit_then_finishes() {
        let field = PlayField::new(400.0, 800.0);
        let monsters = vec![monster_at(1, 100.0, 100.0)];
        let mut s = Splash::default();
        s.init(9, Vec2::new(100.0, 110.0), 1.0, 2.0, &monsters);

        assert_eq!(s.update(&monsters, 1, &field), SplashStep::Struck(1));
        assert!(s.is_hit);
        assert_eq!(s.frame_index, 1);

        // Hit animation advances every SPLASH_FRAME_STEP frames
        let mut finished_at = None;
        for frame in 2..100 {
            if s.update(&monsters, frame, &field) == SplashStep::Finished {
                finished_at = Some(frame);
                break;
            }
        }
        assert_eq!(finished_at, Some(15));
    }

    #[test]
    fn test_splash_leaving_field_finishes() {
        let field = PlayField::new(400.0, 800.0);
        let mut s = Splash::default();
        s.init(9, Vec2::new(100.0, -35.0), 8.0, 2.0, &[]);
        assert_eq!(s.update(&[], 1, &field), SplashStep::Finished);
    }
}
