//! Shared entity capabilities
//!
//! Every simulated actor embeds a [`Body`]: top-left position, size, and the
//! `active` (simulated) / `visible` (rendered) flags. Collision between any
//! two actors is axis-aligned rectangle overlap with strict inequalities, so
//! boxes that only share an edge do not touch.

use glam::Vec2;

/// Entity identifier, unique within a match
pub type EntityId = u32;

/// Axis-aligned bounding box `[min.x, max.x] x [min.y, max.y]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap test; shared edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Position, size and lifecycle flags shared by all actors
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Participates in simulation and collision
    pub active: bool,
    /// Participates in rendering
    pub visible: bool,
}

impl Body {
    pub fn new(size: Vec2) -> Self {
        Self {
            id: 0,
            pos: Vec2::ZERO,
            size,
            active: false,
            visible: false,
        }
    }

    /// Bring a pooled body back to life at `pos`
    pub fn activate(&mut self, id: EntityId, pos: Vec2) {
        self.id = id;
        self.pos = pos;
        self.active = true;
        self.visible = true;
    }

    /// Take the body out of simulation and rendering
    pub fn deactivate(&mut self) {
        self.active = false;
        self.visible = false;
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// Capability set implemented by every simulated actor
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn id(&self) -> EntityId {
        self.body().id
    }

    fn is_active(&self) -> bool {
        self.body().active
    }

    fn is_visible(&self) -> bool {
        self.body().visible
    }

    fn bounds(&self) -> Aabb {
        self.body().bounds()
    }

    /// Both entities active and their boxes strictly overlapping
    fn collides_with(&self, other: &dyn Entity) -> bool {
        self.is_active() && other.is_active() && self.bounds().overlaps(&other.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(Body);

    impl Entity for Probe {
        fn body(&self) -> &Body {
            &self.0
        }
        fn body_mut(&mut self) -> &mut Body {
            &mut self.0
        }
    }

    fn probe(x: f32, y: f32, w: f32, h: f32) -> Probe {
        let mut body = Body::new(Vec2::new(w, h));
        body.activate(1, Vec2::new(x, y));
        Probe(body)
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = probe(0.0, 0.0, 10.0, 10.0);
        // Shares the right edge only
        let b = probe(10.0, 0.0, 10.0, 10.0);
        // Shares the bottom edge only
        let c = probe(0.0, 10.0, 10.0, 10.0);
        // Overlaps by a sliver
        let d = probe(9.9, 9.9, 10.0, 10.0);

        assert!(!a.collides_with(&b));
        assert!(!a.collides_with(&c));
        assert!(a.collides_with(&d));
        assert!(d.collides_with(&a));
    }

    #[test]
    fn test_inactive_never_collides() {
        let a = probe(0.0, 0.0, 10.0, 10.0);
        let mut b = probe(5.0, 5.0, 10.0, 10.0);
        assert!(a.collides_with(&b));
        b.body_mut().deactivate();
        assert!(!a.collides_with(&b));
        assert!(!b.is_visible());
    }

    #[test]
    fn test_center() {
        let a = probe(10.0, 20.0, 4.0, 8.0);
        assert_eq!(a.body().center(), Vec2::new(12.0, 24.0));
        assert_eq!(a.bounds().center(), Vec2::new(12.0, 24.0));
    }
}
