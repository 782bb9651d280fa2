//! Cosmetic effects (no gameplay or collision role)

use glam::Vec2;

use super::entity::{Body, Entity, EntityId};
use crate::consts::{COIN_FLY_DURATION, COIN_FLY_SIZE};

/// A coin flying from a kill to the HUD coin counter
#[derive(Debug, Clone)]
pub struct CoinFly {
    pub body: Body,
    pub start: Vec2,
    pub end: Vec2,
    /// Coins represented (display only, coins are credited at kill time)
    pub value: u32,
    pub elapsed: u32,
    pub duration: u32,
}

impl Default for CoinFly {
    fn default() -> Self {
        Self {
            body: Body::new(Vec2::splat(COIN_FLY_SIZE)),
            start: Vec2::ZERO,
            end: Vec2::ZERO,
            value: 0,
            elapsed: 0,
            duration: COIN_FLY_DURATION,
        }
    }
}

impl CoinFly {
    pub fn init(&mut self, id: EntityId, start: Vec2, end: Vec2, value: u32) {
        self.body.activate(id, start);
        self.start = start;
        self.end = end;
        self.value = value;
        self.elapsed = 0;
        self.duration = COIN_FLY_DURATION;
    }

    /// Interpolate toward the destination; returns true on arrival
    pub fn update(&mut self) -> bool {
        self.elapsed += 1;
        let t = (self.elapsed as f32 / self.duration as f32).min(1.0);
        self.body.pos = self.start.lerp(self.end, t);
        t >= 1.0
    }
}

impl Entity for CoinFly {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
