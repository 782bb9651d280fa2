//! Render-surface boundary
//!
//! The core never draws pixels. Each entity describes itself to a host
//! supplied [`RenderSurface`] (sprite id, bounds, rotation, animation frame),
//! and [`render_frame`] walks the match once per display frame. Every entity
//! is drawn at most once per frame and only while its `visible` flag is set.

use glam::Vec2;

use crate::sim::{
    Aabb, Bullet, CoinFly, Entity, GameState, Monster, Player, Splash, Structure, StructureKind,
};

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteRef<'a> {
    Background(&'a str),
    /// Catalog key of the monster type
    Monster(&'a str),
    Bullet,
    Splash,
    CoinFly,
    Player,
    DefenseLine,
    Village,
}

/// Numbers shown in the heads-up display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub score: u64,
    pub coins: u64,
    pub level: u32,
    /// 1-based wave number and wave total
    pub wave: usize,
    pub wave_total: usize,
    /// Equipped ability readiness 0-1
    pub ability_ready: f32,
}

/// Host drawing context
pub trait RenderSurface {
    fn draw_sprite(&mut self, sprite: SpriteRef<'_>, bounds: Aabb, rotation: f32, frame: u32);
    /// Health bar above `bounds`, `fill` in 0-1
    fn draw_health_bar(&mut self, bounds: Aabb, fill: f32);
    fn draw_hud(&mut self, hud: &Hud);
}

/// Implemented by every drawable entity
pub trait Render {
    fn render(&self, surface: &mut dyn RenderSurface);
}

impl Render for Monster {
    fn render(&self, surface: &mut dyn RenderSurface) {
        if !self.is_visible() {
            return;
        }
        surface.draw_sprite(
            SpriteRef::Monster(&self.kind),
            self.bounds(),
            0.0,
            self.animation_frame(),
        );
        surface.draw_health_bar(self.bounds(), self.health_fraction());
    }
}

impl Render for Bullet {
    fn render(&self, surface: &mut dyn RenderSurface) {
        if self.is_visible() {
            surface.draw_sprite(SpriteRef::Bullet, self.bounds(), 0.0, 0);
        }
    }
}

impl Render for Splash {
    fn render(&self, surface: &mut dyn RenderSurface) {
        if self.is_visible() {
            surface.draw_sprite(SpriteRef::Splash, self.bounds(), self.angle, self.frame_index);
        }
    }
}

impl Render for CoinFly {
    fn render(&self, surface: &mut dyn RenderSurface) {
        if self.is_visible() {
            surface.draw_sprite(SpriteRef::CoinFly, self.bounds(), 0.0, 0);
        }
    }
}

impl Render for Player {
    fn render(&self, surface: &mut dyn RenderSurface) {
        if self.is_visible() {
            surface.draw_sprite(SpriteRef::Player, self.bounds(), 0.0, 0);
        }
    }
}

impl Render for Structure {
    fn render(&self, surface: &mut dyn RenderSurface) {
        // Destroyed structures disappear
        if !self.is_visible() || !self.is_alive {
            return;
        }
        let sprite = match self.kind {
            StructureKind::DefenseLine => SpriteRef::DefenseLine,
            StructureKind::Village => SpriteRef::Village,
        };
        surface.draw_sprite(sprite, self.bounds(), 0.0, 0);
        surface.draw_health_bar(self.bounds(), self.health_fraction());
    }
}

/// Draw one frame of a match, back to front
pub fn render_frame(
    surface: &mut dyn RenderSurface,
    state: &GameState,
    player: &Player,
    background: &str,
    hud: &Hud,
) {
    let full = Aabb::from_pos_size(Vec2::ZERO, Vec2::new(state.field.width, state.field.height));
    surface.draw_sprite(SpriteRef::Background(background), full, 0.0, 0);

    state.village.render(surface);
    state.defense_line.render(surface);
    for monster in &state.monsters {
        monster.render(surface);
    }
    player.render(surface);
    for bullet in &state.bullets {
        bullet.render(surface);
    }
    for splash in &state.splashes {
        splash.render(surface);
    }
    for coin in &state.coin_flies {
        coin.render(surface);
    }

    surface.draw_hud(hud);
}
