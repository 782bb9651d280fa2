//! Collision and damage resolution
//!
//! Runs once per tick after everything has moved, in fixed precedence:
//! 1. bullets against monsters (first overlapping monster per bullet)
//! 2. monsters against the defense line (reverse scan, first match only)
//! 3. monsters against the village, only when the defense line was already
//!    down before this pass (reverse scan, first match only)
//!
//! Homing splashes resolve their own strikes in [`GameState::update_splashes`].

use super::entity::{Entity, EntityId};
use super::state::{GameEvent, GameState};
use super::structure::StructureKind;

/// What the resolver did this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Bullets that struck a monster
    pub bullet_hits: u32,
    /// Monsters killed by bullets
    pub kills: Vec<EntityId>,
    /// Monster that struck the defense line
    pub defense_line_hit: Option<EntityId>,
    /// Monster that struck the village
    pub village_hit: Option<EntityId>,
    pub defense_line_destroyed: bool,
    pub village_destroyed: bool,
}

/// Resolve every collision for this tick
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    // The village only becomes a target on a tick that starts with the line down
    let village_exposed = !state.defense_line.is_alive;

    resolve_bullets(state, &mut report);
    resolve_structure(state, StructureKind::DefenseLine, &mut report);
    if village_exposed {
        resolve_structure(state, StructureKind::Village, &mut report);
    }

    report
}

fn resolve_bullets(state: &mut GameState, report: &mut CollisionReport) {
    let bullet_ids: Vec<EntityId> = state.bullets.iter().map(|b| b.body.id).collect();

    for bullet_id in bullet_ids {
        let Some(bullet) = state.bullets.iter().find(|b| b.body.id == bullet_id) else {
            continue;
        };
        let damage = bullet.damage;

        // First monster in collection order, nothing further for this bullet
        let Some(monster) = state.monsters.iter_mut().find(|m| m.collides_with(bullet)) else {
            continue;
        };
        let monster_id = monster.body.id;
        let dead = monster.take_damage(damage);

        state.remove_bullet(bullet_id);
        report.bullet_hits += 1;

        if dead {
            if state.kill_monster(monster_id).is_some() {
                report.kills.push(monster_id);
            }
        } else {
            state.events.push(GameEvent::Hit);
        }
    }
}

fn resolve_structure(state: &mut GameState, kind: StructureKind, report: &mut CollisionReport) {
    let structure = match kind {
        StructureKind::DefenseLine => &state.defense_line,
        StructureKind::Village => &state.village,
    };
    if !structure.is_alive {
        return;
    }

    // Reverse index order, stop at the first contact
    let Some(monster) = state
        .monsters
        .iter()
        .rev()
        .find(|m| structure.collides_with(*m))
    else {
        return;
    };
    let monster_id = monster.body.id;
    let attack = monster.attack;

    let structure = match kind {
        StructureKind::DefenseLine => &mut state.defense_line,
        StructureKind::Village => &mut state.village,
    };
    let destroyed = structure.take_damage(attack);
    let remaining = structure.health;

    // The monster is spent on impact; no reward
    state.remove_monster(monster_id);
    state.events.push(GameEvent::StructureDamaged(kind));
    log::debug!("{kind:?} hit by monster {monster_id} for {attack}, {remaining} left");

    match kind {
        StructureKind::DefenseLine => {
            report.defense_line_hit = Some(monster_id);
            if destroyed {
                report.defense_line_destroyed = true;
                state.events.push(GameEvent::DefenseLineDestroyed);
                log::info!("Defense line destroyed, the village is exposed");
            }
        }
        StructureKind::Village => {
            report.village_hit = Some(monster_id);
            if destroyed {
                report.village_destroyed = true;
                state.events.push(GameEvent::VillageDestroyed);
                state.game_over();
            }
        }
    }
}
