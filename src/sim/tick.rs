//! Fixed-step simulation tick
//!
//! One call advances the match by exactly one display frame.

use super::collision::{CollisionReport, resolve_collisions};
use super::player::Player;
use super::state::GameState;
use super::waves::{SpawnEvent, WaveScheduler};
use crate::config::MonsterCatalog;
use crate::consts::{SCORE_PER_LEVEL, SPAWN_INTERVAL_DECAY};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x the shooter should follow
    pub target_x: Option<f32>,
    /// Fire the equipped ability (double tap)
    pub trigger_ability: bool,
    /// Equip the next ability (long press)
    pub cycle_ability: bool,
}

/// Where the match stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    Running,
    /// Every wave generated and the field is clear
    Victory,
    /// The village fell (reported on the tick after it happened)
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub status: TickStatus,
    pub spawn: Option<SpawnEvent>,
    pub collisions: CollisionReport,
}

impl TickOutcome {
    fn status(status: TickStatus) -> Self {
        Self {
            status,
            spawn: None,
            collisions: CollisionReport::default(),
        }
    }
}

/// Player level implied by the current score
pub fn level_for_score(score: u64) -> u32 {
    u32::try_from(score / SCORE_PER_LEVEL + 1).unwrap_or(u32::MAX)
}

/// Catch the player level up with the score. Each step raises the health
/// caps, upgrades the shooter and tightens spawn intervals.
pub fn check_level_up(state: &mut GameState, player: &mut Player, scheduler: &mut WaveScheduler) {
    let target = level_for_score(state.score);
    while state.level < target {
        state.level_up();
        player.upgrade();
        scheduler.scale_interval(SPAWN_INTERVAL_DECAY);
    }
}

/// Advance the match by one frame
pub fn tick(
    state: &mut GameState,
    player: &mut Player,
    scheduler: &mut WaveScheduler,
    catalog: &MonsterCatalog,
    input: &TickInput,
) -> TickOutcome {
    state.frame += 1;

    if state.is_game_over {
        return TickOutcome::status(TickStatus::GameOver);
    }

    if input.cycle_ability {
        let kind = player.cycle_ability();
        log::debug!("Equipped {kind:?}");
    }
    if input.trigger_ability && !player.trigger_ability(state) {
        log::debug!("{:?} is cooling down", player.current_ability().kind);
    }

    check_level_up(state, player, scheduler);

    // Entities
    player.update(state, input.target_x);
    state.update_bullets();
    state.update_splashes();
    state.update_monsters();
    state.update_coin_flies();

    let spawn = scheduler.tick(state, catalog);
    let collisions = resolve_collisions(state);

    let status = if !state.is_game_over && state.monsters.is_empty() && scheduler.is_exhausted() {
        TickStatus::Victory
    } else {
        TickStatus::Running
    };

    TickOutcome {
        status,
        spawn,
        collisions,
    }
}
