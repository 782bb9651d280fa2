//! Whole-match scenarios driven through the public API

use glam::Vec2;
use proptest::prelude::*;

use village_defense::config::{MonsterCatalog, WaveConfig};
use village_defense::sim::{
    EntityId, GameState, Monster, Player, PoolCategory, TickInput, TickStatus, WaveScheduler,
    resolve_collisions, tick,
};

struct Match {
    state: GameState,
    player: Player,
    scheduler: WaveScheduler,
    catalog: MonsterCatalog,
}

impl Match {
    fn new(waves: Vec<WaveConfig>) -> Self {
        let state = GameState::new(42);
        let player = Player::new(state.field);
        Self {
            state,
            player,
            scheduler: WaveScheduler::new(waves),
            catalog: MonsterCatalog::default(),
        }
    }

    fn step(&mut self) -> TickStatus {
        tick(
            &mut self.state,
            &mut self.player,
            &mut self.scheduler,
            &self.catalog,
            &TickInput::default(),
        )
        .status
    }
}

fn place_monster(state: &mut GameState, pos: Vec2) -> EntityId {
    let catalog = MonsterCatalog::default();
    let id = state.next_entity_id();
    let mut monster: Monster = state.pool.acquire(Monster::default);
    monster.init(id, catalog.get("niu").unwrap(), 1.0, &state.field, &mut state.rng);
    monster.body.pos = pos;
    state.monsters.push(monster);
    id
}

#[test]
fn single_monster_level_is_won_by_three_bullets() {
    let mut m = Match::new(vec![WaveConfig::new(&["niu"], 1, 1.0)]);

    assert_eq!(m.step(), TickStatus::Running);
    assert_eq!(m.state.monsters.len(), 1);
    m.state.monsters[0].body.pos = Vec2::new(150.0, 200.0);

    // Stationary bullets dropped on the monster: hit, hit, kill
    for _ in 0..3 {
        let target = m.state.monsters[0].body.pos + Vec2::new(5.0, 10.0);
        m.state.spawn_bullet(target, 0.0, 1.0);
        m.step();
    }

    assert!(m.state.monsters.is_empty());
    assert_eq!(m.state.score, 10);
    assert_eq!(m.state.coins, 10);
    assert_eq!(m.state.coin_flies.len(), 1);
    assert_eq!(m.step(), TickStatus::Victory);
}

#[test]
fn village_is_exposed_only_after_the_defense_line_falls() {
    let mut state = GameState::new(3);
    let line = state.defense_line.body.pos;
    let village = state.village.body.pos;

    for hit in 1..=9 {
        place_monster(&mut state, line);
        let report = resolve_collisions(&mut state);
        assert!(report.defense_line_hit.is_some());
        assert_eq!(state.defense_line.health, 100.0 - 10.0 * hit as f32);
    }
    assert!(state.defense_line.is_alive);

    // Tenth hit destroys the line; the village monster waits a pass
    place_monster(&mut state, line);
    let waiting = place_monster(&mut state, village);
    let report = resolve_collisions(&mut state);
    assert!(report.defense_line_destroyed);
    assert!(!state.defense_line.is_alive);
    assert!(report.village_hit.is_none());
    assert_eq!(state.village.health, 100.0);

    let report = resolve_collisions(&mut state);
    assert_eq!(report.village_hit, Some(waiting));
    assert_eq!(state.village.health, 90.0);
    assert_eq!(state.score, 0, "structure contact is unscored");
    assert!(!state.is_game_over);
}

#[test]
fn one_bullet_kills_at_most_one_monster() {
    let mut state = GameState::new(9);
    let pos = Vec2::new(100.0, 200.0);
    let first = place_monster(&mut state, pos);
    let second = place_monster(&mut state, pos);
    state.monsters[0].hp = 1.0;
    state.monsters[1].hp = 1.0;

    state.spawn_bullet(pos + Vec2::new(4.0, 4.0), 0.0, 5.0);
    let report = resolve_collisions(&mut state);

    assert_eq!(report.kills, vec![first]);
    assert_eq!(state.monsters[0].body.id, second);
    assert_eq!(state.score, 10);
    assert!(state.bullets.is_empty());
}

#[test]
fn destroyed_village_ends_the_match_next_tick() {
    let mut m = Match::new(vec![WaveConfig::new(&["niu"], 5, 60.0)]);
    m.state.defense_line.destroy();
    m.state.village.health = 10.0;
    let village = m.state.village.body.pos;
    place_monster(&mut m.state, village);

    assert_eq!(m.step(), TickStatus::Running);
    assert!(m.state.is_game_over);
    assert!(!m.state.village.is_alive);
    assert_eq!(m.step(), TickStatus::GameOver);
}

proptest! {
    #[test]
    fn removal_is_idempotent(count in 1usize..20, removals in prop::collection::vec(0usize..40, 0..60)) {
        let mut state = GameState::new(1);
        let ids: Vec<EntityId> = (0..count)
            .map(|i| state.spawn_bullet(Vec2::new(i as f32, 300.0), 1.0, 1.0))
            .collect();

        let mut removed = std::collections::HashSet::new();
        for pick in removals {
            let Some(&id) = ids.get(pick % (count * 2)) else {
                prop_assert!(!state.remove_bullet(EntityId::MAX));
                continue;
            };
            let was_live = removed.insert(id);
            prop_assert_eq!(state.remove_bullet(id), was_live);
        }

        prop_assert_eq!(state.bullets.len(), count - removed.len());
        prop_assert_eq!(state.pool.available(PoolCategory::Bullet), removed.len());
    }

    #[test]
    fn waves_advance_monotonically_and_spawn_their_counts(
        counts in prop::collection::vec(1u32..6, 1..5),
        interval in 1u32..5,
    ) {
        let waves: Vec<WaveConfig> = counts
            .iter()
            .map(|&c| WaveConfig::new(&["niu", "feiji"], c, interval as f32))
            .collect();
        let mut state = GameState::new(5);
        let mut scheduler = WaveScheduler::new(waves);
        let catalog = MonsterCatalog::default();

        let total: u32 = counts.iter().sum();
        let mut spawned = vec![0u32; counts.len()];
        let mut last_index = 0;
        for _ in 0..(total + counts.len() as u32 + 2) * interval {
            state.frame += 1;
            if let Some(event) = scheduler.tick(&mut state, &catalog) {
                prop_assert!(event.wave_index >= last_index);
                last_index = event.wave_index;
                spawned[event.wave_index] += 1;
            }
            prop_assert!(scheduler.wave_index() >= last_index);
            // Keep the field empty; only the scheduler is under test
            let ids: Vec<EntityId> = state.monsters.iter().map(|m| m.body.id).collect();
            for id in ids {
                state.remove_monster(id);
            }
        }

        prop_assert_eq!(spawned, counts);
        prop_assert!(scheduler.is_exhausted());
    }
}
