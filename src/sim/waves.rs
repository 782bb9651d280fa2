//! Wave scheduler
//!
//! Turns a level's ordered wave list into a timed sequence of monster spawns.
//! Waves are consumed strictly in order; a wave is complete once its full
//! count has been generated, regardless of how many of its monsters are still
//! alive. After the last wave the scheduler goes idle and never restarts.

use rand::Rng;

use super::entity::EntityId;
use super::monster::Monster;
use super::state::{GameEvent, GameState};
use crate::config::{MonsterCatalog, WaveConfig};
use crate::consts::MIN_SPAWN_INTERVAL;

/// One monster produced by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnEvent {
    pub wave_index: usize,
    pub monster_id: EntityId,
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct WaveScheduler {
    waves: Vec<WaveConfig>,
    /// 0-based index of the active wave
    wave_index: usize,
    /// Monsters generated so far in the active wave
    generated: u32,
    /// False until the first tick of the match loads wave 0
    started: bool,
    /// Multiplier applied to every wave interval (shrinks on level-up)
    interval_scale: f32,
}

impl WaveScheduler {
    pub fn new(waves: Vec<WaveConfig>) -> Self {
        Self {
            waves,
            wave_index: 0,
            generated: 0,
            started: false,
            interval_scale: 1.0,
        }
    }

    pub fn waves(&self) -> &[WaveConfig] {
        &self.waves
    }

    pub fn wave_index(&self) -> usize {
        self.wave_index
    }

    pub fn generated_in_wave(&self) -> u32 {
        self.generated
    }

    pub fn wave_count(&self) -> usize {
        self.waves.len()
    }

    fn current(&self) -> Option<&WaveConfig> {
        self.waves.get(self.wave_index)
    }

    /// The final wave is active and its full count has been generated
    pub fn is_exhausted(&self) -> bool {
        match self.current() {
            None => true,
            Some(wave) => {
                self.wave_index + 1 >= self.waves.len() && self.generated >= wave.monster_count
            }
        }
    }

    /// Shrink all spawn intervals by `factor` (difficulty scaling)
    pub fn scale_interval(&mut self, factor: f32) {
        self.interval_scale *= factor;
    }

    /// Frames between spawns for the active wave. Scaling never takes it
    /// below `MIN_SPAWN_INTERVAL`, or below the configured interval when that
    /// is already smaller, and never below one frame.
    pub fn effective_interval(&self) -> u64 {
        let Some(wave) = self.current() else {
            return 1;
        };
        let base = wave.interval.max(0.0).floor() as u64;
        let scaled = (wave.interval * self.interval_scale).max(0.0).floor() as u64;
        scaled.max(base.min(MIN_SPAWN_INTERVAL)).max(1)
    }

    /// Run one scheduler step: load or advance waves, then spawn at most one
    /// monster if the frame lands on the active wave's interval.
    pub fn tick(&mut self, state: &mut GameState, catalog: &MonsterCatalog) -> Option<SpawnEvent> {
        if !self.started {
            self.started = true;
            self.wave_index = 0;
            self.generated = 0;
            if !self.waves.is_empty() {
                self.announce_wave(state);
            }
        }

        let wave = self.current()?;
        if self.generated >= wave.monster_count {
            if self.wave_index + 1 < self.waves.len() {
                self.wave_index += 1;
                self.generated = 0;
                self.announce_wave(state);
            } else {
                return None;
            }
        }

        let wave = self.current()?;
        let count = wave.monster_count;
        if state.frame % self.effective_interval() != 0 || self.generated >= count {
            return None;
        }

        let kind = if wave.monster_types.is_empty() {
            catalog.default_kind().map(str::to_string)
        } else {
            let pick = state.rng.random_range(0..wave.monster_types.len());
            Some(wave.monster_types[pick].clone())
        };
        // Nothing to spawn from an empty catalog; the wave stays open
        let Some((kind, spec)) = kind.and_then(|k| catalog.get(&k).map(|spec| (k, spec))) else {
            log::warn!("Monster catalog is empty, skipping spawn");
            return None;
        };

        let id = state.next_entity_id();
        let difficulty = state.difficulty();
        let mut monster: Monster = state.pool.acquire(Monster::default);
        monster.init(id, spec, difficulty, &state.field, &mut state.rng);
        state.monsters.push(monster);
        self.generated += 1;

        log::debug!(
            "Spawned {} #{} (wave {}, {}/{})",
            kind,
            id,
            self.wave_index + 1,
            self.generated,
            count
        );

        Some(SpawnEvent {
            wave_index: self.wave_index,
            monster_id: id,
            kind,
        })
    }

    fn announce_wave(&self, state: &mut GameState) {
        state.events.push(GameEvent::WaveStarted {
            index: self.wave_index,
        });
        log::info!("Wave {}/{} started", self.wave_index + 1, self.waves.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scheduler: &mut WaveScheduler, state: &mut GameState, frames: u64) -> Vec<SpawnEvent> {
        let catalog = MonsterCatalog::default();
        let mut spawns = Vec::new();
        for _ in 0..frames {
            state.frame += 1;
            if let Some(spawn) = scheduler.tick(state, &catalog) {
                spawns.push(spawn);
            }
        }
        spawns
    }

    #[test]
    fn test_default_ramp_spawns_twenty() {
        let waves: Vec<WaveConfig> = [2, 4, 6, 8]
            .iter()
            .map(|&n| WaveConfig::new(&["niu", "feiji"], n, 60.0))
            .collect();
        let mut scheduler = WaveScheduler::new(waves);
        let mut state = GameState::new(3);

        let spawns = run(&mut scheduler, &mut state, 60 * 40);
        assert_eq!(spawns.len(), 20);
        assert!(spawns.windows(2).all(|w| w[0].wave_index <= w[1].wave_index));
        for (wave, expected) in [2, 4, 6, 8].iter().enumerate() {
            let n = spawns.iter().filter(|s| s.wave_index == wave).count();
            assert_eq!(n, *expected);
        }
        assert!(scheduler.is_exhausted());
        assert!(spawns.iter().all(|s| s.kind == "niu" || s.kind == "feiji"));
    }

    #[test]
    fn test_spawns_only_on_interval() {
        let mut scheduler = WaveScheduler::new(vec![WaveConfig::new(&["niu"], 3, 10.0)]);
        let mut state = GameState::new(3);
        let spawns = run(&mut scheduler, &mut state, 9);
        assert!(spawns.is_empty());
        let spawns = run(&mut scheduler, &mut state, 1);
        assert_eq!(spawns.len(), 1);
        assert_eq!(state.monsters.len(), 1);
    }

    #[test]
    fn test_fractional_interval_is_floored() {
        let mut scheduler = WaveScheduler::new(vec![WaveConfig::new(&["niu"], 5, 2.7)]);
        assert_eq!(scheduler.effective_interval(), 2);
        let mut state = GameState::new(3);
        let spawns = run(&mut scheduler, &mut state, 4);
        assert_eq!(spawns.len(), 2);
    }

    #[test]
    fn test_scaling_respects_floor() {
        let mut scheduler = WaveScheduler::new(vec![WaveConfig::new(&["niu"], 5, 60.0)]);
        scheduler.scale_interval(0.9);
        assert_eq!(scheduler.effective_interval(), 54);
        for _ in 0..50 {
            scheduler.scale_interval(0.9);
        }
        assert_eq!(scheduler.effective_interval(), MIN_SPAWN_INTERVAL);

        // A configured interval below the floor is left alone
        let mut fast = WaveScheduler::new(vec![WaveConfig::new(&["niu"], 5, 4.0)]);
        fast.scale_interval(0.1);
        assert_eq!(fast.effective_interval(), 4);
    }

    #[test]
    fn test_idle_after_last_wave() {
        let mut scheduler = WaveScheduler::new(vec![WaveConfig::new(&["niu"], 1, 1.0)]);
        let mut state = GameState::new(3);
        assert!(!scheduler.is_exhausted());
        let spawns = run(&mut scheduler, &mut state, 100);
        assert_eq!(spawns.len(), 1);
        assert!(scheduler.is_exhausted());
    }

    #[test]
    fn test_empty_type_list_uses_catalog_default() {
        let mut scheduler = WaveScheduler::new(vec![WaveConfig::new(&[], 1, 1.0)]);
        let mut state = GameState::new(3);
        let spawns = run(&mut scheduler, &mut state, 1);
        assert_eq!(spawns[0].kind, "niu");
    }

    #[test]
    fn test_zero_count_wave_is_skipped() {
        let mut scheduler = WaveScheduler::new(vec![
            WaveConfig::new(&["niu"], 0, 1.0),
            WaveConfig::new(&["feiji"], 1, 1.0),
        ]);
        let mut state = GameState::new(3);
        let spawns = run(&mut scheduler, &mut state, 3);
        assert_eq!(spawns.len(), 1);
        assert_eq!(spawns[0].wave_index, 1);
        assert_eq!(spawns[0].kind, "feiji");
    }

    #[test]
    fn test_empty_catalog_spawns_nothing() {
        let mut scheduler = WaveScheduler::new(vec![WaveConfig::new(&["niu"], 2, 1.0)]);
        let mut state = GameState::new(3);
        let catalog = MonsterCatalog { monsters: Vec::new() };
        for _ in 0..10 {
            state.frame += 1;
            assert!(scheduler.tick(&mut state, &catalog).is_none());
        }
        assert!(state.monsters.is_empty());
        assert_eq!(scheduler.generated_in_wave(), 0);
    }

    #[test]
    fn test_no_waves_is_exhausted() {
        let mut scheduler = WaveScheduler::new(Vec::new());
        let mut state = GameState::new(3);
        assert!(run(&mut scheduler, &mut state, 10).is_empty());
        assert!(scheduler.is_exhausted());
    }
}
