//! Village Defense entry point
//!
//! The browser build is driven by its host page, so the wasm binary has
//! nothing to do. Natively this runs a headless match with a simple
//! autopilot and logs the result:
//!
//! ```text
//! village-defense [levels.json] [level-id] [seed]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use village_defense::audio::AudioManager;
    use village_defense::consts::FRAME_RATE;
    use village_defense::game::NullObserver;
    use village_defense::persistence::MemoryStore;
    use village_defense::sim::{AbilityKind, TickInput};
    use village_defense::{Command, Game, GameConfig, MonsterCatalog, Screen};

    /// Ten minutes of play
    const FRAME_LIMIT: u64 = 10 * 60 * FRAME_RATE as u64;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => GameConfig::from_path(&path).unwrap_or_else(|e| {
                log::warn!("{path}: {e}; using default levels");
                GameConfig::default()
            }),
            None => GameConfig::default(),
        };
        let level_id = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

        let mut game = Game::new(
            config,
            MonsterCatalog::default(),
            Box::new(MemoryStore::new()),
            AudioManager::default(),
            Box::new(NullObserver),
            seed,
        );
        game.handle(Command::StartGame {
            level_id,
            skill_id: Some(AbilityKind::ClearBoard.skill_id().to_string()),
        });

        let mut frames = 0;
        while frames < FRAME_LIMIT && game.screen() == Screen::Playing && !game.is_victory() {
            let input = autopilot(&game);
            game.frame(&input);
            frames += 1;
        }

        let state = game.state();
        if game.is_victory() {
            log::info!(
                "Victory after {frames} frames: score {}, coins {}, level {}",
                state.score,
                state.coins,
                state.level
            );
        } else if game.screen() == Screen::GameOver {
            log::info!("Village fell after {frames} frames with score {}", state.score);
        } else {
            log::info!("Stopped at the frame limit with score {}", state.score);
        }
    }

    /// Track the monster closest to the defense line; fire the ability as
    /// soon as it is ready and there is something to hit.
    fn autopilot(game: &Game) -> TickInput {
        let state = game.state();
        let target_x = state
            .monsters
            .iter()
            .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y))
            .map(|m| m.body.center().x);
        let ready = game
            .player()
            .is_some_and(|p| p.current_ability().is_ready());
        TickInput {
            target_x,
            trigger_ability: ready && !state.monsters.is_empty(),
            cycle_ability: false,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Village Defense (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
