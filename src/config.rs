//! Level, wave, monster and skill configuration
//!
//! Configuration is plain JSON using the field names the level editor emits
//! (`monsterTypes`, `monsterConfig`, ...). Every loader has a `load_or_default`
//! variant: a broken or missing file never blocks play, it falls back to the
//! baked-in tables below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PlayField;
use crate::consts::{DEFAULT_WAVE_COUNTS, DEFAULT_WAVE_INTERVAL};

/// Background used when a level does not name one
pub const DEFAULT_BACKGROUND: &str = "images/bg/bg_default.jpg";

/// Configuration load failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One wave: which monsters, how many, and how often (in frames)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveConfig {
    /// Allowed monster types, one picked uniformly per spawn
    #[serde(rename = "monsterType", alias = "monsterTypes", default)]
    pub monster_types: Vec<String>,
    pub monster_count: u32,
    /// Frames between spawns (may become fractional after difficulty scaling)
    #[serde(rename = "monsterGenerateInterval", default = "default_interval")]
    pub interval: f32,
}

fn default_interval() -> f32 {
    DEFAULT_WAVE_INTERVAL
}

impl WaveConfig {
    pub fn new(monster_types: &[&str], monster_count: u32, interval: f32) -> Self {
        Self {
            monster_types: monster_types.iter().map(|s| s.to_string()).collect(),
            monster_count,
            interval,
        }
    }
}

/// A selectable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub monster_types: Vec<String>,
    #[serde(default, alias = "monsterConfig")]
    pub waves: Option<Vec<WaveConfig>>,
    #[serde(default)]
    pub background: Option<String>,
}

impl LevelConfig {
    /// Waves to play, synthesizing the default four-wave ramp from
    /// `monster_types` when the level has no explicit wave list.
    pub fn resolved_waves(&self) -> Vec<WaveConfig> {
        match &self.waves {
            Some(waves) if !waves.is_empty() => waves.clone(),
            _ => {
                log::warn!("Level {} has no wave list, synthesizing default waves", self.id);
                DEFAULT_WAVE_COUNTS
                    .iter()
                    .map(|&count| WaveConfig {
                        monster_types: self.monster_types.clone(),
                        monster_count: count,
                        interval: DEFAULT_WAVE_INTERVAL,
                    })
                    .collect()
            }
        }
    }

    pub fn background_or_default(&self) -> &str {
        self.background.as_deref().unwrap_or(DEFAULT_BACKGROUND)
    }
}

/// A selectable special ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cooldown in seconds (display only; the simulation uses its own table)
    #[serde(default)]
    pub cooldown: u32,
}

/// Levels and skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub levels: Vec<LevelConfig>,
    #[serde(default = "default_skills")]
    pub skills: Vec<SkillConfig>,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse `json`, falling back to the baked-in levels on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => {
                log::info!("Loaded {} levels", config.levels.len());
                config
            }
            Some(Err(e)) => {
                log::warn!("{e}; using default levels");
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("no levels defined".into()));
        }
        for level in &self.levels {
            if let Some(waves) = &level.waves {
                if waves.iter().any(|w| w.interval < 0.0) {
                    return Err(ConfigError::Invalid(format!(
                        "level {} has a negative spawn interval",
                        level.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn level(&self, id: u32) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.id == id)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let names = [
            (1, "Village Encounter", "Drive back the first monster raid"),
            (2, "Reinforcements", "More monsters close in"),
            (3, "Elite Troops", "Tougher monsters appear"),
            (4, "Frenzied Invasion", "The horde surges"),
            (5, "Last Stand", "Hold the final line"),
        ];
        let levels = names
            .iter()
            .map(|&(id, name, description)| {
                let types: &[&str] = if id == 1 { &["niu"] } else { &["niu", "feiji"] };
                LevelConfig {
                    id,
                    name: name.to_string(),
                    description: description.to_string(),
                    unlocked: id <= 2,
                    monster_types: types.iter().map(|s| s.to_string()).collect(),
                    waves: Some(
                        DEFAULT_WAVE_COUNTS
                            .iter()
                            .map(|&count| WaveConfig::new(types, count, DEFAULT_WAVE_INTERVAL))
                            .collect(),
                    ),
                    background: Some(format!("images/bg/bg_level_{id}.jpg")),
                }
            })
            .collect();
        Self {
            levels,
            skills: default_skills(),
        }
    }
}

fn default_skills() -> Vec<SkillConfig> {
    [
        ("clearScreen", "Clear Board", "Destroy every monster on screen", 30),
        ("defenseBuff", "Fortify", "Temporarily reinforce the line and village", 45),
        ("rapidFire", "Rapid Fire", "Temporarily double the fire rate", 20),
    ]
    .iter()
    .map(|&(id, name, description, cooldown)| SkillConfig {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        cooldown,
    })
    .collect()
}

/// Base stats for one monster type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// Absolute pixels, or a (0, 1] fraction of the screen width
    pub width: f32,
    /// Absolute pixels, or a (0, 1] fraction of the screen height
    #[serde(default)]
    pub height: Option<f32>,
    /// Height/width ratio used when `height` is missing
    #[serde(default)]
    pub aspect: Option<f32>,
    pub hp: f32,
    pub speed: f32,
    pub attack: f32,
    pub score: u32,
    /// Per-frame chance to start a sprint when close to the defense line
    #[serde(default = "default_sprint_chance")]
    pub sprint_chance: f32,
    #[serde(default)]
    pub frames: Vec<String>,
}

fn default_sprint_chance() -> f32 {
    0.2
}

impl MonsterSpec {
    /// Pixel size of this monster on `field`
    pub fn size_on(&self, field: &PlayField) -> (f32, f32) {
        let width = PlayField::resolve_dimension(self.width, field.width);
        let height = match self.height {
            Some(h) => PlayField::resolve_dimension(h, field.height),
            None => width * self.aspect.unwrap_or(1.0),
        };
        (width, height)
    }
}

/// Static table of monster types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterCatalog {
    pub monsters: Vec<MonsterSpec>,
}

impl MonsterCatalog {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(catalog)) => catalog,
            Some(Err(e)) => {
                log::warn!("{e}; using default monster catalog");
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monsters.is_empty() {
            return Err(ConfigError::Invalid("monster catalog is empty".into()));
        }
        if let Some(m) = self.monsters.iter().find(|m| m.hp <= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "monster '{}' has non-positive hp",
                m.kind
            )));
        }
        Ok(())
    }

    /// Look up a type, falling back to the first entry for unknown keys.
    /// `None` only for an empty catalog.
    pub fn get(&self, kind: &str) -> Option<&MonsterSpec> {
        self.monsters
            .iter()
            .find(|m| m.kind == kind)
            .or_else(|| self.monsters.first())
    }

    /// First catalog key, used when a wave lists no types
    pub fn default_kind(&self) -> Option<&str> {
        self.monsters.first().map(|m| m.kind.as_str())
    }
}

impl Default for MonsterCatalog {
    fn default() -> Self {
        Self {
            monsters: vec![
                MonsterSpec {
                    kind: "niu".into(),
                    name: "Ox Brute".into(),
                    width: 0.08,
                    height: Some(0.1),
                    aspect: None,
                    hp: 3.0,
                    speed: 0.25,
                    attack: 10.0,
                    score: 10,
                    sprint_chance: 0.2,
                    frames: (1..=9).map(|i| format!("images/npc/niu/niu_{i:02}.png")).collect(),
                },
                MonsterSpec {
                    kind: "feiji".into(),
                    name: "Flyer".into(),
                    width: 0.1,
                    height: Some(0.1),
                    aspect: None,
                    hp: 2.0,
                    speed: 0.4,
                    attack: 8.0,
                    score: 20,
                    sprint_chance: 0.4,
                    frames: (1..=3).map(|i| format!("images/npc/feiji/feiji_{i}.png")).collect(),
                },
            ],
        }
    }
}
