//! Simulation configuration: the scene plus its roster and policy.

use std::collections::BTreeSet;
use std::path::Path;

use roam_map::{MapError, SceneConfig, DEFAULT_SCENE_YAML};
use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorConfig;
use crate::error::{Result, SimError};

/// One YAML document describing a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub behavior: BehaviorConfig,

    #[serde(flatten)]
    pub scene: SceneConfig,

    #[serde(default)]
    pub characters: Vec<CharacterConfig>,

    #[serde(default)]
    pub player: Option<PlayerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    /// Units per second.
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_name")]
    pub name: String,
    #[serde(default = "default_player_color")]
    pub color: String,
    #[serde(default = "default_player_speed")]
    pub speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: default_player_name(),
            color: default_player_color(),
            speed: default_player_speed(),
        }
    }
}

fn default_seed() -> u64 {
    0x5EED
}
fn default_player_name() -> String {
    "You".to_string()
}
fn default_player_color() -> String {
    "#ff0000".to_string()
}
fn default_player_speed() -> f32 {
    4.0
}

impl SimConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| SimError::Map(MapError::Yaml(e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// The bundled castle map with its thirteen residents and a player.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_SCENE_YAML)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scene.rooms.is_empty() {
            return Err(SimError::EmptyScene);
        }
        self.scene.validate()?;
        self.behavior.validate()?;

        let mut ids = BTreeSet::new();
        for character in &self.characters {
            if !ids.insert(character.id.as_str()) {
                return Err(invalid_character(&character.id, "duplicate id"));
            }
            if !positive(character.speed) {
                return Err(invalid_character(&character.id, "speed must be positive"));
            }
        }
        if let Some(player) = &self.player {
            if !positive(player.speed) {
                return Err(invalid_character("player", "speed must be positive"));
            }
        }
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v > 0.0 && v.is_finite()
}

fn invalid_character(id: &str, reason: &str) -> SimError {
    SimError::InvalidCharacter {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}
