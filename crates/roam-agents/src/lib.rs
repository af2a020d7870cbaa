//! Wandering characters: the behavior policy, path following with
//! walkability snapping, the player character, and a headless simulation
//! driver.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod behavior;
pub mod character;
pub mod config;
pub mod error;
pub mod locomotion;
pub mod player;
pub mod sim;
pub mod stuck;
pub mod walker;

pub use behavior::{Behavior, BehaviorConfig, BehaviorKind, BehaviorSystem};
pub use character::{Character, CharacterEvent, ARRIVAL_PAUSE};
pub use config::{CharacterConfig, PlayerConfig, SimConfig};
pub use error::SimError;
pub use locomotion::{Locomotion, StepOutcome, SNAP_THRESHOLD};
pub use player::{PlayerCharacter, PLAYER_ID};
pub use sim::{AgentSnapshot, Simulation};
pub use stuck::StuckDetector;
pub use walker::{Walker, DEFAULT_DRAW_HEIGHT};
