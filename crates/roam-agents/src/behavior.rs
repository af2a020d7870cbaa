//! Probabilistic Wait / Roam / MoveToTarget policy.

use core::fmt;

use roam_core::DeterministicRng;
use roam_nav::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// A character's current intent. Replaced wholesale when it completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Stand still until the timer runs out.
    Wait { duration: f32, remaining: f32 },
    /// Wander inside `target_room` until the timer runs out.
    Roam {
        target_room: String,
        duration: f32,
        remaining: f32,
    },
    /// Travel to another room. Ends on arrival, never on a timer.
    MoveToTarget {
        target_room: String,
        target_position: Option<Vec2>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    Wait,
    Roam,
    MoveToTarget,
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BehaviorKind::Wait => "wait",
            BehaviorKind::Roam => "roam",
            BehaviorKind::MoveToTarget => "move_to_target",
        })
    }
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Wait { .. } => BehaviorKind::Wait,
            Behavior::Roam { .. } => BehaviorKind::Roam,
            Behavior::MoveToTarget { .. } => BehaviorKind::MoveToTarget,
        }
    }

    pub fn remaining_time(&self) -> Option<f32> {
        match self {
            Behavior::Wait { remaining, .. } | Behavior::Roam { remaining, .. } => Some(*remaining),
            Behavior::MoveToTarget { .. } => None,
        }
    }

    pub fn target_room(&self) -> Option<&str> {
        match self {
            Behavior::Wait { .. } => None,
            Behavior::Roam { target_room, .. } | Behavior::MoveToTarget { target_room, .. } => {
                Some(target_room)
            }
        }
    }
}

/// Chances and duration ranges. Durations are seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default = "default_wait_chance")]
    pub wait_chance: f32,
    #[serde(default = "default_roam_chance")]
    pub roam_chance: f32,
    #[serde(default = "default_min_wait_time")]
    pub min_wait_time: f32,
    #[serde(default = "default_max_wait_time")]
    pub max_wait_time: f32,
    #[serde(default = "default_min_roam_time")]
    pub min_roam_time: f32,
    #[serde(default = "default_max_roam_time")]
    pub max_roam_time: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            wait_chance: default_wait_chance(),
            roam_chance: default_roam_chance(),
            min_wait_time: default_min_wait_time(),
            max_wait_time: default_max_wait_time(),
            min_roam_time: default_min_roam_time(),
            max_roam_time: default_max_roam_time(),
        }
    }
}

fn default_wait_chance() -> f32 {
    0.2
}
fn default_roam_chance() -> f32 {
    0.5
}
fn default_min_wait_time() -> f32 {
    2.0
}
fn default_max_wait_time() -> f32 {
    6.0
}
fn default_min_roam_time() -> f32 {
    3.0
}
fn default_max_roam_time() -> f32 {
    8.0
}

impl BehaviorConfig {
    /// Whatever probability mass is left after wait and roam.
    pub fn move_chance(&self) -> f32 {
        (1.0 - self.wait_chance - self.roam_chance).max(0.0)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, chance) in [("wait_chance", self.wait_chance), ("roam_chance", self.roam_chance)] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(SimError::InvalidBehaviorConfig(format!(
                    "{name} must be in [0, 1], got {chance}"
                )));
            }
        }
        if self.wait_chance + self.roam_chance > 1.0 + f32::EPSILON {
            return Err(SimError::InvalidBehaviorConfig(
                "wait_chance + roam_chance exceeds 1".to_string(),
            ));
        }
        for (name, min, max) in [
            ("wait", self.min_wait_time, self.max_wait_time),
            ("roam", self.min_roam_time, self.max_roam_time),
        ] {
            if !(min >= 0.0) || !(max >= min) || !max.is_finite() {
                return Err(SimError::InvalidBehaviorConfig(format!(
                    "{name} duration range [{min}, {max}] is invalid"
                )));
            }
        }
        Ok(())
    }
}

/// Stateless policy over a [`BehaviorConfig`]. All randomness comes from the
/// caller's RNG.
#[derive(Debug, Clone, Default)]
pub struct BehaviorSystem {
    config: BehaviorConfig,
}

impl BehaviorSystem {
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// One uniform draw picks the kind. A move needs some room other than
    /// `current_room`; without one it degrades to roaming in place.
    pub fn choose_next_behavior<S: AsRef<str>>(
        &self,
        current_room: &str,
        available_rooms: &[S],
        rng: &mut impl DeterministicRng,
    ) -> Behavior {
        let r = rng.next_f32_unit();
        if r < self.config.wait_chance {
            return self.create_wait(rng);
        }
        if r < self.config.wait_chance + self.config.roam_chance {
            return self.create_roam(current_room, rng);
        }

        let others: Vec<&str> = available_rooms
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| *id != current_room)
            .collect();
        match rng.next_index(others.len()) {
            Some(i) => Behavior::MoveToTarget {
                target_room: others[i].to_string(),
                target_position: None,
            },
            None => self.create_roam(current_room, rng),
        }
    }

    pub fn create_wait(&self, rng: &mut impl DeterministicRng) -> Behavior {
        let duration = sample_duration(self.config.min_wait_time, self.config.max_wait_time, rng);
        Behavior::Wait {
            duration,
            remaining: duration,
        }
    }

    pub fn create_roam(&self, room: &str, rng: &mut impl DeterministicRng) -> Behavior {
        let duration = sample_duration(self.config.min_roam_time, self.config.max_roam_time, rng);
        Behavior::Roam {
            target_room: room.to_string(),
            duration,
            remaining: duration,
        }
    }

    /// Count the timer down by `dt_seconds`. True exactly on the tick the
    /// timer crosses zero; MoveToTarget never reports completion here.
    pub fn update_behavior(&self, behavior: &mut Behavior, dt_seconds: f32) -> bool {
        match behavior {
            Behavior::Wait { remaining, .. } | Behavior::Roam { remaining, .. } => {
                let before = *remaining;
                *remaining -= dt_seconds.max(0.0);
                before > 0.0 && *remaining <= 0.0
            }
            Behavior::MoveToTarget { .. } => false,
        }
    }
}

// A zero-length timer would never see a crossing from above zero.
fn sample_duration(min: f32, max: f32, rng: &mut impl DeterministicRng) -> f32 {
    rng.next_range(min, max).max(f32::MIN_POSITIVE)
}
