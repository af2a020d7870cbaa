use roam_core::{derive_seed, AgentKey, DeterministicRng, SplitMix64, TickContext};
use roam_map::{RouteDestination, SceneMap};
use roam_nav::Vec2;
use tracing::{debug, warn};

use crate::config::PlayerConfig;
use crate::locomotion::{Locomotion, StepOutcome};
use crate::stuck::StuckDetector;
use crate::walker::Walker;

pub const PLAYER_ID: &str = "player";

/// A blocked direct move may still land on the nearest walkable point if it
/// is closer than this to where the player wanted to go.
pub const DIRECT_SNAP_LIMIT: f32 = 0.5;

const RNG_STREAM: u64 = 0x0B07_0002;

/// The user-driven character: keyboard-style direction input or
/// click-to-move targets instead of a behavior policy.
#[derive(Debug, Clone)]
pub struct PlayerCharacter {
    name: String,
    color: String,
    speed: f32,
    rng: SplitMix64,
    motion: Locomotion,
    target: Option<Vec2>,
    stuck: StuckDetector,
    input_this_tick: bool,
}

impl PlayerCharacter {
    pub fn new(config: &PlayerConfig, seed: u64) -> Self {
        let key = AgentKey::from_name(PLAYER_ID);
        Self {
            name: config.name.clone(),
            color: config.color.clone(),
            speed: config.speed,
            rng: SplitMix64::new(derive_seed(seed, key.stable_id(), RNG_STREAM)),
            motion: Locomotion::default(),
            target: None,
            stuck: StuckDetector::new(),
            input_this_tick: false,
        }
    }

    /// Drop the player at a random walkable point of a random room.
    pub fn initialize(&mut self, scene: &SceneMap) {
        let Some(i) = self.rng.next_index(scene.rooms().len()) else {
            warn!("scene has no rooms");
            return;
        };
        let room = &scene.rooms()[i];
        let start = room.random_walkable_position(&mut self.rng);
        self.motion = Locomotion::new(start, room.id());
        self.target = None;
        self.stuck.clear();
    }

    /// Place the player explicitly, keeping the room bookkeeping consistent.
    pub fn place(&mut self, position: Vec2, scene: &SceneMap) {
        let room = scene
            .room_at(position)
            .map(|r| r.id().to_string())
            .unwrap_or_else(|| self.motion.room().to_string());
        self.motion.place(position, room);
        self.motion.clear_path();
        self.target = None;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.motion.has_path()
    }

    pub fn target_position(&self) -> Option<Vec2> {
        self.target
    }

    pub fn path(&self) -> &[Vec2] {
        self.motion.path()
    }

    /// Step `speed * dt_seconds` along `direction`. Any path in flight is
    /// abandoned once the step lands. Returns whether the player moved.
    pub fn move_in_direction(&mut self, direction: Vec2, dt_seconds: f32, scene: &SceneMap) -> bool {
        let Some(dir) = direction.try_normalize() else {
            return false;
        };
        self.input_this_tick = true;

        let proposed = self.motion.position() + dir * (self.speed * dt_seconds.max(0.0));
        let landing = if scene.is_walkable(proposed) {
            Some(proposed)
        } else {
            scene
                .nearest_walkable_point(proposed, Some(self.motion.room()))
                .filter(|p| p.distance(proposed) < DIRECT_SNAP_LIMIT && scene.is_walkable(*p))
        };

        match landing {
            Some(p) => {
                self.motion.move_to(p, scene);
                self.motion.clear_path();
                self.target = None;
                true
            }
            None => false,
        }
    }

    /// Route to `target`. Within the current room this is a single mesh
    /// query; otherwise BFS over rooms stitched with corridor paths. Returns
    /// false when the target is outside every room or unreachable.
    pub fn set_target_position(&mut self, target: Vec2, scene: &SceneMap) -> bool {
        let Some(target_room) = scene.room_at(target) else {
            warn!(x = target.x, z = target.z, "target is not in any room");
            return false;
        };
        let goal = target_room.nearest_walkable_point(target);

        let path = if target_room.id() == self.motion.room() {
            target_room.find_path_in_room(self.motion.position(), goal)
        } else {
            let rooms = scene
                .graph()
                .find_room_path(self.motion.room(), target_room.id());
            if rooms.is_empty() {
                warn!(from = %self.motion.room(), to = %target_room.id(), "no room path");
                return false;
            }
            scene.build_route(
                &rooms,
                self.motion.position(),
                RouteDestination::Point(goal),
                &mut self.rng,
            )
        };

        debug!(room = %target_room.id(), waypoints = path.len(), "player target set");
        self.target = Some(target);
        self.motion.set_path(path);
        self.stuck.clear();
        true
    }
}

impl Walker for PlayerCharacter {
    fn id(&self) -> &str {
        PLAYER_ID
    }

    fn position_2d(&self) -> Vec2 {
        self.motion.position()
    }

    fn facing(&self) -> Vec2 {
        self.motion.facing()
    }

    fn current_room(&self) -> &str {
        self.motion.room()
    }

    fn update(&mut self, ctx: &TickContext, scene: &SceneMap) {
        let dt = ctx.dt();
        let attempting = self.input_this_tick || self.motion.has_path();
        self.input_this_tick = false;

        if self.motion.follow(self.speed, dt, scene) == StepOutcome::ReachedEnd {
            self.motion.clear_path();
            self.target = None;
        }

        if self.stuck.observe(self.motion.position(), attempting, dt) {
            warn!(room = %self.motion.room(), "player stuck, resetting");
            self.reset(scene);
        }
    }

    fn reset(&mut self, scene: &SceneMap) {
        self.motion.reset(scene);
        self.stuck.clear();
    }
}
