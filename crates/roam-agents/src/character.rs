use roam_core::{derive_seed, AgentKey, DeterministicRng, Schedule, SplitMix64, TickContext};
use roam_map::{RouteDestination, SceneMap};
use roam_nav::{NavPath, Vec2};
use tracing::{debug, info, warn};

use crate::behavior::{Behavior, BehaviorConfig, BehaviorSystem};
use crate::config::CharacterConfig;
use crate::locomotion::{Locomotion, StepOutcome};
use crate::walker::Walker;

/// Seconds between arriving in a room and picking the next behavior.
pub const ARRIVAL_PAUSE: f32 = 0.5;

const RNG_STREAM: u64 = 0x0B07_0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterEvent {
    ChooseBehavior,
}

/// An autonomous character driven by [`BehaviorSystem`].
///
/// Every behavior change bumps `generation`; scheduled events carry the
/// generation they were scheduled under and are dropped if it has moved on.
#[derive(Debug, Clone)]
pub struct Character {
    id: String,
    name: String,
    color: String,
    speed: f32,
    rng: SplitMix64,
    behavior_system: BehaviorSystem,
    behavior: Option<Behavior>,
    generation: u64,
    motion: Locomotion,
    schedule: Schedule<CharacterEvent>,
}

impl Character {
    /// The RNG stream is derived from `seed` and the character id, so
    /// characters stay independent of roster order.
    pub fn new(config: &CharacterConfig, behavior: BehaviorConfig, seed: u64) -> Self {
        let key = AgentKey::from_name(&config.id);
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            color: config.color.clone(),
            speed: config.speed,
            rng: SplitMix64::new(derive_seed(seed, key.stable_id(), RNG_STREAM)),
            behavior_system: BehaviorSystem::new(behavior),
            behavior: None,
            generation: 0,
            motion: Locomotion::default(),
            schedule: Schedule::new(),
        }
    }

    /// Start in a random room at a random walkable point, then pick the first
    /// behavior.
    pub fn initialize(&mut self, scene: &SceneMap) {
        let Some(i) = self.rng.next_index(scene.rooms().len()) else {
            warn!(character = %self.id, "scene has no rooms");
            return;
        };
        let room = &scene.rooms()[i];
        let start = room.random_walkable_position(&mut self.rng);
        self.motion = Locomotion::new(start, room.id());
        self.schedule.clear();
        self.choose_new_behavior(scene);
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

    pub fn behavior(&self) -> Option<&Behavior> {
        self.behavior.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &[Vec2] {
        self.motion.path()
    }

    pub fn path_index(&self) -> usize {
        self.motion.cursor()
    }

    pub fn pending_events(&self) -> usize {
        self.schedule.len()
    }

    /// Replace the current behavior from outside the policy, e.g. a scripted
    /// scene. Pending events from the old behavior go stale.
    pub fn assign_behavior(&mut self, behavior: Behavior, scene: &SceneMap) {
        self.behavior = Some(behavior);
        self.generation += 1;
        self.execute_behavior(scene);
    }

    /// Put the character at `position`, e.g. when restoring a saved layout.
    /// The path is dropped.
    pub fn teleport(&mut self, position: Vec2, scene: &SceneMap) {
        let room = scene
            .room_at(position)
            .map(|r| r.id().to_string())
            .unwrap_or_else(|| self.motion.room().to_string());
        self.motion.place(position, room);
        self.motion.clear_path();
    }

    fn choose_new_behavior(&mut self, scene: &SceneMap) {
        let available: Vec<&str> = scene.room_ids().collect();
        let behavior =
            self.behavior_system
                .choose_next_behavior(self.motion.room(), &available, &mut self.rng);
        info!(
            character = %self.id,
            behavior = %behavior.kind(),
            room = %self.motion.room(),
            "new behavior"
        );
        self.behavior = Some(behavior);
        self.generation += 1;
        self.execute_behavior(scene);
    }

    fn execute_behavior(&mut self, scene: &SceneMap) {
        let Some(behavior) = &self.behavior else {
            return;
        };
        match behavior {
            Behavior::Wait { .. } => self.motion.clear_path(),
            Behavior::Roam { .. } => self.execute_roam(scene),
            Behavior::MoveToTarget {
                target_room,
                target_position,
            } => {
                let (target_room, target_position) = (target_room.clone(), *target_position);
                self.execute_move(scene, &target_room, target_position);
            }
        }
    }

    fn execute_roam(&mut self, scene: &SceneMap) {
        let Some(room) = scene.room(self.motion.room()) else {
            self.motion.clear_path();
            return;
        };
        let target = room.random_walkable_position(&mut self.rng);
        let path = room.find_path_in_room(self.motion.position(), target);
        debug!(character = %self.id, x = target.x, z = target.z, "roaming");
        self.motion.set_path(path);
    }

    fn execute_move(&mut self, scene: &SceneMap, target_room: &str, target_position: Option<Vec2>) {
        if target_room == self.motion.room() {
            let roam = self
                .behavior_system
                .create_roam(self.motion.room(), &mut self.rng);
            self.behavior = Some(roam);
            self.execute_roam(scene);
            return;
        }

        let rooms = scene.graph().find_room_path(self.motion.room(), target_room);
        if rooms.is_empty() {
            warn!(character = %self.id, from = %self.motion.room(), to = %target_room, "no room path");
            // Reselected on the next tick.
            self.behavior = None;
            self.motion.clear_path();
            return;
        }

        let destination = match target_position {
            Some(p) => RouteDestination::Point(p),
            None => RouteDestination::Explore,
        };
        let route: NavPath =
            scene.build_route(&rooms, self.motion.position(), destination, &mut self.rng);
        info!(
            character = %self.id,
            from = %self.motion.room(),
            to = %target_room,
            hops = rooms.len() - 1,
            "moving"
        );
        if route.len() < 2 {
            self.motion.clear_path();
            self.arrive(target_room);
        } else {
            self.motion.set_path(route);
        }
    }

    fn arrive(&mut self, room: &str) {
        info!(character = %self.id, room = %room, "arrived");
        self.motion.set_room(room);
        self.schedule
            .schedule_in(ARRIVAL_PAUSE, self.generation, CharacterEvent::ChooseBehavior);
    }

    fn drain_events(&mut self, scene: &SceneMap) {
        while let Some(fired) = self.schedule.pop_due() {
            if fired.generation != self.generation {
                debug!(character = %self.id, "stale event ignored");
                continue;
            }
            match fired.event {
                CharacterEvent::ChooseBehavior => self.choose_new_behavior(scene),
            }
        }
    }

    fn on_path_end(&mut self, scene: &SceneMap) {
        let target = match &self.behavior {
            Some(Behavior::Roam { .. }) => None,
            Some(Behavior::MoveToTarget { target_room, .. }) => Some(target_room.clone()),
            _ => return,
        };
        match target {
            None => self.execute_roam(scene),
            Some(room) => self.arrive(&room),
        }
    }
}

impl Walker for Character {
    fn id(&self) -> &str {
        &self.id
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

    /// Scheduled events fire first, so a behavior chosen by an event starts
    /// moving on the same tick.
    fn update(&mut self, ctx: &TickContext, scene: &SceneMap) {
        let dt = ctx.dt();
        self.schedule.advance(dt);
        self.drain_events(scene);

        let Some(behavior) = self.behavior.as_mut() else {
            self.choose_new_behavior(scene);
            return;
        };

        if self.behavior_system.update_behavior(behavior, dt) {
            self.choose_new_behavior(scene);
            return;
        }

        if self.motion.follow(self.speed, dt, scene) == StepOutcome::ReachedEnd {
            self.on_path_end(scene);
        }
    }

    fn reset(&mut self, scene: &SceneMap) {
        self.motion.reset(scene);
    }
}
