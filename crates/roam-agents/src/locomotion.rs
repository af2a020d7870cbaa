//! Path following and walkability snapping shared by every walker.

use roam_map::SceneMap;
use roam_nav::{NavPath, Vec2};
use tracing::debug;

/// Within this distance a waypoint counts as reached.
pub const SNAP_THRESHOLD: f32 = 0.1;

/// Result of one [`Locomotion::follow`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No path, or the path is already finished.
    Idle,
    Moved,
    ReachedWaypoint,
    ReachedEnd,
}

/// Position, room bookkeeping, and the flattened route being walked.
#[derive(Debug, Clone, Default)]
pub struct Locomotion {
    position: Vec2,
    room: String,
    path: Vec<Vec2>,
    cursor: usize,
    facing: Vec2,
}

impl Locomotion {
    pub fn new(position: Vec2, room: impl Into<String>) -> Self {
        Self {
            position,
            room: room.into(),
            ..Self::default()
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Last room whose footprint contained the walker. Kept while walking a
    /// corridor.
    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn set_room(&mut self, room: impl Into<String>) {
        self.room = room.into();
    }

    pub fn facing(&self) -> Vec2 {
        self.facing
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// A path of at least two points with waypoints left to reach.
    pub fn has_path(&self) -> bool {
        self.path.len() > 1 && self.cursor < self.path.len() - 1
    }

    pub fn next_waypoint(&self) -> Option<Vec2> {
        if self.has_path() {
            self.path.get(self.cursor + 1).copied()
        } else {
            None
        }
    }

    pub fn set_path(&mut self, path: NavPath) {
        self.path = path.points;
        self.cursor = 0;
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
        self.cursor = 0;
    }

    pub fn place(&mut self, position: Vec2, room: impl Into<String>) {
        self.position = position;
        self.room = room.into();
    }

    /// Advance toward the next waypoint by `speed * dt_seconds`, never past it.
    pub fn follow(&mut self, speed: f32, dt_seconds: f32, scene: &SceneMap) -> StepOutcome {
        let Some(next) = self.next_waypoint() else {
            return StepOutcome::Idle;
        };

        let delta = next - self.position;
        let distance = delta.length();
        if distance < SNAP_THRESHOLD {
            if scene.is_walkable(next) {
                self.move_to(next, scene);
            }
            self.cursor += 1;
            return if self.cursor >= self.path.len() - 1 {
                StepOutcome::ReachedEnd
            } else {
                StepOutcome::ReachedWaypoint
            };
        }

        let step = speed.max(0.0) * dt_seconds.max(0.0);
        let proposed = if step >= distance {
            next
        } else {
            self.position + delta * (step / distance)
        };
        self.commit_move(proposed, scene);
        StepOutcome::Moved
    }

    /// Take `proposed` if it is walkable, otherwise the nearest walkable
    /// point. When neither is walkable on the scene (off the map, or a mesh
    /// node outside every room and corridor) the walker stays put. Returns
    /// whether the position changed.
    pub fn commit_move(&mut self, proposed: Vec2, scene: &SceneMap) -> bool {
        let target = if scene.is_walkable(proposed) {
            Some(proposed)
        } else {
            scene
                .nearest_walkable_point(proposed, Some(self.room.as_str()))
                .filter(|p| scene.is_walkable(*p))
        };
        match target {
            Some(p) if p != self.position => {
                self.move_to(p, scene);
                true
            }
            _ => false,
        }
    }

    /// Rewind to the start of the current path.
    pub fn reset(&mut self, scene: &SceneMap) {
        self.cursor = 0;
        if let Some(&first) = self.path.first() {
            self.position = first;
            self.update_room(scene);
        }
    }

    /// Move straight to `p` without a walkability check, updating facing and room.
    pub fn move_to(&mut self, p: Vec2, scene: &SceneMap) {
        if let Some(dir) = (p - self.position).try_normalize() {
            self.facing = dir;
        }
        self.position = p;
        self.update_room(scene);
    }

    fn update_room(&mut self, scene: &SceneMap) {
        if let Some(room) = scene.room_at(self.position) {
            if room.id() != self.room {
                debug!(from = %self.room, to = %room.id(), "entered room");
                self.room = room.id().to_string();
            }
        }
    }
}
