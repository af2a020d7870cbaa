use std::borrow::Cow;

use roam_nav::{Bounds2, NavMesh, Vec2};

use crate::config::{CorridorConfig, NavSettings};
use crate::room::Room;

/// A passage between two rooms' doorways.
///
/// The mesh is built lazily by [`Corridor::initialize_nav_mesh`] once both
/// rooms exist; until then the corridor is not walkable.
#[derive(Debug, Clone)]
pub struct Corridor {
    id: String,
    room_a: String,
    room_b: String,
    connection_a: String,
    connection_b: String,
    width: f32,
    waypoints: Vec<Vec2>,
    path: Vec<Vec2>,
    nav_mesh: Option<NavMesh>,
}

impl Corridor {
    pub fn new(config: &CorridorConfig) -> Self {
        Self {
            id: config.id.clone(),
            room_a: config.room_a.clone(),
            room_b: config.room_b.clone(),
            connection_a: config.connection_a.clone(),
            connection_b: config.connection_b.clone(),
            width: config.width,
            waypoints: config.waypoints.clone(),
            path: Vec::new(),
            nav_mesh: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn room_a(&self) -> &str {
        &self.room_a
    }

    pub fn room_b(&self) -> &str {
        &self.room_b
    }

    pub fn connection_a(&self) -> &str {
        &self.connection_a
    }

    pub fn connection_b(&self) -> &str {
        &self.connection_b
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn nav_mesh(&self) -> Option<&NavMesh> {
        self.nav_mesh.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.nav_mesh.is_some()
    }

    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.room_a == a && self.room_b == b) || (self.room_a == b && self.room_b == a)
    }

    /// The doorway name this corridor uses on `room_id`.
    pub fn connection_for(&self, room_id: &str) -> Option<&str> {
        if room_id == self.room_a {
            Some(&self.connection_a)
        } else if room_id == self.room_b {
            Some(&self.connection_b)
        } else {
            None
        }
    }

    pub fn other_room(&self, room_id: &str) -> Option<&str> {
        if room_id == self.room_a {
            Some(&self.room_b)
        } else if room_id == self.room_b {
            Some(&self.room_a)
        } else {
            None
        }
    }

    /// Room A's doorway, the bend points, then room B's doorway. A doorway
    /// the room does not define is left out.
    pub fn generate_path(&self, room_a: &Room, room_b: &Room) -> Vec<Vec2> {
        let mut path = Vec::with_capacity(self.waypoints.len() + 2);
        path.extend(room_a.connection_point(&self.connection_a));
        path.extend(self.waypoints.iter().copied());
        path.extend(room_b.connection_point(&self.connection_b));
        path
    }

    /// Build the mesh over the path bounds padded by `width * corridor_padding_factor`.
    /// A corridor with no resolvable points stays uninitialized.
    pub fn initialize_nav_mesh(&mut self, room_a: &Room, room_b: &Room, settings: &NavSettings) {
        let path = self.generate_path(room_a, room_b);
        let Some(bounds) = Bounds2::from_points(path.iter().copied()) else {
            self.path = path;
            self.nav_mesh = None;
            return;
        };
        let padded = bounds.expanded(self.width * settings.corridor_padding_factor);
        self.nav_mesh = Some(NavMesh::build(padded, Vec::new(), settings.corridor_grid_step));
        self.path = path;
    }

    /// Within half the width of some segment of the path.
    pub fn contains_point(&self, p: Vec2, room_a: &Room, room_b: &Room) -> bool {
        let path = self.resolved_path(room_a, room_b);
        let half = self.width * 0.5;
        path.windows(2)
            .any(|w| p.distance_to_segment(w[0], w[1]) <= half)
    }

    pub fn is_walkable(&self, p: Vec2, room_a: &Room, room_b: &Room) -> bool {
        match &self.nav_mesh {
            Some(mesh) => self.contains_point(p, room_a, room_b) && mesh.is_walkable(p),
            None => false,
        }
    }

    pub fn waypoints(&self, room_a: &Room, room_b: &Room) -> Vec<Vec2> {
        self.generate_path(room_a, room_b)
    }

    fn resolved_path<'a>(&'a self, room_a: &Room, room_b: &Room) -> Cow<'a, [Vec2]> {
        if self.is_initialized() {
            Cow::Borrowed(&self.path)
        } else {
            Cow::Owned(self.generate_path(room_a, room_b))
        }
    }
}
