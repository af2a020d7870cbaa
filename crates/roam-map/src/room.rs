use std::collections::BTreeMap;

use roam_core::DeterministicRng;
use roam_nav::{Bounds2, NavMesh, NavMeshQuery, NavPath, Navigator, Obstacle, PathSource, Vec2, Vec3};

use crate::config::{NavSettings, RoomConfig};

/// A room's geometry and its navigation mesh. Immutable once built.
///
/// The mesh covers the footprint shrunk by `room_interior_scale`, then grows
/// to reach every doorway plus `connection_padding`, so doorways stay
/// reachable even though the interior keeps clear of the walls.
#[derive(Debug, Clone)]
pub struct Room {
    id: String,
    name: String,
    position: Vec3,
    size: Vec3,
    color: String,
    connection_points: BTreeMap<String, Vec2>,
    footprint: Bounds2,
    nav_mesh: NavMesh,
    interior_nodes: Vec<Vec2>,
}

impl Room {
    pub fn new(config: &RoomConfig, settings: &NavSettings) -> Self {
        let center = config.position.planar();
        let footprint = Bounds2::from_center_size(center, config.size.planar());

        let scale = settings.room_interior_scale;
        let mut mesh_bounds = Bounds2::from_center_size(
            center,
            Vec2::new(config.size.x * scale, config.size.z * scale),
        );
        for offset in config.connection_points.values() {
            let door = center + *offset;
            if !mesh_bounds.contains(door) {
                mesh_bounds = mesh_bounds
                    .including(door - Vec2::new(settings.connection_padding, settings.connection_padding))
                    .including(door + Vec2::new(settings.connection_padding, settings.connection_padding));
            }
        }

        let obstacles: Vec<Obstacle> = config
            .obstacles
            .iter()
            .map(|o| o.resolve(center))
            .collect();
        let nav_mesh = NavMesh::build(mesh_bounds, obstacles, settings.room_grid_step);

        let interior_nodes = nav_mesh
            .nodes()
            .iter()
            .map(|n| n.position)
            .filter(|p| footprint.contains(*p))
            .collect();

        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            position: config.position,
            size: config.size,
            color: config.color.clone(),
            connection_points: config.connection_points.clone(),
            footprint,
            nav_mesh,
            interior_nodes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn footprint(&self) -> Bounds2 {
        self.footprint
    }

    pub fn center(&self) -> Vec2 {
        self.position.planar()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.nav_mesh.obstacles()
    }

    pub fn nav_mesh(&self) -> &NavMesh {
        &self.nav_mesh
    }

    /// Coarse footprint test, independent of obstacles.
    pub fn contains_point(&self, p: Vec2) -> bool {
        self.footprint.contains(p)
    }

    /// Inside the footprint and walkable on the mesh.
    pub fn is_walkable(&self, p: Vec2) -> bool {
        self.contains_point(p) && self.nav_mesh.is_walkable(p)
    }

    pub fn find_path_in_room(&self, start: Vec2, end: Vec2) -> NavPath {
        self.nav_mesh.find_path(start, end)
    }

    pub fn find_path_in_room_into(
        &self,
        start: Vec2,
        end: Vec2,
        query: &mut NavMeshQuery,
        out: &mut NavPath,
    ) -> PathSource {
        self.nav_mesh.find_path_into(start, end, query, out)
    }

    /// A uniformly chosen mesh node inside the footprint.
    pub fn random_walkable_position(&self, rng: &mut impl DeterministicRng) -> Vec2 {
        match rng.next_index(self.interior_nodes.len()) {
            Some(i) => self.interior_nodes[i],
            None => self.nav_mesh.random_walkable_point(rng),
        }
    }

    pub fn nearest_walkable_point(&self, p: Vec2) -> Vec2 {
        self.nav_mesh.nearest_walkable_point(p)
    }

    /// Absolute position of a named doorway.
    pub fn connection_point(&self, name: &str) -> Option<Vec2> {
        self.connection_points
            .get(name)
            .map(|offset| self.center() + *offset)
    }

    pub fn connection_names(&self) -> impl Iterator<Item = &str> {
        self.connection_points.keys().map(String::as_str)
    }

    /// The center followed by every doorway, in absolute coordinates.
    pub fn waypoints(&self) -> Vec<Vec2> {
        let center = self.center();
        std::iter::once(center)
            .chain(self.connection_points.values().map(|offset| center + *offset))
            .collect()
    }

    /// Doorways that are outside the mesh or covered by an obstacle.
    pub fn unreachable_connections(&self) -> Vec<&str> {
        self.connection_points
            .iter()
            .filter(|(_, offset)| !self.is_walkable(self.center() + **offset))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl Navigator for Room {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath> {
        Some(self.find_path_in_room(start, goal))
    }

    fn is_walkable(&self, point: Vec2) -> bool {
        Room::is_walkable(self, point)
    }

    fn nearest_point(&self, point: Vec2) -> Option<Vec2> {
        Some(self.nearest_walkable_point(point))
    }
}
