//! Stitching room-local and corridor paths into one multi-room route.

use roam_core::DeterministicRng;
use roam_nav::{NavPath, Vec2};
use tracing::debug;

use crate::room::Room;
use crate::scene::SceneMap;

/// Where the last room of a route should end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteDestination {
    /// A freshly drawn random walkable point in the destination room.
    Explore,
    /// An exact point, e.g. a click target.
    Point(Vec2),
}

impl SceneMap {
    /// Build a route along `rooms` (as returned by BFS) starting from `from`.
    ///
    /// The first room paths from `from` itself. Every later room enters at the
    /// doorway shared with the previous room; every room but the last exits at
    /// the doorway shared with the next one. Doorways are snapped to the room
    /// mesh and fall back to the room center when the doorway name is
    /// missing. Each corridor in between contributes its own mesh path, run in
    /// the direction of travel.
    pub fn build_route(
        &self,
        rooms: &[String],
        from: Vec2,
        destination: RouteDestination,
        rng: &mut impl DeterministicRng,
    ) -> NavPath {
        let mut points = Vec::new();
        let last = rooms.len().saturating_sub(1);

        for (i, room_id) in rooms.iter().enumerate() {
            let Some(room) = self.room(room_id) else {
                continue;
            };

            let entry = if i == 0 {
                from
            } else {
                self.doorway_toward(room, &rooms[i - 1])
            };
            let exit = if i < last {
                self.doorway_toward(room, &rooms[i + 1])
            } else {
                match destination {
                    RouteDestination::Explore => room.random_walkable_position(rng),
                    RouteDestination::Point(p) => p,
                }
            };
            points.extend(room.find_path_in_room(entry, exit).points);

            if i < last {
                points.extend(self.corridor_leg(room_id, &rooms[i + 1]));
            }
        }

        debug!(rooms = ?rooms, waypoints = points.len(), "route built");
        NavPath::new(points)
    }

    fn doorway_toward(&self, room: &Room, neighbor: &str) -> Vec2 {
        self.corridor_between(room.id(), neighbor)
            .and_then(|c| c.connection_for(room.id()))
            .and_then(|name| room.connection_point(name))
            .map(|door| room.nearest_walkable_point(door))
            .unwrap_or_else(|| room.nearest_walkable_point(room.center()))
    }

    // Corridor path between its first and last waypoints, oriented from `from_room`.
    fn corridor_leg(&self, from_room: &str, to_room: &str) -> Vec<Vec2> {
        let Some(corridor) = self.corridor_between(from_room, to_room) else {
            return Vec::new();
        };
        let Some((room_a, room_b)) = self.corridor_rooms(corridor) else {
            return Vec::new();
        };
        let Some(mesh) = corridor.nav_mesh() else {
            return Vec::new();
        };

        let mut waypoints = corridor.waypoints(room_a, room_b);
        if corridor.room_a() != from_room {
            waypoints.reverse();
        }
        match (waypoints.first(), waypoints.last()) {
            (Some(&first), Some(&last)) if waypoints.len() >= 2 => {
                mesh.find_path(first, last).points
            }
            _ => waypoints,
        }
    }
}
