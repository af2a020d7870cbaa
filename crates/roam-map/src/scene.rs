use std::collections::BTreeMap;

use roam_nav::Vec2;
use tracing::{debug, warn};

use crate::config::{NavSettings, SceneConfig};
use crate::corridor::Corridor;
use crate::error::Result;
use crate::graph::RoomGraph;
use crate::room::Room;

/// Read-only arena of every room and corridor, shared by all agents.
///
/// Rooms and corridors keep configuration order, which decides ties in
/// containment lookups.
#[derive(Debug, Clone)]
pub struct SceneMap {
    settings: NavSettings,
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
    room_index: BTreeMap<String, usize>,
    corridor_index: BTreeMap<String, usize>,
    graph: RoomGraph,
}

impl SceneMap {
    /// Validate the config, build every room mesh, then every corridor mesh.
    pub fn build(config: &SceneConfig) -> Result<Self> {
        config.validate()?;
        let settings = config.nav;

        let rooms: Vec<Room> = config
            .rooms
            .iter()
            .map(|c| Room::new(c, &settings))
            .collect();
        let room_index: BTreeMap<String, usize> = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id().to_string(), i))
            .collect();

        for room in &rooms {
            let unreachable = room.unreachable_connections();
            if !unreachable.is_empty() {
                warn!(room = %room.id(), doorways = ?unreachable, "doorway is not walkable");
            }
            debug!(room = %room.id(), nodes = room.nav_mesh().node_count(), "room mesh built");
        }

        let mut corridors = Vec::with_capacity(config.corridors.len());
        for corridor_config in &config.corridors {
            let mut corridor = Corridor::new(corridor_config);
            // Both ids were checked by `validate`.
            if let (Some(&a), Some(&b)) = (
                room_index.get(corridor.room_a()),
                room_index.get(corridor.room_b()),
            ) {
                let (room_a, room_b) = (&rooms[a], &rooms[b]);
                if room_a.connection_point(corridor.connection_a()).is_none() {
                    warn!(corridor = %corridor.id(), room = %room_a.id(), doorway = %corridor.connection_a(), "missing doorway");
                }
                if room_b.connection_point(corridor.connection_b()).is_none() {
                    warn!(corridor = %corridor.id(), room = %room_b.id(), doorway = %corridor.connection_b(), "missing doorway");
                }
                corridor.initialize_nav_mesh(room_a, room_b, &settings);
            }
            corridors.push(corridor);
        }
        let corridor_index = corridors
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id().to_string(), i))
            .collect();

        let graph = RoomGraph::from_corridors(&corridors);

        Ok(Self {
            settings,
            rooms,
            corridors,
            room_index,
            corridor_index,
            graph,
        })
    }

    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.room_index.get(id).map(|&i| &self.rooms[i])
    }

    pub fn corridor(&self, id: &str) -> Option<&Corridor> {
        self.corridor_index.get(id).map(|&i| &self.corridors[i])
    }

    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(Room::id)
    }

    /// First room, in configuration order, whose footprint contains `p`.
    pub fn room_at(&self, p: Vec2) -> Option<&Room> {
        self.rooms.iter().find(|r| r.contains_point(p))
    }

    pub fn corridor_between(&self, a: &str, b: &str) -> Option<&Corridor> {
        self.corridors.iter().find(|c| c.joins(a, b))
    }

    /// Both rooms a corridor joins, as `(room_a, room_b)`.
    pub fn corridor_rooms(&self, corridor: &Corridor) -> Option<(&Room, &Room)> {
        Some((self.room(corridor.room_a())?, self.room(corridor.room_b())?))
    }

    /// First corridor whose band contains `p`.
    pub fn corridor_at(&self, p: Vec2) -> Option<&Corridor> {
        self.corridors.iter().find(|c| {
            self.corridor_rooms(c)
                .is_some_and(|(a, b)| c.contains_point(p, a, b))
        })
    }

    /// A room containing `p` decides; otherwise a corridor containing `p`
    /// decides; otherwise `p` is off the map.
    pub fn is_walkable(&self, p: Vec2) -> bool {
        if let Some(room) = self.room_at(p) {
            return room.is_walkable(p);
        }
        match self.corridor_at(p) {
            Some(corridor) => self
                .corridor_rooms(corridor)
                .is_some_and(|(a, b)| corridor.is_walkable(p, a, b)),
            None => false,
        }
    }

    /// Closest walkable point to `p` on the mesh of whatever contains it,
    /// trying `hint_room` first. `None` when `p` is off every room and
    /// corridor.
    pub fn nearest_walkable_point(&self, p: Vec2, hint_room: Option<&str>) -> Option<Vec2> {
        if let Some(room) = hint_room.and_then(|id| self.room(id)) {
            if room.contains_point(p) {
                return Some(room.nearest_walkable_point(p));
            }
        }
        if let Some(room) = self.room_at(p) {
            return Some(room.nearest_walkable_point(p));
        }
        self.corridor_at(p)
            .and_then(Corridor::nav_mesh)
            .map(|mesh| mesh.nearest_walkable_point(p))
    }
}
