//! Scene configuration: rooms, corridors, and navigation settings.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use roam_nav::{Obstacle, ObstacleKind, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

/// The bundled castle map, also used as the default simulation scene.
pub const DEFAULT_SCENE_YAML: &str = include_str!("../data/default_map.yaml");

/// Static scene description. Loaded once and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub nav: NavSettings,

    pub rooms: Vec<RoomConfig>,

    #[serde(default)]
    pub corridors: Vec<CorridorConfig>,
}

/// Grid and padding parameters for every mesh in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavSettings {
    #[serde(default = "default_room_grid_step")]
    pub room_grid_step: f32,

    /// Corridors use a finer grid for narrow passages.
    #[serde(default = "default_corridor_grid_step")]
    pub corridor_grid_step: f32,

    /// Fraction of the room footprint covered by its mesh, keeping nodes off
    /// the walls.
    #[serde(default = "default_room_interior_scale")]
    pub room_interior_scale: f32,

    /// Margin added around each doorway when it falls outside the mesh.
    #[serde(default = "default_connection_padding")]
    pub connection_padding: f32,

    /// Corridor mesh bounds are padded by `width * corridor_padding_factor`.
    #[serde(default = "default_corridor_padding_factor")]
    pub corridor_padding_factor: f32,
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            room_grid_step: default_room_grid_step(),
            corridor_grid_step: default_corridor_grid_step(),
            room_interior_scale: default_room_interior_scale(),
            connection_padding: default_connection_padding(),
            corridor_padding_factor: default_corridor_padding_factor(),
        }
    }
}

fn default_room_grid_step() -> f32 {
    0.3
}
fn default_corridor_grid_step() -> f32 {
    0.2
}
fn default_room_interior_scale() -> f32 {
    0.85
}
fn default_connection_padding() -> f32 {
    0.3
}
fn default_corridor_padding_factor() -> f32 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub id: String,
    pub name: String,
    pub position: Vec3,
    pub size: Vec3,

    #[serde(default)]
    pub color: String,

    /// Doorways, relative to the room center.
    #[serde(default)]
    pub connection_points: BTreeMap<String, Vec2>,

    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub id: String,
    pub name: String,

    /// Relative to the owning room's center.
    pub position: Vec2,
    pub size: Vec2,

    #[serde(default)]
    pub height: Option<f32>,

    #[serde(default)]
    pub kind: ObstacleKind,
}

impl ObstacleConfig {
    /// Resolve to an absolute obstacle inside a room centered at `origin`.
    pub fn resolve(&self, origin: Vec2) -> Obstacle {
        let mut obstacle = Obstacle::new(
            self.id.clone(),
            self.name.clone(),
            origin + self.position,
            self.size,
        )
        .with_kind(self.kind);
        if let Some(height) = self.height {
            obstacle = obstacle.with_height(height);
        }
        obstacle
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorConfig {
    pub id: String,
    pub room_a: String,
    pub room_b: String,
    pub connection_a: String,
    pub connection_b: String,
    pub width: f32,

    /// Absolute bend points between the two doorways.
    #[serde(default)]
    pub waypoints: Vec<Vec2>,
}

impl SceneConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn embedded() -> Result<Self> {
        Self::from_yaml_str(DEFAULT_SCENE_YAML)
    }

    /// Reject scenes that cannot be built.
    ///
    /// Missing doorway names on a corridor are not errors here; the corridor
    /// simply loses that endpoint at build time.
    pub fn validate(&self) -> Result<()> {
        self.nav.validate()?;

        let mut room_ids = BTreeSet::new();
        for room in &self.rooms {
            if !room_ids.insert(room.id.as_str()) {
                return Err(MapError::DuplicateRoom(room.id.clone()));
            }
            if !positive(room.size.x) || !positive(room.size.z) {
                return Err(invalid(&room.id, "room footprint must be positive"));
            }
            for obstacle in &room.obstacles {
                if !positive(obstacle.size.x) || !positive(obstacle.size.z) {
                    return Err(invalid(&obstacle.id, "obstacle size must be positive"));
                }
            }
        }

        let mut corridor_ids = BTreeSet::new();
        for corridor in &self.corridors {
            if !corridor_ids.insert(corridor.id.as_str()) {
                return Err(MapError::DuplicateCorridor(corridor.id.clone()));
            }
            for room in [&corridor.room_a, &corridor.room_b] {
                if !room_ids.contains(room.as_str()) {
                    return Err(MapError::UnknownRoom {
                        corridor: corridor.id.clone(),
                        room: room.clone(),
                    });
                }
            }
            if !positive(corridor.width) {
                return Err(invalid(&corridor.id, "corridor width must be positive"));
            }
        }

        Ok(())
    }
}

impl NavSettings {
    pub fn validate(&self) -> Result<()> {
        if !positive(self.room_grid_step) || !positive(self.corridor_grid_step) {
            return Err(MapError::InvalidNavSettings(
                "grid steps must be positive".to_string(),
            ));
        }
        if !(self.room_interior_scale > 0.0 && self.room_interior_scale <= 1.0) {
            return Err(MapError::InvalidNavSettings(format!(
                "room_interior_scale must be in (0, 1], got {}",
                self.room_interior_scale
            )));
        }
        if !(self.connection_padding >= 0.0) || !(self.corridor_padding_factor >= 0.0) {
            return Err(MapError::InvalidNavSettings(
                "padding must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v > 0.0 && v.is_finite()
}

fn invalid(id: &str, reason: &str) -> MapError {
    MapError::InvalidGeometry {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}
