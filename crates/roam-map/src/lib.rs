//! Rooms, corridors, scene configuration, and room-to-room routing.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;
pub mod corridor;
pub mod error;
pub mod graph;
pub mod presentation;
pub mod room;
pub mod route;
pub mod scene;

pub use config::{
    CorridorConfig, NavSettings, ObstacleConfig, RoomConfig, SceneConfig, DEFAULT_SCENE_YAML,
};
pub use corridor::Corridor;
pub use error::MapError;
pub use graph::RoomGraph;
pub use presentation::{PresentationState, RoomPresentation};
pub use room::Room;
pub use route::RouteDestination;
pub use scene::SceneMap;
