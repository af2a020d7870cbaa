//! Grid-sampled walkability meshes, A* path queries, and obstacle geometry.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod math;
pub mod mesh;
pub mod navigator;
pub mod obstacle;

pub use math::{Bounds2, Vec2, Vec3};
pub use mesh::{NavMesh, NavMeshQuery, NavNode, PathSource};
pub use navigator::{NavPath, Navigator};
pub use obstacle::{Obstacle, ObstacleKind};
