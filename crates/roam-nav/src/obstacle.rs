use crate::{Bounds2, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Determinants smaller than this are treated as parallel segments.
const PARALLEL_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ObstacleKind {
    #[default]
    Furniture,
    Wall,
    Decoration,
}

/// Axis-aligned rectangular blocker.
///
/// `position` is the absolute center on the ground plane and `size` the full
/// width (x) and depth (z). `height` only matters to renderers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Obstacle {
    pub id: String,
    pub name: String,
    pub position: Vec2,
    pub size: Vec2,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            size,
            height: 1.0,
            kind: ObstacleKind::Furniture,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn with_kind(mut self, kind: ObstacleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn bounds(&self) -> Bounds2 {
        Bounds2::from_center_size(self.position, self.size)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        self.bounds().contains(p)
    }

    pub fn expanded_bounds(&self, padding: f32) -> Bounds2 {
        self.bounds().expanded(padding)
    }

    /// True if either endpoint lies inside the rectangle or the segment
    /// crosses one of its four edges.
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        if self.contains_point(a) || self.contains_point(b) {
            return true;
        }

        let corners = self.bounds().corners();
        (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
    }

    /// Closest point of the rectangle (boundary or interior) to `p`.
    pub fn closest_point_on_boundary(&self, p: Vec2) -> Vec2 {
        let b = self.bounds();
        Vec2::new(p.x.clamp(b.min.x, b.max.x), p.z.clamp(b.min.z, b.max.z))
    }
}

// Segments a1 + t*(a2-a1) and b1 + u*(b2-b1) intersect when both t and u land in [0, 1].
fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let r = a2 - a1;
    let s = b2 - b1;
    let det = r.cross(s);
    if det.abs() < PARALLEL_EPSILON {
        return false;
    }
    let qp = b1 - a1;
    let t = qp.cross(s) / det;
    let u = qp.cross(r) / det;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}
