use core::cmp::Ordering;
use std::collections::BinaryHeap;

use roam_core::DeterministicRng;

use crate::{Bounds2, NavPath, Navigator, Obstacle, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Grid-adjacent offsets in `(dx, dz)` order: left, right, up, down, then diagonals.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Slack when counting how many grid steps fit in an extent, so that
/// `0.3 * 10` still samples the far edge.
const STEP_SLACK: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    g: u32,
    node: u32,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u64, u32, u32) {
        (self.f, self.tie, self.g, self.node)
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap. Equal f
        // scores pop in insertion order.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One sampled grid point that is not covered by an obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct NavNode {
    pub id: u32,
    pub position: Vec2,
    pub neighbors: Vec<u32>,
}

/// Whether a path came from the node graph or is the straight-line fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Mesh,
    Fallback,
}

/// Reusable scratch buffers for `NavMesh` queries.
///
/// This avoids per-query allocations when many agents path every frame.
#[derive(Debug, Default)]
pub struct NavMeshQuery {
    open: BinaryHeap<OpenNode>,
    g_score: Vec<u32>,
    came_from: Vec<Option<u32>>,
    closed: Vec<bool>,
    chain: Vec<Vec2>,
}

/// Walkable-area index for one room or corridor.
///
/// Every grid point inside `bounds` that is not inside an obstacle becomes a
/// node; nodes link to their 8 grid neighbours whenever the straight segment
/// between them stays clear of every obstacle. The graph is built once and
/// never mutated.
#[derive(Debug, Clone)]
pub struct NavMesh {
    bounds: Bounds2,
    grid_step: f32,
    obstacles: Vec<Obstacle>,
    nodes: Vec<NavNode>,
    columns: usize,
    rows: usize,
    cells: Vec<Option<u32>>,
    walkable_polygons: Vec<Vec<Vec2>>,
}

impl NavMesh {
    pub fn build(bounds: Bounds2, obstacles: Vec<Obstacle>, grid_step: f32) -> Self {
        assert!(
            grid_step > 0.0 && grid_step.is_finite(),
            "grid_step must be > 0"
        );

        let size = bounds.size();
        let columns = sample_count(size.x, grid_step);
        let rows = sample_count(size.z, grid_step);

        let mut mesh = Self {
            bounds,
            grid_step,
            obstacles,
            nodes: Vec::new(),
            columns,
            rows,
            cells: vec![None; columns * rows],
            walkable_polygons: vec![bounds.corners().to_vec()],
        };

        for col in 0..columns {
            for row in 0..rows {
                let position = mesh.cell_position(col, row);
                if mesh.point_in_obstacle(position) {
                    continue;
                }
                let id = mesh.nodes.len() as u32;
                mesh.nodes.push(NavNode {
                    id,
                    position,
                    neighbors: Vec::new(),
                });
                mesh.cells[row * columns + col] = Some(id);
            }
        }

        for col in 0..columns {
            for row in 0..rows {
                let Some(id) = mesh.cells[row * columns + col] else {
                    continue;
                };
                let from = mesh.nodes[id as usize].position;
                let mut neighbors = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
                for (dx, dz) in NEIGHBOR_OFFSETS {
                    let Some(other) = mesh.cell_at(col as isize + dx, row as isize + dz) else {
                        continue;
                    };
                    let to = mesh.nodes[other as usize].position;
                    if !mesh.segment_blocked(from, to) {
                        neighbors.push(other);
                    }
                }
                mesh.nodes[id as usize].neighbors = neighbors;
            }
        }

        mesh
    }

    pub fn bounds(&self) -> Bounds2 {
        self.bounds
    }

    pub fn grid_step(&self) -> f32 {
        self.grid_step
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The full rectangular bounds, for debug drawing only.
    pub fn walkable_polygons(&self) -> &[Vec<Vec2>] {
        &self.walkable_polygons
    }

    /// Inside the bounds and outside every obstacle. Does not require `p` to
    /// coincide with a sampled node.
    pub fn is_walkable(&self, p: Vec2) -> bool {
        self.bounds.contains(p) && !self.point_in_obstacle(p)
    }

    /// `p` itself when walkable, otherwise the closest node. With no nodes at
    /// all, `p` comes back unchanged.
    pub fn nearest_walkable_point(&self, p: Vec2) -> Vec2 {
        if self.is_walkable(p) {
            return p;
        }
        self.nearest_node(p)
            .map(|id| self.nodes[id as usize].position)
            .unwrap_or(p)
    }

    /// Position of a uniformly chosen node, or the bounds centroid when the
    /// mesh has no nodes.
    pub fn random_walkable_point(&self, rng: &mut impl DeterministicRng) -> Vec2 {
        match rng.next_index(self.nodes.len()) {
            Some(i) => self.nodes[i].position,
            None => self.bounds.center(),
        }
    }

    /// A* over the node graph followed by line-of-sight simplification.
    ///
    /// The result always starts at `start` and ends at `end` exactly. When the
    /// two points snap to the same node, or no node route exists, the result
    /// is the straight segment `[start, end]`.
    pub fn find_path(&self, start: Vec2, end: Vec2) -> NavPath {
        let mut query = NavMeshQuery::default();
        let mut out = NavPath::default();
        self.find_path_into(start, end, &mut query, &mut out);
        out
    }

    pub fn find_path_into(
        &self,
        start: Vec2,
        end: Vec2,
        query: &mut NavMeshQuery,
        out: &mut NavPath,
    ) -> PathSource {
        out.points.clear();

        let (Some(start_node), Some(end_node)) = (self.nearest_node(start), self.nearest_node(end))
        else {
            out.points.extend([start, end]);
            return PathSource::Fallback;
        };

        if start_node == end_node || !self.a_star(start_node, end_node, query) {
            out.points.extend([start, end]);
            return PathSource::Fallback;
        }

        query.chain.clear();
        query.chain.push(start);
        let mut current = Some(end_node);
        let chain_start = query.chain.len();
        while let Some(id) = current {
            query.chain.push(self.nodes[id as usize].position);
            current = query.came_from[id as usize];
        }
        query.chain[chain_start..].reverse();
        query.chain.push(end);

        self.simplify_into(&query.chain, &mut out.points);
        PathSource::Mesh
    }

    fn a_star(&self, start: u32, goal: u32, query: &mut NavMeshQuery) -> bool {
        let goal_pos = self.nodes[goal as usize].position;
        let heuristic = |id: u32| -> u32 { quant(self.nodes[id as usize].position.distance(goal_pos)) };

        let n = self.nodes.len();
        let NavMeshQuery {
            open,
            g_score,
            came_from,
            closed,
            ..
        } = query;
        open.clear();
        g_score.clear();
        g_score.resize(n, u32::MAX);
        came_from.clear();
        came_from.resize(n, None);
        closed.clear();
        closed.resize(n, false);

        g_score[start as usize] = 0;
        open.push(OpenNode {
            f: heuristic(start),
            g: 0,
            node: start,
            tie: 0,
        });
        let mut tie: u64 = 1;

        while let Some(current) = open.pop() {
            if current.node == goal {
                return true;
            }

            let idx = current.node as usize;
            if closed[idx] || current.g != g_score[idx] {
                // Stale heap entry.
                continue;
            }
            closed[idx] = true;

            let from = self.nodes[idx].position;
            for &next in &self.nodes[idx].neighbors {
                let next_idx = next as usize;
                if closed[next_idx] {
                    continue;
                }

                let step = quant(from.distance(self.nodes[next_idx].position));
                let tentative_g = current.g.saturating_add(step);
                if tentative_g >= g_score[next_idx] {
                    continue;
                }

                came_from[next_idx] = Some(current.node);
                g_score[next_idx] = tentative_g;
                open.push(OpenNode {
                    f: tentative_g.saturating_add(heuristic(next)),
                    g: tentative_g,
                    node: next,
                    tie,
                });
                tie += 1;
            }
        }

        false
    }

    // Greedily extend each kept point to the farthest later point it can see.
    fn simplify_into(&self, chain: &[Vec2], out: &mut Vec<Vec2>) {
        out.clear();
        let Some(&first) = chain.first() else {
            return;
        };
        out.push(first);

        let mut current = 0;
        while current + 1 < chain.len() {
            let mut farthest = current + 1;
            for candidate in current + 2..chain.len() {
                if self.segment_blocked(chain[current], chain[candidate]) {
                    break;
                }
                farthest = candidate;
            }
            out.push(chain[farthest]);
            current = farthest;
        }
    }

    fn nearest_node(&self, p: Vec2) -> Option<u32> {
        let mut best: Option<(f32, u32)> = None;
        for node in &self.nodes {
            let d2 = node.position.distance_squared(p);
            match best {
                Some((best_d2, _)) if d2 >= best_d2 => {}
                _ => best = Some((d2, node.id)),
            }
        }
        best.map(|(_, id)| id)
    }

    fn cell_position(&self, col: usize, row: usize) -> Vec2 {
        // Clamp so accumulated float error never pushes the last column past `max`.
        Vec2::new(
            (self.bounds.min.x + col as f32 * self.grid_step).min(self.bounds.max.x),
            (self.bounds.min.z + row as f32 * self.grid_step).min(self.bounds.max.z),
        )
    }

    fn cell_at(&self, col: isize, row: isize) -> Option<u32> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[row * self.columns + col]
    }

    fn point_in_obstacle(&self, p: Vec2) -> bool {
        self.obstacles.iter().any(|o| o.contains_point(p))
    }

    fn segment_blocked(&self, a: Vec2, b: Vec2) -> bool {
        self.obstacles.iter().any(|o| o.intersects_segment(a, b))
    }
}

impl Navigator for NavMesh {
    fn find_path(&self, start: Vec2, goal: Vec2) -> Option<NavPath> {
        Some(NavMesh::find_path(self, start, goal))
    }

    fn is_walkable(&self, point: Vec2) -> bool {
        NavMesh::is_walkable(self, point)
    }

    fn nearest_point(&self, point: Vec2) -> Option<Vec2> {
        Some(self.nearest_walkable_point(point))
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct NavMeshSerde {
    bounds: Bounds2,
    grid_step: f32,
    obstacles: Vec<Obstacle>,
}

#[cfg(feature = "serde")]
impl Serialize for NavMesh {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        NavMeshSerde {
            bounds: self.bounds,
            grid_step: self.grid_step,
            obstacles: self.obstacles.clone(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for NavMesh {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = NavMeshSerde::deserialize(deserializer)?;
        if !(data.grid_step > 0.0 && data.grid_step.is_finite()) {
            return Err(serde::de::Error::custom("grid_step must be > 0"));
        }
        Ok(NavMesh::build(data.bounds, data.obstacles, data.grid_step))
    }
}

fn quant(d: f32) -> u32 {
    (d.max(0.0) * 1024.0) as u32
}

fn sample_count(extent: f32, step: f32) -> usize {
    if !(extent >= 0.0) {
        return 0;
    }
    (extent / step + STEP_SLACK).floor() as usize + 1
}
