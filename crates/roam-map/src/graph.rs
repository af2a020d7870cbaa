use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::corridor::Corridor;

/// Room adjacency derived from corridors. Each corridor adds an edge in both
/// directions; neighbours keep corridor order.
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    adjacency: BTreeMap<String, Vec<String>>,
}

impl RoomGraph {
    pub fn from_corridors<'a>(corridors: impl IntoIterator<Item = &'a Corridor>) -> Self {
        let mut graph = Self::default();
        for corridor in corridors {
            graph.add_edge(corridor.room_a(), corridor.room_b());
        }
        graph
    }

    pub fn add_edge(&mut self, a: &str, b: &str) {
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .push(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .push(a.to_string());
    }

    pub fn neighbors(&self, room_id: &str) -> &[String] {
        self.adjacency
            .get(room_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_room(&self, room_id: &str) -> bool {
        self.adjacency.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Fewest-hops room sequence from `from` to `to`, both ends included.
    ///
    /// Returns an empty vector when `to` is unreachable. `from == to` yields
    /// the single room.
    pub fn find_room_path(&self, from: &str, to: &str) -> Vec<String> {
        if from == to {
            return vec![from.to_string()];
        }

        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let mut parent: BTreeMap<&str, &str> = BTreeMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                let next = next.as_str();
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, current);
                if next == to {
                    return unwind(&parent, from, to);
                }
                queue.push_back(next);
            }
        }

        Vec::new()
    }
}

fn unwind(parent: &BTreeMap<&str, &str>, from: &str, to: &str) -> Vec<String> {
    let mut path = vec![to.to_string()];
    let mut current = to;
    while current != from {
        match parent.get(current) {
            Some(&prev) => {
                path.push(prev.to_string());
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
