//! Shortest-path routing over the live transition graph.
//!
//! Plain breadth-first search by edge count. The path finder is stateless
//! and re-run on every call: back edges appear and disappear between
//! navigations, so there is nothing safe to cache.

use std::collections::{HashMap, HashSet, VecDeque};

use wayfinder_graph::SceneGraph;

/// Compute the shortest directed path from `from` to `to`, inclusive of both
/// endpoints. Returns `[from]` when `from == to` and an empty vec when either
/// endpoint is unknown or the target is unreachable.
///
/// Ties among equally short paths are broken by per-scene transition
/// declaration order, so a fixed graph always yields the same path.
pub fn shortest_path(graph: &SceneGraph, from: &str, to: &str) -> Vec<String> {
    if graph.lookup(from).is_none() || graph.lookup(to).is_none() {
        return Vec::new();
    }
    if from == to {
        return vec![from.to_string()];
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let Some(scene) = graph.lookup(current) else {
            continue;
        };
        for transition in scene.outgoing() {
            let next = transition.to.as_str();
            if !visited.insert(next) {
                continue;
            }
            parent.insert(next, current);
            if next == to {
                return reconstruct(&parent, from, to);
            }
            queue.push_back(next);
        }
    }

    Vec::new()
}

fn reconstruct(parent: &HashMap<&str, &str>, from: &str, to: &str) -> Vec<String> {
    let mut path = vec![to.to_string()];
    let mut cursor = to;
    while cursor != from {
        match parent.get(cursor) {
            Some(prev) => {
                path.push((*prev).to_string());
                cursor = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
