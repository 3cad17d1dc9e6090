//! Node storage and whole-graph queries.

use std::collections::BTreeMap;

use vanet_core::{NodeId, Point2};

use crate::{Link, Node};

/// All nodes in the network, keyed by id.
///
/// A `BTreeMap` rather than a hash map: every per-tick scan (movement,
/// message generation, topology rebuild, sample collection) iterates this
/// store while consuming the shared RNG, so iteration order must be
/// deterministic for runs to reproduce from a seed.
#[derive(Default)]
pub struct NodeStore {
    nodes: BTreeMap<NodeId, Node>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Insert `node`, replacing any previous node with the same id.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        id
    }

    /// Remove a node.  Links *to* it held by other nodes persist until the
    /// next topology rebuild discards them.
    pub fn remove(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    #[inline]
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Iteration (always in id order) ────────────────────────────────────

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.is_vehicle())
    }

    pub fn vehicle_ids(&self) -> Vec<NodeId> {
        self.vehicles().map(|n| n.id.clone()).collect()
    }

    // ── Counts ────────────────────────────────────────────────────────────

    pub fn vehicle_count(&self) -> usize {
        self.vehicles().count()
    }

    pub fn infrastructure_count(&self) -> usize {
        self.nodes.values().filter(|n| !n.is_vehicle()).count()
    }

    // ── Graph queries ─────────────────────────────────────────────────────

    /// The directed link `from → to`, if present.
    pub fn link(&self, from: &NodeId, to: &NodeId) -> Option<&Link> {
        self.nodes.get(from).and_then(|n| n.links.get(to))
    }

    /// The roadside unit closest to `p`, if any exist.
    pub fn nearest_infrastructure(&self, p: Point2) -> Option<NodeId> {
        self.nodes
            .values()
            .filter(|n| !n.is_vehicle())
            .min_by(|a, b| a.pos.distance(p).total_cmp(&b.pos.distance(p)))
            .map(|n| n.id.clone())
    }

    /// Drop every link in the graph (start of a topology rebuild).
    pub fn clear_links(&mut self) {
        for node in self.nodes.values_mut() {
            node.clear_links();
        }
    }

    /// Total directed link count across all nodes.
    pub fn total_links(&self) -> usize {
        self.nodes.values().map(|n| n.links.len()).sum()
    }

    /// Mean quality over all vehicle-owned outgoing links, or 0 with no
    /// links.  Infrastructure-owned links are excluded: the score tracks
    /// what the learned policy can influence.
    pub fn average_link_quality(&self) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for node in self.vehicles() {
            for link in node.links.values() {
                total += link.quality;
                count += 1;
            }
        }
        if count > 0 {
            total / count as f64
        } else {
            0.0
        }
    }
}
