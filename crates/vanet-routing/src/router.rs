//! Dijkstra's algorithm over the node store's link maps.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use vanet_core::{MessageKind, NodeId};
use vanet_net::NodeStore;

use crate::EdgePolicy;

// ── Heap entry ────────────────────────────────────────────────────────────────

/// Min-heap entry: accumulated cost, then discovery sequence as the
/// tie-break so equal-cost pops come out in insertion order.
struct QueueEntry {
    cost: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the cheapest entry on
        // top.  `total_cmp` keeps the ordering total even for infinities.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── find_path ─────────────────────────────────────────────────────────────────

/// Shortest weighted path from `from` to `to` under `policy`.
///
/// Returns the node sequence including both endpoints, or an empty vector
/// when the destination is unreachable (or equals the source).  Scanning
/// stops as soon as the destination pops from the queue.
pub fn find_path(
    nodes: &NodeStore,
    from: &NodeId,
    to: &NodeId,
    policy: &dyn EdgePolicy,
    kind: MessageKind,
) -> Vec<NodeId> {
    if from == to || !nodes.contains(from) || !nodes.contains(to) {
        return Vec::new();
    }

    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut prev: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut settled: FxHashSet<NodeId> = FxHashSet::default();
    let mut heap: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut seq = 0u64;

    dist.insert(from.clone(), 0.0);
    heap.push(QueueEntry { cost: 0.0, seq, node: from.clone() });

    while let Some(QueueEntry { cost, node, .. }) = heap.pop() {
        if node == *to {
            break;
        }
        if !settled.insert(node.clone()) {
            continue; // stale heap entry
        }
        let Some(current) = nodes.get(&node) else {
            continue;
        };

        for (neighbor, link) in &current.links {
            let next_cost = cost + policy.edge_weight(link, kind);
            let best = dist.get(neighbor).copied().unwrap_or(f64::INFINITY);
            if next_cost < best {
                dist.insert(neighbor.clone(), next_cost);
                prev.insert(neighbor.clone(), node.clone());
                seq += 1;
                heap.push(QueueEntry { cost: next_cost, seq, node: neighbor.clone() });
            }
        }
    }

    reconstruct(&prev, from, to)
}

/// Walk the predecessor map backward from `to`; an empty path is returned
/// when the destination was never reached or the trace does not end at the
/// source (defensive check against a corrupt predecessor chain).
fn reconstruct(prev: &FxHashMap<NodeId, NodeId>, from: &NodeId, to: &NodeId) -> Vec<NodeId> {
    let mut path = vec![to.clone()];
    let mut current = to;
    while let Some(parent) = prev.get(current) {
        path.push(parent.clone());
        current = parent;
    }
    path.reverse();

    if path.len() <= 1 || path[0] != *from {
        return Vec::new();
    }
    path
}
