//! Message delivery over the current topology.
//!
//! Three disciplines share a two-stage per-hop loss model (congestion draw,
//! then environment draw against link reliability):
//!
//! - **flood broadcast** — safety messages, every direct neighbor;
//! - **selective broadcast** — destination-less non-safety messages, only a
//!   greedy multipoint-relay subset of neighbors;
//! - **unicast** — hop-by-hop along a routed path, verifying each link
//!   still exists.
//!
//! The congestion scale factors (0.7 broadcast, 0.8 unicast) are calibrated
//! severity knobs.

use std::collections::{BTreeMap, BTreeSet};

use vanet_core::{Message, NodeId, Point2, SimRng};

use vanet_channel::{congestion_factor, CongestionZone, DENSITY_RADIUS_M};
use vanet_net::{DensityIndex, NodeStore};

use crate::MetricsSink;

/// Congestion-loss scale for broadcast transmissions.
const BROADCAST_CONGESTION_SCALE: f64 = 0.7;

/// Congestion-loss scale for unicast hops — unicast penalises congestion
/// harder.
const UNICAST_CONGESTION_SCALE: f64 = 0.8;

// ── Delivery ──────────────────────────────────────────────────────────────────

/// Outcome of one delivery attempt.
///
/// `path_broken` distinguishes "retry next tick via re-route" from
/// "delivered" and from "lost in transit" (no retry; the message is
/// dropped).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: bool,
    pub path_broken: bool,
    /// Successful hops: the full path length for a delivered unicast, the
    /// index of the failing hop otherwise; 1 or 0 for broadcasts.
    pub hops: usize,
}

// ── DeliveryContext ───────────────────────────────────────────────────────────

/// Borrowed view of everything one tick's delivery phase needs.
pub(crate) struct DeliveryContext<'a> {
    pub nodes: &'a NodeStore,
    pub zones: &'a [CongestionZone],
    pub density: &'a DensityIndex,
}

impl DeliveryContext<'_> {
    fn congestion_at(&self, p: Point2) -> f64 {
        congestion_factor(self.zones, p, self.density.count_within(p, DENSITY_RADIUS_M))
    }

    /// One two-stage loss draw for a transmission from a point with
    /// congestion factor `congestion` over a link of `reliability`.
    ///
    /// Reports the loss (if any) and the attempt to `sink`; returns `true`
    /// when the packet survives both stages.
    fn transmit<M: MetricsSink>(
        &self,
        msg: &Message,
        congestion: f64,
        congestion_scale: f64,
        reliability: f64,
        rng: &mut SimRng,
        sink: &mut M,
    ) -> bool {
        let mut received = true;
        if rng.random::<f64>() < congestion * congestion_scale {
            received = false;
            sink.on_congestion_loss(msg.kind, msg.size);
        } else if rng.random::<f64>() > reliability {
            received = false;
            sink.on_environment_loss(msg.kind, msg.size);
        }
        sink.on_packet_attempt();
        received
    }

    // ── Broadcast ─────────────────────────────────────────────────────────

    /// Flood `msg` to every direct neighbor of `source`.
    ///
    /// Counts as delivered (one hop) if at least one neighbor received it.
    pub fn broadcast<M: MetricsSink>(
        &self,
        msg: &Message,
        source: &NodeId,
        rng: &mut SimRng,
        sink: &mut M,
    ) -> Delivery {
        let Some(node) = self.nodes.get(source) else {
            return Delivery { delivered: false, path_broken: false, hops: 0 };
        };
        let congestion = self.congestion_at(node.pos);

        let mut receipts = 0usize;
        for link in node.links.values() {
            if self.transmit(msg, congestion, BROADCAST_CONGESTION_SCALE, link.reliability, rng, sink)
            {
                receipts += 1;
            }
        }

        Delivery {
            delivered: receipts > 0,
            path_broken: false,
            hops: usize::from(receipts > 0),
        }
    }

    /// Broadcast `msg` through a greedy multipoint-relay subset of
    /// `source`'s neighbors instead of flooding all of them.
    pub fn selective_broadcast<M: MetricsSink>(
        &self,
        msg: &Message,
        source: &NodeId,
        rng: &mut SimRng,
        sink: &mut M,
    ) -> Delivery {
        let Some(node) = self.nodes.get(source) else {
            return Delivery { delivered: false, path_broken: false, hops: 0 };
        };
        let congestion = self.congestion_at(node.pos);
        let relays = self.relay_set(source);

        let mut receipts = 0usize;
        for relay in &relays {
            let Some(link) = node.links.get(relay) else {
                continue;
            };
            if self.transmit(msg, congestion, BROADCAST_CONGESTION_SCALE, link.reliability, rng, sink)
            {
                receipts += 1;
            }
        }

        Delivery {
            delivered: receipts > 0,
            path_broken: false,
            hops: usize::from(receipts > 0),
        }
    }

    /// Greedy multipoint-relay selection: repeatedly pick the neighbor
    /// covering the most not-yet-covered two-hop nodes, until no candidate
    /// adds coverage.
    ///
    /// Works on its own candidate/covered sets — the caller's neighbor maps
    /// are never touched, and ties resolve to the earliest id.
    pub fn relay_set(&self, source: &NodeId) -> BTreeSet<NodeId> {
        let Some(node) = self.nodes.get(source) else {
            return BTreeSet::new();
        };

        // Each neighbor's own neighborhood (its potential coverage).
        let coverage: BTreeMap<&NodeId, BTreeSet<&NodeId>> = node
            .links
            .keys()
            .map(|neighbor| {
                let reach = self
                    .nodes
                    .get(neighbor)
                    .map(|n| n.links.keys().collect())
                    .unwrap_or_default();
                (neighbor, reach)
            })
            .collect();

        let mut covered: BTreeSet<&NodeId> = node.links.keys().collect();
        covered.insert(source);
        let mut candidates: BTreeSet<&NodeId> = node.links.keys().collect();
        let mut selected = BTreeSet::new();

        loop {
            let mut best: Option<(&NodeId, usize)> = None;
            for &candidate in &candidates {
                let gain = coverage[candidate].difference(&covered).count();
                if gain > best.map_or(0, |(_, g)| g) {
                    best = Some((candidate, gain));
                }
            }
            let Some((relay, _)) = best else {
                break; // no candidate adds new coverage
            };
            candidates.remove(relay);
            covered.extend(coverage[relay].iter().copied());
            selected.insert(relay.clone());
        }

        selected
    }

    // ── Unicast ───────────────────────────────────────────────────────────

    /// Walk `path` hop by hop, verifying each link still exists and drawing
    /// both loss stages per hop.  Stops at the first loss or missing link.
    pub fn unicast<M: MetricsSink>(
        &self,
        msg: &Message,
        path: &[NodeId],
        rng: &mut SimRng,
        sink: &mut M,
    ) -> Delivery {
        let mut successful = 0usize;

        for pair in path.windows(2) {
            let (current_id, next_id) = (&pair[0], &pair[1]);
            let Some(current) = self.nodes.get(current_id) else {
                return Delivery { delivered: false, path_broken: true, hops: successful };
            };
            let Some(link) = current.links.get(next_id) else {
                return Delivery { delivered: false, path_broken: true, hops: successful };
            };

            let congestion = self.congestion_at(current.pos);
            if !self.transmit(msg, congestion, UNICAST_CONGESTION_SCALE, link.reliability, rng, sink)
            {
                return Delivery { delivered: false, path_broken: false, hops: successful };
            }
            successful += 1;
        }

        Delivery { delivered: true, path_broken: false, hops: path.len().saturating_sub(1) }
    }
}
