//! Per-tick topology rebuild.
//!
//! Every tick the whole link graph is re-derived from current geometry:
//! stale links are discarded wholesale, and every node pair within mutual
//! range gets a fresh pair of directed links.  This O(n²) pass dominates
//! per-tick cost; the density index it builds is returned so the delivery
//! phase can reuse it within the same tick.

use vanet_core::{NodeId, Point2, RoutingMode, SimRng};

use vanet_channel::model::LinkEstimate;
use vanet_channel::{
    congestion_factor, obstacle_attenuation, ChannelModel, CongestionZone, Obstacle,
    DENSITY_RADIUS_M,
};

use crate::{DensityIndex, Link, NodeStore, RoadMap};

/// Link duration cap used when normalising duration into a quality factor.
const DURATION_CAP_SECS: f64 = 60.0;

/// Relative speed that zeroes the stability factor, in m/s.
const SPEED_NORM: f64 = 30.0;

// ── Node snapshot ─────────────────────────────────────────────────────────────

/// Immutable per-node geometry captured before the pair scan, so the scan
/// borrows nothing from the store it is about to mutate.
struct NodeView {
    id: NodeId,
    pos: Point2,
    range: f64,
    vehicle: bool,
    speed: f64,
    velocity: (f64, f64),
}

impl NodeView {
    fn of(node: &crate::Node) -> Self {
        Self {
            id: node.id.clone(),
            pos: node.pos,
            range: node.range,
            vehicle: node.is_vehicle(),
            speed: node.speed(),
            velocity: node.velocity(),
        }
    }
}

/// Relative speed between two snapshots; mirrors
/// [`crate::node::relative_speed`] for live nodes.
fn view_relative_speed(a: &NodeView, b: &NodeView) -> f64 {
    match (a.vehicle, b.vehicle) {
        (true, true) => {
            let (ax, ay) = a.velocity;
            let (bx, by) = b.velocity;
            (ax - bx).hypot(ay - by)
        }
        (true, false) => a.speed,
        (false, true) => b.speed,
        (false, false) => 0.0,
    }
}

// ── TopologyEngine ────────────────────────────────────────────────────────────

/// Rebuilds the link graph from scratch each tick.
pub struct TopologyEngine {
    channel: ChannelModel,
}

impl TopologyEngine {
    pub fn new(channel: ChannelModel) -> Self {
        Self { channel }
    }

    /// Clear all links, then install a fresh directed link for every ordered
    /// pair of distinct nodes within mutual range.
    ///
    /// Both directions of a pair are created together; their quality and
    /// reliability may differ slightly because each direction draws its own
    /// fading sample and evaluates congestion at its own sender.  Fixed
    /// infrastructure pairs are never linked — roadside units do not relay
    /// to each other.
    ///
    /// Returns the vehicle density index built for this tick so the delivery
    /// phase can reuse it.
    pub fn rebuild(
        &self,
        nodes: &mut NodeStore,
        roads: &RoadMap,
        obstacles: &[Obstacle],
        zones: &[CongestionZone],
        mode: RoutingMode,
        rng: &mut SimRng,
    ) -> DensityIndex {
        nodes.clear_links();

        let views: Vec<NodeView> = nodes.iter().map(NodeView::of).collect();
        let density = DensityIndex::build(views.iter().filter(|v| v.vehicle).map(|v| v.pos));

        for i in 0..views.len() {
            for j in (i + 1)..views.len() {
                let (a, b) = (&views[i], &views[j]);
                if !a.vehicle && !b.vehicle {
                    continue;
                }
                let distance = a.pos.distance(b.pos);
                if distance > a.range.min(b.range) {
                    continue;
                }

                // Shadowing is symmetric; everything else is per-direction.
                let attenuation = obstacle_attenuation(obstacles, a.pos, b.pos);
                let rel_speed = view_relative_speed(a, b);

                let forward =
                    self.directed_link(a, b, distance, attenuation, rel_speed, roads, zones, &density, mode, rng);
                let backward =
                    self.directed_link(b, a, distance, attenuation, rel_speed, roads, zones, &density, mode, rng);

                if let Some(node) = nodes.get_mut(&a.id) {
                    node.add_link(b.id.clone(), forward);
                }
                if let Some(node) = nodes.get_mut(&b.id) {
                    node.add_link(a.id.clone(), backward);
                }
            }
        }

        density
    }

    /// Estimate the directed link `sender → receiver`.
    #[allow(clippy::too_many_arguments)]
    fn directed_link(
        &self,
        sender: &NodeView,
        receiver: &NodeView,
        distance: f64,
        attenuation: f64,
        rel_speed: f64,
        roads: &RoadMap,
        zones: &[CongestionZone],
        density: &DensityIndex,
        mode: RoutingMode,
        rng: &mut SimRng,
    ) -> Link {
        let range = sender.range.min(receiver.range);

        if sender.vehicle && receiver.vehicle {
            let env = roads.environment_at(sender.pos);
            let congestion = congestion_factor(
                zones,
                sender.pos,
                density.count_within(sender.pos, DENSITY_RADIUS_M),
            );
            let est = self.channel.v2v_estimate(
                rng,
                distance,
                range,
                env.v2v_shape(),
                attenuation,
                congestion,
                rel_speed,
            );
            let quality = match mode {
                RoutingMode::Learned => composite_quality(&est, rel_speed),
                RoutingMode::Baseline => est.signal,
            };
            Link {
                quality,
                reliability: est.reliability,
                duration_secs: est.duration_secs,
            }
        } else {
            // Mixed pair: environment and congestion are evaluated at the
            // fixed endpoint's site regardless of direction.
            let site = if sender.vehicle { receiver.pos } else { sender.pos };
            let env = roads.environment_at(site);
            let congestion =
                congestion_factor(zones, site, density.count_within(site, DENSITY_RADIUS_M));
            let est = self.channel.v2i_estimate(
                rng,
                distance,
                range,
                env.v2i_shape(),
                attenuation,
                congestion,
            );
            Link {
                quality: est.signal,
                reliability: est.reliability,
                duration_secs: est.duration_secs,
            }
        }
    }
}

/// The learned policy's composite quality: a fixed weighted sum of signal,
/// reliability, capped-normalised duration, and inverse relative speed.
fn composite_quality(est: &LinkEstimate, relative_speed: f64) -> f64 {
    let norm_duration = est.duration_secs.min(DURATION_CAP_SECS) / DURATION_CAP_SECS;
    let norm_stability = (1.0 - relative_speed / SPEED_NORM).max(0.0);
    0.3 * est.signal + 0.3 * est.reliability + 0.2 * norm_duration + 0.2 * norm_stability
}
