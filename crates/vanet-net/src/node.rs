//! Network node model.
//!
//! A node is either a moving vehicle or a fixed roadside unit, modelled as a
//! tagged variant rather than an inheritance hierarchy: everything that needs
//! the common surface (`id`, `pos`, `range`) gets it directly, and
//! vehicle-only state lives behind the `Vehicle` arm.

use std::collections::BTreeMap;

use vanet_core::{MessageKind, NodeId, Point2};

use crate::roads::Road;
use crate::Link;

/// Default vehicle speed ceiling, in m/s, until a road imposes its limit.
const DEFAULT_MAX_SPEED: f64 = 30.0;

/// Headings within this angle of the road axis count as already aligned.
const ALIGNMENT_TOLERANCE_RAD: f64 = 0.1;

// ── Application ───────────────────────────────────────────────────────────────

/// A traffic-generating application installed on a vehicle.
///
/// Each application emits one message of its kind every `interval_ms` of
/// simulated time.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Application {
    pub kind: MessageKind,
    pub payload_size: u32,
    pub interval_ms: u64,
    pub last_sent_ms: u64,
}

impl Application {
    /// An application with its kind's standard traffic profile.
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            payload_size: kind.payload_size(),
            interval_ms: kind.interval_ms(),
            last_sent_ms: 0,
        }
    }

    /// `true` when the inter-send interval has elapsed at `now_ms`.
    #[inline]
    pub fn due(&self, now_ms: u64) -> bool {
        now_ms - self.last_sent_ms >= self.interval_ms
    }

    #[inline]
    pub fn mark_sent(&mut self, now_ms: u64) {
        self.last_sent_ms = now_ms;
    }
}

// ── NodeKind ──────────────────────────────────────────────────────────────────

/// Variant-specific node state.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Vehicle {
        /// Heading in radians, counter-clockwise from east.
        direction: f64,
        /// Current speed in m/s.
        speed: f64,
        /// Speed ceiling, set by the road currently travelled.
        max_speed: f64,
        /// Installed traffic generators.
        apps: Vec<Application>,
    },
    Infrastructure,
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// One radio node: a vehicle or a roadside unit, plus its outgoing links.
///
/// Lifetime = one simulation run.  The link map is cleared and regenerated
/// from current geometry on every topology rebuild.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub id: NodeId,
    pub pos: Point2,
    /// Transmission range in metres.
    pub range: f64,
    pub kind: NodeKind,
    /// Outgoing links keyed by neighbor id; `BTreeMap` for deterministic
    /// neighbor iteration.
    pub links: BTreeMap<NodeId, Link>,
}

impl Node {
    /// A vehicle with the three standard applications installed.
    pub fn vehicle(id: NodeId, pos: Point2, direction: f64, speed: f64, range: f64) -> Self {
        let apps = MessageKind::ALL.iter().map(|&k| Application::new(k)).collect();
        Self {
            id,
            pos,
            range,
            kind: NodeKind::Vehicle {
                direction,
                speed,
                max_speed: DEFAULT_MAX_SPEED,
                apps,
            },
            links: BTreeMap::new(),
        }
    }

    /// A fixed roadside unit.
    pub fn infrastructure(id: NodeId, pos: Point2, range: f64) -> Self {
        Self {
            id,
            pos,
            range,
            kind: NodeKind::Infrastructure,
            links: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn is_vehicle(&self) -> bool {
        matches!(self.kind, NodeKind::Vehicle { .. })
    }

    /// Current speed in m/s; 0 for fixed nodes.
    #[inline]
    pub fn speed(&self) -> f64 {
        match self.kind {
            NodeKind::Vehicle { speed, .. } => speed,
            NodeKind::Infrastructure => 0.0,
        }
    }

    /// Velocity components in m/s; (0, 0) for fixed nodes.
    #[inline]
    pub fn velocity(&self) -> (f64, f64) {
        match self.kind {
            NodeKind::Vehicle { direction, speed, .. } => {
                (speed * direction.cos(), speed * direction.sin())
            }
            NodeKind::Infrastructure => (0.0, 0.0),
        }
    }

    // ── Movement (vehicles only; no-ops for infrastructure) ───────────────

    /// Integrate position over `dt_secs`.
    pub fn advance(&mut self, dt_secs: f64) {
        if let NodeKind::Vehicle { direction, speed, .. } = self.kind {
            self.pos.x += speed * direction.cos() * dt_secs;
            self.pos.y += speed * direction.sin() * dt_secs;
        }
    }

    /// Wrap the position torus-style at the simulation area boundary.
    pub fn wrap_within(&mut self, width: f64, height: f64) {
        if self.pos.x < 0.0 {
            self.pos.x = width;
        }
        if self.pos.x > width {
            self.pos.x = 0.0;
        }
        if self.pos.y < 0.0 {
            self.pos.y = height;
        }
        if self.pos.y > height {
            self.pos.y = 0.0;
        }
    }

    /// Snap the heading to the road axis (or its opposite, whichever is
    /// closer) unless already within tolerance of one of them.
    pub fn align_to_road(&mut self, road: &Road) {
        let NodeKind::Vehicle { direction, .. } = &mut self.kind else {
            return;
        };
        let road_dir = road.direction();
        let diff = angle_difference(*direction, road_dir);
        let opposite_diff = angle_difference(*direction, road_dir + std::f64::consts::PI);
        if diff > ALIGNMENT_TOLERANCE_RAD && opposite_diff > ALIGNMENT_TOLERANCE_RAD {
            *direction = if diff <= opposite_diff {
                road_dir
            } else {
                normalize_angle(road_dir + std::f64::consts::PI)
            };
        }
    }

    /// Impose a road's speed limit: lowers the ceiling and clamps the
    /// current speed to it.
    pub fn clamp_speed(&mut self, limit: f64) {
        if let NodeKind::Vehicle { speed, max_speed, .. } = &mut self.kind {
            *max_speed = limit;
            *speed = speed.min(limit);
        }
    }

    // ── Links ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn clear_links(&mut self) {
        self.links.clear();
    }

    #[inline]
    pub fn add_link(&mut self, neighbor: NodeId, link: Link) {
        self.links.insert(neighbor, link);
    }
}

// ── Kinematics helpers ────────────────────────────────────────────────────────

/// Magnitude of the relative velocity between two nodes in m/s.
///
/// For a vehicle and a fixed node this is the vehicle's own speed; for two
/// fixed nodes it is zero.
pub fn relative_speed(a: &Node, b: &Node) -> f64 {
    match (a.is_vehicle(), b.is_vehicle()) {
        (true, true) => {
            let (ax, ay) = a.velocity();
            let (bx, by) = b.velocity();
            (ax - bx).hypot(ay - by)
        }
        (true, false) => a.speed(),
        (false, true) => b.speed(),
        (false, false) => 0.0,
    }
}

/// Normalise an angle into [0, 2π).
fn normalize_angle(angle: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    ((angle % tau) + tau) % tau
}

/// Absolute angular distance between two headings, in [0, π].
fn angle_difference(a: f64, b: f64) -> f64 {
    let d = normalize_angle(a - b);
    d.min(std::f64::consts::TAU - d)
}
