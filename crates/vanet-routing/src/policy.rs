//! Edge-weight policies.
//!
//! The router asks a policy for the cost of traversing one link for one
//! message kind; lower is preferred.  Applications can implement
//! [`EdgePolicy`] themselves to experiment with other weightings without
//! touching the router.

use vanet_core::{MessageKind, RoutingMode};
use vanet_net::Link;

/// Pluggable edge-cost function for the router.
pub trait EdgePolicy {
    /// Cost of traversing `link` with a message of `kind`.  Lower is
    /// preferred; `f64::INFINITY` makes the edge unusable.
    fn edge_weight(&self, link: &Link, kind: MessageKind) -> f64;
}

// ── LearnedPolicy ─────────────────────────────────────────────────────────────

/// Quality-driven weighting, sharpened per traffic class.
///
/// The base cost is the inverse link quality (floored at 0.1 so a
/// near-zero-quality link cannot dominate the sum).  The class divisor then
/// rewards the property that matters most for that traffic: reliability for
/// safety, a reliability-durability blend for telemetry, and sheer link
/// lifetime for infotainment.
pub struct LearnedPolicy;

impl EdgePolicy for LearnedPolicy {
    fn edge_weight(&self, link: &Link, kind: MessageKind) -> f64 {
        let base = 1.0 / link.quality.max(0.1);
        match kind {
            MessageKind::Safety => base / (link.reliability * 2.0),
            MessageKind::Telemetry => base / (link.reliability * link.duration_secs / 30.0),
            MessageKind::Infotainment => base / (link.duration_secs / 60.0),
        }
    }
}

// ── BaselinePolicy ────────────────────────────────────────────────────────────

/// Traditional weighting: inverse reliability, blind to message kind and to
/// the learned quality score.
pub struct BaselinePolicy;

impl EdgePolicy for BaselinePolicy {
    fn edge_weight(&self, link: &Link, _kind: MessageKind) -> f64 {
        1.0 / link.reliability
    }
}

/// The policy instance matching a routing mode.
pub fn policy_for(mode: RoutingMode) -> &'static dyn EdgePolicy {
    match mode {
        RoutingMode::Learned => &LearnedPolicy,
        RoutingMode::Baseline => &BaselinePolicy,
    }
}
