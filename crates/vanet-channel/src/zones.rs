//! Static environment clutter: obstacles and congestion zones.

use vanet_core::{Point2, Rect};

/// A signal-blocking structure (building, tree cluster) with an attenuation
/// factor in [0, 1], where 1 means complete blockage.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub bounds: Rect,
    pub attenuation: f64,
}

impl Obstacle {
    pub fn new(a: Point2, b: Point2, attenuation: f64) -> Self {
        Self {
            bounds: Rect::new(a, b),
            attenuation: attenuation.clamp(0.0, 1.0),
        }
    }
}

/// An area of elevated network load (busy intersection) with a load factor
/// in [0, 1], where 1 means maximum congestion.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CongestionZone {
    pub bounds: Rect,
    pub load: f64,
}

impl CongestionZone {
    pub fn new(a: Point2, b: Point2, load: f64) -> Self {
        Self {
            bounds: Rect::new(a, b),
            load: load.clamp(0.0, 1.0),
        }
    }
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Radius of the live-density probe around a point, in metres.
pub const DENSITY_RADIUS_M: f64 = 100.0;

/// Vehicle count within [`DENSITY_RADIUS_M`] that saturates congestion at 1.
const DENSITY_SATURATION: f64 = 20.0;

/// Accumulated attenuation of every obstacle crossed by the segment `a`–`b`.
///
/// Factors combine with diminishing returns — each obstacle removes its
/// fraction of whatever signal is left — so the total stays in [0, 1] and is
/// independent of obstacle order:
///
/// ```text
/// total ← total + (1 − total) · attenuation
/// ```
pub fn obstacle_attenuation(obstacles: &[Obstacle], a: Point2, b: Point2) -> f64 {
    let mut total = 0.0;
    for obstacle in obstacles {
        if obstacle.bounds.crossed_by(a, b) {
            total += (1.0 - total) * obstacle.attenuation;
        }
    }
    total
}

/// Congestion factor at `p`: the more severe of the static zone load and the
/// live local vehicle density.
///
/// `nearby_vehicles` is the number of vehicles within [`DENSITY_RADIUS_M`]
/// of `p` (including any vehicle standing at `p` itself).
pub fn congestion_factor(zones: &[CongestionZone], p: Point2, nearby_vehicles: usize) -> f64 {
    let zone_load = zones
        .iter()
        .filter(|z| z.bounds.contains(p))
        .map(|z| z.load)
        .fold(0.0, f64::max);
    let density = (nearby_vehicles as f64 / DENSITY_SATURATION).min(1.0);
    zone_load.max(density)
}
