//! Roads and the road map.
//!
//! Roads constrain vehicle movement (heading and speed limit) and tag their
//! surroundings with a propagation environment.  The map answers exactly one
//! query per vehicle per tick — nearest road within snapping distance — so a
//! linear scan over the handful of scenario roads is plenty.

use vanet_core::geom::point_segment_distance;
use vanet_core::Point2;

use vanet_channel::Environment;

/// Vehicles further than this from any road are considered off-road.
const SNAP_DISTANCE_M: f64 = 20.0;

/// One straight road segment.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Road {
    pub start: Point2,
    pub end: Point2,
    pub lanes: u8,
    /// Speed limit in m/s.
    pub speed_limit: f64,
    pub environment: Environment,
}

impl Road {
    pub fn new(
        start: Point2,
        end: Point2,
        lanes: u8,
        speed_limit: f64,
        environment: Environment,
    ) -> Self {
        Self {
            start,
            end,
            lanes,
            speed_limit,
            environment,
        }
    }

    /// Heading of the road axis in radians.
    #[inline]
    pub fn direction(&self) -> f64 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    /// Shortest distance from `p` to the road segment, in metres.
    #[inline]
    pub fn distance_to(&self, p: Point2) -> f64 {
        point_segment_distance(p, self.start, self.end)
    }
}

// ── RoadMap ───────────────────────────────────────────────────────────────────

/// All roads in the scenario.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadMap {
    roads: Vec<Road>,
}

impl RoadMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, road: Road) {
        self.roads.push(road);
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// The closest road within [`SNAP_DISTANCE_M`] of `p`, if any.
    pub fn nearest_road(&self, p: Point2) -> Option<&Road> {
        self.roads
            .iter()
            .map(|road| (road, road.distance_to(p)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .filter(|&(_, d)| d <= SNAP_DISTANCE_M)
            .map(|(road, _)| road)
    }

    /// Propagation environment at `p`: the nearest road's class, or the
    /// urban default off-road.
    pub fn environment_at(&self, p: Point2) -> Environment {
        self.nearest_road(p)
            .map(|road| road.environment)
            .unwrap_or_default()
    }
}
