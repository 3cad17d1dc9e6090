//! Per-tick spatial index over vehicle positions.
//!
//! The congestion model asks "how many vehicles are within 100 m of this
//! point?" once per directed link plus once per delivery hop.  An R-tree
//! built once per tick answers each query in O(log n) instead of rescanning
//! all vehicles.

use rstar::RTree;

use vanet_core::Point2;

/// An immutable snapshot of vehicle positions, valid for one tick.
pub struct DensityIndex {
    tree: RTree<[f64; 2]>,
}

impl DensityIndex {
    /// Bulk-load the index from this tick's vehicle positions.
    pub fn build(positions: impl IntoIterator<Item = Point2>) -> Self {
        let points: Vec<[f64; 2]> = positions.into_iter().map(|p| [p.x, p.y]).collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Number of vehicles within `radius` metres of `center`.
    ///
    /// A vehicle standing exactly at `center` counts itself — the density
    /// probe measures channel contention, and the probing vehicle's own
    /// radio contends too.
    pub fn count_within(&self, center: Point2, radius: f64) -> usize {
        self.tree
            .locate_within_distance([center.x, center.y], radius * radius)
            .count()
    }
}
