//! One directed edge of the link graph.

/// A directed radio link to a neighbor.
///
/// The neighbor's id is the key of the owning node's link map.  Links are
/// rebuilt from scratch every tick; none of these fields is incrementally
/// updated except `quality`, which the estimator refresh smooths between
/// rebuilds within a training cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    /// Learned or signal-derived desirability in [0, 1].  This is the
    /// routing cost input, distinct from raw reliability.
    pub quality: f64,
    /// Expected per-hop delivery probability in [0, 1].
    pub reliability: f64,
    /// Seconds until the link is expected to break; infinite for
    /// roadside-unit links.
    pub duration_secs: f64,
}
