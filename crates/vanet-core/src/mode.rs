//! Routing-mode selector.

/// Which edge-weighting family drives link quality and path costs.
///
/// The whole point of the workspace is to run the same scenario under both
/// modes and compare the delivery metrics, so the selector threads through
/// topology rebuild (quality formula) and routing (edge weights).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoutingMode {
    /// Multi-factor link quality, message-type-aware edge weights, and the
    /// online-trained quality estimator.
    Learned,
    /// Signal-strength quality and plain `1/reliability` edge weights.
    Baseline,
}

impl RoutingMode {
    #[inline]
    pub fn is_learned(self) -> bool {
        matches!(self, RoutingMode::Learned)
    }
}
