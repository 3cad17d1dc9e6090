//! Metrics sink trait — how the core reports delivery events outward.

use vanet_core::{MessageKind, Tick};

/// Callbacks invoked by the simulation at message and model events.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  The simulation guarantees **exactly
/// one terminal call per message attempt**: a delivered message reports
/// `on_message_delivered` once, a lost or broken attempt reports its loss /
/// break calls, and nothing is double-reported.
///
/// # Example — delivery counter
///
/// ```rust,ignore
/// struct DeliveredCount(u64);
///
/// impl MetricsSink for DeliveredCount {
///     fn on_message_delivered(&mut self, _k: MessageKind, _s: Tick, _d: Tick, _h: usize, _b: u32) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait MetricsSink {
    /// A new message entered the queue.
    fn on_message_sent(&mut self, _kind: MessageKind, _size: u32) {}

    /// A message reached its destination (or, for broadcasts, at least one
    /// neighbor).
    fn on_message_delivered(
        &mut self,
        _kind: MessageKind,
        _sent: Tick,
        _delivered: Tick,
        _hops: usize,
        _size: u32,
    ) {
    }

    /// One hop's packet was dropped by local congestion.
    fn on_congestion_loss(&mut self, _kind: MessageKind, _size: u32) {}

    /// One hop's packet was dropped by the radio environment.
    fn on_environment_loss(&mut self, _kind: MessageKind, _size: u32) {}

    /// One per-hop (or per-neighbor) transmission was attempted, successful
    /// or not.
    fn on_packet_attempt(&mut self) {}

    /// A unicast path turned out to have a vanished link mid-walk.
    fn on_path_break(&mut self) {}

    /// A broken-path message was re-queued for routing next tick.
    fn on_route_recomputation(&mut self) {}

    /// Average vehicle-link quality at the end of a tick.
    fn on_link_quality(&mut self, _average: f64) {}

    /// The estimator finished one training cycle.
    fn on_model_update(&mut self) {}
}

/// A [`MetricsSink`] that does nothing.  Use when running without metrics.
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {}
