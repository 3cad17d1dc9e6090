//! The metrics collector — counts and sums in, ratios out.

use vanet_core::{MessageKind, Tick};
use vanet_sim::MetricsSink;

// ── Per-kind tallies ──────────────────────────────────────────────────────────

#[derive(Default, Clone, Copy)]
struct KindTally {
    sent: u64,
    delivered: u64,
    latency_ms: u64,
    latency_count: u64,
}

impl KindTally {
    fn delivery_ratio(&self) -> f64 {
        ratio(self.delivered, self.sent)
    }

    fn average_latency_ms(&self) -> f64 {
        ratio(self.latency_ms, self.latency_count)
    }
}

// ── MetricsCollector ──────────────────────────────────────────────────────────

/// Accumulates one simulation run's delivery statistics.
///
/// Pure aggregation: every field is a count or a sum, and every derived
/// figure is computed on read, so recording stays O(1) per event.
pub struct MetricsCollector {
    /// Simulated milliseconds per tick, for latency conversion.
    tick_ms: u64,

    kinds: [KindTally; 3],

    bytes_transmitted: u64,
    total_hops: u64,
    hop_count: u64,

    path_breaks: u64,
    route_recomputations: u64,

    congestion_lost: u64,
    environment_lost: u64,
    packets_attempted: u64,

    /// First non-zero average link quality seen, as the improvement base.
    initial_avg_quality: Option<f64>,
    current_avg_quality: f64,
    model_updates: u64,
}

impl MetricsCollector {
    pub fn new(tick_ms: u64) -> Self {
        Self {
            tick_ms,
            kinds: [KindTally::default(); 3],
            bytes_transmitted: 0,
            total_hops: 0,
            hop_count: 0,
            path_breaks: 0,
            route_recomputations: 0,
            congestion_lost: 0,
            environment_lost: 0,
            packets_attempted: 0,
            initial_avg_quality: None,
            current_avg_quality: 0.0,
            model_updates: 0,
        }
    }

    #[inline]
    fn tally(&mut self, kind: MessageKind) -> &mut KindTally {
        &mut self.kinds[kind.priority() as usize]
    }

    #[inline]
    fn tally_of(&self, kind: MessageKind) -> &KindTally {
        &self.kinds[kind.priority() as usize]
    }

    // ── Totals ────────────────────────────────────────────────────────────

    pub fn total_sent(&self) -> u64 {
        self.kinds.iter().map(|k| k.sent).sum()
    }

    pub fn total_delivered(&self) -> u64 {
        self.kinds.iter().map(|k| k.delivered).sum()
    }

    /// Total bytes handed to the network across all sends.
    pub fn network_overhead_bytes(&self) -> u64 {
        self.bytes_transmitted
    }

    pub fn path_breaks(&self) -> u64 {
        self.path_breaks
    }

    pub fn route_recomputations(&self) -> u64 {
        self.route_recomputations
    }

    pub fn model_updates(&self) -> u64 {
        self.model_updates
    }

    // ── Ratios ────────────────────────────────────────────────────────────

    /// Overall delivered / sent, in [0, 1].
    pub fn delivery_ratio(&self) -> f64 {
        ratio(self.total_delivered(), self.total_sent())
    }

    /// Delivered / sent for one traffic class.
    pub fn kind_delivery_ratio(&self, kind: MessageKind) -> f64 {
        self.tally_of(kind).delivery_ratio()
    }

    /// Mean creation-to-delivery latency across all delivered messages, ms.
    pub fn average_latency_ms(&self) -> f64 {
        let total: u64 = self.kinds.iter().map(|k| k.latency_ms).sum();
        let count: u64 = self.kinds.iter().map(|k| k.latency_count).sum();
        ratio(total, count)
    }

    pub fn kind_latency_ms(&self, kind: MessageKind) -> f64 {
        self.tally_of(kind).average_latency_ms()
    }

    /// Mean hops per delivered message.
    pub fn average_hop_count(&self) -> f64 {
        ratio(self.total_hops, self.hop_count)
    }

    /// Congestion-dropped packets / attempted packets.
    pub fn congestion_loss_rate(&self) -> f64 {
        ratio(self.congestion_lost, self.packets_attempted)
    }

    /// Environment-dropped packets / attempted packets.
    pub fn environment_loss_rate(&self) -> f64 {
        ratio(self.environment_lost, self.packets_attempted)
    }

    /// Percentage change of average link quality since the first non-zero
    /// reading.
    pub fn link_quality_improvement_pct(&self) -> f64 {
        match self.initial_avg_quality {
            Some(initial) if initial > 0.0 => {
                (self.current_avg_quality - initial) / initial * 100.0
            }
            _ => 0.0,
        }
    }
}

impl MetricsSink for MetricsCollector {
    fn on_message_sent(&mut self, kind: MessageKind, size: u32) {
        self.tally(kind).sent += 1;
        self.bytes_transmitted += u64::from(size);
    }

    fn on_message_delivered(
        &mut self,
        kind: MessageKind,
        sent: Tick,
        delivered: Tick,
        hops: usize,
        _size: u32,
    ) {
        let latency_ms = delivered.since(sent) * self.tick_ms;
        let tally = self.tally(kind);
        tally.delivered += 1;
        tally.latency_ms += latency_ms;
        tally.latency_count += 1;

        self.total_hops += hops as u64;
        self.hop_count += 1;
    }

    fn on_congestion_loss(&mut self, _kind: MessageKind, _size: u32) {
        self.congestion_lost += 1;
    }

    fn on_environment_loss(&mut self, _kind: MessageKind, _size: u32) {
        self.environment_lost += 1;
    }

    fn on_packet_attempt(&mut self) {
        self.packets_attempted += 1;
    }

    fn on_path_break(&mut self) {
        self.path_breaks += 1;
    }

    fn on_route_recomputation(&mut self) {
        self.route_recomputations += 1;
    }

    fn on_link_quality(&mut self, average: f64) {
        if self.initial_avg_quality.is_none() && average > 0.0 {
            self.initial_avg_quality = Some(average);
        }
        self.current_avg_quality = average;
    }

    fn on_model_update(&mut self) {
        self.model_updates += 1;
    }
}

#[inline]
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

// ── Comparison rows ───────────────────────────────────────────────────────────

/// One line of the learned-vs-baseline comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonRow {
    pub metric: &'static str,
    pub learned: f64,
    pub baseline: f64,
    /// Positive means the learned run did better on this metric.
    pub improvement_pct: f64,
}

/// Percentage change from `old` to `new`; 0 when `old` is 0.
fn improvement(new: f64, old: f64) -> f64 {
    if old == 0.0 {
        0.0
    } else {
        (new - old) / old * 100.0
    }
}

/// Line the two runs up metric by metric.
///
/// For latency, overhead, hop count, breaks, and loss rates the comparison
/// is inverted — lower is better — so a positive improvement always reads
/// as "the learned run won".
pub fn comparison_rows(learned: &MetricsCollector, baseline: &MetricsCollector) -> Vec<ComparisonRow> {
    let mut rows = Vec::new();

    let mut higher_better = |metric, l: f64, b: f64| {
        rows.push(ComparisonRow { metric, learned: l, baseline: b, improvement_pct: improvement(l, b) });
    };

    higher_better(
        "overall delivery ratio (%)",
        learned.delivery_ratio() * 100.0,
        baseline.delivery_ratio() * 100.0,
    );
    for kind in MessageKind::ALL {
        let metric = match kind {
            MessageKind::Safety => "safety delivery ratio (%)",
            MessageKind::Telemetry => "telemetry delivery ratio (%)",
            MessageKind::Infotainment => "infotainment delivery ratio (%)",
        };
        higher_better(
            metric,
            learned.kind_delivery_ratio(kind) * 100.0,
            baseline.kind_delivery_ratio(kind) * 100.0,
        );
    }

    let mut lower_better = |metric, l: f64, b: f64| {
        rows.push(ComparisonRow { metric, learned: l, baseline: b, improvement_pct: improvement(b, l) });
    };

    lower_better(
        "average latency (ms)",
        learned.average_latency_ms(),
        baseline.average_latency_ms(),
    );
    for kind in MessageKind::ALL {
        let metric = match kind {
            MessageKind::Safety => "safety latency (ms)",
            MessageKind::Telemetry => "telemetry latency (ms)",
            MessageKind::Infotainment => "infotainment latency (ms)",
        };
        lower_better(metric, learned.kind_latency_ms(kind), baseline.kind_latency_ms(kind));
    }
    lower_better(
        "network overhead (bytes)",
        learned.network_overhead_bytes() as f64,
        baseline.network_overhead_bytes() as f64,
    );
    lower_better(
        "average hop count",
        learned.average_hop_count(),
        baseline.average_hop_count(),
    );
    lower_better(
        "path breaks",
        learned.path_breaks() as f64,
        baseline.path_breaks() as f64,
    );
    lower_better(
        "congestion packet loss (%)",
        learned.congestion_loss_rate() * 100.0,
        baseline.congestion_loss_rate() * 100.0,
    );
    lower_better(
        "environment packet loss (%)",
        learned.environment_loss_rate() * 100.0,
        baseline.environment_loss_rate() * 100.0,
    );

    rows
}
