//! Unit tests for vanet-metrics.

use vanet_core::{MessageKind, Tick};
use vanet_sim::MetricsSink;

use crate::{comparison_rows, write_comparison_csv, MetricsCollector};

const TICK_MS: u64 = 100;

fn collector() -> MetricsCollector {
    MetricsCollector::new(TICK_MS)
}

mod collector_tests {
    use super::*;

    #[test]
    fn empty_collector_reports_zero_ratios() {
        let m = collector();
        assert_eq!(m.delivery_ratio(), 0.0);
        assert_eq!(m.average_latency_ms(), 0.0);
        assert_eq!(m.average_hop_count(), 0.0);
        assert_eq!(m.congestion_loss_rate(), 0.0);
        assert_eq!(m.link_quality_improvement_pct(), 0.0);
    }

    #[test]
    fn delivery_ratio_tracks_per_kind_counts() {
        let mut m = collector();
        for _ in 0..4 {
            m.on_message_sent(MessageKind::Safety, 50);
        }
        m.on_message_sent(MessageKind::Telemetry, 200);
        m.on_message_delivered(MessageKind::Safety, Tick(0), Tick(1), 1, 50);
        m.on_message_delivered(MessageKind::Safety, Tick(0), Tick(3), 1, 50);

        assert_eq!(m.total_sent(), 5);
        assert_eq!(m.total_delivered(), 2);
        assert_eq!(m.delivery_ratio(), 0.4);
        assert_eq!(m.kind_delivery_ratio(MessageKind::Safety), 0.5);
        assert_eq!(m.kind_delivery_ratio(MessageKind::Telemetry), 0.0);
    }

    #[test]
    fn latency_converts_tick_spans_to_ms() {
        let mut m = collector();
        m.on_message_delivered(MessageKind::Telemetry, Tick(10), Tick(30), 2, 200);
        m.on_message_delivered(MessageKind::Telemetry, Tick(10), Tick(50), 4, 200);
        // Spans of 20 and 40 ticks at 100 ms each → mean 3000 ms.
        assert_eq!(m.average_latency_ms(), 3_000.0);
        assert_eq!(m.kind_latency_ms(MessageKind::Telemetry), 3_000.0);
        assert_eq!(m.kind_latency_ms(MessageKind::Safety), 0.0);
        assert_eq!(m.average_hop_count(), 3.0);
    }

    #[test]
    fn loss_rates_divide_by_attempts() {
        let mut m = collector();
        for _ in 0..10 {
            m.on_packet_attempt();
        }
        m.on_congestion_loss(MessageKind::Safety, 50);
        m.on_congestion_loss(MessageKind::Telemetry, 200);
        m.on_environment_loss(MessageKind::Safety, 50);

        assert_eq!(m.congestion_loss_rate(), 0.2);
        assert_eq!(m.environment_loss_rate(), 0.1);
    }

    #[test]
    fn overhead_sums_payload_bytes() {
        let mut m = collector();
        m.on_message_sent(MessageKind::Safety, 50);
        m.on_message_sent(MessageKind::Infotainment, 1_500);
        assert_eq!(m.network_overhead_bytes(), 1_550);
    }

    #[test]
    fn quality_improvement_uses_first_nonzero_base() {
        let mut m = collector();
        // Leading zeros (empty graph before vehicles meet) must not anchor
        // the baseline.
        m.on_link_quality(0.0);
        m.on_link_quality(0.4);
        m.on_link_quality(0.5);
        assert!((m.link_quality_improvement_pct() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn breaks_and_recomputations_count() {
        let mut m = collector();
        m.on_path_break();
        m.on_path_break();
        m.on_route_recomputation();
        m.on_model_update();
        assert_eq!(m.path_breaks(), 2);
        assert_eq!(m.route_recomputations(), 1);
        assert_eq!(m.model_updates(), 1);
    }
}

mod comparison_tests {
    use super::*;

    fn runs() -> (MetricsCollector, MetricsCollector) {
        let mut learned = collector();
        let mut baseline = collector();
        for sink in [&mut learned, &mut baseline] {
            for _ in 0..10 {
                sink.on_message_sent(MessageKind::Safety, 50);
            }
        }
        // Learned delivers 8/10 at 1 tick each; baseline 5/10 at 3 ticks.
        for _ in 0..8 {
            learned.on_message_delivered(MessageKind::Safety, Tick(0), Tick(1), 1, 50);
        }
        for _ in 0..5 {
            baseline.on_message_delivered(MessageKind::Safety, Tick(0), Tick(3), 1, 50);
        }
        (learned, baseline)
    }

    #[test]
    fn improvement_signs_follow_metric_direction() {
        let (learned, baseline) = runs();
        let rows = comparison_rows(&learned, &baseline);

        let row = |name: &str| rows.iter().find(|r| r.metric == name).unwrap().clone();

        // Higher-is-better: 80 % vs 50 % → +60 %.
        let delivery = row("overall delivery ratio (%)");
        assert!((delivery.improvement_pct - 60.0).abs() < 1e-9);

        // Lower-is-better: 100 ms vs 300 ms → +200 % (inverted comparison).
        let latency = row("average latency (ms)");
        assert_eq!(latency.learned, 100.0);
        assert_eq!(latency.baseline, 300.0);
        assert!((latency.improvement_pct - 200.0).abs() < 1e-9);
    }

    #[test]
    fn zero_baselines_produce_zero_improvement() {
        let rows = comparison_rows(&collector(), &collector());
        assert!(rows.iter().all(|r| r.improvement_pct == 0.0));
    }

    #[test]
    fn csv_export_has_header_and_all_rows() {
        let (learned, baseline) = runs();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison.csv");

        write_comparison_csv(&path, &learned, &baseline).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "metric,learned,baseline,improvement_pct");
        // Header plus one line per comparison row.
        assert_eq!(lines.len(), 1 + comparison_rows(&learned, &baseline).len());
        assert!(lines.iter().any(|l| l.starts_with("overall delivery ratio (%)")));
    }
}
