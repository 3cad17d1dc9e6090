//! `vanet-metrics` — turns the simulation's event stream into delivery
//! statistics and a learned-vs-baseline comparison report.
//!
//! [`MetricsCollector`] implements `vanet_sim::MetricsSink`, accumulating
//! counts and sums; ratios are derived on read.  [`comparison_rows`] lines
//! the two collectors up metric by metric, and [`write_comparison_csv`]
//! exports them with the `csv` crate.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut learned = MetricsCollector::new(config.tick_ms);
//! sim.run_ticks(3_000, &mut learned);
//! write_comparison_csv(Path::new("results.csv"), &learned, &baseline)?;
//! ```

pub mod collector;
pub mod csv;
pub mod error;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use collector::{comparison_rows, ComparisonRow, MetricsCollector};
pub use csv::write_comparison_csv;
pub use error::{MetricsError, MetricsResult};
