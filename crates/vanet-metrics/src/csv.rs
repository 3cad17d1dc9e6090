//! Comparison CSV export.

use std::path::Path;

use csv::Writer;

use crate::collector::{comparison_rows, MetricsCollector};
use crate::MetricsResult;

/// Write the learned-vs-baseline comparison table to `path`.
///
/// One row per metric: `metric,learned,baseline,improvement_pct`.
pub fn write_comparison_csv(
    path: &Path,
    learned: &MetricsCollector,
    baseline: &MetricsCollector,
) -> MetricsResult<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["metric", "learned", "baseline", "improvement_pct"])?;

    for row in comparison_rows(learned, baseline) {
        writer.write_record(&[
            row.metric.to_string(),
            format!("{:.4}", row.learned),
            format!("{:.4}", row.baseline),
            format!("{:.2}", row.improvement_pct),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
