//! Threshold evaluation of a single metric record.

use crate::config::ThresholdTable;
use crate::core::{MetricRecord, Reason, Severity, UnitKind, Verdict};
use tracing::debug;

/// Classify every registered measurement of `record` and aggregate with
/// worst-of.
///
/// Measurements without a registered threshold, or whose threshold is scoped
/// to a different kind of unit, do not affect the verdict.
pub fn evaluate(record: &MetricRecord, table: &ThresholdTable) -> Verdict {
    Verdict::from_reasons(
        record
            .measurements
            .iter()
            .filter_map(|(metric, &value)| classify_measurement(record.kind, metric, value, table)),
    )
}

fn classify_measurement(
    kind: UnitKind,
    metric: &str,
    value: u32,
    table: &ThresholdTable,
) -> Option<Reason> {
    let spec = match table.boundaries_for(metric) {
        Ok(spec) => spec,
        Err(e) => {
            debug!("Skipping measurement: {}", e);
            return None;
        }
    };
    if !spec.applies_to(kind) {
        return None;
    }

    match spec.classify(value) {
        Severity::Green => None,
        severity => Some(Reason {
            metric: metric.to_string(),
            value,
            severity,
            green_max: spec.green_max,
            yellow_max: spec.yellow_max,
        }),
    }
}
