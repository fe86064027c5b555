//! Regression ratchet.
//!
//! The ratchet only stops aggregate complexity from growing; it never asks
//! for pre-existing complexity to shrink. A unit regresses when
//!
//! ```text
//! (current - previous) / max(previous, 1) > max_delta_pct / 100
//! ```
//!
//! The comparison is strict and done in integer arithmetic, so growth of
//! exactly `max_delta_pct` is tolerated. Units missing from the baseline are
//! reported as [`RegressionVerdict::NewUnit`] and are never penalized: a
//! baseline of zero says nothing about what the unit should cost.

use crate::core::{BaselineSnapshot, MetricRecord, UnitId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegressionVerdict {
    Regressed {
        delta_pct: f64,
        previous_total: u64,
        current_total: u64,
    },
    ImprovedOrFlat {
        delta_pct: f64,
        previous_total: u64,
        current_total: u64,
    },
    NewUnit {
        current_total: u64,
    },
}

impl RegressionVerdict {
    pub fn is_regressed(&self) -> bool {
        matches!(self, Self::Regressed { .. })
    }

    pub fn current_total(&self) -> u64 {
        match *self {
            Self::Regressed { current_total, .. }
            | Self::ImprovedOrFlat { current_total, .. }
            | Self::NewUnit { current_total } => current_total,
        }
    }

    pub fn previous_total(&self) -> Option<u64> {
        match *self {
            Self::Regressed { previous_total, .. } | Self::ImprovedOrFlat { previous_total, .. } => {
                Some(previous_total)
            }
            Self::NewUnit { .. } => None,
        }
    }

    pub fn delta_pct(&self) -> Option<f64> {
        match *self {
            Self::Regressed { delta_pct, .. } | Self::ImprovedOrFlat { delta_pct, .. } => {
                Some(delta_pct)
            }
            Self::NewUnit { .. } => None,
        }
    }
}

/// Compare one unit's current total against its baseline entry.
pub fn check_regression(
    current: &MetricRecord,
    baseline: &BaselineSnapshot,
    max_delta_pct: u32,
) -> RegressionVerdict {
    let current_total = current.total();
    match baseline.total_for(&current.identity()) {
        Some(previous_total) => compare_totals(previous_total, current_total, max_delta_pct),
        None => RegressionVerdict::NewUnit { current_total },
    }
}

/// Ratchet rule applied to a pair of totals.
pub fn compare_totals(previous_total: u64, current_total: u64, max_delta_pct: u32) -> RegressionVerdict {
    let denominator = i128::from(previous_total.max(1));
    let delta = i128::from(current_total) - i128::from(previous_total);
    let delta_pct = delta as f64 * 100.0 / denominator as f64;

    // delta / denominator > max / 100, without rounding
    if delta * 100 > i128::from(max_delta_pct) * denominator {
        RegressionVerdict::Regressed {
            delta_pct,
            previous_total,
            current_total,
        }
    } else {
        RegressionVerdict::ImprovedOrFlat {
            delta_pct,
            previous_total,
            current_total,
        }
    }
}

/// Check every record against the baseline, keyed by unit identity.
pub fn check_regressions(
    records: &[MetricRecord],
    baseline: &BaselineSnapshot,
    max_delta_pct: u32,
) -> Vec<(UnitId, RegressionVerdict)> {
    records
        .iter()
        .map(|record| {
            (
                record.identity(),
                check_regression(record, baseline, max_delta_pct),
            )
        })
        .collect()
}

/// Apply the ratchet to the summed totals of units present in both the run
/// and the baseline.
///
/// Returns `None` when no unit of the run appears in the baseline.
pub fn check_aggregate_regression(
    records: &[MetricRecord],
    baseline: &BaselineSnapshot,
    max_delta_pct: u32,
) -> Option<RegressionVerdict> {
    let (previous, current, matched) = records.iter().fold(
        (0u64, 0u64, 0usize),
        |(previous, current, matched), record| match baseline.total_for(&record.identity()) {
            Some(total) => (
                previous.saturating_add(total),
                current.saturating_add(record.total()),
                matched + 1,
            ),
            None => (previous, current, matched),
        },
    );

    (matched > 0).then(|| compare_totals(previous, current, max_delta_pct))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::names;

    fn record(name: &str, total: u32) -> MetricRecord {
        MetricRecord::file(name, format!("src/{name}")).with_measurement(names::TOTAL_COMPLEXITY, total)
    }

    fn baseline(entries: &[(&str, u64)]) -> BaselineSnapshot {
        let mut snapshot = BaselineSnapshot::new();
        for (name, total) in entries {
            snapshot.insert(UnitId::from(format!("src/{name}::{name}").as_str()), *total);
        }
        snapshot
    }

    #[test]
    fn test_regression_above_limit() {
        let verdict = check_regression(&record("a.rs", 50), &baseline(&[("a.rs", 40)]), 15);
        assert_eq!(
            verdict,
            RegressionVerdict::Regressed {
                delta_pct: 25.0,
                previous_total: 40,
                current_total: 50,
            }
        );
    }

    #[test]
    fn test_exact_limit_is_not_a_regression() {
        let verdict = check_regression(&record("a.rs", 46), &baseline(&[("a.rs", 40)]), 15);
        assert!(!verdict.is_regressed());
        assert_eq!(verdict.delta_pct(), Some(15.0));

        let verdict = check_regression(&record("a.rs", 47), &baseline(&[("a.rs", 40)]), 15);
        assert!(verdict.is_regressed());
    }

    #[test]
    fn test_equal_totals_never_regress_even_with_zero_tolerance() {
        let verdict = check_regression(&record("a.rs", 40), &baseline(&[("a.rs", 40)]), 0);
        assert!(!verdict.is_regressed());
        assert_eq!(verdict.delta_pct(), Some(0.0));
    }

    #[test]
    fn test_improvement_has_negative_delta() {
        let verdict = compare_totals(40, 30, 0);
        assert!(!verdict.is_regressed());
        assert_eq!(verdict.delta_pct(), Some(-25.0));
    }

    #[test]
    fn test_zero_baseline_uses_unit_denominator() {
        assert_eq!(
            compare_totals(0, 1, 50),
            RegressionVerdict::Regressed {
                delta_pct: 100.0,
                previous_total: 0,
                current_total: 1,
            }
        );
        assert!(!compare_totals(0, 0, 0).is_regressed());
    }

    #[test]
    fn test_new_unit_is_never_penalized() {
        let verdict = check_regression(&record("new.rs", 500), &BaselineSnapshot::new(), 0);
        assert_eq!(verdict, RegressionVerdict::NewUnit { current_total: 500 });
        assert!(!verdict.is_regressed());
        assert_eq!(verdict.previous_total(), None);
    }

    #[test]
    fn test_aggregate_only_counts_known_units() {
        let records = vec![record("a.rs", 30), record("b.rs", 30), record("new.rs", 1000)];
        let snapshot = baseline(&[("a.rs", 20), ("b.rs", 20), ("gone.rs", 100)]);

        let verdict = check_aggregate_regression(&records, &snapshot, 40).unwrap();
        assert_eq!(
            verdict,
            RegressionVerdict::Regressed {
                delta_pct: 50.0,
                previous_total: 40,
                current_total: 60,
            }
        );
    }

    #[test]
    fn test_aggregate_without_overlap_is_none() {
        let records = vec![record("new.rs", 10)];
        assert_eq!(
            check_aggregate_regression(&records, &baseline(&[("a.rs", 10)]), 0),
            None
        );
    }

    #[test]
    fn test_check_regressions_preserves_order() {
        let records = vec![record("b.rs", 10), record("a.rs", 10)];
        let results = check_regressions(&records, &BaselineSnapshot::new(), 0);
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["src/b.rs::b.rs", "src/a.rs::a.rs"]);
    }
}
