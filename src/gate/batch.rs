//! Batch evaluation of analyzer output.

use super::evaluator::evaluate;
use crate::config::ThresholdTable;
use crate::core::{KnownIdentity, MetricRecord, RawMetricRecord, Severity, Verdict};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    Evaluated { verdict: Verdict },
    Errored { message: String },
}

/// Result for one unit of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitResult {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl UnitResult {
    pub fn evaluated(unit: impl Into<String>, path: Option<PathBuf>, verdict: Verdict) -> Self {
        Self {
            unit: unit.into(),
            path,
            outcome: Outcome::Evaluated { verdict },
        }
    }

    pub fn errored(unit: impl Into<String>, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            path,
            outcome: Outcome::Errored {
                message: message.into(),
            },
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.outcome {
            Outcome::Evaluated { verdict } => Some(verdict),
            Outcome::Errored { .. } => None,
        }
    }

    pub fn is_errored(&self) -> bool {
        matches!(self.outcome, Outcome::Errored { .. })
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// One entry per input record, in input order
    pub results: Vec<UnitResult>,
    /// Records that passed identity validation, in input order
    pub records: Vec<MetricRecord>,
    /// What is known about each record that failed validation
    pub errored_identities: Vec<KnownIdentity>,
}

impl BatchResult {
    pub fn count(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter_map(UnitResult::verdict)
            .filter(|verdict| verdict.severity() == severity)
            .count()
    }

    pub fn errored_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_errored()).count()
    }

    pub fn has_blocks(&self) -> bool {
        self.count(Severity::Red) > 0
    }
}

/// Validate and evaluate every raw record.
///
/// A record with missing identity fields becomes an `Errored` entry and does
/// not affect the other units. Records are evaluated in parallel; the
/// output order matches the input order.
pub fn evaluate_batch(raw_records: Vec<RawMetricRecord>, table: &ThresholdTable) -> BatchResult {
    let evaluated: Vec<(UnitResult, Result<MetricRecord, KnownIdentity>)> = raw_records
        .into_par_iter()
        .enumerate()
        .map(|(index, raw)| evaluate_raw(index, raw, table))
        .collect();

    let mut batch = BatchResult::default();
    for (result, validated) in evaluated {
        batch.results.push(result);
        match validated {
            Ok(record) => batch.records.push(record),
            Err(identity) => batch.errored_identities.push(identity),
        }
    }

    debug!(
        "Evaluated {} units ({} errored)",
        batch.results.len(),
        batch.errored_identities.len()
    );

    batch
}

fn evaluate_raw(
    index: usize,
    raw: RawMetricRecord,
    table: &ThresholdTable,
) -> (UnitResult, Result<MetricRecord, KnownIdentity>) {
    let label = raw
        .label()
        .unwrap_or_else(|| format!("record #{}", index + 1));
    let path = raw.path.clone();
    let identity = raw.known_identity();

    match raw.validate() {
        Ok(record) => {
            let verdict = evaluate(&record, table);
            let result = UnitResult::evaluated(record.name.clone(), Some(record.path.clone()), verdict);
            (result, Ok(record))
        }
        Err(e) => (UnitResult::errored(label, path, e.to_string()), Err(identity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{names, UnitId, UnitKind};

    fn raw(name: Option<&str>, cyclomatic: u32) -> RawMetricRecord {
        RawMetricRecord {
            name: name.map(str::to_string),
            path: Some(PathBuf::from("src/lib.rs")),
            kind: Some(UnitKind::Function),
            measurements: [(names::CYCLOMATIC.to_string(), cyclomatic)].into_iter().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_malformed_record_does_not_abort_batch() {
        let batch = evaluate_batch(
            vec![raw(Some("ok"), 3), raw(None, 30), raw(Some("busy"), 30)],
            &ThresholdTable::default(),
        );

        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.count(Severity::Green), 1);
        assert_eq!(batch.count(Severity::Red), 1);
        assert_eq!(batch.errored_count(), 1);

        let errored = &batch.results[1];
        assert!(errored.is_errored());
        assert_eq!(errored.unit, "src/lib.rs");
        assert_eq!(
            batch.errored_identities,
            vec![KnownIdentity::Path(PathBuf::from("src/lib.rs"))]
        );
    }

    #[test]
    fn test_unreadable_record_is_errored_not_fatal() {
        let good = serde_json::json!({
            "name": "ok", "path": "src/lib.rs", "kind": "function",
            "measurements": {"cyclomatic": 3}
        });
        let bad = serde_json::json!({
            "name": "odd", "path": "src/lib.rs", "kind": "function",
            "measurements": {"cyclomatic": 3.5}
        });
        let batch = evaluate_batch(
            vec![RawMetricRecord::from_json(&good), RawMetricRecord::from_json(&bad)],
            &ThresholdTable::default(),
        );

        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.results[1].unit, "odd");
        assert!(batch.results[1].is_errored());
        assert_eq!(
            batch.errored_identities,
            vec![KnownIdentity::Unit(UnitId::from("src/lib.rs::odd"))]
        );
    }

    #[test]
    fn test_unlabelled_record_uses_position() {
        let batch = evaluate_batch(vec![RawMetricRecord::default()], &ThresholdTable::default());
        assert_eq!(batch.results[0].unit, "record #1");
        assert!(batch.results[0].is_errored());
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let names: Vec<String> = (0..64).map(|i| format!("fn_{i:02}")).collect();
        let raws = names.iter().map(|n| raw(Some(n), 1)).collect();

        let batch = evaluate_batch(raws, &ThresholdTable::default());
        let order: Vec<&str> = batch.results.iter().map(|r| r.unit.as_str()).collect();
        assert_eq!(order, names.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let table = ThresholdTable::default();
        let raws: Vec<RawMetricRecord> = (0..50)
            .map(|i| RawMetricRecord {
                name: Some(format!("f{i}")),
                path: Some(PathBuf::from("src/lib.rs")),
                kind: Some(UnitKind::Function),
                measurements: [
                    (names::CYCLOMATIC.to_string(), i),
                    (names::PARAMS.to_string(), i % 9),
                ]
                .into_iter()
                .collect(),
                ..Default::default()
            })
            .collect();

        let batch = evaluate_batch(raws, &table);
        let sequential: Vec<Verdict> = batch.records.iter().map(|r| evaluate(r, &table)).collect();
        let parallel: Vec<Verdict> = batch
            .results
            .iter()
            .filter_map(UnitResult::verdict)
            .cloned()
            .collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_unit_result_serializes_flat() {
        let result = UnitResult::errored("record #2", None, "Malformed record");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "errored");
        assert_eq!(json["message"], "Malformed record");
        assert!(json.get("path").is_none());
    }
}
