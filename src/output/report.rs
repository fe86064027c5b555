//! Report model shared by every output format.
//!
//! Ordering is fixed: blocked units first, then warned, each sorted by unit
//! name ascending (path breaks ties). Passing units only contribute to the
//! summary counts. Errored units are kept apart so bad input is never
//! mistaken for a complexity problem.

use crate::core::{Reason, UnitId, Verdict};
use crate::gate::{Outcome, RegressionVerdict, UnitResult};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitLine {
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub reasons: Vec<Reason>,
}

impl UnitLine {
    pub fn worst(&self) -> Option<&Reason> {
        self.reasons.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErroredLine {
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionLine {
    pub unit: UnitId,
    pub verdict: RegressionVerdict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub pass: usize,
    pub warn: usize,
    pub block: usize,
    pub errored: usize,
    pub regressed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GateReport {
    pub blocked: Vec<UnitLine>,
    pub warned: Vec<UnitLine>,
    pub errored: Vec<ErroredLine>,
    /// Tolerance the ratchet ran with; `None` when no baseline was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delta_pct: Option<u32>,
    pub regressions: Vec<RegressionLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<RegressionVerdict>,
    pub summary: ReportSummary,
}

impl GateReport {
    pub fn from_results(results: &[UnitResult]) -> Self {
        let mut report = Self::default();

        for result in results {
            match &result.outcome {
                Outcome::Evaluated { verdict } => {
                    report.push_verdict(&result.unit, result.path.as_ref(), verdict)
                }
                Outcome::Errored { message } => {
                    report.summary.errored += 1;
                    report.errored.push(ErroredLine {
                        unit: result.unit.clone(),
                        path: result.path.clone(),
                        message: message.clone(),
                    });
                }
            }
        }

        report.sort();
        report
    }

    /// Build a report from bare `(unit name, verdict)` pairs
    pub fn from_verdicts(verdicts: &[(String, Verdict)]) -> Self {
        let mut report = Self::default();
        for (unit, verdict) in verdicts {
            report.push_verdict(unit, None, verdict);
        }
        report.sort();
        report
    }

    /// Attach ratchet results; only regressed units are listed.
    #[must_use]
    pub fn with_regressions(
        mut self,
        max_delta_pct: u32,
        regressions: &[(UnitId, RegressionVerdict)],
        aggregate: Option<RegressionVerdict>,
    ) -> Self {
        self.max_delta_pct = Some(max_delta_pct);
        self.regressions = regressions
            .iter()
            .filter(|(_, verdict)| verdict.is_regressed())
            .map(|(unit, verdict)| RegressionLine {
                unit: unit.clone(),
                verdict: *verdict,
            })
            .collect();
        self.regressions.sort_by(|a, b| a.unit.cmp(&b.unit));
        self.aggregate = aggregate;
        self.summary.regressed = self.regressions.len();
        self
    }

    pub fn has_blocks(&self) -> bool {
        self.summary.block > 0
    }

    pub fn has_regressions(&self) -> bool {
        self.summary.regressed > 0 || self.aggregate.is_some_and(|a| a.is_regressed())
    }

    /// Whether the run should fail: any block or any regression
    pub fn is_failing(&self) -> bool {
        self.has_blocks() || self.has_regressions()
    }

    fn push_verdict(&mut self, unit: &str, path: Option<&PathBuf>, verdict: &Verdict) {
        let line = || UnitLine {
            unit: unit.to_string(),
            path: path.cloned(),
            reasons: verdict.reasons().to_vec(),
        };
        match verdict {
            Verdict::Pass => self.summary.pass += 1,
            Verdict::Warn(_) => {
                self.summary.warn += 1;
                self.warned.push(line());
            }
            Verdict::Block(_) => {
                self.summary.block += 1;
                self.blocked.push(line());
            }
        }
    }

    fn sort(&mut self) {
        let by_name =
            |a: &UnitLine, b: &UnitLine| a.unit.cmp(&b.unit).then_with(|| a.path.cmp(&b.path));
        self.blocked.sort_by(by_name);
        self.warned.sort_by(by_name);
        self.errored
            .sort_by(|a, b| a.unit.cmp(&b.unit).then_with(|| a.path.cmp(&b.path)));
    }
}
