//! Gate verdicts.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Classification of a single measurement against its thresholds.
///
/// Ordered so that `Red` is the greatest, which makes worst-of aggregation a
/// plain `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => f.write_str("green"),
            Self::Yellow => f.write_str("yellow"),
            Self::Red => f.write_str("red"),
        }
    }
}

/// A measurement that was not green.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub metric: String,
    pub value: u32,
    pub severity: Severity,
    pub green_max: u32,
    pub yellow_max: u32,
}

impl Reason {
    /// The boundary reported alongside the value: the largest value that
    /// still avoids a block.
    pub fn boundary(&self) -> u32 {
        self.yellow_max
    }

    fn report_order(&self, other: &Self) -> Ordering {
        other
            .severity
            .cmp(&self.severity)
            .then_with(|| self.metric.cmp(&other.metric))
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={} (yellow-max={})",
            self.metric,
            self.value,
            self.boundary()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reasons", rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn(Vec<Reason>),
    Block(Vec<Reason>),
}

impl Verdict {
    /// Build a verdict from classified measurements using worst-of.
    ///
    /// Green entries are dropped; the rest are ordered red first, then by
    /// metric name.
    pub fn from_reasons(reasons: impl IntoIterator<Item = Reason>) -> Self {
        let mut reasons: Vec<Reason> = reasons
            .into_iter()
            .filter(|r| r.severity != Severity::Green)
            .collect();
        reasons.sort_by(Reason::report_order);

        match reasons.first().map(|r| r.severity) {
            None => Self::Pass,
            Some(Severity::Red) => Self::Block(reasons),
            Some(_) => Self::Warn(reasons),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Pass => Severity::Green,
            Self::Warn(_) => Severity::Yellow,
            Self::Block(_) => Severity::Red,
        }
    }

    pub fn reasons(&self) -> &[Reason] {
        match self {
            Self::Pass => &[],
            Self::Warn(reasons) | Self::Block(reasons) => reasons,
        }
    }

    pub fn worst_reason(&self) -> Option<&Reason> {
        self.reasons().first()
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block(_))
    }
}
