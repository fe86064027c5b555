//! Baseline snapshots consumed and produced by the ratchet.

use super::metrics::{KnownIdentity, MetricRecord, UnitId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version written into persisted snapshots.
pub const BASELINE_SCHEMA_VERSION: u32 = 1;

/// Last-known aggregate complexity per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub totals: BTreeMap<UnitId, u64>,
}

fn default_schema_version() -> u32 {
    BASELINE_SCHEMA_VERSION
}

impl Default for BaselineSnapshot {
    fn default() -> Self {
        Self {
            schema_version: BASELINE_SCHEMA_VERSION,
            generated_at: None,
            totals: BTreeMap::new(),
        }
    }
}

impl BaselineSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the totals of the given records. Later duplicates of the
    /// same identity win.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MetricRecord>) -> Self {
        let totals = records
            .into_iter()
            .map(|record| (record.identity(), record.total()))
            .collect();
        Self {
            totals,
            ..Self::default()
        }
    }

    /// Snapshot to persist after a run.
    ///
    /// Validated `records` replace their entries. Entries of units whose
    /// record failed validation are carried over from `self`, so a malformed
    /// record cannot drop a unit out of the ratchet: an exact identity keeps
    /// that unit, a bare path keeps every unit of that path not re-measured.
    /// Returns `None` when a failed record carries no path at all, since no
    /// entry can then be matched to it.
    pub fn advance(&self, records: &[MetricRecord], errored: &[KnownIdentity]) -> Option<Self> {
        let mut next = Self::from_records(records);

        for identity in errored {
            match identity {
                KnownIdentity::Unit(unit) => {
                    if let Some(total) = self.total_for(unit) {
                        next.totals.entry(unit.clone()).or_insert(total);
                    }
                }
                KnownIdentity::Path(path) => {
                    let prefix = format!("{}::", path.display());
                    for (unit, total) in &self.totals {
                        if unit.as_str().starts_with(&prefix) {
                            next.totals.entry(unit.clone()).or_insert(*total);
                        }
                    }
                }
                KnownIdentity::Unknown => return None,
            }
        }

        Some(next)
    }

    #[must_use]
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn insert(&mut self, unit: UnitId, total: u64) -> Option<u64> {
        self.totals.insert(unit, total)
    }

    pub fn total_for(&self, unit: &UnitId) -> Option<u64> {
        self.totals.get(unit).copied()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}
