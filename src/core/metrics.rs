//! Metric records produced by an external analyzer.
//!
//! A [`MetricRecord`] identifies one unit of code (a function or a file) and
//! carries its named measurements. Records arrive as [`RawMetricRecord`]s,
//! where every identity field is optional, and are validated into
//! `MetricRecord`s before evaluation.

use super::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Well-known metric names.
pub mod names {
    /// Cyclomatic complexity of a function
    pub const CYCLOMATIC: &str = "cyclomatic";
    /// Maximum lexical nesting of conditionals and loops
    pub const NESTING_DEPTH: &str = "nesting_depth";
    /// Maximum depth of nested callbacks / closures
    pub const CALLBACK_DEPTH: &str = "callback_depth";
    /// Lines per function
    pub const LINES: &str = "lines";
    /// Parameter count
    pub const PARAMS: &str = "params";
    /// Aggregate complexity of a unit (per file for file records)
    pub const TOTAL_COMPLEXITY: &str = "total_complexity";

    pub const BUILTIN: [&str; 6] = [
        CYCLOMATIC,
        NESTING_DEPTH,
        CALLBACK_DEPTH,
        LINES,
        PARAMS,
        TOTAL_COMPLEXITY,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Function,
    File,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => f.write_str("function"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Stable identity of a unit across runs, `<path>::<name>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(path: &std::path::Path, name: &str) -> Self {
        Self(format!("{}::{}", path.display(), name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Validated measurements for one unit of code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: String,
    pub path: PathBuf,
    pub kind: UnitKind,
    #[serde(default)]
    pub measurements: BTreeMap<String, u32>,
}

impl MetricRecord {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: UnitKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            measurements: BTreeMap::new(),
        }
    }

    pub fn function(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(name, path, UnitKind::Function)
    }

    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(name, path, UnitKind::File)
    }

    #[must_use]
    pub fn with_measurement(mut self, metric: impl Into<String>, value: u32) -> Self {
        self.measurements.insert(metric.into(), value);
        self
    }

    pub fn measurement(&self, metric: &str) -> Option<u32> {
        self.measurements.get(metric).copied()
    }

    pub fn identity(&self) -> UnitId {
        UnitId::new(&self.path, &self.name)
    }

    /// Aggregate complexity used by the ratchet.
    ///
    /// Prefers `total_complexity`, falls back to `cyclomatic`, and is 0 when
    /// neither was measured.
    pub fn total(&self) -> u64 {
        self.measurement(names::TOTAL_COMPLEXITY)
            .or_else(|| self.measurement(names::CYCLOMATIC))
            .map(u64::from)
            .unwrap_or(0)
    }
}

/// Record as emitted by the analyzer, before identity validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMetricRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "file")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub kind: Option<UnitKind>,
    #[serde(default)]
    pub measurements: BTreeMap<String, u32>,

    /// Why the record could not be read, when its JSON had the wrong shape
    #[serde(skip)]
    pub defect: Option<String>,
}

/// What is known about the unit behind a record, valid or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownIdentity {
    Unit(UnitId),
    Path(PathBuf),
    Unknown,
}

impl RawMetricRecord {
    /// Read one record from analyzer JSON.
    ///
    /// Never fails: a record of the wrong shape keeps whatever `name` and
    /// `path` strings it has and carries the deserialization error as its
    /// defect, so validation reports it for this unit only.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match Self::deserialize(value) {
            Ok(record) => record,
            Err(e) => {
                let text = |key: &str| value.get(key).and_then(serde_json::Value::as_str);
                Self {
                    name: text("name").map(str::to_string),
                    path: text("path").or_else(|| text("file")).map(PathBuf::from),
                    defect: Some(e.to_string()),
                    ..Self::default()
                }
            }
        }
    }

    pub fn known_identity(&self) -> KnownIdentity {
        let path = self.path.as_ref().filter(|p| !p.as_os_str().is_empty());
        match (non_blank(self.name.as_deref()), path) {
            (Some(name), Some(path)) => KnownIdentity::Unit(UnitId::new(path, name)),
            (None, Some(path)) => KnownIdentity::Path(path.clone()),
            _ => KnownIdentity::Unknown,
        }
    }

    /// Best-effort label for reporting, even when identity fields are missing
    pub fn label(&self) -> Option<String> {
        non_blank(self.name.as_deref())
            .map(str::to_string)
            .or_else(|| self.path.as_ref().map(|p| p.display().to_string()))
    }

    pub fn validate(self) -> Result<MetricRecord> {
        MetricRecord::try_from(self)
    }
}

impl TryFrom<RawMetricRecord> for MetricRecord {
    type Error = Error;

    fn try_from(raw: RawMetricRecord) -> Result<Self> {
        let unit = raw.label().unwrap_or_else(|| "<unnamed>".to_string());
        if let Some(defect) = raw.defect {
            return Err(Error::malformed(unit, defect));
        }

        let name = non_blank(raw.name.as_deref())
            .ok_or_else(|| Error::malformed(&unit, "missing field `name`"))?
            .to_string();
        let path = raw
            .path
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::malformed(&unit, "missing field `path`"))?;
        let kind = raw
            .kind
            .ok_or_else(|| Error::malformed(&unit, "missing field `kind`"))?;

        Ok(Self {
            name,
            path,
            kind,
            measurements: raw.measurements,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
