//! Core data model: metric records, verdicts, and baseline snapshots.

pub mod baseline;
pub mod errors;
pub mod metrics;
pub mod verdict;

pub use baseline::{BaselineSnapshot, BASELINE_SCHEMA_VERSION};
pub use errors::{Error, Result};
pub use metrics::{names, KnownIdentity, MetricRecord, RawMetricRecord, UnitId, UnitKind};
pub use verdict::{Reason, Severity, Verdict};
